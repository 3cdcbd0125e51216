//! Concrete element categories the engine registers caches for.
//!
//! Each type pairs a plain-data `*Desc` (the cache's construction arguments)
//! with the element proper. Lights and cameras are attachable and live in
//! object caches; the rest are plain resource-cache elements.

mod camera;
mod light;
mod material;
mod mesh;
mod render_target;
mod sampler;

pub use camera::{Camera, CameraDesc};
pub use light::{Light, LightDesc, LightKind};
pub use material::{Material, MaterialDesc};
pub use mesh::{Mesh, MeshDesc};
pub use render_target::{RenderTarget, RenderTargetDesc};
pub use sampler::{AddressMode, FilterMode, Sampler, SamplerDesc};
