#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cache;
pub mod engine;
pub mod errors;
pub mod plugin;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod version;

pub use cache::{CacheElement, CacheSnapshot, Lifecycle, LifecycleState, MergeOp, ObjectCache, ResourceCache};
pub use engine::Engine;
pub use errors::{Error, Result};
pub use plugin::{Plugin, PluginCache, PluginCategory};
pub use resources::{
    Camera, CameraDesc, Light, LightDesc, LightKind, Material, MaterialDesc, Mesh, MeshDesc,
    RenderTarget, RenderTargetDesc, Sampler, SamplerDesc,
};
pub use scene::{AttachPoint, Attachable, Scene, SceneAttachment, SceneNode};
pub use settings::EngineSettings;
pub use version::{EngineVersion, ENGINE_VERSION};
