//! Scene graph primitives consumed by the object caches.
//!
//! [`SceneNode`] is the attachment target: it holds strong references to its
//! children while each child holds only a weak back-reference to its parent
//! ([`AttachPoint`]), which is what breaks the node ↔ attached-object ↔ cache
//! ownership cycle.

mod node;
#[allow(clippy::module_inception)]
mod scene;

pub use node::{AttachPoint, Attachable, SceneAttachment, SceneNode};
pub use scene::Scene;
