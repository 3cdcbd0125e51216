use std::sync::Arc;

use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;
use crate::scene::{AttachPoint, Attachable, SceneAttachment, SceneNode};

/// Construction arguments for a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDesc {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            fov_y: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// A viewpoint attached to a scene-graph node; the node's transform places
/// and orients it.
pub struct Camera {
    name: String,
    desc: CameraDesc,
    attach: AttachPoint,
    lifecycle: Lifecycle,
}

impl Camera {
    #[must_use]
    pub fn new(name: impl Into<String>, desc: CameraDesc) -> Self {
        Self {
            name: name.into(),
            desc,
            attach: AttachPoint::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn desc(&self) -> CameraDesc {
        self.desc
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl SceneAttachment for Camera {
    fn attachment_name(&self) -> &str {
        &self.name
    }
}

impl Attachable for Camera {
    fn parent(&self) -> Option<Arc<SceneNode>> {
        self.attach.parent()
    }

    fn set_parent(&self, parent: Option<&Arc<SceneNode>>) {
        self.attach.set_parent(parent);
    }
}

impl CacheElement for Camera {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}
