use std::sync::Arc;

use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;
use crate::scene::{AttachPoint, Attachable, SceneAttachment, SceneNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    Directional,
    #[default]
    Point,
    Spot,
}

/// Construction arguments for a [`Light`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDesc {
    pub kind: LightKind,
    /// Linear RGB.
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            kind: LightKind::default(),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

/// A light source attached to a scene-graph node. The node's transform gives
/// the light its position and direction; the light itself carries only
/// photometric data.
#[derive(Debug)]
pub struct Light {
    name: String,
    desc: LightDesc,
    attach: AttachPoint,
    lifecycle: Lifecycle,
}

impl Light {
    #[must_use]
    pub fn new(name: impl Into<String>, desc: LightDesc) -> Self {
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
    pub fn desc(&self) -> LightDesc {
        self.desc
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> LightKind {
        self.desc.kind
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl SceneAttachment for Light {
    fn attachment_name(&self) -> &str {
        &self.name
    }
}

impl Attachable for Light {
    fn parent(&self) -> Option<Arc<SceneNode>> {
        self.attach.parent()
    }

    fn set_parent(&self, parent: Option<&Arc<SceneNode>>) {
        self.attach.set_parent(parent);
    }
}

impl CacheElement for Light {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}
