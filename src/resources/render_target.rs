use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;

/// Construction arguments for a [`RenderTarget`]. Zero extents are rejected
/// by the engine's producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetDesc {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
}

impl Default for RenderTargetDesc {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            samples: 1,
        }
    }
}

/// An off-screen surface the rendering pipeline draws into. The surface
/// memory itself is device-bound and acquired in `initialise`.
#[derive(Debug)]
pub struct RenderTarget {
    name: String,
    desc: RenderTargetDesc,
    lifecycle: Lifecycle,
}

impl RenderTarget {
    #[must_use]
    pub fn new(name: impl Into<String>, desc: RenderTargetDesc) -> Self {
        Self {
            name: name.into(),
            desc,
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
    pub fn desc(&self) -> RenderTargetDesc {
        self.desc
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.desc.width, self.desc.height)
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl CacheElement for RenderTarget {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}
