use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;

/// Construction arguments for a [`Material`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    /// Base color, linear RGBA.
    pub diffuse: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            diffuse: [1.0, 1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

/// A named surface description. CPU-side metadata only; the rendering
/// pipeline derives its GPU state from this on `initialise`.
pub struct Material {
    name: String,
    desc: MaterialDesc,
    lifecycle: Lifecycle,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>, desc: &MaterialDesc) -> Self {
        Self {
            name: name.into(),
            desc: desc.clone(),
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
    pub fn desc(&self) -> &MaterialDesc {
        &self.desc
    }

    #[inline]
    #[must_use]
    pub fn diffuse(&self) -> [f32; 4] {
        self.desc.diffuse
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl CacheElement for Material {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}
