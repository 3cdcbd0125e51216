use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    Repeat,
    ClampToEdge,
    MirrorRepeat,
}

/// Construction arguments for a [`Sampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerDesc {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub address_mode: AddressMode,
}

/// A named texture-sampling state.
pub struct Sampler {
    name: String,
    desc: SamplerDesc,
    lifecycle: Lifecycle,
}

impl Sampler {
    #[must_use]
    pub fn new(name: impl Into<String>, desc: SamplerDesc) -> Self {
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
    pub fn desc(&self) -> SamplerDesc {
        self.desc
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl CacheElement for Sampler {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}
