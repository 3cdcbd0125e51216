use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;

/// Construction arguments for a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshDesc {
    pub vertex_count: u32,
    pub index_count: u32,
}

/// Geometry metadata. Vertex data itself lives with the excluded procedural
/// generation / import collaborators; the cache tracks identity and buffer
/// shape.
pub struct Mesh {
    name: String,
    desc: MeshDesc,
    lifecycle: Lifecycle,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, desc: MeshDesc) -> Self {
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
    pub fn desc(&self) -> MeshDesc {
        self.desc
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl CacheElement for Mesh {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}
