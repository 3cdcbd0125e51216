//! The scene element cached by the engine's scene registry.

use std::sync::Arc;

use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::errors::Result;
use crate::scene::SceneNode;

/// A named scene: a root node plus whatever the importer hangs below it.
///
/// Scenes are ordinary cache elements; the scene-file parser populates the
/// graph under [`root`](Self::root) through the node/light/camera object
/// caches.
pub struct Scene {
    name: String,
    root: Arc<SceneNode>,
    lifecycle: Lifecycle,
}

impl Scene {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Arc::new(SceneNode::new(format!("{name}.Root")));
        Self {
            name,
            root,
            lifecycle: Lifecycle::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scene's own root node; lives outside the node cache.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Arc<SceneNode> {
        &self.root
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl CacheElement for Scene {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.root.retire();
        self.lifecycle.mark_cleaned_up();
    }
}
