//! Scene-graph nodes and the attachment contract.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::cache::CacheElement;

/// Anything that can appear in a node's child set: child nodes, lights,
/// cameras, or any other object-cache element.
pub trait SceneAttachment: Send + Sync + 'static {
    /// The attachment's cache key; unique within one parent's child set.
    fn attachment_name(&self) -> &str;
}

/// An object-cache element that occupies a position in the scene graph.
///
/// Implementors embed an [`AttachPoint`] and delegate; the back-reference is
/// weak, so a child never extends its parent's lifetime.
pub trait Attachable: SceneAttachment {
    /// Current parent, if the node is still alive.
    fn parent(&self) -> Option<Arc<SceneNode>>;

    /// Swaps the weak back-reference. Called by the merge machinery while
    /// the owning cache's lock is held; not intended for direct use.
    fn set_parent(&self, parent: Option<&Arc<SceneNode>>);
}

/// The weak parent back-reference embedded by every attachable element.
#[derive(Debug)]
pub struct AttachPoint {
    parent: RwLock<Weak<SceneNode>>,
}

impl AttachPoint {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: RwLock::new(Weak::new()),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<Arc<SceneNode>> {
        self.parent.read().upgrade()
    }

    pub fn set_parent(&self, parent: Option<&Arc<SceneNode>>) {
        *self.parent.write() = parent.map_or_else(Weak::new, Arc::downgrade);
    }
}

impl Default for AttachPoint {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the scene graph.
///
/// Holds strong references to its attached children. A node removed from
/// the node cache is *retired*: it rejects further attachments, and elements
/// still holding its weak back-reference resolve their parent as absent once
/// every strong reference is gone.
pub struct SceneNode {
    name: String,
    attach: AttachPoint,
    children: RwLock<SmallVec<[Arc<dyn SceneAttachment>; 4]>>,
    live: AtomicBool,
}

impl SceneNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attach: AttachPoint::new(),
            children: RwLock::new(SmallVec::new()),
            live: AtomicBool::new(true),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the node may still accept attachments.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Marks the node as no longer part of the graph. Attaching to a retired
    /// node is rejected with `InvalidParent`.
    pub fn retire(&self) {
        self.live.store(false, Ordering::Release);
        self.children.write().clear();
    }

    /// Adds `child` to this node's child set. Callers are expected to have
    /// detached the child from its previous parent first; the standard
    /// merger does both halves under one cache critical section.
    pub fn attach_child(&self, child: Arc<dyn SceneAttachment>) {
        self.children.write().push(child);
    }

    /// Removes `child` from this node's child set, matching by identity
    /// rather than name: names are unique within one cache, not across
    /// caches, so a light and a camera sharing a name may sit under the
    /// same parent. Returns whether the child was present.
    pub fn detach_child(&self, child: &dyn SceneAttachment) -> bool {
        let mut children = self.children.write();
        match children
            .iter()
            .position(|c| std::ptr::addr_eq(Arc::as_ptr(c), std::ptr::from_ref(child)))
        {
            Some(index) => {
                children.swap_remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.children
            .read()
            .iter()
            .any(|c| c.attachment_name() == name)
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Snapshot of the current child set.
    #[must_use]
    pub fn children(&self) -> Vec<Arc<dyn SceneAttachment>> {
        self.children.read().iter().cloned().collect()
    }
}

impl SceneAttachment for SceneNode {
    fn attachment_name(&self) -> &str {
        &self.name
    }
}

impl Attachable for SceneNode {
    fn parent(&self) -> Option<Arc<SceneNode>> {
        self.attach.parent()
    }

    fn set_parent(&self, parent: Option<&Arc<SceneNode>>) {
        self.attach.set_parent(parent);
    }
}

impl CacheElement for SceneNode {}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("children", &self.child_count())
            .field("live", &self.is_live())
            .finish()
    }
}
