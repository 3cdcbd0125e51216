//! The scene-graph-aware registry.
//!
//! An [`ObjectCache`] is a [`ResourceCache`] whose elements occupy a position
//! in the scene graph. `add` takes the intended parent node and runs the
//! registered merger inside the same critical section as the map update, so
//! no accessor holding the cache lock can ever observe an element with zero
//! or two parents.

use std::sync::Arc;

use crate::cache::resource_cache::{CacheSnapshot, ConstructionArgs, ElementHook, Producer};
use crate::cache::{CacheElement, ResourceCache};
use crate::errors::{Error, Result};
use crate::scene::{Attachable, SceneAttachment, SceneNode};

/// Arguments handed to a merger: the element being (re-)attached, the parent
/// it is leaving (if any), and the parent it is joining.
pub struct MergeOp<'a, E> {
    pub element: &'a Arc<E>,
    pub old_parent: Option<Arc<SceneNode>>,
    pub new_parent: &'a Arc<SceneNode>,
}

/// Reconciles an element's scene-graph links after insert or re-attach.
/// Runs while the cache lock is held.
pub type Merger<E> = Box<dyn Fn(&MergeOp<'_, E>) + Send + Sync>;

/// The standard merger: remove from the old parent's child set, insert into
/// the new parent's, swap the weak back-reference. Both halves happen inside
/// the caller's critical section.
#[must_use]
pub fn reattach_merger<E>() -> Merger<E>
where
    E: Attachable,
{
    Box::new(|op: &MergeOp<'_, E>| {
        if let Some(old) = &op.old_parent {
            old.detach_child(op.element.as_ref());
        }
        op.new_parent
            .attach_child(Arc::clone(op.element) as Arc<dyn SceneAttachment>);
        op.element.set_parent(Some(op.new_parent));
    })
}

/// A [`ResourceCache`] for elements attached to the scene graph.
///
/// Read operations delegate to the base cache unchanged; `add`, `remove` and
/// `clear` are wrapped with attachment bookkeeping.
pub struct ObjectCache<A, E>
where
    E: Attachable,
{
    base: ResourceCache<A, E>,
    merger: Merger<E>,
}

impl<A, E> ObjectCache<A, E>
where
    A: ConstructionArgs,
    E: Attachable + CacheElement,
{
    /// Creates an empty object cache with the standard re-attach merger.
    #[must_use]
    pub fn new(label: impl Into<String>, producer: Producer<String, A, E>) -> Self {
        Self {
            base: ResourceCache::new(label, producer),
            merger: reattach_merger(),
        }
    }

    /// Replaces the standard merger.
    #[must_use]
    pub fn with_merger(mut self, merger: Merger<E>) -> Self {
        self.merger = merger;
        self
    }

    /// Registers a cleaner on the underlying cache, run when an element is
    /// removed (after it has been detached from its parent).
    #[must_use]
    pub fn with_cleaner(mut self, hook: ElementHook<E>) -> Self {
        self.base = self.base.with_cleaner(hook);
        self
    }

    /// Returns the element for `key`, constructing and attaching it under
    /// `parent` on first request.
    ///
    /// On a hit with a different parent, the element is re-parented through
    /// the merger; on a hit with the parent it already has, this is a no-op
    /// and the merger is not invoked. A retired parent is rejected with
    /// [`Error::InvalidParent`] before anything is looked up or produced.
    pub fn add(&self, key: String, parent: &Arc<SceneNode>, args: A) -> Result<Arc<E>> {
        if !parent.is_live() {
            return Err(Error::InvalidParent {
                key,
                reason: format!("parent node `{}` has been retired", parent.name()),
            });
        }

        self.base.add_with(key, args, |element, _created| {
            if let Some(current) = element.parent() {
                if Arc::ptr_eq(&current, parent) {
                    // Already attached here; nothing to merge.
                    return Ok(());
                }
                (self.merger)(&MergeOp {
                    element,
                    old_parent: Some(current),
                    new_parent: parent,
                });
            } else {
                (self.merger)(&MergeOp {
                    element,
                    old_parent: None,
                    new_parent: parent,
                });
            }
            Ok(())
        })
    }

    /// Detaches the element from its parent, then drops the cache's
    /// reference. Returns whether an element was present.
    pub fn remove(&self, key: &str) -> bool {
        self.base.remove_with(key, Self::detach)
    }

    /// Detaches and removes every element; used at cache teardown.
    pub fn clear(&self) {
        self.base.clear_with(Self::detach);
    }

    fn detach(element: &Arc<E>) {
        if let Some(parent) = element.parent() {
            parent.detach_child(element.as_ref());
        }
        element.set_parent(None);
    }

    // ------------------------------------------------------------------
    // Read operations, delegated unchanged
    // ------------------------------------------------------------------

    #[must_use]
    pub fn find(&self, key: &str) -> Option<Arc<E>> {
        self.base.find(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.base.has(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot<String, E> {
        self.base.snapshot()
    }

    pub fn for_each<F>(&self, visitor: F)
    where
        F: FnMut(&String, &Arc<E>),
    {
        self.base.for_each(visitor);
    }

    pub fn initialise_all(&self) -> Result<()> {
        self.base.initialise_all()
    }

    pub fn cleanup_all(&self) {
        self.base.cleanup_all();
    }
}
