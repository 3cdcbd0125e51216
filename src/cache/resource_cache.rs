//! The base name-keyed registry.
//!
//! # Creation protocol
//!
//! Client code calls `cache.add(name, args)`. The cache acquires its lock,
//! looks the name up, and on a miss invokes the producer, stores the result
//! and returns it; on a hit the existing element is returned unchanged and
//! the producer is *not* invoked again. A producer failure inserts nothing.
//!
//! First writer wins: when a second `add` supplies different construction
//! arguments than the original, the existing element is kept and the
//! divergence is logged (`log::warn!`), never silently absorbed.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::cache::CacheElement;
use crate::errors::Result;

/// Identity of an element within one cache. In practice a string name; any
/// hashable, totally ordered, cloneable value qualifies.
pub trait CacheKey: Eq + Hash + Ord + Clone + fmt::Debug + Send + Sync + 'static {}
impl<T: Eq + Hash + Ord + Clone + fmt::Debug + Send + Sync + 'static> CacheKey for T {}

/// Construction arguments accepted by a cache's producer. `PartialEq` and
/// `Debug` make the duplicate-arguments condition detectable and loggable.
pub trait ConstructionArgs: PartialEq + fmt::Debug + Send + Sync + 'static {}
impl<T: PartialEq + fmt::Debug + Send + Sync + 'static> ConstructionArgs for T {}

/// Factory invoked under the cache lock for a previously-unseen key.
pub type Producer<K, A, E> = Box<dyn Fn(&K, &A) -> Result<E> + Send + Sync>;

/// Cache-level hook run against an element on insert (initialiser) or on
/// `remove`/`clear` (cleaner).
pub type ElementHook<E> = Box<dyn Fn(&Arc<E>) + Send + Sync>;

struct Entry<A, E> {
    /// Original construction arguments, kept only to detect divergence on a
    /// duplicate `add`.
    args: A,
    element: Arc<E>,
}

/// A thread-safe, lazily-constructing, name-keyed element registry.
///
/// The cache holds one strong reference per element; callers receive their
/// own `Arc` clones, so an element's lifetime is the union of all holders.
/// Removal drops the cache's reference only.
///
/// All operations take `&self`; the internal `parking_lot::Mutex` makes
/// concurrent `add` calls for the same key linearizable, with exactly one of
/// them performing construction.
pub struct ResourceCache<A, E, K = String> {
    label: String,
    inner: Mutex<FxHashMap<K, Entry<A, E>>>,
    producer: Producer<K, A, E>,
    initialiser: Option<ElementHook<E>>,
    cleaner: Option<ElementHook<E>>,
}

impl<A, E, K> ResourceCache<A, E, K>
where
    A: ConstructionArgs,
    E: CacheElement,
    K: CacheKey,
{
    /// Creates an empty cache. `label` names the cache in log lines.
    #[must_use]
    pub fn new(label: impl Into<String>, producer: Producer<K, A, E>) -> Self {
        Self {
            label: label.into(),
            inner: Mutex::new(FxHashMap::default()),
            producer,
            initialiser: None,
            cleaner: None,
        }
    }

    /// Registers a hook run right after an element is produced and inserted.
    #[must_use]
    pub fn with_initialiser(mut self, hook: ElementHook<E>) -> Self {
        self.initialiser = Some(hook);
        self
    }

    /// Registers a hook run when an element leaves the cache
    /// (`remove`/`clear`).
    #[must_use]
    pub fn with_cleaner(mut self, hook: ElementHook<E>) -> Self {
        self.cleaner = Some(hook);
        self
    }

    /// Returns the element for `key`, constructing it on first request.
    ///
    /// On a hit the existing element is returned and `args` is discarded
    /// (logged if it differs from the original). On a miss the producer runs
    /// under the cache lock; its failure leaves the cache untouched.
    pub fn add(&self, key: K, args: A) -> Result<Arc<E>> {
        self.add_with(key, args, |_, _| Ok(()))
    }

    /// `add` with a follow-up closure run inside the same critical section.
    ///
    /// `follow_up(element, created)` runs *before* a fresh element is
    /// inserted, so a failure leaves no partial registration. On a hit it
    /// runs with `created = false` against the existing element. This is the
    /// seam [`ObjectCache`](super::ObjectCache) hangs its merge logic on.
    pub(crate) fn add_with<F>(&self, key: K, args: A, follow_up: F) -> Result<Arc<E>>
    where
        F: FnOnce(&Arc<E>, bool) -> Result<()>,
    {
        let mut inner = self.inner.lock();

        if let Some(entry) = inner.get(&key) {
            if entry.args != args {
                log::warn!(
                    "[{}] `{:?}` already exists; differing construction arguments ignored (kept {:?}, got {:?})",
                    self.label, key, entry.args, args
                );
            }
            let element = entry.element.clone();
            follow_up(&element, false)?;
            return Ok(element);
        }

        let element = Arc::new((self.producer)(&key, &args)?);
        follow_up(&element, true)?;
        if let Some(hook) = &self.initialiser {
            hook(&element);
        }
        log::debug!("[{}] constructed `{:?}`", self.label, key);
        inner.insert(key, Entry { args, element: element.clone() });
        Ok(element)
    }

    /// Returns the element for `key` if present; never constructs.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<Arc<E>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key).map(|entry| entry.element.clone())
    }

    #[must_use]
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drops the cache's reference to the element under `key`, running the
    /// registered cleaner. Returns whether an element was present; removing
    /// an absent key is a no-op, not an error.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_with(key, |_| {})
    }

    /// `remove` with a detach closure run inside the critical section,
    /// before the cleaner.
    pub(crate) fn remove_with<Q, F>(&self, key: &Q, before: F) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&Arc<E>),
    {
        let mut inner = self.inner.lock();
        match inner.remove(key) {
            Some(entry) => {
                before(&entry.element);
                if let Some(hook) = &self.cleaner {
                    hook(&entry.element);
                }
                true
            }
            None => false,
        }
    }

    /// Removes all elements (unspecified order), running the cleaner on
    /// each. Used at cache teardown.
    pub fn clear(&self) {
        self.clear_with(|_| {});
    }

    pub(crate) fn clear_with<F>(&self, mut before: F)
    where
        F: FnMut(&Arc<E>),
    {
        let mut inner = self.inner.lock();
        for (_, entry) in inner.drain() {
            before(&entry.element);
            if let Some(hook) = &self.cleaner {
                hook(&entry.element);
            }
        }
    }

    /// Copies the current (key, element) pairs out under the lock and
    /// returns a restartable sequence over them. Later mutations of the
    /// cache do not affect an already-taken snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot<K, E> {
        let inner = self.inner.lock();
        CacheSnapshot {
            entries: inner
                .iter()
                .map(|(key, entry)| (key.clone(), entry.element.clone()))
                .collect(),
        }
    }

    /// Visits every (key, element) pair of a fresh snapshot. The lock is
    /// never held across `visitor` calls, so the visitor may freely call
    /// back into this cache.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &Arc<E>),
    {
        for (key, element) in self.snapshot().iter() {
            visitor(key, element);
        }
    }

    /// Runs every element's own [`initialise`](CacheElement::initialise)
    /// hook, outside the cache's critical section. Stops at the first
    /// failure.
    pub fn initialise_all(&self) -> Result<()> {
        for (_, element) in self.snapshot().iter() {
            element.initialise()?;
        }
        Ok(())
    }

    /// Runs every element's own [`cleanup`](CacheElement::cleanup) hook,
    /// outside the cache's critical section.
    pub fn cleanup_all(&self) {
        for (_, element) in self.snapshot().iter() {
            element.cleanup();
        }
    }

    /// Label used in log lines.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// An owned, restartable snapshot of a cache's contents at one instant.
pub struct CacheSnapshot<K, E> {
    entries: Vec<(K, Arc<E>)>,
}

impl<K, E> CacheSnapshot<K, E> {
    /// Iterates the snapshot; may be called any number of times.
    pub fn iter(&self) -> impl Iterator<Item = &(K, Arc<E>)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, E> IntoIterator for CacheSnapshot<K, E> {
    type Item = (K, Arc<E>);
    type IntoIter = std::vec::IntoIter<(K, Arc<E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, E> IntoIterator for &'a CacheSnapshot<K, E> {
    type Item = &'a (K, Arc<E>);
    type IntoIter = std::slice::Iter<'a, (K, Arc<E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
