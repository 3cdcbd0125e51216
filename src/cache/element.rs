//! The lifecycle contract for cached elements.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::errors::Result;

/// A resource that can live inside a [`ResourceCache`](super::ResourceCache).
///
/// Elements are constructed by the cache's producer with only cheap metadata
/// work; anything heavyweight (GPU buffers, OS handles) belongs in
/// [`initialise`](Self::initialise), which the owning subsystem calls lazily
/// — typically through `initialise_all` from a dedicated update pass, outside
/// any cache critical section.
///
/// Both hooks default to no-ops for elements without device-bound state.
pub trait CacheElement: Send + Sync + 'static {
    /// Acquires the element's heavyweight resources. Must be reversible via
    /// [`cleanup`](Self::cleanup).
    fn initialise(&self) -> Result<()> {
        Ok(())
    }

    /// Releases the resources acquired by [`initialise`](Self::initialise).
    /// The element value itself stays alive until every holder releases it.
    fn cleanup(&self) {}
}

/// Progress of an element through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Produced, no heavyweight resources acquired yet.
    Constructed = 0,
    /// `initialise` has run.
    Initialised = 1,
    /// `cleanup` has run; the value may still be held by callers.
    CleanedUp = 2,
}

/// Atomic lifecycle tracker embedded by concrete element types.
///
/// Purely observational — the cache never inspects it; it exists so element
/// implementations can make their hook progress visible to diagnostics and
/// tests.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Constructed as u8),
        }
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        match self.state.load(Ordering::Acquire) {
            1 => LifecycleState::Initialised,
            2 => LifecycleState::CleanedUp,
            _ => LifecycleState::Constructed,
        }
    }

    pub fn mark_initialised(&self) {
        self.state
            .store(LifecycleState::Initialised as u8, Ordering::Release);
    }

    pub fn mark_cleaned_up(&self) {
        self.state
            .store(LifecycleState::CleanedUp as u8, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.state() == LifecycleState::Initialised
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
