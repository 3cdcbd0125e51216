//! Generic Resource Registries
//!
//! Every engine-wide registry (materials, meshes, samplers, scene nodes,
//! lights, cameras, render targets, scenes) is an instance of the same
//! pattern: a thread-safe, name-keyed collection that lazily constructs
//! elements on first request and guarantees at most one live instance per
//! name.
//!
//! # Architecture
//!
//! - [`ResourceCache`]: the base registry — name→element map, lock, producer.
//! - [`ObjectCache`]: a registry whose elements additionally occupy a
//!   position in the scene graph; add/remove are wrapped with merge calls
//!   that rewire parent/child links atomically.
//! - [`CacheElement`]: the lifecycle contract every cached element fulfils.
//!
//! The plugin registry is a specialization with its own module, see
//! [`crate::plugin`].
//!
//! # Locking discipline
//!
//! Each cache owns one `parking_lot::Mutex`. `add` is a single critical
//! section across the existence check, the producer call, and the insertion,
//! which is what makes creation idempotent under concurrent callers.
//! Iteration copies the entries out first (`snapshot`) so visitor callbacks
//! never run under the lock.

mod element;
mod object_cache;
mod resource_cache;

pub use element::{CacheElement, Lifecycle, LifecycleState};
pub use object_cache::{reattach_merger, MergeOp, Merger, ObjectCache};
pub use resource_cache::{CacheKey, CacheSnapshot, ConstructionArgs, ElementHook, Producer, ResourceCache};
