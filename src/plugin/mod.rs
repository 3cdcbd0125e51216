//! Plugin loading.
//!
//! Plugins are units of functionality loaded from native dynamic libraries
//! at runtime. A library qualifies as a plugin by exposing five C-ABI entry
//! points with fixed symbol names (see [`library`]); a missing symbol or an
//! incompatible engine version is a load failure — the library is closed
//! immediately and nothing is registered.
//!
//! [`PluginCache`] indexes loaded plugins both by name and by
//! [`PluginCategory`], both maps updated in the same critical section.
//! On-load callbacks run *after* the cache lock is released, so a plugin may
//! register further resources into any engine cache, including this one.

pub mod library;
#[allow(clippy::module_inception)]
mod plugin;
mod plugin_cache;

pub use plugin::{Plugin, PluginCategory};
pub use plugin_cache::PluginCache;
