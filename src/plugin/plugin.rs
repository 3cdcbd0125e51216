//! The plugin element.

use std::fmt;
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::cache::{CacheElement, Lifecycle, LifecycleState};
use crate::engine::Engine;
use crate::plugin::library::{EntryPoints, LoadFn, UnloadFn};
use crate::version::EngineVersion;

/// Category a plugin declares through `ember_plugin_category`; the secondary
/// index of the plugin cache is keyed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PluginCategory {
    Renderer = 0,
    Importer = 1,
    Exporter = 2,
    Script = 3,
    Other = 4,
}

impl PluginCategory {
    /// Maps the raw `u32` a library reports to a category; unknown values
    /// fold into [`Other`](Self::Other) rather than failing the load.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Renderer,
            1 => Self::Importer,
            2 => Self::Exporter,
            3 => Self::Script,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Renderer => "renderer",
            Self::Importer => "importer",
            Self::Exporter => "exporter",
            Self::Script => "script",
            Self::Other => "other",
        }
    }
}

/// A loaded plugin: validated metadata, the on-load/on-unload entry points,
/// and the library handle they were resolved from.
///
/// The `Library` is owned exclusively by this struct and is the last field,
/// so it is dropped after the function pointers become unreachable — closing
/// it any earlier would invalidate every entry point derived from it. It
/// closes only when the final `Arc<Plugin>` is released, so outstanding
/// holders never observe dangling pointers.
pub struct Plugin {
    name: String,
    category: PluginCategory,
    required_version: EngineVersion,
    path: PathBuf,
    lifecycle: Lifecycle,
    load_fn: LoadFn,
    unload_fn: UnloadFn,
    _library: Option<Library>,
}

impl Plugin {
    pub(crate) fn from_parts(entry: EntryPoints, library: Library, path: &Path) -> Self {
        Self {
            name: entry.name,
            category: entry.category,
            required_version: entry.required_version,
            path: path.to_path_buf(),
            lifecycle: Lifecycle::new(),
            load_fn: entry.load,
            unload_fn: entry.unload,
            _library: Some(library),
        }
    }

    /// Library-less plugin for exercising the registry indices.
    #[cfg(test)]
    pub(crate) fn stub(name: &str, category: PluginCategory, required_version: EngineVersion) -> Self {
        unsafe extern "C" fn load(_: *const Engine, _: *const Plugin) {}
        unsafe extern "C" fn unload(_: *const Engine) {}
        Self {
            name: name.to_string(),
            category,
            required_version,
            path: PathBuf::from(name),
            lifecycle: Lifecycle::new(),
            load_fn: load,
            unload_fn: unload,
            _library: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn category(&self) -> PluginCategory {
        self.category
    }

    /// Engine version the plugin was built against.
    #[inline]
    #[must_use]
    pub fn required_version(&self) -> EngineVersion {
        self.required_version
    }

    /// Path of the library file the plugin was loaded from.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Invokes the plugin's on-load entry point. Called by the plugin cache
    /// after registration, outside its critical section.
    pub(crate) fn on_load(&self, engine: &Engine) {
        self.lifecycle.mark_initialised();
        // SAFETY: resolved from the still-open library this struct owns;
        // the engine and plugin pointers outlive the call.
        unsafe {
            (self.load_fn)(std::ptr::from_ref(engine), std::ptr::from_ref(self));
        }
    }

    /// Invokes the plugin's on-unload entry point during teardown.
    pub(crate) fn on_unload(&self, engine: &Engine) {
        // SAFETY: as for `on_load`; the library is still open because the
        // cache has not yet released its reference.
        unsafe {
            (self.unload_fn)(std::ptr::from_ref(engine));
        }
        self.lifecycle.mark_cleaned_up();
    }
}

impl CacheElement for Plugin {}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("required_version", &self.required_version)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
