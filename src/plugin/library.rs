//! Dynamic-library plumbing: symbol contract, resolution, platform naming.
//!
//! # The plugin ABI
//!
//! A plugin library must export, with these exact symbol names:
//!
//! | symbol                        | signature                              |
//! |-------------------------------|----------------------------------------|
//! | `ember_plugin_engine_version` | `fn() -> u32` (packed, see [`EngineVersion::to_packed`]) |
//! | `ember_plugin_name`           | `fn() -> *const c_char`                |
//! | `ember_plugin_category`       | `fn() -> u32` (see [`PluginCategory::from_raw`]) |
//! | `ember_plugin_load`           | `fn(*const Engine, *const Plugin)`     |
//! | `ember_plugin_unload`         | `fn(*const Engine)`                    |
//!
//! All five are required. Resolution failures are mapped to
//! [`Error::IncompatiblePlugin`] rather than surfacing as null-pointer
//! hazards.

use std::ffi::{c_char, CStr};
use std::path::Path;

use libloading::{Library, Symbol};

use crate::engine::Engine;
use crate::errors::{Error, Result};
use crate::plugin::{Plugin, PluginCategory};
use crate::version::EngineVersion;

pub(crate) const SYM_ENGINE_VERSION: &[u8] = b"ember_plugin_engine_version\0";
pub(crate) const SYM_NAME: &[u8] = b"ember_plugin_name\0";
pub(crate) const SYM_CATEGORY: &[u8] = b"ember_plugin_category\0";
pub(crate) const SYM_LOAD: &[u8] = b"ember_plugin_load\0";
pub(crate) const SYM_UNLOAD: &[u8] = b"ember_plugin_unload\0";

pub(crate) type EngineVersionFn = unsafe extern "C" fn() -> u32;
pub(crate) type NameFn = unsafe extern "C" fn() -> *const c_char;
pub(crate) type CategoryFn = unsafe extern "C" fn() -> u32;
pub(crate) type LoadFn = unsafe extern "C" fn(*const Engine, *const Plugin);
pub(crate) type UnloadFn = unsafe extern "C" fn(*const Engine);

/// Everything read out of a library at load time.
pub(crate) struct EntryPoints {
    pub required_version: EngineVersion,
    pub name: String,
    pub category: PluginCategory,
    pub load: LoadFn,
    pub unload: UnloadFn,
}

/// Resolves the full entry-point set of `library`, calling the three query
/// functions once and copying their results out. Any missing symbol or
/// malformed metadata is an [`Error::IncompatiblePlugin`]; the caller drops
/// the library and registers nothing.
pub(crate) fn resolve_entry_points(library: &Library, path: &Path) -> Result<EntryPoints> {
    let incompatible = |reason: String| Error::IncompatiblePlugin {
        path: path.display().to_string(),
        reason,
    };

    // SAFETY: symbols are only called through the signatures the plugin
    // contract fixes for these names, and only while `library` is open.
    unsafe {
        let version_fn: Symbol<'_, EngineVersionFn> = library
            .get(SYM_ENGINE_VERSION)
            .map_err(|e| incompatible(format!("missing entry point `ember_plugin_engine_version`: {e}")))?;
        let name_fn: Symbol<'_, NameFn> = library
            .get(SYM_NAME)
            .map_err(|e| incompatible(format!("missing entry point `ember_plugin_name`: {e}")))?;
        let category_fn: Symbol<'_, CategoryFn> = library
            .get(SYM_CATEGORY)
            .map_err(|e| incompatible(format!("missing entry point `ember_plugin_category`: {e}")))?;
        let load_fn: Symbol<'_, LoadFn> = library
            .get(SYM_LOAD)
            .map_err(|e| incompatible(format!("missing entry point `ember_plugin_load`: {e}")))?;
        let unload_fn: Symbol<'_, UnloadFn> = library
            .get(SYM_UNLOAD)
            .map_err(|e| incompatible(format!("missing entry point `ember_plugin_unload`: {e}")))?;

        let name_ptr = name_fn();
        if name_ptr.is_null() {
            return Err(incompatible("plugin reported a null name".to_string()));
        }
        let name = CStr::from_ptr(name_ptr)
            .to_str()
            .map_err(|e| incompatible(format!("plugin name is not valid UTF-8: {e}")))?
            .to_owned();
        if name.is_empty() {
            return Err(incompatible("plugin reported an empty name".to_string()));
        }

        Ok(EntryPoints {
            required_version: EngineVersion::from_packed(version_fn()),
            name,
            category: PluginCategory::from_raw(category_fn()),
            load: *load_fn,
            unload: *unload_fn,
        })
    }
}

/// Platform-specific library file name for a bare plugin name:
/// `lib{name}.so`, `{name}.dll`, or `lib{name}.dylib`.
#[must_use]
pub fn platform_library_filename(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{name}.dll")
    } else if cfg!(target_os = "macos") {
        format!("lib{name}.dylib")
    } else {
        format!("lib{name}.so")
    }
}

/// Whether `path` looks like a dynamic library on this platform.
#[must_use]
pub fn is_library_file(path: &Path) -> bool {
    let expected = if cfg!(target_os = "windows") {
        "dll"
    } else if cfg!(target_os = "macos") {
        "dylib"
    } else {
        "so"
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == expected)
}
