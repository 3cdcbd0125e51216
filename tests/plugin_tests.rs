//! Plugin System Tests
//!
//! Tests for:
//! - EngineVersion: packed wire form, compatibility predicate
//! - PluginCategory: raw-value mapping
//! - Platform library naming and folder scanning helpers
//! - Load failure semantics: nothing registered, caches stay clean
//!
//! Loading a real plugin library needs a compiled cdylib and is exercised by
//! the engine's plugin SDK examples rather than unit tests; everything up to
//! the `dlopen` boundary is covered here.

use std::io::Write;
use std::path::PathBuf;

use ember::errors::Error;
use ember::plugin::library::{is_library_file, platform_library_filename};
use ember::{Engine, EngineVersion, PluginCategory};

// ============================================================================
// EngineVersion
// ============================================================================

#[test]
fn packed_version_roundtrips() {
    let version = EngineVersion {
        major: 1,
        minor: 4,
        patch: 9,
    };
    assert_eq!(EngineVersion::from_packed(version.to_packed()), version);
}

#[test]
fn plugin_built_against_older_minor_is_compatible() {
    let engine = EngineVersion {
        major: 1,
        minor: 4,
        patch: 0,
    };
    let required = EngineVersion {
        major: 1,
        minor: 2,
        patch: 7,
    };
    assert!(engine.is_compatible_with(required));
}

#[test]
fn plugin_requiring_newer_minor_is_incompatible() {
    let engine = EngineVersion {
        major: 1,
        minor: 4,
        patch: 0,
    };
    let required = EngineVersion {
        major: 1,
        minor: 5,
        patch: 0,
    };
    assert!(!engine.is_compatible_with(required));
}

#[test]
fn major_version_must_match_exactly() {
    let engine = EngineVersion {
        major: 2,
        minor: 0,
        patch: 0,
    };
    let older = EngineVersion {
        major: 1,
        minor: 9,
        patch: 0,
    };
    assert!(!engine.is_compatible_with(older));
}

#[test]
fn patch_level_never_affects_compatibility() {
    let engine = EngineVersion {
        major: 1,
        minor: 4,
        patch: 0,
    };
    let required = EngineVersion {
        major: 1,
        minor: 4,
        patch: 255,
    };
    assert!(engine.is_compatible_with(required));
}

// ============================================================================
// PluginCategory
// ============================================================================

#[test]
fn category_raw_values_map_to_variants() {
    assert_eq!(PluginCategory::from_raw(0), PluginCategory::Renderer);
    assert_eq!(PluginCategory::from_raw(1), PluginCategory::Importer);
    assert_eq!(PluginCategory::from_raw(2), PluginCategory::Exporter);
    assert_eq!(PluginCategory::from_raw(3), PluginCategory::Script);
    assert_eq!(PluginCategory::from_raw(4), PluginCategory::Other);
}

#[test]
fn unknown_category_folds_into_other() {
    assert_eq!(PluginCategory::from_raw(999), PluginCategory::Other);
}

// ============================================================================
// Platform Naming
// ============================================================================

#[test]
fn library_filename_follows_platform_convention() {
    let filename = platform_library_filename("water");
    if cfg!(target_os = "windows") {
        assert_eq!(filename, "water.dll");
    } else if cfg!(target_os = "macos") {
        assert_eq!(filename, "libwater.dylib");
    } else {
        assert_eq!(filename, "libwater.so");
    }
}

#[test]
fn only_platform_libraries_are_scanned() {
    let library = PathBuf::from(platform_library_filename("water"));
    assert!(is_library_file(&library));
    assert!(!is_library_file(&PathBuf::from("readme.txt")));
    assert!(!is_library_file(&PathBuf::from("water")));
}

// ============================================================================
// Load Failure Semantics
// ============================================================================

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ember-plugin-tests-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn loading_a_missing_library_registers_nothing() {
    let engine = Engine::default();

    let err = engine
        .load_plugin("/nonexistent/ember/libnothing.so")
        .unwrap_err();
    assert!(matches!(err, Error::PluginLibrary(_)));
    assert!(engine.plugins.is_empty());
    assert!(engine.plugins.plugins_of(PluginCategory::Renderer).is_empty());
}

#[test]
fn loading_a_non_library_file_registers_nothing() {
    let engine = Engine::default();
    let dir = scratch_dir("bogus");
    let path = dir.join(platform_library_filename("bogus"));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is not a shared object").unwrap();
    }

    assert!(engine.load_plugin(&path).is_err());
    assert!(engine.plugins.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn named_load_with_no_matching_file_is_not_an_error() {
    let engine = Engine::default();
    let dir = scratch_dir("empty-named");

    let result = engine.load_plugin_named("water", &dir).unwrap();
    assert!(result.is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn folder_scan_skips_non_library_files() {
    let engine = Engine::default();
    let dir = scratch_dir("scan");
    std::fs::write(dir.join("notes.txt"), "hello").unwrap();

    let loaded = engine.load_all_plugins(Some(&dir)).unwrap();
    assert_eq!(loaded, 0);
    assert!(engine.plugins.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn folder_scan_tolerates_broken_libraries() {
    let engine = Engine::default();
    let dir = scratch_dir("broken");
    std::fs::write(dir.join(platform_library_filename("broken")), b"junk").unwrap();

    // The individual failure is logged, not propagated.
    let loaded = engine.load_all_plugins(Some(&dir)).unwrap();
    assert_eq!(loaded, 0);
    assert!(engine.plugins.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn scanning_a_missing_folder_is_an_io_error() {
    let engine = Engine::default();
    let missing = PathBuf::from("/nonexistent/ember/plugins");

    let err = engine.load_all_plugins(Some(&missing)).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn unloading_an_absent_plugin_returns_false() {
    let engine = Engine::default();
    assert!(!engine.plugins.unload_plugin(&engine, "ghost"));
}

#[test]
fn unconfigured_plugin_folder_loads_nothing() {
    let engine = Engine::default();
    assert_eq!(engine.load_all_plugins(None).unwrap(), 0);
}
