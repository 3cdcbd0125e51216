//! Engine configuration.

use std::path::PathBuf;

use crate::version::{EngineVersion, ENGINE_VERSION};

/// Configuration consumed by [`Engine::new`](crate::Engine::new).
///
/// Plain data with sensible defaults; construct with struct-update syntax:
///
/// ```rust,ignore
/// let settings = EngineSettings {
///     plugin_folder: Some("plugins".into()),
///     ..EngineSettings::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Folder scanned by [`Engine::load_all_plugins`](crate::Engine::load_all_plugins)
    /// when no folder is passed explicitly.
    pub plugin_folder: Option<PathBuf>,

    /// Version the engine reports to plugins during the compatibility check.
    /// Defaults to [`ENGINE_VERSION`]; overridable for test harnesses.
    pub engine_version: EngineVersion,

    /// Name of the implicit scene-graph root node.
    pub root_node_name: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            plugin_folder: None,
            engine_version: ENGINE_VERSION,
            root_node_name: "Root".to_string(),
        }
    }
}
