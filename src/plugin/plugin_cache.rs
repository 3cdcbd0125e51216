//! The plugin registry.

use std::path::Path;
use std::sync::Arc;

use libloading::Library;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::engine::Engine;
use crate::errors::{Error, Result};
use crate::plugin::library::{is_library_file, platform_library_filename, resolve_entry_points};
use crate::plugin::{Plugin, PluginCategory};
use crate::version::EngineVersion;

struct PluginInner {
    by_name: FxHashMap<String, Arc<Plugin>>,
    /// Secondary index; names here always resolve in `by_name` because both
    /// maps are updated in the same critical section.
    by_category: FxHashMap<PluginCategory, Vec<String>>,
    /// Names in load order; teardown walks this in reverse so inter-plugin
    /// dependencies established during loading unwind correctly.
    load_order: Vec<String>,
}

/// Registry of plugins loaded from native dynamic libraries, indexed by name
/// and by category.
///
/// Unlike the generic [`ResourceCache`](crate::ResourceCache), the key — the
/// plugin's self-reported name — is only known *after* the library has been
/// opened and queried, so lookup cannot precede construction; dedup happens
/// at registration instead, with the freshly opened library simply dropped
/// on a name collision.
pub struct PluginCache {
    inner: Mutex<PluginInner>,
    engine_version: EngineVersion,
}

impl PluginCache {
    /// Creates an empty registry that validates plugins against
    /// `engine_version`.
    #[must_use]
    pub fn new(engine_version: EngineVersion) -> Self {
        Self {
            inner: Mutex::new(PluginInner {
                by_name: FxHashMap::default(),
                by_category: FxHashMap::default(),
                load_order: Vec::new(),
            }),
            engine_version,
        }
    }

    /// Loads the plugin library at `path`.
    ///
    /// Opens the library, resolves the five required entry points, and
    /// checks the reported engine version; any failure closes the library
    /// with nothing registered. On success the plugin lands in the name map,
    /// the category index and the load-order list under one critical
    /// section, and its on-load entry point runs after the lock is released
    /// — it may therefore register further resources into any engine cache.
    ///
    /// Loading a library whose plugin name is already registered returns the
    /// existing plugin unchanged.
    pub fn load_plugin(&self, engine: &Engine, path: impl AsRef<Path>) -> Result<Arc<Plugin>> {
        let path = path.as_ref();

        // SAFETY: loading a library runs its platform initializers; the
        // plugin contract requires them to be sound.
        let library = unsafe { Library::new(path) }?;
        let entry = resolve_entry_points(&library, path)?;

        if !self.engine_version.is_compatible_with(entry.required_version) {
            // Dropping `library` closes it; nothing was registered.
            return Err(Error::IncompatiblePlugin {
                path: path.display().to_string(),
                reason: format!(
                    "built against engine {}, running {}",
                    entry.required_version, self.engine_version
                ),
            });
        }

        let plugin = Arc::new(Plugin::from_parts(entry, library, path));
        let (plugin, created) = self.register(plugin);
        if !created {
            log::debug!(
                "plugin `{}` already loaded from {}; ignoring {}",
                plugin.name(),
                plugin.path().display(),
                path.display()
            );
            return Ok(plugin);
        }

        log::debug!(
            "loaded {} plugin `{}` (requires engine {}) from {}",
            plugin.category().as_str(),
            plugin.name(),
            plugin.required_version(),
            path.display()
        );
        plugin.on_load(engine);
        Ok(plugin)
    }

    /// Inserts `plugin` into the name map, the category index and the
    /// load-order list under one critical section. On a name collision the
    /// already-registered plugin is returned instead, with `false`; the
    /// newcomer's library closes as its `Arc` drops.
    pub(crate) fn register(&self, plugin: Arc<Plugin>) -> (Arc<Plugin>, bool) {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.by_name.get(plugin.name()) {
            return (existing.clone(), false);
        }
        let name = plugin.name().to_string();
        inner
            .by_category
            .entry(plugin.category())
            .or_default()
            .push(name.clone());
        inner.load_order.push(name.clone());
        inner.by_name.insert(name, plugin.clone());
        (plugin, true)
    }

    /// Resolves `name` to a platform library file under `folder` and loads
    /// it. Returns `Ok(None)` — not an error — when no such file exists.
    pub fn load_plugin_named(
        &self,
        engine: &Engine,
        name: &str,
        folder: &Path,
    ) -> Result<Option<Arc<Plugin>>> {
        let path = folder.join(platform_library_filename(name));
        if !path.is_file() {
            return Ok(None);
        }
        self.load_plugin(engine, &path).map(Some)
    }

    /// Attempts to load every library file in `folder`, logging individual
    /// failures without aborting the scan. Returns the number loaded.
    pub fn load_all_plugins(&self, engine: &Engine, folder: &Path) -> Result<usize> {
        let mut loaded = 0;
        for dir_entry in std::fs::read_dir(folder)? {
            let path = match dir_entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    log::error!("failed to read entry in plugin folder {}: {e}", folder.display());
                    continue;
                }
            };
            if !is_library_file(&path) {
                continue;
            }
            match self.load_plugin(engine, &path) {
                Ok(_) => loaded += 1,
                Err(e) => log::error!("failed to load plugin {}: {e}", path.display()),
            }
        }
        Ok(loaded)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Plugin>> {
        self.inner.lock().by_name.get(name).cloned()
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.inner.lock().by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().by_name.is_empty()
    }

    /// Snapshot of the category index: every loaded plugin of `category`,
    /// keyed by name.
    #[must_use]
    pub fn plugins_of(&self, category: PluginCategory) -> FxHashMap<String, Arc<Plugin>> {
        let inner = self.inner.lock();
        inner
            .by_category
            .get(&category)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| inner.by_name.get(n).map(|p| (n.clone(), p.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unloads the named plugin: on-unload entry point first, then the
    /// cache's reference is dropped (the library closes with the last
    /// outstanding `Arc`). Returns whether the plugin was present.
    pub fn unload_plugin(&self, engine: &Engine, name: &str) -> bool {
        let plugin = {
            let mut inner = self.inner.lock();
            let Some(plugin) = inner.by_name.remove(name) else {
                return false;
            };
            if let Some(names) = inner.by_category.get_mut(&plugin.category()) {
                names.retain(|n| n != name);
            }
            inner.load_order.retain(|n| n != name);
            plugin
        };
        plugin.on_unload(engine);
        log::debug!("unloaded plugin `{name}`");
        true
    }

    /// Unloads every plugin in the reverse of load order. Called by engine
    /// teardown, after every other cache has been cleared.
    pub fn unload_all(&self, engine: &Engine) {
        for plugin in self.drain_reverse() {
            plugin.on_unload(engine);
            log::debug!("unloaded plugin `{}`", plugin.name());
        }
    }

    /// Empties every index and returns the plugins in reverse load order,
    /// so inter-plugin dependencies established during loading unwind
    /// correctly.
    pub(crate) fn drain_reverse(&self) -> Vec<Arc<Plugin>> {
        let mut inner = self.inner.lock();
        let order = std::mem::take(&mut inner.load_order);
        inner.by_category.clear();
        order
            .iter()
            .rev()
            .filter_map(|name| inner.by_name.remove(name))
            .collect()
    }
}
