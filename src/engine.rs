//! Engine Core Module
//!
//! This module contains [`Engine`], the composition root of the registry
//! core. The engine exclusively owns one cache per resource category,
//! constructs all of them up front in [`Engine::new`], and hands references
//! to the subsystems that need them — no cache is reachable through ambient
//! or global lookup, which keeps teardown-order enforcement explicit and
//! testable.
//!
//! # Teardown order
//!
//! Caches whose elements may hold references into another cache's elements
//! are destroyed first: render targets before the scene cache, the scene
//! cache before the material cache, and the plugin cache last of all, since
//! plugins may be needed to correctly tear down resources they registered.
//! [`Engine::shutdown`] encodes this sequence and is idempotent; dropping
//! the engine runs it too.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cache::{CacheElement, ObjectCache, ResourceCache};
use crate::errors::{Error, Result};
use crate::plugin::{Plugin, PluginCache};
use crate::resources::{
    Camera, CameraDesc, Light, LightDesc, Material, MaterialDesc, Mesh, MeshDesc, RenderTarget,
    RenderTargetDesc, Sampler, SamplerDesc,
};
use crate::scene::{Scene, SceneNode};
use crate::settings::EngineSettings;

pub type MaterialCache = ResourceCache<MaterialDesc, Material>;
pub type MeshCache = ResourceCache<MeshDesc, Mesh>;
pub type SamplerCache = ResourceCache<SamplerDesc, Sampler>;
pub type RenderTargetCache = ResourceCache<RenderTargetDesc, RenderTarget>;
pub type SceneCache = ResourceCache<(), Scene>;
pub type NodeCache = ObjectCache<(), SceneNode>;
pub type LightCache = ObjectCache<LightDesc, Light>;
pub type CameraCache = ObjectCache<CameraDesc, Camera>;

/// The engine instance owning every resource registry.
///
/// # Components
///
/// - Plain resource caches: `materials`, `meshes`, `samplers`,
///   `render_targets`, `scenes`
/// - Object caches (scene-graph attached): `nodes`, `lights`, `cameras`
/// - `plugins`: the dynamic-library registry
///
/// The caches are public: external collaborators (renderer, importer,
/// editor, scripting) are ordinary clients of the public cache contract.
/// Cross-cache consistency is the caller's concern — within one cache
/// operations are linearizable, across caches there is no ordering
/// guarantee.
pub struct Engine {
    pub materials: MaterialCache,
    pub meshes: MeshCache,
    pub samplers: SamplerCache,
    pub render_targets: RenderTargetCache,
    pub scenes: SceneCache,
    pub nodes: NodeCache,
    pub lights: LightCache,
    pub cameras: CameraCache,
    pub plugins: PluginCache,

    root: Arc<SceneNode>,
    settings: EngineSettings,
    shut_down: AtomicBool,
}

impl Engine {
    /// Creates the engine and every cache it owns.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        let materials = ResourceCache::new(
            "materials",
            Box::new(|key: &String, desc: &MaterialDesc| Ok(Material::new(key.clone(), desc))),
        )
        .with_cleaner(Box::new(|m: &Arc<Material>| m.cleanup()));

        let meshes = ResourceCache::new(
            "meshes",
            Box::new(|key: &String, desc: &MeshDesc| Ok(Mesh::new(key.clone(), *desc))),
        )
        .with_cleaner(Box::new(|m: &Arc<Mesh>| m.cleanup()));

        let samplers = ResourceCache::new(
            "samplers",
            Box::new(|key: &String, desc: &SamplerDesc| Ok(Sampler::new(key.clone(), *desc))),
        )
        .with_cleaner(Box::new(|s: &Arc<Sampler>| s.cleanup()));

        let render_targets = ResourceCache::new(
            "render_targets",
            Box::new(|key: &String, desc: &RenderTargetDesc| {
                if desc.width == 0 || desc.height == 0 {
                    return Err(Error::ConstructionFailed {
                        key: key.clone(),
                        reason: format!("empty extent {}x{}", desc.width, desc.height),
                    });
                }
                Ok(RenderTarget::new(key.clone(), *desc))
            }),
        )
        .with_cleaner(Box::new(|rt: &Arc<RenderTarget>| rt.cleanup()));

        let scenes = ResourceCache::new(
            "scenes",
            Box::new(|key: &String, (): &()| Ok(Scene::new(key.clone()))),
        )
        .with_cleaner(Box::new(|s: &Arc<Scene>| s.cleanup()));

        let nodes = ObjectCache::new(
            "nodes",
            Box::new(|key: &String, (): &()| Ok(SceneNode::new(key.clone()))),
        )
        // A removed node must stop accepting attachments even while callers
        // still hold references to it.
        .with_cleaner(Box::new(|n: &Arc<SceneNode>| n.retire()));

        let lights = ObjectCache::new(
            "lights",
            Box::new(|key: &String, desc: &LightDesc| Ok(Light::new(key.clone(), *desc))),
        )
        .with_cleaner(Box::new(|l: &Arc<Light>| l.cleanup()));

        let cameras = ObjectCache::new(
            "cameras",
            Box::new(|key: &String, desc: &CameraDesc| Ok(Camera::new(key.clone(), *desc))),
        )
        .with_cleaner(Box::new(|c: &Arc<Camera>| c.cleanup()));

        Self {
            materials,
            meshes,
            samplers,
            render_targets,
            scenes,
            nodes,
            lights,
            cameras,
            plugins: PluginCache::new(settings.engine_version),
            root: Arc::new(SceneNode::new(settings.root_node_name.clone())),
            settings,
            shut_down: AtomicBool::new(false),
        }
    }

    /// The implicit scene-graph root; the one node that exists outside the
    /// node cache, so the first cached node always has a parent.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Arc<SceneNode> {
        &self.root
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ========================================================================
    // Convenience wrappers over the public cache contract
    // ========================================================================

    pub fn create_material(&self, name: &str, desc: MaterialDesc) -> Result<Arc<Material>> {
        self.materials.add(name.to_string(), desc)
    }

    pub fn create_mesh(&self, name: &str, desc: MeshDesc) -> Result<Arc<Mesh>> {
        self.meshes.add(name.to_string(), desc)
    }

    pub fn create_sampler(&self, name: &str, desc: SamplerDesc) -> Result<Arc<Sampler>> {
        self.samplers.add(name.to_string(), desc)
    }

    pub fn create_render_target(
        &self,
        name: &str,
        desc: RenderTargetDesc,
    ) -> Result<Arc<RenderTarget>> {
        self.render_targets.add(name.to_string(), desc)
    }

    pub fn create_scene(&self, name: &str) -> Result<Arc<Scene>> {
        self.scenes.add(name.to_string(), ())
    }

    /// Creates (or re-parents) a scene node under `parent`.
    pub fn create_node(&self, name: &str, parent: &Arc<SceneNode>) -> Result<Arc<SceneNode>> {
        self.nodes.add(name.to_string(), parent, ())
    }

    pub fn attach_light(
        &self,
        name: &str,
        parent: &Arc<SceneNode>,
        desc: LightDesc,
    ) -> Result<Arc<Light>> {
        self.lights.add(name.to_string(), parent, desc)
    }

    pub fn attach_camera(
        &self,
        name: &str,
        parent: &Arc<SceneNode>,
        desc: CameraDesc,
    ) -> Result<Arc<Camera>> {
        self.cameras.add(name.to_string(), parent, desc)
    }

    // ========================================================================
    // Plugins
    // ========================================================================

    pub fn load_plugin(&self, path: impl AsRef<Path>) -> Result<Arc<Plugin>> {
        self.plugins.load_plugin(self, path)
    }

    pub fn load_plugin_named(&self, name: &str, folder: &Path) -> Result<Option<Arc<Plugin>>> {
        self.plugins.load_plugin_named(self, name, folder)
    }

    /// Loads every plugin library in `folder`, or in the configured
    /// `plugin_folder` when `folder` is `None`. Returns the number loaded;
    /// `Ok(0)` when neither is given.
    pub fn load_all_plugins(&self, folder: Option<&Path>) -> Result<usize> {
        let folder = folder.or(self.settings.plugin_folder.as_deref());
        match folder {
            Some(folder) => self.plugins.load_all_plugins(self, folder),
            None => Ok(0),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Runs every element's `initialise` hook, cache by cache, in creation
    /// order. Called once all elements exist, before first use.
    pub fn initialise_resources(&self) -> Result<()> {
        self.samplers.initialise_all()?;
        self.materials.initialise_all()?;
        self.meshes.initialise_all()?;
        self.render_targets.initialise_all()?;
        self.scenes.initialise_all()?;
        self.nodes.initialise_all()?;
        self.lights.initialise_all()?;
        self.cameras.initialise_all()?;
        Ok(())
    }

    /// Tears every cache down in the declared order. Idempotent; also run
    /// on drop. Cache operations after shutdown are a precondition
    /// violation.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        log::debug!("engine shutdown: tearing down caches");

        self.render_targets.clear();
        self.cameras.clear();
        self.lights.clear();
        self.nodes.clear();
        self.scenes.clear();
        self.meshes.clear();
        self.materials.clear();
        self.samplers.clear();
        self.root.retire();

        // Last: plugins may be needed to tear down what they registered.
        self.plugins.unload_all(self);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
