//! Script registry — maps script names to factories.
//!
//! The registry is an explicit value owned by whoever drives the frame loop.
//! It must be fully populated (factories registered, plugins loaded) before
//! the loop starts; it is not designed for concurrent mutation.
//!
//! Names are unique. Registering a name twice is rejected with
//! [`ScriptError::DuplicateRegistration`] rather than silently replacing the
//! first factory, since instances of the old type may still be alive.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use tracing::{info, warn};

use crate::error::ScriptError;
use crate::plugin::{PluginLibrary, is_plugin_file};
use crate::script::Script;

/// Creates a fresh script instance.
///
/// A plain function pointer, so a factory can cross a plugin boundary.
pub type ScriptFactory = fn() -> Box<dyn Script>;

/// Factory for any `Default` script type, usable as a [`ScriptFactory`].
#[must_use]
pub fn default_factory<S: Script + Default>() -> Box<dyn Script> {
    Box::new(S::default())
}

#[derive(Debug)]
struct ScriptEntry {
    factory: ScriptFactory,
    /// The plugin that provided the factory, if any.
    origin: Option<Rc<PluginLibrary>>,
}

/// A script instance produced by the registry.
///
/// Keeps its plugin library mapped until the instance itself is dropped.
pub struct ScriptInstance {
    name: String,
    // Declared before `origin` so the script drops while its code is mapped.
    script: Box<dyn Script>,
    origin: Option<Rc<PluginLibrary>>,
}

impl ScriptInstance {
    /// The name the instance was created under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The script behind this instance.
    #[must_use]
    pub fn script(&self) -> &(dyn Script + 'static) {
        self.script.as_ref()
    }

    /// The script behind this instance, mutably.
    pub fn script_mut(&mut self) -> &mut (dyn Script + 'static) {
        self.script.as_mut()
    }

    /// Returns `true` if the instance was created by a plugin library.
    #[must_use]
    pub fn is_from_plugin(&self) -> bool {
        self.origin.is_some()
    }
}

impl std::fmt::Debug for ScriptInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptInstance")
            .field("name", &self.name)
            .field("from_plugin", &self.is_from_plugin())
            .finish_non_exhaustive()
    }
}

/// The catalogue of known scripts.
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    entries: HashMap<String, ScriptEntry>,
}

impl ScriptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &str, entry: ScriptEntry) -> Result<(), ScriptError> {
        if self.entries.contains_key(name) {
            warn!(script = name, "rejected duplicate script registration");
            return Err(ScriptError::DuplicateRegistration {
                name: name.to_string(),
            });
        }
        info!(
            script = name,
            plugin = entry.origin.is_some(),
            "script registered"
        );
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// Register `factory` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::DuplicateRegistration`] if `name` is taken.
    pub fn register_factory(
        &mut self,
        name: impl AsRef<str>,
        factory: ScriptFactory,
    ) -> Result<(), ScriptError> {
        self.insert(
            name.as_ref(),
            ScriptEntry {
                factory,
                origin: None,
            },
        )
    }

    /// Register the `Default` constructor of `S` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::DuplicateRegistration`] if `name` is taken.
    pub fn register_default<S: Script + Default>(
        &mut self,
        name: impl AsRef<str>,
    ) -> Result<(), ScriptError> {
        self.register_factory(name, default_factory::<S>)
    }

    /// Returns `true` if a factory is registered under `name`.
    #[must_use]
    pub fn check_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Create a new instance of the script registered under `name`.
    ///
    /// Ownership of the instance passes to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::NotRegistered`] if `name` is unknown.
    pub fn instantiate(&self, name: &str) -> Result<ScriptInstance, ScriptError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ScriptError::NotRegistered {
                name: name.to_string(),
            })?;
        Ok(ScriptInstance {
            name: name.to_string(),
            script: (entry.factory)(),
            origin: entry.origin.clone(),
        })
    }

    /// Remove the factory registered under `name`.
    ///
    /// Existing instances are unaffected. Returns `false` if `name` was
    /// unknown.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Load the plugin library at `path` and register the script it exports.
    ///
    /// Returns the registered script name.
    ///
    /// # Errors
    ///
    /// Returns any [`PluginLibrary::open`] error, or
    /// [`ScriptError::DuplicateRegistration`] if the plugin's name is taken
    /// (the library is unloaded again in that case).
    pub fn load_plugin(&mut self, path: impl AsRef<Path>) -> Result<String, ScriptError> {
        let library = Rc::new(PluginLibrary::open(path)?);
        let name = library.name().to_string();
        self.insert(
            &name,
            ScriptEntry {
                factory: library.factory(),
                origin: Some(library),
            },
        )?;
        Ok(name)
    }

    /// Load every plugin library in `dir`.
    ///
    /// Files without the platform's library extension are ignored. Libraries
    /// that fail to load are logged and skipped. Returns the names
    /// registered, in file name order.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::PluginDir`] if `dir` cannot be read.
    pub fn load_plugin_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<String>, ScriptError> {
        let dir = dir.as_ref();
        let read_error = |source| ScriptError::PluginDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if is_plugin_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_plugin(&path) {
                Ok(name) => loaded.push(name),
                Err(error) => warn!(path = %path.display(), %error, "skipping plugin"),
            }
        }
        info!(dir = %dir.display(), count = loaded.len(), "plugin directory loaded");
        Ok(loaded)
    }

    /// Unregister a plugin-provided script.
    ///
    /// The library stays mapped until every instance created from it has been
    /// dropped. Returns `false` if `name` is unknown or was not registered by a
    /// plugin.
    pub fn unload_plugin(&mut self, name: &str) -> bool {
        let from_plugin = self
            .entries
            .get(name)
            .is_some_and(|entry| entry.origin.is_some());
        if from_plugin {
            self.entries.remove(name);
            info!(script = name, "plugin script unregistered");
        }
        from_plugin
    }

    /// Registered script names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered scripts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptContext;

    #[derive(Default)]
    struct Jump {
        height: f32,
    }

    impl Script for Jump {
        fn update(&mut self, _ctx: &ScriptContext<'_>) {
            self.height += 1.0;
        }
    }

    #[derive(Default)]
    struct Patrol;

    impl Script for Patrol {}

    fn make_patrol() -> Box<dyn Script> {
        Box::new(Patrol)
    }

    #[test]
    fn test_check_registered_flips_on_register() {
        let mut registry = ScriptRegistry::new();
        assert!(!registry.check_registered("Jump"));
        registry.register_default::<Jump>("Jump").unwrap();
        assert!(registry.check_registered("Jump"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_instantiate_builds_fresh_instances() {
        let mut registry = ScriptRegistry::new();
        registry.register_default::<Jump>("Jump").unwrap();

        let mut first = registry.instantiate("Jump").unwrap();
        let second = registry.instantiate("Jump").unwrap();
        first.script_mut().downcast_mut::<Jump>().unwrap().height = 3.0;

        assert_eq!(first.name(), "Jump");
        assert!(!first.is_from_plugin());
        assert_eq!(second.script().downcast_ref::<Jump>().unwrap().height, 0.0);
    }

    #[test]
    fn test_instantiate_unknown_is_not_registered() {
        let registry = ScriptRegistry::new();
        let err = registry.instantiate("Ghost").unwrap_err();
        assert!(matches!(err, ScriptError::NotRegistered { name } if name == "Ghost"));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ScriptRegistry::new();
        registry.register_default::<Jump>("Jump").unwrap();
        let err = registry.register_factory("Jump", make_patrol).unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateRegistration { .. }));

        // The first factory is untouched.
        let instance = registry.instantiate("Jump").unwrap();
        assert!(instance.script().downcast_ref::<Jump>().is_some());
    }

    #[test]
    fn test_unregister() {
        let mut registry = ScriptRegistry::new();
        registry.register_factory("Patrol", make_patrol).unwrap();
        assert!(registry.unregister("Patrol"));
        assert!(!registry.unregister("Patrol"));
        assert!(!registry.check_registered("Patrol"));
    }

    #[test]
    fn test_unload_plugin_ignores_in_process_factories() {
        let mut registry = ScriptRegistry::new();
        registry.register_factory("Patrol", make_patrol).unwrap();
        assert!(!registry.unload_plugin("Patrol"));
        assert!(registry.check_registered("Patrol"));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ScriptRegistry::new();
        registry.register_factory("Patrol", make_patrol).unwrap();
        registry.register_default::<Jump>("Jump").unwrap();
        assert_eq!(registry.names(), vec!["Jump", "Patrol"]);
    }

    #[test]
    fn test_load_plugin_dir_missing_dir() {
        let mut registry = ScriptRegistry::new();
        let err = registry
            .load_plugin_dir("/nonexistent/hydrogen/plugins")
            .unwrap_err();
        assert!(matches!(err, ScriptError::PluginDir { .. }));
    }

    #[test]
    fn test_load_plugin_dir_ignores_non_libraries() {
        let dir = std::env::temp_dir().join(format!("hydrogen-plugins-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a plugin").unwrap();

        let mut registry = ScriptRegistry::new();
        let loaded = registry.load_plugin_dir(&dir).unwrap();
        assert!(loaded.is_empty());
        assert!(registry.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
