//! Native script plugins.
//!
//! A plugin is a dynamic library (`cdylib`) exporting a `create_script`
//! function with the [`ScriptFactory`] signature, and optionally a
//! `script_name` function naming the script it creates. Both are generated by
//! [`export_script!`](crate::export_script). Without `script_name`, the
//! script is named after the library file, minus the platform prefix and
//! extension (`libjump.so` → `jump`).
//!
//! Plugins use the Rust ABI: they must be built by the same compiler as the
//! engine.
//!
//! A `cdylib` links its own copy of `tracing` with its own global dispatcher,
//! so events a plugin emits never reach the host's subscriber unless the
//! plugin installs one itself. Scripts that need host-visible diagnostics
//! should surface them through the components they write.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ScriptError;
use crate::registry::ScriptFactory;

/// Symbol every plugin must export.
pub const CREATE_SYMBOL: &[u8] = b"create_script";

/// Optional symbol naming the script a plugin creates.
pub const NAME_SYMBOL: &[u8] = b"script_name";

type NameFn = fn() -> &'static str;

/// A loaded plugin library.
///
/// The library stays mapped for as long as this value lives. The registry
/// and every instance created from it hold it through an `Rc`, so its code is
/// never unmapped underneath a live script.
pub struct PluginLibrary {
    name: String,
    path: PathBuf,
    create: ScriptFactory,
    library: libloading::Library,
}

impl PluginLibrary {
    /// Open the library at `path` and resolve its entry points.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::PluginLoad`] if the library cannot be opened,
    /// [`ScriptError::MissingEntryPoint`] if it lacks `create_script`, or
    /// [`ScriptError::InvalidPluginPath`] if no name can be derived.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();

        // SAFETY: opening runs the library's initialisers. Plugins are
        // trusted engine code built with the engine's toolchain.
        let library = unsafe { libloading::Library::new(path) }.map_err(|source| {
            ScriptError::PluginLoad {
                path: path.to_path_buf(),
                source,
            }
        })?;

        // SAFETY: `create_script` is emitted by `export_script!` with exactly
        // the `ScriptFactory` signature.
        let create = unsafe { library.get::<ScriptFactory>(CREATE_SYMBOL) }
            .map(|symbol| *symbol)
            .map_err(|source| ScriptError::MissingEntryPoint {
                path: path.to_path_buf(),
                source,
            })?;

        // SAFETY: as above, `script_name` is emitted by `export_script!`.
        let declared = unsafe { library.get::<NameFn>(NAME_SYMBOL) }
            .ok()
            .map(|symbol| (*symbol)().to_string());

        let name = match declared {
            Some(name) => name,
            None => name_from_path(path).ok_or_else(|| ScriptError::InvalidPluginPath {
                path: path.to_path_buf(),
            })?,
        };

        info!(plugin = %name, path = %path.display(), "plugin library loaded");
        Ok(Self {
            name,
            path: path.to_path_buf(),
            create,
            library,
        })
    }

    /// The script name this plugin registers.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path the library was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The plugin's `create_script` entry point.
    ///
    /// Only valid while this library is alive.
    #[must_use]
    pub fn factory(&self) -> ScriptFactory {
        self.create
    }
}

impl Drop for PluginLibrary {
    fn drop(&mut self) {
        debug!(plugin = %self.name, "plugin library unloading");
    }
}

impl std::fmt::Debug for PluginLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLibrary")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("library", &self.library)
            .finish_non_exhaustive()
    }
}

/// Derive a script name from a library file name.
#[must_use]
pub fn name_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let prefix = std::env::consts::DLL_PREFIX;
    let name = if prefix.is_empty() {
        stem
    } else {
        stem.strip_prefix(prefix).unwrap_or(stem)
    };
    (!name.is_empty()).then(|| name.to_string())
}

/// Returns `true` if `path` has this platform's dynamic library extension.
#[must_use]
pub fn is_plugin_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib_file(stem: &str) -> PathBuf {
        PathBuf::from(format!(
            "plugins/{}{stem}.{}",
            std::env::consts::DLL_PREFIX,
            std::env::consts::DLL_EXTENSION
        ))
    }

    #[test]
    fn test_name_from_platform_file() {
        assert_eq!(name_from_path(&lib_file("jump")), Some("jump".to_string()));
    }

    #[test]
    fn test_name_without_prefix() {
        assert_eq!(
            name_from_path(Path::new("plugins/Jump.dll")),
            Some("Jump".to_string())
        );
    }

    #[test]
    fn test_name_from_empty_path() {
        assert_eq!(name_from_path(Path::new("")), None);
    }

    #[test]
    fn test_plugin_extension_filter() {
        assert!(is_plugin_file(&lib_file("jump")));
        assert!(!is_plugin_file(Path::new("plugins/readme.txt")));
        assert!(!is_plugin_file(Path::new("plugins/noext")));
    }

    #[test]
    fn test_open_missing_library_fails() {
        let err = PluginLibrary::open(lib_file("definitely_not_here")).unwrap_err();
        assert!(matches!(err, ScriptError::PluginLoad { .. }));
    }
}
