//! Scripting error types.

use std::path::PathBuf;

/// Errors raised by the script registry, plugin loading, and slot tables.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// No factory is registered under this name.
    #[error("no script registered under `{name}`")]
    NotRegistered {
        /// The requested script name.
        name: String,
    },

    /// A factory is already registered under this name.
    #[error("a script is already registered under `{name}`")]
    DuplicateRegistration {
        /// The conflicting script name.
        name: String,
    },

    /// The slot table already declares this script.
    #[error("script `{name}` is already declared in slot {index}")]
    AlreadyRegistered {
        /// The script name.
        name: String,
        /// The slot holding it.
        index: usize,
    },

    /// The slot table is full.
    #[error("cannot declare `{name}`: all {capacity} script slots are in use")]
    CapacityExceeded {
        /// The script that did not fit.
        name: String,
        /// The table's fixed capacity.
        capacity: usize,
    },

    /// No script has been declared at this slot index.
    #[error("no script declared at slot {index}")]
    InvalidSlot {
        /// The requested slot index.
        index: usize,
    },

    /// The slot already holds a live instance.
    #[error("slot {index} is already instantiated")]
    AlreadyInstantiated {
        /// The slot index.
        index: usize,
    },

    /// The slot's instance has been destroyed and cannot be revived.
    #[error("slot {index} has been destroyed")]
    SlotDestroyed {
        /// The slot index.
        index: usize,
    },

    /// The plugin library could not be opened.
    #[error("failed to load plugin {}: {source}", path.display())]
    PluginLoad {
        /// Path of the library.
        path: PathBuf,
        /// The loader error.
        #[source]
        source: libloading::Error,
    },

    /// The library does not export a `create_script` entry point.
    #[error("plugin {} has no `create_script` entry point: {source}", path.display())]
    MissingEntryPoint {
        /// Path of the library.
        path: PathBuf,
        /// The symbol lookup error.
        #[source]
        source: libloading::Error,
    },

    /// The path has no usable file name to derive a script name from.
    #[error("cannot derive a script name from {}", path.display())]
    InvalidPluginPath {
        /// The offending path.
        path: PathBuf,
    },

    /// A plugin directory could not be read.
    #[error("failed to read plugin directory {}: {source}", path.display())]
    PluginDir {
        /// The directory.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
}
