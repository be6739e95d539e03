use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the failure modes of the program model, the transformation engine, and the
/// plugin pipeline. Analyzer read paths are total and never produce an error: an empty repository
/// yields empty results, and lookups of absent names are silent no-ops rather than failures.
///
/// # Error Categories
///
/// ## Plugin Registration Errors
/// - [`Error::InvalidPluginName`] - Blank plugin name at registration
/// - [`Error::DuplicatePlugin`] - Name already registered with this manager
///
/// ## Plugin Lifecycle Errors
/// - [`Error::Plugin`] - A lifecycle hook (`initialize`/`process`/`cleanup`) failed. These are
///   recovered at the pipeline level: the offending plugin is skipped for the remainder of that
///   phase and processing continues with the next plugin.
///
/// ## Internal Errors
/// - [`Error::LockError`] - Thread synchronization failure
/// - [`Error::Error`] - Generic error for miscellaneous failures
#[derive(Error, Debug)]
pub enum Error {
    /// A plugin was registered with a blank name.
    ///
    /// Plugin names are the registration key and must be non-empty after trimming whitespace.
    #[error("Plugin name cannot be empty")]
    InvalidPluginName,

    /// A plugin with the same name is already registered.
    ///
    /// The associated value is the conflicting plugin name.
    #[error("Plugin with name '{0}' is already registered")]
    DuplicatePlugin(String),

    /// A plugin lifecycle hook failed.
    ///
    /// Raised by plugin implementations from `initialize`, `process` or `cleanup`. The
    /// [`PluginManager`](crate::plugin::PluginManager) catches these, reports them through the
    /// logging channel, and continues with the next plugin - a single failing plugin is never
    /// fatal to the pipeline.
    #[error("Plugin '{name}' failed: {message}")]
    Plugin {
        /// Name of the plugin that raised the error
        name: String,
        /// Description of what went wrong
        message: String,
    },

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically when trying to acquire
    /// a mutex or rwlock that is in an invalid state.
    #[error("Failed to lock target")]
    LockError,

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for wrapping external
    /// failures with additional context.
    #[error("{0}")]
    Error(String),
}
