//! Registration, ordering, and lifecycle management of plugins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tracing::warn;

use crate::model::ProgramRepository;
use crate::plugin::Plugin;
use crate::{Error, Result};

/// Shared handle to a registered plugin.
pub type PluginRc = Arc<dyn Plugin>;

/// Owns a set of plugins and drives their lifecycle against a repository.
///
/// Execution order is descending priority; plugins of equal priority run in registration
/// order (the ordering sort is stable). Lifecycle failures - a plugin erroring in
/// `initialize`, `process`, or `cleanup` - are logged and skipped so one broken plugin
/// never takes the pipeline down. Only registration itself is fallible: blank and
/// duplicate names are rejected.
///
/// There is no global instance; the pipeline entry point owns its manager and threads it
/// explicitly.
///
/// # Examples
///
/// ```rust
/// use jarscope::plugin::{Plugin, PluginManager};
/// use jarscope::prelude::*;
///
/// struct NoopPass;
///
/// impl Plugin for NoopPass {
///     fn name(&self) -> &str { "noop" }
///     fn version(&self) -> &str { "1.0" }
///     fn description(&self) -> &str { "does nothing" }
///     fn process(&self, _repository: &ProgramRepository) -> jarscope::Result<()> { Ok(()) }
/// }
///
/// let manager = PluginManager::new();
/// manager.register(std::sync::Arc::new(NoopPass)).unwrap();
/// manager.process_with_plugins(&ProgramRepository::new());
/// ```
#[derive(Default)]
pub struct PluginManager {
    plugins: DashMap<String, PluginRc>,
    ordered: RwLock<Vec<PluginRc>>,
    initialized: AtomicBool,
}

impl PluginManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPluginName`] when the name is blank and
    /// [`Error::DuplicatePlugin`] when a plugin is already registered under it.
    pub fn register(&self, plugin: PluginRc) -> Result<()> {
        let name = plugin.name().to_string();
        if name.trim().is_empty() {
            return Err(Error::InvalidPluginName);
        }
        if self.plugins.contains_key(&name) {
            return Err(Error::DuplicatePlugin(name));
        }

        self.plugins.insert(name, plugin.clone());
        let mut ordered = crate::model::lock_write(&self.ordered);
        ordered.push(plugin);
        ordered.sort_by_key(|p| std::cmp::Reverse(p.priority()));
        Ok(())
    }

    /// Unregisters the plugin with the given name, running its `cleanup`. Absent names
    /// are a silent no-op; a cleanup failure is logged, not propagated.
    pub fn unregister(&self, name: &str) {
        if let Some((_, plugin)) = self.plugins.remove(name) {
            if let Err(error) = plugin.cleanup() {
                warn!(plugin = name, "cleanup failed: {error}");
            }
            crate::model::lock_write(&self.ordered).retain(|p| p.name() != name);
        }
    }

    /// The plugin registered under the given name, if any.
    #[must_use]
    pub fn plugin(&self, name: &str) -> Option<PluginRc> {
        self.plugins.get(name).map(|entry| entry.value().clone())
    }

    /// Every registered plugin in execution order, enabled or not.
    #[must_use]
    pub fn all_plugins(&self) -> Vec<PluginRc> {
        crate::model::lock_read(&self.ordered).clone()
    }

    /// The enabled plugins in execution order.
    #[must_use]
    pub fn enabled_plugins(&self) -> Vec<PluginRc> {
        crate::model::lock_read(&self.ordered)
            .iter()
            .filter(|plugin| plugin.is_enabled())
            .cloned()
            .collect()
    }

    /// Is a plugin registered under the given name?
    #[must_use]
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Number of registered plugins currently enabled.
    #[must_use]
    pub fn enabled_plugin_count(&self) -> usize {
        self.plugins.iter().filter(|entry| entry.value().is_enabled()).count()
    }

    /// Enables the named plugin. Plugins that ignore `set_enabled` are unaffected.
    pub fn enable_plugin(&self, name: &str) {
        if let Some(plugin) = self.plugin(name) {
            plugin.set_enabled(true);
        }
    }

    /// Disables the named plugin. Plugins that ignore `set_enabled` are unaffected.
    pub fn disable_plugin(&self, name: &str) {
        if let Some(plugin) = self.plugin(name) {
            plugin.set_enabled(false);
        }
    }

    /// Every registered plugin name, in execution order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<String> {
        crate::model::lock_read(&self.ordered)
            .iter()
            .map(|plugin| plugin.name().to_string())
            .collect()
    }

    /// Initializes every enabled plugin in execution order. Idempotent: a second call
    /// before [`cleanup_plugins`](Self::cleanup_plugins) is a no-op. Initialization
    /// failures are logged and skipped.
    pub fn initialize_plugins(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        for plugin in self.all_plugins() {
            if plugin.is_enabled() {
                if let Err(error) = plugin.initialize() {
                    warn!(plugin = plugin.name(), "initialization failed: {error}");
                }
            }
        }
    }

    /// Runs every enabled plugin over the repository in execution order, initializing
    /// first if that has not happened yet. Processing failures are logged and the
    /// remaining plugins still run.
    pub fn process_with_plugins(&self, repository: &ProgramRepository) {
        self.initialize_plugins();
        for plugin in self.enabled_plugins() {
            if let Err(error) = plugin.process(repository) {
                warn!(plugin = plugin.name(), "processing failed: {error}");
            }
        }
    }

    /// Runs `cleanup` on every registered plugin - enabled or not - and re-arms
    /// initialization. Cleanup failures are logged and skipped.
    pub fn cleanup_plugins(&self) {
        for plugin in self.all_plugins() {
            if let Err(error) = plugin.cleanup() {
                warn!(plugin = plugin.name(), "cleanup failed: {error}");
            }
        }
        self.initialized.store(false, Ordering::SeqCst);
    }

    /// Cleans up and unregisters every plugin.
    pub fn clear(&self) {
        self.cleanup_plugins();
        self.plugins.clear();
        crate::model::lock_write(&self.ordered).clear();
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("plugins", &self.plugin_names())
            .field("initialized", &self.initialized.load(Ordering::SeqCst))
            .finish()
    }
}
