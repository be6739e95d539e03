//! The plugin pipeline: externally supplied analysis/transformation passes.
//!
//! A plugin is a boxed [`Plugin`] trait object registered with an owned
//! [`PluginManager`](crate::plugin::PluginManager); the manager drives the
//! initialize/process/cleanup lifecycle and orders execution by descending priority.
//! There is no ambient registry - whoever owns the pipeline owns the manager.
//!
//! [`PluginConfig`] gives configurable plugins a concurrent typed key/value store plus an
//! enabled flag, with never-failing accessors that fall back to a caller default.

mod manager;

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use crate::model::ProgramRepository;
use crate::Result;

pub use manager::{PluginManager, PluginRc};

/// A single analysis or transformation pass over a repository.
///
/// Implementations are driven by a [`PluginManager`]: `initialize` runs once before the
/// first processing round, `process` once per round, and `cleanup` when the plugin is
/// unregistered or the pipeline shuts down. A failure in any lifecycle stage is logged by
/// the manager and never aborts the pipeline for the remaining plugins.
pub trait Plugin: Send + Sync {
    /// Unique plugin name; registration rejects blanks and duplicates.
    fn name(&self) -> &str;

    /// Plugin version string.
    fn version(&self) -> &str;

    /// Human-readable description of what the pass does.
    fn description(&self) -> &str;

    /// Whether the plugin currently takes part in processing.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Updates the enabled state. The default implementation ignores the request;
    /// plugins backed by a [`PluginConfig`] forward to its flag.
    fn set_enabled(&self, _enabled: bool) {}

    /// Execution priority; higher runs earlier. Defaults to 0.
    fn priority(&self) -> i32 {
        0
    }

    /// One-time setup before the first processing round.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Runs the pass over the repository.
    fn process(&self, repository: &ProgramRepository) -> Result<()>;

    /// Teardown when the plugin leaves the pipeline.
    fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// A boolean setting.
    Bool(bool),
    /// An integer setting.
    Int(i64),
    /// A string setting.
    Str(String),
}

/// Concurrent configuration store for a configurable plugin.
///
/// Typed accessors return the caller's default when the key is absent *or* holds a value
/// of a different kind - configuration reads never fail. The store also carries the
/// plugin's enabled flag so `set_enabled` has somewhere to land.
///
/// # Examples
///
/// ```rust
/// use jarscope::plugin::{ConfigValue, PluginConfig};
///
/// let config = PluginConfig::new();
/// config.set("threshold", ConfigValue::Int(8));
/// assert_eq!(config.int_or("threshold", 0), 8);
/// assert_eq!(config.bool_or("threshold", true), true); // kind mismatch -> default
/// assert_eq!(config.str_or("missing", "fallback"), "fallback");
/// ```
#[derive(Debug, Default)]
pub struct PluginConfig {
    values: DashMap<String, ConfigValue>,
    enabled: AtomicBool,
}

impl PluginConfig {
    /// Creates an empty configuration with the plugin enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            enabled: AtomicBool::new(true),
        }
    }

    /// Stores a value, replacing any previous one under the key.
    pub fn set(&self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    /// The raw value under the key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    /// Is a value stored under the key?
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes the value under the key, if any.
    pub fn remove(&self, key: &str) {
        self.values.remove(key);
    }

    /// Drops every stored value. The enabled flag is untouched.
    pub fn clear(&self) {
        self.values.clear();
    }

    /// The boolean under the key, or `default` on absence or kind mismatch.
    #[must_use]
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(ConfigValue::Bool(value)) => value,
            _ => default,
        }
    }

    /// The integer under the key, or `default` on absence or kind mismatch.
    #[must_use]
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(ConfigValue::Int(value)) => value,
            _ => default,
        }
    }

    /// The string under the key, or `default` on absence or kind mismatch.
    #[must_use]
    pub fn str_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(ConfigValue::Str(value)) => value,
            _ => default.to_string(),
        }
    }

    /// The enabled flag.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Updates the enabled flag.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}
