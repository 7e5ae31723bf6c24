//! Settings backend trait and registry

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

use crate::profile::Profile;

/// A settings backend renders one profile section to its on-disk location.
pub trait SettingsBackend {
    /// Materialise the settings.
    ///
    /// Failures are logged and abort the current apply; the caller
    /// receives no error value and must inspect the filesystem to tell
    /// partial from full success.
    fn apply_settings(&self);
}

/// Filesystem roots a backend may write under.
///
/// Defaults target the live system; the agent substitutes configured
/// roots before dispatching.
#[derive(Debug, Clone)]
pub struct BackendPaths {
    pub dconf_db_root: PathBuf,
}

impl Default for BackendPaths {
    fn default() -> Self {
        Self {
            dconf_db_root: PathBuf::from(crate::gsettings::SYSTEM_DB_ROOT),
        }
    }
}

/// Constructor for a backend: profile identity, that backend's settings
/// node, and the filesystem roots to write under. Fails when the node
/// violates the backend's structural invariant.
pub type BackendFactory =
    fn(&Profile, &Value, &BackendPaths) -> Result<Box<dyn SettingsBackend>>;

/// In-memory backend registry, keyed by settings-section id.
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with every built-in backend registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            crate::gsettings::BACKEND_ID,
            crate::gsettings::GSettingsBackend::factory,
        );
        registry
    }

    /// Register a backend factory. A later registration for the same id
    /// replaces the earlier one.
    pub fn register(&mut self, id: &str, factory: BackendFactory) {
        info!("Registered settings backend: {id}");
        self.factories.insert(id.to_string(), factory);
    }

    /// Construct the backend registered for `id`, if any.
    pub fn create(
        &self,
        id: &str,
        profile: &Profile,
        settings: &Value,
        paths: &BackendPaths,
    ) -> Option<Result<Box<dyn SettingsBackend>>> {
        self.factories
            .get(id)
            .map(|factory| factory(profile, settings, paths))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Ids of all registered backends, sorted.
    pub fn backend_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
