//! GSettings backend — renders a profile's settings to a dconf key-file
//! database plus a companion locks list.
//!
//! Settings arrive as a JSON array of `{"key": "/path/to/key", "value": ...}`
//! entries. Each path splits into a key-file group and key at its last
//! slash; every key that lands in the database is also locked so the user
//! cannot override it.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::backend::{BackendPaths, SettingsBackend};
use crate::keyfile::KeyFile;
use crate::profile::Profile;
use crate::variant::Variant;

/// Settings-section id this backend consumes.
pub const BACKEND_ID: &str = "org.gnome.gsettings";

/// System dconf database root.
pub const SYSTEM_DB_ROOT: &str = "/etc/dconf/db";

/// Database name prefix; the full database name is `deskd-<profile uid>`.
const DB_NAME_PREFIX: &str = "deskd";

const PREAMBLE: &str = "# Generated by deskd. DO NOT EDIT.\n\n";

pub struct GSettingsBackend {
    key_file: KeyFile,
    locks: BTreeSet<String>,
    db_name: String,
    db_path: PathBuf,
}

impl GSettingsBackend {
    /// Build a backend for `profile` targeting the system database root.
    pub fn new(profile: &Profile, settings: &Value) -> Result<Self> {
        Self::with_db_root(profile, settings, Path::new(SYSTEM_DB_ROOT))
    }

    /// Build a backend targeting an explicit database root.
    pub fn with_db_root(profile: &Profile, settings: &Value, db_root: &Path) -> Result<Self> {
        let db_name = format!("{DB_NAME_PREFIX}-{}", profile.uid);
        let db_path = db_root.join(format!("{db_name}.d"));

        let mut backend = Self {
            key_file: KeyFile::new(),
            locks: BTreeSet::new(),
            db_name,
            db_path,
        };
        backend.parse_settings(settings)?;
        Ok(backend)
    }

    /// Registry factory for this backend; the database root comes from
    /// `paths.dconf_db_root`.
    pub fn factory(
        profile: &Profile,
        settings: &Value,
        paths: &BackendPaths,
    ) -> Result<Box<dyn SettingsBackend>> {
        Ok(Box::new(Self::with_db_root(
            profile,
            settings,
            &paths.dconf_db_root,
        )?))
    }

    /// Database name (`deskd-<uid>`).
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Database directory (`<root>/deskd-<uid>.d`).
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn key_file(&self) -> &KeyFile {
        &self.key_file
    }

    /// Locked key paths, lexicographically sorted.
    pub fn locks(&self) -> Vec<&str> {
        self.locks.iter().map(String::as_str).collect()
    }

    fn parse_settings(&mut self, settings: &Value) -> Result<()> {
        let entries = match settings.as_array() {
            Some(entries) => entries,
            None => bail!("gsettings: settings node for {} is not a JSON array", self.db_name),
        };

        for entry in entries {
            self.add_entry(entry);
        }

        // Every key that made it into the database gets locked.
        for group in self.key_file.groups() {
            for key in self.key_file.keys(group) {
                self.locks.insert(format!("/{group}/{key}"));
            }
        }

        Ok(())
    }

    fn add_entry(&mut self, entry: &Value) {
        let object = match entry.as_object() {
            Some(object) => object,
            None => {
                debug!("gsettings: skipping non-object settings entry");
                return;
            }
        };

        let path = match object.get("key").and_then(Value::as_str) {
            Some(path) => path,
            None => {
                debug!("gsettings: skipping entry without a string 'key' member");
                return;
            }
        };

        let value = match object.get("value") {
            Some(value) => value,
            None => {
                debug!("gsettings: skipping entry without a 'value' member: {path}");
                return;
            }
        };

        let path = path.trim_start_matches('/');
        let (group, key) = match path.rsplit_once('/') {
            Some(split) => split,
            None => {
                debug!("gsettings: dropping group-less settings path: {path}");
                return;
            }
        };

        let variant = match Variant::from_json(value) {
            Some(variant) => variant,
            None => {
                debug!("gsettings: value of {path} has no typed representation, dropping");
                return;
            }
        };

        self.key_file.set_value(group, key, &variant.to_string());
    }

    fn write_key_file(&self, path: &Path) -> Result<()> {
        let mut contents = String::from(PREAMBLE);
        contents.push_str(&self.key_file.to_data());
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    fn write_locks(&self, path: &Path) -> Result<()> {
        let mut contents = String::from(PREAMBLE);
        for lock in &self.locks {
            contents.push_str(lock);
            contents.push('\n');
        }
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }
}

impl SettingsBackend for GSettingsBackend {
    fn apply_settings(&self) {
        let locks_dir = self.db_path.join("locks");

        if let Err(e) = fs::DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(&locks_dir)
        {
            error!("Failed to make directory: {}: {e}", locks_dir.display());
            return;
        }

        let db_file = self.db_path.join("generated");
        if let Err(e) = self.write_key_file(&db_file) {
            error!("Failed to write file: {e:#}");
            return;
        }

        let locks_file = locks_dir.join("generated");
        if let Err(e) = self.write_locks(&locks_file) {
            error!("Failed to write file: {e:#}");
            return;
        }

        info!(
            "Wrote database {} ({} keys, all locked)",
            self.db_name,
            self.locks.len()
        );
    }
}
