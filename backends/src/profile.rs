//! Managed settings profile — identity plus per-backend settings sections

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A profile as delivered by the management server.
///
/// `settings` maps a backend id (e.g. `org.gnome.gsettings`) to the JSON
/// settings node that backend consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl Profile {
    /// Parse a profile from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let profile: Profile = serde_json::from_str(text).context("invalid profile JSON")?;
        if profile.uid.is_empty() {
            anyhow::bail!("profile has an empty uid");
        }
        Ok(profile)
    }

    /// Load a profile from a file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("failed to parse profile {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_profile() {
        let profile = Profile::from_json(r#"{"uid": "abc123"}"#).unwrap();
        assert_eq!(profile.uid, "abc123");
        assert!(profile.name.is_empty());
        assert!(profile.description.is_empty());
        assert!(profile.settings.is_empty());
    }

    #[test]
    fn test_parse_full_profile() {
        let text = r#"{
            "uid": "0999afab",
            "name": "workstation defaults",
            "description": "Baseline settings for managed workstations",
            "settings": {
                "org.gnome.gsettings": [
                    {"key": "/org/gnome/desktop/session/idle-delay", "value": 300}
                ]
            }
        }"#;
        let profile = Profile::from_json(text).unwrap();
        assert_eq!(profile.uid, "0999afab");
        assert_eq!(profile.name, "workstation defaults");
        assert_eq!(profile.settings.len(), 1);
        assert!(profile.settings.contains_key("org.gnome.gsettings"));
    }

    #[test]
    fn test_missing_uid_rejected() {
        assert!(Profile::from_json(r#"{"name": "no identity"}"#).is_err());
    }

    #[test]
    fn test_empty_uid_rejected() {
        assert!(Profile::from_json(r#"{"uid": ""}"#).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Profile::from_json("not json at all").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, r#"{"uid": "disk-profile"}"#).unwrap();

        let profile = Profile::load(&path).unwrap();
        assert_eq!(profile.uid, "disk-profile");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Profile::load(&dir.path().join("absent.json")).is_err());
    }
}
