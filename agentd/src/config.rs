//! deskd agent configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "/etc/deskd/config.toml";

/// Root configuration structure
#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

#[derive(Debug, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: String,
    #[serde(default = "default_dconf_db_root")]
    pub dconf_db_root: String,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            profiles_dir: default_profiles_dir(),
            dconf_db_root: default_dconf_db_root(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_profiles_dir() -> String {
    "/var/lib/deskd/profiles".into()
}

fn default_dconf_db_root() -> String {
    "/etc/dconf/db".into()
}

/// Load configuration from /etc/deskd/config.toml
pub fn load_config() -> Result<AgentConfig> {
    let config_path =
        std::env::var("DESKD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if Path::new(&config_path).exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {config_path}"))?;
        let config: AgentConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {config_path}"))?;
        Ok(config)
    } else {
        tracing::warn!("Config file not found at {config_path}, using defaults");
        Ok(AgentConfig {
            system: SystemConfig::default(),
            profiles: ProfilesConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig {
            system: SystemConfig::default(),
            profiles: ProfilesConfig::default(),
        };
        assert_eq!(config.system.log_level, "info");
        assert_eq!(config.profiles.profiles_dir, "/var/lib/deskd/profiles");
        assert_eq!(config.profiles.dconf_db_root, "/etc/dconf/db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: AgentConfig = toml::from_str("").unwrap();
        assert_eq!(config.system.log_level, "info");
        assert_eq!(config.profiles.profiles_dir, "/var/lib/deskd/profiles");
        assert_eq!(config.profiles.dconf_db_root, "/etc/dconf/db");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[system]
log_level = "debug"

[profiles]
profiles_dir = "/srv/deskd/profiles"
dconf_db_root = "/srv/deskd/dconf"
"#;
        let config: AgentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.system.log_level, "debug");
        assert_eq!(config.profiles.profiles_dir, "/srv/deskd/profiles");
        assert_eq!(config.profiles.dconf_db_root, "/srv/deskd/dconf");
    }

    #[test]
    fn test_parse_partial_config_fills_defaults() {
        let toml_str = r#"
[profiles]
profiles_dir = "/srv/deskd/profiles"
"#;
        let config: AgentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.system.log_level, "info");
        assert_eq!(config.profiles.profiles_dir, "/srv/deskd/profiles");
        assert_eq!(config.profiles.dconf_db_root, "/etc/dconf/db");
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let toml_str = r#"
[profiles]
profiles_dir = "/srv/deskd/profiles"

[future]
flag = true
"#;
        let config: AgentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profiles.profiles_dir, "/srv/deskd/profiles");
    }
}
