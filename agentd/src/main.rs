//! deskd agent daemon
//!
//! Responsibilities:
//! - Read agent configuration from /etc/deskd/config.toml
//! - Scan the profiles directory for managed profiles
//! - Dispatch each profile's settings sections to the registered backends

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use deskd_backends::{BackendPaths, BackendRegistry, Profile};

mod config;

fn main() {
    if let Err(e) = run() {
        eprintln!("FATAL: deskd-agentd failed: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = config::load_config()?;
    init_logging(&config.system.log_level)?;

    info!("deskd-agentd v{}", env!("CARGO_PKG_VERSION"));

    let registry = BackendRegistry::with_builtins();
    info!("Settings backends available: {:?}", registry.backend_ids());

    let paths = BackendPaths {
        dconf_db_root: PathBuf::from(config.profiles.dconf_db_root.as_str()),
    };

    let profiles_dir = Path::new(&config.profiles.profiles_dir);
    let profile_paths = scan_profiles(profiles_dir)?;
    if profile_paths.is_empty() {
        info!("No profiles found in {}", profiles_dir.display());
        return Ok(());
    }

    for path in &profile_paths {
        let profile = match Profile::load(path) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Skipping unreadable profile {}: {e:#}", path.display());
                continue;
            }
        };
        apply_profile(&registry, &profile, &paths);
    }

    Ok(())
}

/// Apply every settings section of `profile` through its backend.
fn apply_profile(registry: &BackendRegistry, profile: &Profile, paths: &BackendPaths) {
    info!(
        "Applying profile {} ({} settings sections)",
        profile.uid,
        profile.settings.len()
    );

    for (backend_id, settings) in &profile.settings {
        match registry.create(backend_id, profile, settings, paths) {
            None => {
                warn!("No settings backend registered for {backend_id}, skipping");
            }
            Some(Err(e)) => {
                error!(
                    "Failed to construct backend {backend_id} for profile {}: {e:#}",
                    profile.uid
                );
            }
            Some(Ok(backend)) => backend.apply_settings(),
        }
    }
}

/// Profile files (`*.json`) in `dir`, sorted by name so profiles apply in
/// a deterministic order.
fn scan_profiles(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        warn!("Profiles directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read profiles directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn init_logging(log_level: &str) -> Result<()> {
    // RUST_LOG wins over the configured level.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
