//! deskd settings backends — framework and renderers
//!
//! A settings backend consumes one section of a managed profile (a JSON
//! settings document) and materialises it to the on-disk format of a
//! desktop subsystem. Backends are looked up by their section id in a
//! [`BackendRegistry`] and invoked once per profile through
//! [`SettingsBackend::apply_settings`].

pub mod backend;
pub mod gsettings;
pub mod keyfile;
pub mod profile;
pub mod variant;

pub use backend::{BackendPaths, BackendRegistry, SettingsBackend};
pub use profile::Profile;
