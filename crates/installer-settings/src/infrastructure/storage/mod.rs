//! Storage infrastructure: settings file persistence.
//!
//! - `access` checks that the settings directory and file are both readable
//!   and writable before anything is loaded.
//! - `configuration_store` owns the in-memory settings and the backing
//!   properties file.
//! - `host_config` reads the optional TOML file that tells the host binary
//!   where the settings live and which version is running.

pub mod access;
pub mod configuration_store;
pub mod host_config;
