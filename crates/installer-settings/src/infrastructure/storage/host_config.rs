//! TOML host configuration for the `installer-settings` binary.
//!
//! The settings store itself only needs a path and a version.  The host
//! binary can take both from the command line, from environment variables,
//! or from this optional file in the platform-appropriate directory:
//! - Windows:  `%APPDATA%\InstallerSettings\host.toml`
//! - Linux:    `~/.config/installer-settings/host.toml`
//! - macOS:    `~/Library/Application Support/InstallerSettings/host.toml`
//!
//! ```toml
//! config_file_path = "/var/lib/myapp/settings.properties"
//! installer_version = "2.0"
//! log_level = "debug"
//! ```
//!
//! Every field is optional.  `log_level` falls back to `"info"` when absent.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File name of the settings file inside the platform config directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.properties";

/// File name of the host config inside the platform config directory.
pub const DEFAULT_HOST_CONFIG_FILE: &str = "host.toml";

/// Error type for host configuration operations.
#[derive(Debug, Error)]
pub enum HostConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing host config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse host config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Host-level settings read from `host.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Location of the properties file backing the settings store.
    #[serde(default)]
    pub config_file_path: Option<PathBuf>,
    /// Version of the running application.
    #[serde(default)]
    pub installer_version: Option<String>,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            config_file_path: None,
            installer_version: None,
            log_level: default_log_level(),
        }
    }
}

/// Determines the platform-appropriate directory for installer settings.
///
/// # Errors
///
/// Returns [`HostConfigError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, HostConfigError> {
    platform_config_dir().ok_or(HostConfigError::NoPlatformConfigDir)
}

/// Default location of the settings properties file.
///
/// # Errors
///
/// Returns [`HostConfigError::NoPlatformConfigDir`] if the base directory
/// cannot be determined.
pub fn default_settings_path() -> Result<PathBuf, HostConfigError> {
    Ok(config_dir()?.join(DEFAULT_SETTINGS_FILE))
}

/// Default location of `host.toml`.
///
/// # Errors
///
/// Returns [`HostConfigError::NoPlatformConfigDir`] if the base directory
/// cannot be determined.
pub fn default_host_config_path() -> Result<PathBuf, HostConfigError> {
    Ok(config_dir()?.join(DEFAULT_HOST_CONFIG_FILE))
}

/// Loads a [`HostConfig`] from `path`, returning `HostConfig::default()` if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`HostConfigError::Io`] for file-system errors other than "not
/// found", and [`HostConfigError::Parse`] if the TOML is malformed.
pub fn load_host_config(path: &Path) -> Result<HostConfig, HostConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(source) => Err(HostConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config base directory plus the application subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("InstallerSettings"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("installer-settings"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("InstallerSettings")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
