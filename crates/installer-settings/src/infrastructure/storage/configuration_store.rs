//! The persistent settings store.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──open()──► FreshInstall   (no file yet, nothing written)
//!       │                   Reconciled     (file loaded, version matched or updated)
//!       │
//!       └── error ────────► Failed         (startup aborts)
//!
//! FreshInstall / Reconciled ──shutdown──► Persisted (file fully rewritten)
//! ```
//!
//! Reads and writes only touch the in-memory map.  The file is written once,
//! when the host's [`ShutdownRegistry`](crate::ShutdownRegistry) notifies the
//! store, and the write replaces the whole file with the current map.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use settings_core::{
    decode_properties, encode_properties, fresh_properties, reconcile, InstallState,
    PropertyMap, ReconcileError,
};
use tracing::{debug, info};

use crate::application::settings::{ApplicationSettings, SymbolProvider};
use crate::error::SettingsError;
use crate::infrastructure::lifecycle::ShutdownListener;
use crate::infrastructure::storage::access;

/// Installer settings backed by a properties file.
///
/// # Examples
///
/// ```rust,no_run
/// use installer_settings::ConfigurationStore;
///
/// let mut store = ConfigurationStore::open("/var/lib/app/settings.properties", "2.0")?;
/// if !store.is_already_installed() {
///     store.put("install.dir", Some("/opt/app"));
/// }
/// store.persist()?;
/// # Ok::<(), installer_settings::SettingsError>(())
/// ```
#[derive(Debug)]
pub struct ConfigurationStore {
    properties: PropertyMap,
    path: PathBuf,
    state: InstallState,
}

impl ConfigurationStore {
    /// Opens the settings at `path` for the running `installer_version`.
    ///
    /// - No file at `path`: starts from a map holding only
    ///   `installer.version`.  Nothing is written until shutdown.
    /// - Existing file: loads it and reconciles the recorded version.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::InvalidConfiguration`] if `path` has no parent
    ///   directory (a bare file name or a filesystem root).
    /// - [`SettingsError::IoFailure`] if the parent directory, or an existing
    ///   file, is not both readable and writable.
    /// - [`SettingsError::MalformedConfiguration`] if the file cannot be decoded.
    /// - [`SettingsError::CorruptConfiguration`] if the file does not record
    ///   `installer.version`.
    pub fn open(
        path: impl Into<PathBuf>,
        installer_version: &str,
    ) -> Result<Self, SettingsError> {
        let path = path.into();
        let dir = parent_dir(&path)?;
        access::ensure_directory_access(dir)?;

        let exists = path.try_exists().map_err(|source| SettingsError::IoFailure {
            path: path.clone(),
            source,
        })?;

        if !exists {
            info!(
                path = %path.display(),
                version = installer_version,
                "no settings file found; starting a fresh install"
            );
            return Ok(Self {
                properties: fresh_properties(installer_version),
                path,
                state: InstallState::FreshInstall,
            });
        }

        let mut properties = load(&path)?;
        let state = reconcile(&mut properties, installer_version).map_err(
            |ReconcileError::MissingVersion| SettingsError::CorruptConfiguration {
                path: path.clone(),
            },
        )?;

        info!(
            path = %path.display(),
            version = installer_version,
            already_installed = state.is_already_installed(),
            "settings loaded"
        );

        Ok(Self {
            properties,
            path,
            state,
        })
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` has a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Same lookup as [`get`](Self::get), returning an owned value.
    pub fn value_for_symbol(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    /// Stores `value` under `key`; `None` is stored as the empty string.
    pub fn put(&mut self, key: impl Into<String>, value: Option<&str>) {
        let key = key.into();
        let value = value.unwrap_or_default().to_string();
        debug!(key = %key, "setting updated");
        self.properties.insert(key, value);
    }

    /// Whether the file recorded the running version when the store was opened.
    pub fn is_already_installed(&self) -> bool {
        self.state.is_already_installed()
    }

    /// How opening the store concluded.
    pub fn install_state(&self) -> &InstallState {
        &self.state
    }

    /// All settings currently held in memory, in key order.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the backing file with exactly the in-memory settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::PersistFailure`] if the file cannot be
    /// created, written, or synced.  Nothing is retried.
    pub fn persist(&self) -> Result<(), SettingsError> {
        let persist_failure = |source| SettingsError::PersistFailure {
            path: self.path.clone(),
            source,
        };

        let text = encode_properties(&self.properties, None);
        let mut file = File::create(&self.path).map_err(persist_failure)?;
        file.write_all(text.as_bytes()).map_err(persist_failure)?;
        file.sync_all().map_err(persist_failure)?;

        info!(
            path = %self.path.display(),
            entries = self.properties.len(),
            "settings persisted"
        );
        Ok(())
    }
}

impl ApplicationSettings for ConfigurationStore {
    fn get(&self, key: &str) -> Option<&str> {
        ConfigurationStore::get(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        ConfigurationStore::contains_key(self, key)
    }

    fn put(&mut self, key: &str, value: Option<&str>) {
        ConfigurationStore::put(self, key, value);
    }

    fn is_already_installed(&self) -> bool {
        ConfigurationStore::is_already_installed(self)
    }
}

impl SymbolProvider for ConfigurationStore {
    fn value_for_symbol(&self, name: &str) -> Option<String> {
        ConfigurationStore::value_for_symbol(self, name)
    }
}

impl ShutdownListener for ConfigurationStore {
    fn registry_did_shutdown(&self) -> Result<(), SettingsError> {
        self.persist()
    }
}

/// Returns the directory that holds `path`.
///
/// A bare file name has an empty parent and `/` has none; both are rejected.
fn parent_dir(path: &Path) -> Result<&Path, SettingsError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
        _ => Err(SettingsError::InvalidConfiguration {
            path: path.to_path_buf(),
        }),
    }
}

/// Reads and decodes the settings file at `path`.
fn load(path: &Path) -> Result<PropertyMap, SettingsError> {
    let mut file = access::open_read_write(path)?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|source| SettingsError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;

    let properties =
        decode_properties(&text).map_err(|source| SettingsError::MalformedConfiguration {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), entries = properties.len(), "settings file decoded");
    Ok(properties)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
