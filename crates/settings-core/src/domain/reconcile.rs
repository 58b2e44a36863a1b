//! Reconciliation of the recorded installer version with the running one.
//!
//! ```text
//!                    file absent
//! Uninitialized ───────────────────────────► FreshInstall
//!       │
//!       │ file loaded
//!       ▼
//!  installer.version == running version ───► AlreadyInstalled
//!  installer.version != running version ───► VersionChanged { previous }
//!  installer.version missing ──────────────► ReconcileError::MissingVersion
//! ```
//!
//! Versions are compared as exact strings.  A "change" may be an upgrade or a
//! downgrade; no ordering between versions is assumed.

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::keys::{INSTALLER_VERSION, PREVIOUS_INSTALLER_VERSION};
use crate::properties::codec::PropertyMap;

/// How opening the settings concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// No settings file existed; the map was created from scratch.
    FreshInstall,
    /// The settings file records the running version.
    AlreadyInstalled,
    /// The settings file recorded `previous`; it now records the running version.
    VersionChanged { previous: String },
}

impl InstallState {
    /// Returns `true` only for [`InstallState::AlreadyInstalled`].
    pub fn is_already_installed(&self) -> bool {
        matches!(self, Self::AlreadyInstalled)
    }
}

/// Errors raised while reconciling loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The loaded settings lack [`INSTALLER_VERSION`].
    #[error("settings do not record `installer.version`")]
    MissingVersion,
}

/// Builds the settings for a first install: only [`INSTALLER_VERSION`] is set.
pub fn fresh_properties(installer_version: &str) -> PropertyMap {
    let mut properties = PropertyMap::new();
    properties.insert(INSTALLER_VERSION.to_string(), installer_version.to_string());
    properties
}

/// Reconciles settings loaded from an existing file with `installer_version`.
///
/// When the recorded version differs, it is moved to
/// [`PREVIOUS_INSTALLER_VERSION`] (replacing whatever was there) and
/// [`INSTALLER_VERSION`] is set to `installer_version`.  When it matches, the
/// map is left untouched.
///
/// # Errors
///
/// Returns [`ReconcileError::MissingVersion`] if the map has no
/// [`INSTALLER_VERSION`] entry.  The map is not modified in that case.
///
/// # Examples
///
/// ```rust
/// use settings_core::{fresh_properties, reconcile, InstallState, PREVIOUS_INSTALLER_VERSION};
///
/// let mut props = fresh_properties("1.0");
/// let state = reconcile(&mut props, "2.0").unwrap();
/// assert_eq!(state, InstallState::VersionChanged { previous: "1.0".to_string() });
/// assert_eq!(props[PREVIOUS_INSTALLER_VERSION], "1.0");
/// ```
pub fn reconcile(
    properties: &mut PropertyMap,
    installer_version: &str,
) -> Result<InstallState, ReconcileError> {
    let recorded = properties
        .get(INSTALLER_VERSION)
        .ok_or(ReconcileError::MissingVersion)?;

    if recorded == installer_version {
        debug!(version = installer_version, "recorded installer version matches");
        return Ok(InstallState::AlreadyInstalled);
    }

    let previous = recorded.clone();
    info!(
        previous = %previous,
        current = installer_version,
        "installer version changed"
    );
    properties.insert(PREVIOUS_INSTALLER_VERSION.to_string(), previous.clone());
    properties.insert(INSTALLER_VERSION.to_string(), installer_version.to_string());

    Ok(InstallState::VersionChanged { previous })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_properties_contains_only_installer_version() {
        // Arrange / Act
        let props = fresh_properties("1.0");

        // Assert
        assert_eq!(props.len(), 1);
        assert_eq!(props[INSTALLER_VERSION], "1.0");
    }

    #[test]
    fn test_reconcile_same_version_is_already_installed() {
        // Arrange
        let mut props = fresh_properties("1.0");
        props.insert("custom".to_string(), "kept".to_string());
        let before = props.clone();

        // Act
        let state = reconcile(&mut props, "1.0").unwrap();

        // Assert
        assert_eq!(state, InstallState::AlreadyInstalled);
        assert!(state.is_already_installed());
        assert_eq!(props, before, "matching versions must not mutate the map");
    }

    #[test]
    fn test_reconcile_different_version_records_previous() {
        // Arrange
        let mut props = fresh_properties("1.0");

        // Act
        let state = reconcile(&mut props, "2.0").unwrap();

        // Assert
        assert_eq!(
            state,
            InstallState::VersionChanged {
                previous: "1.0".to_string()
            }
        );
        assert!(!state.is_already_installed());
        assert_eq!(props[INSTALLER_VERSION], "2.0");
        assert_eq!(props[PREVIOUS_INSTALLER_VERSION], "1.0");
    }

    #[test]
    fn test_reconcile_downgrade_is_a_version_change() {
        let mut props = fresh_properties("2.0");
        let state = reconcile(&mut props, "1.5").unwrap();
        assert!(matches!(state, InstallState::VersionChanged { ref previous } if previous == "2.0"));
        assert_eq!(props[INSTALLER_VERSION], "1.5");
    }

    #[test]
    fn test_reconcile_overwrites_previous_version_slot() {
        // Arrange – a file that already went through one upgrade
        let mut props = fresh_properties("2.0");
        props.insert(PREVIOUS_INSTALLER_VERSION.to_string(), "1.0".to_string());

        // Act
        reconcile(&mut props, "3.0").unwrap();

        // Assert – single-slot history, not an accumulated list
        assert_eq!(props[PREVIOUS_INSTALLER_VERSION], "2.0");
        assert_eq!(props[INSTALLER_VERSION], "3.0");
    }

    #[test]
    fn test_reconcile_compares_versions_as_exact_strings() {
        let mut props = fresh_properties("1.0");
        let state = reconcile(&mut props, "1.0.0").unwrap();
        assert!(!state.is_already_installed(), "1.0 and 1.0.0 are different strings");
    }

    #[test]
    fn test_reconcile_missing_version_is_error_and_leaves_map_alone() {
        // Arrange
        let mut props = PropertyMap::new();
        props.insert("something".to_string(), "else".to_string());
        let before = props.clone();

        // Act
        let result = reconcile(&mut props, "1.0");

        // Assert
        assert_eq!(result, Err(ReconcileError::MissingVersion));
        assert_eq!(props, before);
    }

    #[test]
    fn test_fresh_install_is_not_already_installed() {
        assert!(!InstallState::FreshInstall.is_already_installed());
    }
}
