//! # settings-core
//!
//! Shared, I/O-free building blocks for the installer settings store: the
//! properties text codec, the reserved configuration keys, and the version
//! reconciliation rules applied when an existing settings file is opened.
//!
//! Nothing in this crate touches the file system.  The `installer-settings`
//! crate owns the backing file and calls into these modules with strings and
//! maps, which keeps every rule here testable with plain values.
//!
//! # Architecture overview (for beginners)
//!
//! An installable application needs to remember two things between runs:
//! arbitrary settings the user or installer chose, and *which version* of the
//! application wrote them.  Comparing the recorded version with the running
//! version tells the application whether this is a first run, a re-run of the
//! same version, or an upgrade/downgrade.
//!
//! - **`properties`** – How settings look on disk.  A line-oriented
//!   `key=value` format with `#` comments, backslash escapes, and line
//!   continuations.
//!
//! - **`domain`** – The reserved keys (`installer.version`,
//!   `installer.previous.version`) and the pure reconciliation function that
//!   decides between "already installed" and "version changed".

pub mod domain;
pub mod properties;

// Re-export the most-used items at the crate root so callers can write
// `settings_core::reconcile` instead of `settings_core::domain::reconcile::reconcile`.
pub use domain::keys::{INSTALLER_VERSION, PREVIOUS_INSTALLER_VERSION};
pub use domain::reconcile::{fresh_properties, reconcile, InstallState, ReconcileError};
pub use properties::codec::{decode_properties, encode_properties, PropertiesError, PropertyMap};
