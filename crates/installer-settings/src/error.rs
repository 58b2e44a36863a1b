//! Error type shared by the settings store, the shutdown lifecycle, and
//! symbol expansion.
//!
//! Every variant is fatal for the operation that raised it.  Nothing in this
//! crate retries or logs-and-continues; the caller decides whether to abort
//! startup or shutdown.

use std::path::PathBuf;

use settings_core::PropertiesError;
use thiserror::Error;

/// Errors raised by [`crate::ConfigurationStore`] and its collaborators.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings path has no usable parent directory (a bare file name or
    /// a filesystem root), so the file would land in a root folder.
    #[error("configuration path '{}' has no parent directory; it must not be created in a root folder", path.display())]
    InvalidConfiguration { path: PathBuf },

    /// The settings directory or file is not both readable and writable.
    #[error("cannot read/write configuration at '{}': {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing settings file does not record `installer.version`.
    #[error("cannot find installer version, configuration file '{}' is maybe corrupt", path.display())]
    CorruptConfiguration { path: PathBuf },

    /// The settings file text could not be decoded.
    #[error("configuration file '{}' is malformed: {source}", path.display())]
    MalformedConfiguration {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },

    /// Writing the settings back to disk failed.
    #[error("error writing configuration to disk at '{}': {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `${name}` placeholder has no value.
    #[error("unresolved symbol '{name}'")]
    UnresolvedSymbol { name: String },

    /// A symbol's value refers back to itself, directly or indirectly.
    #[error("symbol '{name}' is defined recursively: {chain}")]
    RecursiveSymbol { name: String, chain: String },
}
