//! Read/write access checks for the settings directory and file.
//!
//! Both checks ask the operating system rather than reading permission bits:
//!
//! - a directory is readable if it can be listed, and writable if a probe
//!   file can be created in it (the probe is removed immediately);
//! - a file is readable and writable if it can be opened for both without
//!   truncation.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use tracing::trace;
use uuid::Uuid;

use crate::error::SettingsError;

fn io_failure(path: &Path, source: std::io::Error) -> SettingsError {
    SettingsError::IoFailure {
        path: path.to_path_buf(),
        source,
    }
}

/// Fails with [`SettingsError::IoFailure`] unless `dir` is a directory this
/// process can both list and create files in.
pub fn ensure_directory_access(dir: &Path) -> Result<(), SettingsError> {
    fs::read_dir(dir).map_err(|source| io_failure(dir, source))?;

    let probe = dir.join(format!(".installer-settings-probe-{}", Uuid::new_v4()));
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
        .map_err(|source| io_failure(dir, source))?;
    fs::remove_file(&probe).map_err(|source| io_failure(&probe, source))?;

    trace!(dir = %dir.display(), "settings directory is readable and writable");
    Ok(())
}

/// Opens `path` for reading and writing without truncating it.
///
/// # Errors
///
/// Returns [`SettingsError::IoFailure`] if the file cannot be opened for both.
pub fn open_read_write(path: &Path) -> Result<File, SettingsError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| io_failure(path, source))
}
