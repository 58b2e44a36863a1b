//! Keys the settings store reads and writes on its own behalf.
//!
//! Every other key belongs to the host application.

/// Version of the installer that last wrote the settings file.
pub const INSTALLER_VERSION: &str = "installer.version";

/// Version recorded before the most recent version change.
///
/// Only the immediately preceding version is kept; each change overwrites it.
pub const PREVIOUS_INSTALLER_VERSION: &str = "installer.previous.version";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys_are_distinct() {
        assert_ne!(INSTALLER_VERSION, PREVIOUS_INSTALLER_VERSION);
    }

    #[test]
    fn test_reserved_keys_share_installer_namespace() {
        assert!(INSTALLER_VERSION.starts_with("installer."));
        assert!(PREVIOUS_INSTALLER_VERSION.starts_with("installer."));
    }
}
