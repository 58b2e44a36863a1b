//! Traits the host application programs against.

use settings_core::PropertyMap;

/// Read/write access to installer settings.
///
/// Implemented by [`crate::ConfigurationStore`].  All operations act on the
/// in-memory settings; none of them touches the disk.
pub trait ApplicationSettings {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Returns `true` if `key` has a value (possibly empty).
    fn contains_key(&self, key: &str) -> bool;

    /// Stores `value` under `key`.  `None` is stored as the empty string.
    fn put(&mut self, key: &str, value: Option<&str>);

    /// Returns `true` if the settings file already recorded the running
    /// installer version when it was opened.
    fn is_already_installed(&self) -> bool;
}

/// Resolves symbol names to values for template expansion.
///
/// Behaves exactly like a plain key lookup on the settings.
pub trait SymbolProvider {
    /// Returns the value of the symbol `name`, if one is defined.
    fn value_for_symbol(&self, name: &str) -> Option<String>;
}

impl SymbolProvider for PropertyMap {
    fn value_for_symbol(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
