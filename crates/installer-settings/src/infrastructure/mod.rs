//! Infrastructure layer for the settings store.
//!
//! Contains the file-system adapters (the settings file itself and the host's
//! TOML config) and the shutdown lifecycle that triggers persistence.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `settings_core`, but MUST NOT be imported by the `application` layer.

pub mod lifecycle;
pub mod storage;
