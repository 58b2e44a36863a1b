//! installer-settings library crate.
//!
//! Owns the persistent settings file of an installable application: it opens
//! (or starts) the file, reconciles the recorded installer version with the
//! running one, serves reads and writes from memory, and writes everything
//! back exactly once when the host shuts down.
//!
//! # Architecture
//!
//! ```text
//! host binary (main.rs)
//!   ├── application/      ApplicationSettings + SymbolProvider seams, ${symbol} expansion
//!   └── infrastructure/
//!         ├── storage/    ConfigurationStore, access checks, host TOML config
//!         └── lifecycle/  ShutdownListener + ShutdownRegistry
//! settings-core           properties codec, reserved keys, reconcile()
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `settings-core` and the error type only.
//! - `infrastructure` implements the application traits and owns all file I/O.

pub mod application;
pub mod error;
pub mod infrastructure;

pub use application::settings::{ApplicationSettings, SymbolProvider};
pub use application::symbols::expand_symbols;
pub use error::SettingsError;
pub use infrastructure::lifecycle::{ShutdownListener, ShutdownRegistry};
pub use infrastructure::storage::configuration_store::ConfigurationStore;
