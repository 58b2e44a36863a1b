//! Shutdown notification for components that flush state on exit.
//!
//! The host creates one [`ShutdownRegistry`] at startup, registers every
//! [`ShutdownListener`] (the settings store among them), and calls
//! [`ShutdownRegistry::shutdown`] once all other work has finished.
//! `shutdown` consumes the registry, so listeners can be notified at most once.
//!
//! # Sharing a listener with the rest of the host
//!
//! The host usually keeps using the settings after registering them.  Wrap
//! the store in `Arc<Mutex<_>>`: `Mutex<T>` is itself a listener whenever `T`
//! is, so the same `Arc` can be handed to the registry and kept for reads and
//! writes.
//!
//! ```rust,no_run
//! use std::sync::{Arc, Mutex};
//! use installer_settings::{ConfigurationStore, ShutdownRegistry};
//!
//! let store = Arc::new(Mutex::new(ConfigurationStore::open("/var/lib/app/settings.properties", "2.0")?));
//! let mut registry = ShutdownRegistry::new();
//! registry.register(store.clone());
//!
//! store.lock().unwrap().put("first.run.done", Some("true"));
//!
//! registry.shutdown()?; // persists the store
//! # Ok::<(), installer_settings::SettingsError>(())
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info};

use crate::error::SettingsError;

/// A component that must run a final step when the host shuts down.
#[cfg_attr(test, mockall::automock)]
pub trait ShutdownListener: Send + Sync {
    /// Called once, after the host has finished all other work.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining shutdown sequence.
    fn registry_did_shutdown(&self) -> Result<(), SettingsError>;
}

impl<T: ShutdownListener> ShutdownListener for Mutex<T> {
    fn registry_did_shutdown(&self) -> Result<(), SettingsError> {
        // Poisoning leaves the in-memory settings intact.
        let guard = self.lock().unwrap_or_else(PoisonError::into_inner);
        guard.registry_did_shutdown()
    }
}

/// Ordered set of listeners notified once at shutdown.
#[derive(Default)]
pub struct ShutdownRegistry {
    listeners: Vec<Arc<dyn ShutdownListener>>,
}

impl ShutdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `listener`; listeners are notified in registration order.
    pub fn register(&mut self, listener: Arc<dyn ShutdownListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies every listener, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first listener error.  Listeners after the failing one are
    /// not notified.
    pub fn shutdown(self) -> Result<(), SettingsError> {
        info!(listeners = self.listeners.len(), "registry shutting down");

        for (index, listener) in self.listeners.iter().enumerate() {
            if let Err(e) = listener.registry_did_shutdown() {
                error!(listener = index, "shutdown listener failed: {e}");
                return Err(e);
            }
        }

        info!("registry shutdown complete");
        Ok(())
    }
}
