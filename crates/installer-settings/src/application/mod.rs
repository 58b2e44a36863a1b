//! Application layer for the settings store.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The host application should not care whether its settings come from a
//! properties file, a database, or a test double.  This layer defines the
//! traits the host depends on and the logic that only needs those traits.
//!
//! # Sub-modules
//!
//! - **`settings`** – The [`settings::ApplicationSettings`] accessor surface
//!   and the [`settings::SymbolProvider`] lookup used by templating code.
//!
//! - **`symbols`** – Expands `${name}` placeholders in a template using any
//!   [`settings::SymbolProvider`].

pub mod settings;
pub mod symbols;
