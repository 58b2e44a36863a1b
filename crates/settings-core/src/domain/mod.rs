//! Domain rules for installer settings.
//!
//! This module contains pure business logic with no file-system access.
//!
//! # What lives here? (for beginners)
//!
//! The settings store has exactly one piece of real decision-making: when an
//! existing settings file is opened, compare the version it records with the
//! version of the program that is running now.  That comparison, and the
//! edits it makes to the in-memory settings, are written as plain functions
//! over a [`crate::PropertyMap`] so they can be tested without creating files.
//!
//! Code in the `installer-settings` crate reads and writes the actual file and
//! calls into this module in between.

/// Reserved configuration keys.
pub mod keys;

/// Version reconciliation between the settings file and the running installer.
///
/// See [`reconcile::reconcile`] for the main entry point.
pub mod reconcile;
