//! # Storage backend contracts
//!
//! This module defines the behaviour that a database backend must expose to hold drink records for the drinks service.
//!
//! * [`DrinkManagement`] provides create, read, update and delete operations over drinks.
//!
//! Backends are never used directly by the server. Instead, wrap one in a [`crate::DrinksApi`], which takes care of
//! validating incoming recipes before anything reaches the backend.
mod drink_management;

pub use drink_management::{DrinkManagement, DrinkStoreError};
