//! Drinks Engine
//!
//! The drinks engine holds the drink records served by the drinks server. It knows nothing about HTTP or
//! authentication.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`traits`] and the SQLite backend). Backends implement [`DrinkManagement`]. You should never need to
//!    access the database directly. The exception is the data types, which are defined in [`db_types`] and are public.
//! 2. The public API. [`DrinksApi`] wraps a backend and validates recipes before anything is written.
mod api;
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod helpers;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::drinks_api::DrinksApi;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{DrinkManagement, DrinkStoreError};
