//! # Drinks engine public API
//!
//! The `api` module exposes the programmatic API for the drinks engine.
//!
//! * [`drinks_api`] provides methods for listing, creating, updating and deleting drinks. Recipes supplied by clients
//!   are validated here, before they reach a storage backend.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use drinks_engine::{DrinksApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/drinks.db", 5).await?;
//! // SqliteDatabase implements DrinkManagement
//! let api = DrinksApi::new(db);
//! let drinks = api.drinks().await?;
//! ```

pub mod drinks_api;
