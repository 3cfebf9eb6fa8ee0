use thiserror::Error;

use crate::{
    db_types::{Drink, DrinkUpdate, NewDrink},
    helpers::RecipeError,
};

#[derive(Debug, Clone, Error)]
pub enum DrinkStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Drink #{0} does not exist")]
    DrinkNotFound(i64),
    #[error("A drink needs a title.")]
    MissingTitle,
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),
    #[error("Stored drink record is corrupt. {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for DrinkStoreError {
    fn from(e: sqlx::Error) -> Self {
        DrinkStoreError::DatabaseError(e.to_string())
    }
}

impl From<RecipeError> for DrinkStoreError {
    fn from(e: RecipeError) -> Self {
        DrinkStoreError::InvalidRecipe(e.to_string())
    }
}

/// The `DrinkManagement` trait defines the behaviour a storage backend must provide to hold drink records.
///
/// Backends receive recipes that have already been validated. Every mutating call is atomic: it either applies in
/// full, or leaves the store exactly as it was.
#[allow(async_fn_in_trait)]
pub trait DrinkManagement {
    /// Fetches every drink, ordered by id ascending.
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkStoreError>;

    /// Fetches a single drink. If no drink has the given id, `None` is returned.
    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkStoreError>;

    /// Saves a new drink and returns it with its newly assigned id.
    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkStoreError>;

    /// Applies the supplied fields of `update` to drink `id`.
    ///
    /// Returns [`DrinkStoreError::DrinkNotFound`] if the drink does not exist.
    async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Drink, DrinkStoreError>;

    /// Permanently removes drink `id`, returning the id of the deleted record.
    ///
    /// Returns [`DrinkStoreError::DrinkNotFound`] if the drink does not exist.
    async fn delete_drink(&self, id: i64) -> Result<i64, DrinkStoreError>;
}
