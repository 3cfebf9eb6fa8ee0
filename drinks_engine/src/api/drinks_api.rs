//! Unifies API for managing drinks.

use std::fmt::Debug;

use log::{debug, trace};
use serde_json::Value;

use crate::{
    db_types::{Drink, DrinkUpdate, NewDrink},
    helpers::validate_recipe,
    traits::{DrinkManagement, DrinkStoreError},
};

/// The `DrinksApi` provides a unified API for managing drinks.
///
/// Recipes arrive as raw JSON values, exactly as the client sent them, and are validated before the backend is
/// touched. A write with an invalid recipe never reaches the store.
pub struct DrinksApi<B> {
    db: B,
}

impl<B: Debug> Debug for DrinksApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DrinksApi ({:?})", self.db)
    }
}

impl<B> DrinksApi<B>
where B: DrinkManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Fetches every drink, ordered by id. An empty store produces an empty list; it is up to the caller to decide
    /// whether that is an error.
    pub async fn drinks(&self) -> Result<Vec<Drink>, DrinkStoreError> {
        self.db.fetch_drinks().await
    }

    pub async fn drink_by_id(&self, id: i64) -> Result<Option<Drink>, DrinkStoreError> {
        self.db.fetch_drink(id).await
    }

    /// Validates the title and recipe and saves a new drink.
    pub async fn create_drink(&self, title: &str, recipe: &[Value]) -> Result<Drink, DrinkStoreError> {
        check_title(title)?;
        let recipe = validate_recipe(recipe).map_err(|e| {
            debug!("🍹️ Rejecting new drink '{title}'. {e}");
            DrinkStoreError::from(e)
        })?;
        let drink = self.db.insert_drink(NewDrink::new(title, recipe)).await?;
        trace!("🍹️ Created {drink}");
        Ok(drink)
    }

    /// Applies a partial update to drink `id`. Fields that are `None` are left untouched. The recipe is only replaced
    /// when one is supplied and it passes validation.
    ///
    /// A missing drink takes precedence over an invalid title or recipe, so updating a non-existent drink always yields
    /// [`DrinkStoreError::DrinkNotFound`].
    pub async fn update_drink(
        &self,
        id: i64,
        title: Option<String>,
        recipe: Option<&[Value]>,
    ) -> Result<Drink, DrinkStoreError> {
        match checked_update(title, recipe) {
            Ok(update) => self.db.update_drink(id, update).await,
            Err(e) => {
                debug!("🍹️ Rejecting update for drink #{id}. {e}");
                match self.db.fetch_drink(id).await? {
                    Some(_) => Err(e),
                    None => Err(DrinkStoreError::DrinkNotFound(id)),
                }
            },
        }
    }

    /// Permanently deletes drink `id` and returns its id.
    pub async fn delete_drink(&self, id: i64) -> Result<i64, DrinkStoreError> {
        self.db.delete_drink(id).await
    }
}

fn check_title(title: &str) -> Result<(), DrinkStoreError> {
    if title.trim().is_empty() {
        return Err(DrinkStoreError::MissingTitle);
    }
    Ok(())
}

fn checked_update(title: Option<String>, recipe: Option<&[Value]>) -> Result<DrinkUpdate, DrinkStoreError> {
    let mut update = DrinkUpdate::default();
    if let Some(title) = title {
        check_title(&title)?;
        update = update.with_title(title);
    }
    if let Some(recipe) = recipe {
        update = update.with_recipe(validate_recipe(recipe)?);
    }
    Ok(update)
}
