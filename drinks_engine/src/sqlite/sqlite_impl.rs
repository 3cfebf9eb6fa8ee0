//! `SqliteDatabase` is a concrete implementation of a drinks storage backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{drinks, new_pool};
use crate::{
    db_types::{Drink, DrinkUpdate, Ingredient, NewDrink},
    traits::{DrinkManagement, DrinkStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl DrinkManagement for SqliteDatabase {
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkStoreError> {
        let mut conn = self.pool.acquire().await?;
        drinks::fetch_all_drinks(&mut conn).await
    }

    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkStoreError> {
        let mut conn = self.pool.acquire().await?;
        drinks::fetch_drink_by_id(id, &mut conn).await
    }

    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkStoreError> {
        let mut tx = self.pool.begin().await?;
        let drink = drinks::insert_drink(drink, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {drink} has been saved");
        Ok(drink)
    }

    /// Runs the update in its own transaction. If anything fails, the transaction is dropped without being committed,
    /// which rolls it back.
    async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Drink, DrinkStoreError> {
        let mut tx = self.pool.begin().await?;
        let drink = drinks::update_drink(id, update, &mut tx).await?.ok_or(DrinkStoreError::DrinkNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ {drink} has been updated");
        Ok(drink)
    }

    async fn delete_drink(&self, id: i64) -> Result<i64, DrinkStoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = drinks::delete_drink(id, &mut tx).await?.ok_or(DrinkStoreError::DrinkNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Drink #{deleted} has been deleted");
        Ok(deleted)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, DrinkStoreError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), DrinkStoreError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await.map_err(|e: MigrateError| {
            error!("🗃️ Could not run database migrations. {e}");
            DrinkStoreError::DatabaseError(e.to_string())
        })?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Drops every drink record and restarts the id sequence. If `seed` is true, a single sample drink is inserted
    /// afterwards.
    ///
    /// **This destroys all data in the drinks table.**
    pub async fn reset(&self, seed: bool) -> Result<(), DrinkStoreError> {
        let mut tx = self.pool.begin().await?;
        let removed = drinks::delete_all_drinks(&mut tx).await?;
        warn!("🗃️ Database reset. {removed} drinks were removed.");
        if seed {
            let water = NewDrink::new("water", vec![Ingredient::new("blue", "water", 1)]);
            let drink = drinks::insert_drink(water, &mut tx).await?;
            info!("🗃️ Seeded the database with {drink}");
        }
        tx.commit().await?;
        Ok(())
    }
}
