use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{serialize_recipe, Drink, DrinkRow, DrinkUpdate, NewDrink},
    traits::DrinkStoreError,
};

/// Returns every drink in the table, ordered by `id` in ascending order.
pub async fn fetch_all_drinks(conn: &mut SqliteConnection) -> Result<Vec<Drink>, DrinkStoreError> {
    let rows: Vec<DrinkRow> =
        sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id ASC").fetch_all(conn).await?;
    trace!("🗃️ Fetched {} drinks", rows.len());
    rows.into_iter().map(Drink::try_from).collect()
}

pub async fn fetch_drink_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Drink>, DrinkStoreError> {
    let row: Option<DrinkRow> =
        sqlx::query_as("SELECT id, title, recipe FROM drinks WHERE id = $1").bind(id).fetch_optional(conn).await?;
    row.map(Drink::try_from).transpose()
}

/// Inserts a new drink into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_drink(drink: NewDrink, conn: &mut SqliteConnection) -> Result<Drink, DrinkStoreError> {
    let recipe = serialize_recipe(&drink.recipe)?;
    let row: DrinkRow = sqlx::query_as(
        r#"
            INSERT INTO drinks (title, recipe) VALUES ($1, $2)
            RETURNING id, title, recipe;
        "#,
    )
    .bind(drink.title)
    .bind(recipe)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Drink [{}] inserted with id {}", row.title, row.id);
    Drink::try_from(row)
}

/// Applies the fields present in `update` to drink `id`. Returns `None` if there is no such drink.
pub async fn update_drink(
    id: i64,
    update: DrinkUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Drink>, DrinkStoreError> {
    if update.is_empty() {
        trace!("🗃️ Empty update for drink #{id}. Nothing to change.");
        return fetch_drink_by_id(id, conn).await;
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE drinks SET ");
    {
        let mut set_clause = builder.separated(", ");
        if let Some(title) = update.title {
            set_clause.push("title = ");
            set_clause.push_bind_unseparated(title);
        }
        if let Some(recipe) = update.recipe {
            set_clause.push("recipe = ");
            set_clause.push_bind_unseparated(serialize_recipe(&recipe)?);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING id, title, recipe");
    trace!("🗃️ Executing query: {}", builder.sql());
    let row = builder.build_query_as::<DrinkRow>().fetch_optional(conn).await?;
    row.map(Drink::try_from).transpose()
}

/// Deletes drink `id`. Returns `None` if there was no such drink.
pub async fn delete_drink(id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, DrinkStoreError> {
    let result = sqlx::query("DELETE FROM drinks WHERE id = $1").bind(id).execute(conn).await?;
    Ok((result.rows_affected() > 0).then_some(id))
}

/// Removes every drink and resets the id sequence, so that the next drink inserted gets id 1.
pub async fn delete_all_drinks(conn: &mut SqliteConnection) -> Result<u64, DrinkStoreError> {
    let result = sqlx::query("DELETE FROM drinks").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'drinks'").execute(conn).await?;
    Ok(result.rows_affected())
}
