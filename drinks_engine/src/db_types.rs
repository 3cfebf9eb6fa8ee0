use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use sqlx::FromRow;

use crate::traits::DrinkStoreError;

//--------------------------------------     Ingredient       ---------------------------------------------------------
/// A single line of a recipe. All three fields are required; see [`crate::helpers::validate_recipe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: Number,
}

impl Ingredient {
    pub fn new<S: Into<String>, N: Into<Number>>(color: S, name: S, parts: N) -> Self {
        Self { color: color.into(), name: name.into(), parts: parts.into() }
    }

    /// The public projection of an ingredient. The ingredient name is omitted.
    pub fn short(&self) -> ShortIngredient {
        ShortIngredient { color: self.color.clone(), parts: self.parts.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: Number,
}

//--------------------------------------       Drink          ---------------------------------------------------------
/// A drink as it is stored. Serializing a `Drink` directly produces the *long* (detailed) view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// The public view of the drink, with ingredient names stripped out of the recipe.
    pub fn short(&self) -> ShortDrink {
        ShortDrink { id: self.id, title: self.title.clone(), recipe: self.recipe.iter().map(Ingredient::short).collect() }
    }

    /// The detailed view of the drink. This is the drink itself.
    pub fn long(&self) -> &Drink {
        self
    }
}

impl Display for Drink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Drink #{} ({}, {} ingredients)", self.id, self.title, self.recipe.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// The raw database row. The recipe is kept as serialized JSON text and is only ever turned into a [`Drink`] via
/// `TryFrom`, so that a corrupt record is caught at the boundary.
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = DrinkStoreError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&row.recipe)
            .map_err(|e| DrinkStoreError::CorruptRecord(format!("Drink #{} has an unreadable recipe. {e}", row.id)))?;
        Ok(Self { id: row.id, title: row.title, recipe })
    }
}

//--------------------------------------      NewDrink        ---------------------------------------------------------
/// A validated drink that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl NewDrink {
    pub fn new<S: Into<String>>(title: S, recipe: Vec<Ingredient>) -> Self {
        Self { title: title.into(), recipe }
    }
}

//--------------------------------------     DrinkUpdate      ---------------------------------------------------------
/// A partial update. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkUpdate {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkUpdate {
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_recipe(mut self, recipe: Vec<Ingredient>) -> Self {
        self.recipe = Some(recipe);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

/// Serializes a recipe into the opaque text form used for storage.
pub fn serialize_recipe(recipe: &[Ingredient]) -> Result<String, DrinkStoreError> {
    serde_json::to_string(recipe).map_err(|e| DrinkStoreError::InvalidRecipe(e.to_string()))
}
