use serde_json::Value;
use thiserror::Error;

use crate::db_types::Ingredient;

/// Every recipe entry must carry all of these fields.
pub const REQUIRED_INGREDIENT_FIELDS: [&str; 3] = ["color", "name", "parts"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("Recipe entry {0} is not an object")]
    NotAnObject(usize),
    #[error("Recipe entry {index} is missing the '{field}' field")]
    MissingField { index: usize, field: &'static str },
    #[error("Recipe entry {index} is malformed. {reason}")]
    Malformed { index: usize, reason: String },
}

/// Checks the shape of a recipe as it arrives over the wire and converts it into [`Ingredient`]s.
///
/// Each entry must be a JSON object containing `color`, `name` and `parts`. The first offending entry, wherever it
/// sits in the array, fails the whole recipe. An empty recipe is valid.
pub fn validate_recipe(entries: &[Value]) -> Result<Vec<Ingredient>, RecipeError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let fields = entry.as_object().ok_or(RecipeError::NotAnObject(index))?;
            if let Some(field) = REQUIRED_INGREDIENT_FIELDS.into_iter().find(|f| !fields.contains_key(*f)) {
                return Err(RecipeError::MissingField { index, field });
            }
            serde_json::from_value::<Ingredient>(entry.clone())
                .map_err(|e| RecipeError::Malformed { index, reason: e.to_string() })
        })
        .collect()
}
