mod recipe;

pub use recipe::{validate_recipe, RecipeError, REQUIRED_INGREDIENT_FIELDS};
