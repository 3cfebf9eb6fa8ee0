use std::fmt::Display;

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// `{"success": true, "drinks": [...]}`. `T` is either the short or the long view of a drink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self { success: true, drinks }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

impl DeleteResponse {
    pub fn new(id: i64) -> Self {
        Self { success: true, delete: id }
    }
}

/// The body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// The HTTP status code
    pub error: u16,
    pub message: String,
    /// Authorization failures carry the failure kind here, e.g. `token_expired`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new<S: Display>(status: StatusCode, message: S) -> Self {
        Self { success: false, error: status.as_u16(), message: message.to_string(), code: None }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }
}

/// Body of `POST /drinks`. Recipe entries are kept as raw JSON until they have been validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDrinkRequest {
    pub title: String,
    pub recipe: Vec<Value>,
}

/// Body of `PATCH /drinks/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Value>>,
}
