use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use drinks_engine::DrinkStoreError;
use log::{error, warn};
use thiserror::Error;

use crate::data_objects::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Bad Request. {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Resource not found. {0}")]
    NoRecordFound(String),
    /// A write could not be completed. The detail is kept for the logs and is not sent to the client.
    #[error("Bad Request")]
    BadRequest(String),
}

impl ServerError {
    /// The message sent to the client. Server-side failures are reported with a generic message so that internals
    /// never leak.
    pub fn client_message(&self) -> String {
        match self {
            Self::AuthenticationError(e) => e.to_string(),
            e if e.status_code().is_server_error() => "Internal Server Error".to_string(),
            e => e.to_string(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => e.status_code(),
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        let code = match self {
            Self::AuthenticationError(e) => Some(e.code().to_string()),
            _ => None,
        };
        let body = ErrorResponse::new(status, self.client_message()).with_code(code);
        HttpResponse::build(status).insert_header(ContentType::json()).json(body)
    }
}

impl From<DrinkStoreError> for ServerError {
    fn from(e: DrinkStoreError) -> Self {
        match e {
            DrinkStoreError::DrinkNotFound(id) => Self::NoRecordFound(format!("Drink #{id} does not exist")),
            DrinkStoreError::InvalidRecipe(s) => Self::InvalidRequestBody(format!("Invalid recipe. {s}")),
            DrinkStoreError::MissingTitle => Self::InvalidRequestBody("A drink needs a title.".into()),
            DrinkStoreError::DatabaseError(s) => {
                warn!("💻️ Database write failed and was rolled back. {s}");
                Self::BadRequest(s)
            },
            DrinkStoreError::CorruptRecord(s) => Self::BackendError(s),
        }
    }
}

/// The ways in which a request can fail authorization. Each has a stable `code` that is sent to the client alongside
/// the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,
    #[error("Authorization header must be a bearer token. {0}")]
    MalformedHeader(String),
    #[error("Unable to verify the token. {0}")]
    InvalidHeader(String),
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. {0}")]
    InvalidClaims(String),
    #[error("Permissions not included in token.")]
    PermissionsNotIncluded,
    #[error("Permission not found. {0} is required.")]
    Unauthorized(String),
    #[error("The signing keys for the identity provider are unavailable.")]
    KeySetUnavailable(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader(_) => "malformed_header",
            Self::InvalidHeader(_) => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::PermissionsNotIncluded => "invalid_claims",
            Self::Unauthorized(_) => "unauthorized",
            Self::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingHeader => StatusCode::UNAUTHORIZED,
            Self::MalformedHeader(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidHeader(_) => StatusCode::UNAUTHORIZED,
            Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionsNotIncluded => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
