use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{cache::CacheError, web::auth::AuthError};

pub enum ApiError {
    Auth(AuthError),
    AirportNotFound(String),
    Fetch(CacheError),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<CacheError> for ApiError {
    fn from(e: CacheError) -> Self {
        ApiError::Fetch(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(e) => e.into_response(),
            ApiError::AirportNotFound(code) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message(
                    "airport_not_found",
                    &format!("unknown airport code {}", code),
                )),
            )
                .into_response(),
            ApiError::Fetch(e) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("fetch_failed", &e.to_string())),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
