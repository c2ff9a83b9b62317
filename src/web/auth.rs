use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashSet;

use super::api::error::ErrorResponse;
use super::config::{Config, Permission};
use super::server::AppState;

/// Holder of a configured API key, resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct Caller {
    pub name: String,
    permissions: HashSet<Permission>,
}

#[derive(Debug, PartialEq)]
pub enum AuthError {
    MissingKey,
    MalformedHeader,
    UnknownKey,
    Forbidden(Permission),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::MissingKey => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_message("missing_api_key", "expected 'Authorization: Bearer <key>'"),
            ),
            AuthError::MalformedHeader => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_message("malformed_authorization", "expected 'Bearer <key>'"),
            ),
            AuthError::UnknownKey => (StatusCode::UNAUTHORIZED, ErrorResponse::new("invalid_api_key")),
            AuthError::Forbidden(permission) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::with_message("forbidden", &format!("requires {}", permission.as_str())),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl Caller {
    /// Resolves the bearer key in `headers` against the configured keys.
    pub fn from_headers(headers: &HeaderMap, config: &Config) -> Result<Self, AuthError> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingKey)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;
        let key = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::MalformedHeader)?;
        let api_key = config.find_api_key(key).ok_or(AuthError::UnknownKey)?;

        Ok(Caller {
            name: api_key.name.clone(),
            permissions: api_key.permissions.clone(),
        })
    }

    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.permissions.contains(&permission) {
            Ok(())
        } else {
            log::debug!("{} lacks {}", self.name, permission.as_str());
            Err(AuthError::Forbidden(permission))
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Caller::from_headers(&parts.headers, &state.config)
    }
}
