use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::token::{IdentityGenerator, TokenConfig};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub token_config: TokenConfig,
    pub identity_generator: Arc<dyn IdentityGenerator>,
}

impl AppState {
    pub fn new(token_config: TokenConfig, identity_generator: Arc<dyn IdentityGenerator>) -> Self {
        Self {
            token_config,
            identity_generator,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Failing to sign a token is a server-side problem, not the caller's
            AppError::JwtError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token error: {}", msg),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
