// Library crate for the video quickstart
// This file exposes the public API for the binary and integration tests

pub mod client;
pub mod shared;
pub mod token;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use client::{
    InMemoryPage, RoomEvent, RoomSessionController, SessionState, UiCommand, VideoSdk,
};
pub use shared::{AppError, AppState};
pub use token::{TokenConfig, TokenResponse};

/// Builds the HTTP router serving the token endpoint
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Video quickstart token server" }))
        .route("/token", get(token::issue_token))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
