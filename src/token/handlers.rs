use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::types::{TokenQuery, TokenResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler issuing an access token for a freshly generated identity
///
/// GET /token
/// Returns `{identity, token}`; `?room=<name>` restricts the grant to one room
#[instrument(name = "issue_token", skip(state, query))]
pub async fn issue_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, AppError> {
    let room = match query.room {
        Some(room) if room.trim().is_empty() => {
            warn!("Rejecting token request with blank room restriction");
            return Err(AppError::BadRequest("room must not be blank".to_string()));
        }
        room => room,
    };

    let identity = state.identity_generator.generate().await;
    let token = state.token_config.create_token(&identity, room)?;

    info!(
        identity = %identity,
        token_length = token.len(),
        "Access token issued"
    );

    Ok(Json(TokenResponse { identity, token }))
}
