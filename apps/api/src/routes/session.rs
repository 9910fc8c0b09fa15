use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::TOKEN_KEY;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// PUT /api/v1/session/token
pub async fn handle_set_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<StatusCode, AppError> {
    let token = req.token.trim();
    if token.is_empty() {
        return Err(AppError::Validation("token must not be empty".to_string()));
    }
    state.store.set_async(TOKEN_KEY, &token).await?;
    info!("backend token stored");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/session/token
pub async fn handle_clear_token(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    if state.store.remove_async(TOKEN_KEY).await? {
        info!("backend token cleared");
    }
    Ok(StatusCode::NO_CONTENT)
}
