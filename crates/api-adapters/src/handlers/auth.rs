//! Signup and token exchange.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use services::{SignupReceipt, SignupRequest, TokenRequest};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<SignupReceipt>> {
    Ok(Json(state.accounts.signup(req).await?))
}

pub async fn token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let token = state.accounts.token(req).await?;
    Ok(Json(json!({ "token": token })))
}
