//! Identity extraction from the `Authorization: Bearer` header.
//!
//! Handlers take `CurrentUser` where authentication is mandatory and
//! `Option<CurrentUser>` where reads stay public. A header that is
//! present but unusable is rejected either way.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use domains::{AppError, Identity, User};

use crate::error::ApiError;
use crate::state::AppState;

pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn identity(&self) -> Identity {
        self.0.identity()
    }
}

/// Handler-side helper: `Option<CurrentUser>` → the `Option<Identity>`
/// the service layer's policy checks expect.
pub fn identity_of(user: &Option<CurrentUser>) -> Option<Identity> {
    user.as_ref().map(CurrentUser::identity)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(AppError::Unauthorized("missing bearer token".to_string()))
            })?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(AppError::Unauthorized(
                "authorization header is not a bearer token".to_string(),
            ))
        })?;
        let user = state.accounts.resolve(token).await?;
        Ok(CurrentUser(user))
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if parts.headers.contains_key(AUTHORIZATION) {
            <CurrentUser as FromRequestParts<S>>::from_request_parts(parts, state)
                .await
                .map(Some)
        } else {
            Ok(None)
        }
    }
}
