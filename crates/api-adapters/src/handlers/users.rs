//! The admin user surface plus the self-service `me` pair.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use domains::User;
use services::{NewUser, UserPatch};

use crate::error::ApiResult;
use crate::extract::{identity_of, CurrentUser};
use crate::pagination::{window, ListQuery, Page};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<User>>> {
    let identity = identity_of(&user);
    let w = window(query.page, state.page_size);
    let (results, count) = state
        .accounts
        .list_users(identity.as_ref(), query.search, w.limit, w.offset)
        .await?;
    Ok(Json(Page::new(w, count, results)))
}

pub async fn create(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Json(input): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let identity = identity_of(&user);
    let created = state.accounts.create_user(identity.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn me(user: CurrentUser) -> Json<User> {
    Json(user.0)
}

pub async fn patch_me(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(patch): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.accounts.patch_me(&user.0, patch).await?))
}

pub async fn retrieve(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    let identity = identity_of(&user);
    Ok(Json(state.accounts.user(identity.as_ref(), &username).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(username): Path<String>,
    Json(patch): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    let identity = identity_of(&user);
    Ok(Json(
        state
            .accounts
            .patch_user(identity.as_ref(), &username, patch)
            .await?,
    ))
}

pub async fn destroy(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = identity_of(&user);
    state
        .accounts
        .delete_user(identity.as_ref(), &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
