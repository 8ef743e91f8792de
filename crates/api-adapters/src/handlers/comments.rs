//! Comment handlers, scoped under a title's review.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use domains::Comment;
use services::{CommentPatch, NewComment};

use crate::error::ApiResult;
use crate::extract::{identity_of, CurrentUser};
use crate::pagination::{window, ListQuery, Page};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Comment>>> {
    let w = window(query.page, state.page_size);
    let (results, count) = state
        .comments
        .list(title_id, review_id, w.limit, w.offset)
        .await?;
    Ok(Json(Page::new(w, count, results)))
}

pub async fn create(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    user: Option<CurrentUser>,
    Json(input): Json<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let identity = identity_of(&user);
    let created = state
        .comments
        .create(identity.as_ref(), title_id, review_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(
        state.comments.get(title_id, review_id, comment_id).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    user: Option<CurrentUser>,
    Json(patch): Json<CommentPatch>,
) -> ApiResult<Json<Comment>> {
    let identity = identity_of(&user);
    Ok(Json(
        state
            .comments
            .update(identity.as_ref(), title_id, review_id, comment_id, patch)
            .await?,
    ))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    user: Option<CurrentUser>,
) -> ApiResult<StatusCode> {
    let identity = identity_of(&user);
    state
        .comments
        .delete(identity.as_ref(), title_id, review_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
