//! Review handlers. Reads are public; mutation defers to the service
//! layer's policy (author or privileged role).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use domains::Review;
use services::{NewReview, ReviewPatch};

use crate::error::ApiResult;
use crate::extract::{identity_of, CurrentUser};
use crate::pagination::{window, ListQuery, Page};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Review>>> {
    let w = window(query.page, state.page_size);
    let (results, count) = state.reviews.list(title_id, w.limit, w.offset).await?;
    Ok(Json(Page::new(w, count, results)))
}

pub async fn create(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    user: Option<CurrentUser>,
    Json(input): Json<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let identity = identity_of(&user);
    let created = state
        .reviews
        .create(identity.as_ref(), title_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Review>> {
    Ok(Json(state.reviews.get(title_id, review_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    user: Option<CurrentUser>,
    Json(patch): Json<ReviewPatch>,
) -> ApiResult<Json<Review>> {
    let identity = identity_of(&user);
    Ok(Json(
        state
            .reviews
            .update(identity.as_ref(), title_id, review_id, patch)
            .await?,
    ))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    user: Option<CurrentUser>,
) -> ApiResult<StatusCode> {
    let identity = identity_of(&user);
    state
        .reviews
        .delete(identity.as_ref(), title_id, review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
