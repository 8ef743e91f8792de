//! Title reads (public, filterable) and admin mutation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use domains::TitleDetail;
use services::{NewTitle, TitlePatch};

use crate::error::ApiResult;
use crate::extract::{identity_of, CurrentUser};
use crate::pagination::{window, Page, TitleQuery};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> ApiResult<Json<Page<TitleDetail>>> {
    let w = window(query.page, state.page_size);
    let (results, count) = state
        .catalog
        .list_titles(query.filter(), w.limit, w.offset)
        .await?;
    Ok(Json(Page::new(w, count, results)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> ApiResult<Json<TitleDetail>> {
    Ok(Json(state.catalog.get_title(title_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Json(input): Json<NewTitle>,
) -> ApiResult<(StatusCode, Json<TitleDetail>)> {
    let identity = identity_of(&user);
    let created = state.catalog.create_title(identity.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(title_id): Path<Uuid>,
    Json(patch): Json<TitlePatch>,
) -> ApiResult<Json<TitleDetail>> {
    let identity = identity_of(&user);
    Ok(Json(
        state
            .catalog
            .update_title(identity.as_ref(), title_id, patch)
            .await?,
    ))
}

pub async fn destroy(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(title_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let identity = identity_of(&user);
    state
        .catalog
        .delete_title(identity.as_ref(), title_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
