//! Category listing (public) and admin mutation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use domains::Category;
use services::SlugInput;

use crate::error::ApiResult;
use crate::extract::{identity_of, CurrentUser};
use crate::pagination::{window, ListQuery, Page};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Category>>> {
    let w = window(query.page, state.page_size);
    let (results, count) = state
        .catalog
        .list_categories(query.search, w.limit, w.offset)
        .await?;
    Ok(Json(Page::new(w, count, results)))
}

pub async fn create(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Json(input): Json<SlugInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let identity = identity_of(&user);
    let created = state
        .catalog
        .create_category(identity.as_ref(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn destroy(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = identity_of(&user);
    state
        .catalog
        .delete_category(identity.as_ref(), &slug)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
