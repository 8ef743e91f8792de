//! Route table.
//!
//! Everything lives under `/api/v1`. The static `/users/me` pair wins over
//! the `/users/{username}` capture, and `me` is a reserved username anyway.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, categories, comments, genres, reviews, titles, users};
use crate::middleware;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/token", post(auth::token))
        .route("/api/v1/users", get(users::list).post(users::create))
        .route(
            "/api/v1/users/me",
            get(users::me).patch(users::patch_me),
        )
        .route(
            "/api/v1/users/{username}",
            get(users::retrieve)
                .patch(users::update)
                .delete(users::destroy),
        )
        .route(
            "/api/v1/categories",
            get(categories::list).post(categories::create),
        )
        .route("/api/v1/categories/{slug}", delete(categories::destroy))
        .route("/api/v1/genres", get(genres::list).post(genres::create))
        .route("/api/v1/genres/{slug}", delete(genres::destroy))
        .route("/api/v1/titles", get(titles::list).post(titles::create))
        .route(
            "/api/v1/titles/{title_id}",
            get(titles::retrieve)
                .patch(titles::update)
                .delete(titles::destroy),
        )
        .route(
            "/api/v1/titles/{title_id}/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route(
            "/api/v1/titles/{title_id}/reviews/{review_id}",
            get(reviews::retrieve)
                .patch(reviews::update)
                .delete(reviews::destroy),
        )
        .route(
            "/api/v1/titles/{title_id}/reviews/{review_id}/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(comments::retrieve)
                .patch(comments::update)
                .delete(comments::destroy),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_policy())
        .with_state(state)
}
