//! # api-adapters
//!
//! The web routing and orchestration layer for Critica, compiled behind
//! the `web-axum` feature. Handlers stay thin: parse the request, call a
//! service, map the outcome to a status code.

#[cfg(feature = "web-axum")]
mod error;
#[cfg(feature = "web-axum")]
mod extract;
#[cfg(feature = "web-axum")]
mod handlers;
#[cfg(feature = "web-axum")]
mod middleware;
#[cfg(feature = "web-axum")]
mod pagination;
#[cfg(feature = "web-axum")]
mod routes;
#[cfg(feature = "web-axum")]
mod state;

#[cfg(feature = "web-axum")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "web-axum")]
pub use extract::CurrentUser;
#[cfg(feature = "web-axum")]
pub use pagination::{ListQuery, Page, TitleQuery};
#[cfg(feature = "web-axum")]
pub use routes::router;
#[cfg(feature = "web-axum")]
pub use state::AppState;
