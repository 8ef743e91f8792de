//! Cross-cutting HTTP middleware.

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS: the API is public-read and token-authenticated, so
/// origin restrictions buy nothing here.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
