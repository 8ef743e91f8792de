//! State shared across all handlers.

use std::sync::Arc;

use services::{AccountService, CatalogService, CommentService, ReviewService};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub catalog: Arc<CatalogService>,
    pub reviews: Arc<ReviewService>,
    pub comments: Arc<CommentService>,
    /// Fixed page size; page selection comes from the `?page=` query.
    pub page_size: i64,
}
