//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Comment, Genre, Review, Title, TitleDetail, User};

/// Filter for title listings. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Case-insensitive substring of the title name
    pub search: Option<String>,
}

/// Account persistence contract.
///
/// Uniqueness of `username` and `email` is enforced by the implementation;
/// violations surface as `AppError::Conflict`, never as a generic failure.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn update_user(&self, user: &User) -> Result<()>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Username substring search, ordered by username; returns the page and
    /// the unpaginated match count.
    async fn search_users(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64)>;
    async fn delete_user(&self, id: Uuid) -> Result<bool>;
}

/// Persistence contract for categories, genres, and titles.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    // Category operations
    async fn insert_category(&self, category: Category) -> Result<Category>;
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    async fn list_categories(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Category>, i64)>;
    /// Fails with `Conflict` while any title still references the category.
    async fn delete_category(&self, slug: &str) -> Result<bool>;

    // Genre operations
    async fn insert_genre(&self, genre: Genre) -> Result<Genre>;
    async fn genre_by_slug(&self, slug: &str) -> Result<Option<Genre>>;
    async fn list_genres(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Genre>, i64)>;
    /// Fails with `Conflict` while any title still links the genre.
    async fn delete_genre(&self, slug: &str) -> Result<bool>;

    // Title operations
    async fn insert_title(&self, title: Title, genre_ids: Vec<Uuid>) -> Result<()>;
    async fn update_title(&self, title: &Title, genre_ids: Option<Vec<Uuid>>) -> Result<()>;
    async fn title_by_id(&self, id: Uuid) -> Result<Option<TitleDetail>>;
    async fn list_titles(
        &self,
        filter: TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TitleDetail>, i64)>;
    /// Cascades to the title's reviews and their comments.
    async fn delete_title(&self, id: Uuid) -> Result<bool>;
}

/// Persistence contract for reviews and their comments.
///
/// Lookups are scoped to the parent named in the call: a review id under
/// the wrong title, or a comment id under the wrong review, resolves to
/// `None`. `insert_review` reports a duplicate `(title_id, author_id)` as
/// `AppError::Conflict` — the unique constraint in the store is the source
/// of truth under concurrent submissions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    // Review operations
    async fn insert_review(&self, review: Review) -> Result<Review>;
    async fn update_review(&self, review: &Review) -> Result<()>;
    async fn review_by_id(&self, title_id: Uuid, review_id: Uuid) -> Result<Option<Review>>;
    /// Newest first: `created_at` descending, insertion order among ties.
    async fn list_reviews(
        &self,
        title_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64)>;
    /// Cascades to the review's comments.
    async fn delete_review(&self, title_id: Uuid, review_id: Uuid) -> Result<bool>;

    // Comment operations
    async fn insert_comment(&self, comment: Comment) -> Result<Comment>;
    async fn update_comment(&self, comment: &Comment) -> Result<()>;
    async fn comment_by_id(&self, review_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>>;
    async fn list_comments(
        &self,
        review_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64)>;
    async fn delete_comment(&self, review_id: Uuid, comment_id: Uuid) -> Result<bool>;
}

/// Bearer-token contract. The token payload is opaque to the rest of the
/// system; only the subject id comes back out.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String>;
    /// Returns `Unauthorized` for anything malformed, forged, or expired.
    fn verify(&self, token: &str) -> Result<Uuid>;
}

/// A confirmation code and the hash we keep of it. The plain code goes to
/// the dispatcher once and is never stored.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub hash: String,
}

/// Confirmation-code contract for the signup flow.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CodeIssuer: Send + Sync {
    fn issue(&self) -> Result<IssuedCode>;
    fn verify(&self, code: &str, hash: &str) -> bool;
}

/// Delivery contract for confirmation codes (email in production; the
/// default adapter writes to the service log).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CodeDispatcher: Send + Sync {
    async fn dispatch(&self, email: &str, code: &str) -> Result<()>;
}
