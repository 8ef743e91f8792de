//! Relational schema, bootstrapped at pool creation.
//!
//! The `(title_id, author_id)` unique index on `reviews` is the source of
//! truth for the one-review-per-author rule; deletes cascade downward
//! (title → reviews → comments) while category/genre references are
//! restricted so the catalog cannot lose rows that titles still point at.

use sqlx::SqlitePool;

use domains::{AppError, Result};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id                BLOB PRIMARY KEY,
        username          TEXT NOT NULL UNIQUE,
        email             TEXT NOT NULL UNIQUE,
        bio               TEXT NOT NULL DEFAULT '',
        role              TEXT NOT NULL DEFAULT 'user',
        confirmation_hash TEXT,
        created_at        TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id   BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS genres (
        id   BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS titles (
        id          BLOB PRIMARY KEY,
        name        TEXT NOT NULL,
        year        INTEGER NOT NULL,
        description TEXT,
        category_id BLOB NOT NULL REFERENCES categories(id) ON DELETE RESTRICT
    )",
    "CREATE TABLE IF NOT EXISTS title_genres (
        title_id BLOB NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
        genre_id BLOB NOT NULL REFERENCES genres(id) ON DELETE RESTRICT,
        PRIMARY KEY (title_id, genre_id)
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id         BLOB PRIMARY KEY,
        title_id   BLOB NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
        author_id  BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        score      INTEGER NOT NULL,
        text       TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (title_id, author_id)
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id         BLOB PRIMARY KEY,
        review_id  BLOB NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
        author_id  BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        text       TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_reviews_title_created
        ON reviews (title_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_comments_review_created
        ON comments (review_id, created_at DESC)",
];

pub async fn bootstrap(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::Internal(format!("schema bootstrap failed: {e}")))?;
    }
    tracing::debug!(tables = 7, "schema bootstrapped");
    Ok(())
}
