//! # storage-adapters
//!
//! sqlx/SQLite implementations of the domain's persistence ports. One
//! pool-owning store implements all three repo traits; constraint
//! violations are mapped to `AppError::Conflict` so the service layer can
//! tell them apart from infrastructure failures.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use domains::{AppError, Result};

mod catalog;
mod reviews;
mod schema;
mod users;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url`, enables foreign
    /// keys, and bootstraps the schema.
    ///
    /// In-memory databases only survive on a single connection, so tests
    /// pass `max_connections = 1`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Internal(format!("bad database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Internal(format!("database connect failed: {e}")))?;
        schema::bootstrap(&pool).await?;
        tracing::info!(%url, "sqlite store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Maps driver errors onto the domain: unique/foreign-key violations become
/// `Conflict` (a distinct, expected outcome), everything else `Internal`.
pub(crate) fn storage_err(e: sqlx::Error) -> AppError {
    use sqlx::error::ErrorKind;
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), ErrorKind::UniqueViolation) {
            return AppError::Conflict(format!("unique constraint violated: {}", db.message()));
        }
        // Some SQLite builds report foreign-key violations with an extended
        // result code (e.g. 1811) that sqlx classifies as `Other` rather than
        // `ForeignKeyViolation`; fall back to the driver message so the
        // violation is still surfaced as a `Conflict`.
        if matches!(db.kind(), ErrorKind::ForeignKeyViolation)
            || db.message().contains("FOREIGN KEY constraint failed")
        {
            return AppError::Conflict(format!(
                "foreign key constraint violated: {}",
                db.message()
            ));
        }
    }
    AppError::Internal(format!("storage failure: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domains::{
        Authored, CatalogRepo, Category, Comment, Genre, Review, ReviewRepo, Role, Title, User,
        UserRepo,
    };
    use uuid::Uuid;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory store")
    }

    async fn seed_user(store: &SqliteStore, username: &str) -> User {
        store
            .insert_user(User {
                id: Uuid::now_v7(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                bio: String::new(),
                role: Role::User,
                confirmation_hash: None,
                created_at: Utc::now(),
            })
            .await
            .expect("seed user")
    }

    async fn seed_title(store: &SqliteStore, name: &str) -> Title {
        let category = store
            .insert_category(Category {
                id: Uuid::now_v7(),
                name: format!("{name} category"),
                slug: format!("{}-cat", name.to_lowercase()),
            })
            .await
            .expect("seed category");
        let title = Title {
            id: Uuid::now_v7(),
            name: name.to_string(),
            year: 1999,
            description: None,
            category_id: category.id,
        };
        store
            .insert_title(title.clone(), Vec::new())
            .await
            .expect("seed title");
        title
    }

    fn review_for(title_id: Uuid, author_id: Uuid, score: i32) -> Review {
        Review {
            id: Uuid::now_v7(),
            title_id,
            score,
            authored: Authored {
                author_id,
                text: "fine".to_string(),
                created_at: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn duplicate_review_hits_the_unique_constraint() {
        let store = memory_store().await;
        let author = seed_user(&store, "one").await;
        let title = seed_title(&store, "Solaris").await;

        store
            .insert_review(review_for(title.id, author.id, 8))
            .await
            .expect("first review");
        let second = store.insert_review(review_for(title.id, author.id, 3)).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        // Same author on another title, and another author on the same
        // title, both stay legal.
        let other_title = seed_title(&store, "Stalker").await;
        store
            .insert_review(review_for(other_title.id, author.id, 5))
            .await
            .expect("same author, other title");
        let other = seed_user(&store, "two").await;
        store
            .insert_review(review_for(title.id, other.id, 10))
            .await
            .expect("other author, same title");
    }

    #[tokio::test]
    async fn review_listing_is_newest_first_with_stable_ties() {
        let store = memory_store().await;
        let title = seed_title(&store, "Solaris").await;
        let base = Utc::now();

        for (offset_secs, score) in [(0_i64, 5), (2, 6), (1, 7), (2, 8)] {
            let author = seed_user(&store, &format!("u{score}")).await;
            let mut review = review_for(title.id, author.id, score);
            review.authored.created_at = base + Duration::seconds(offset_secs);
            store.insert_review(review).await.expect("insert");
        }

        let (listed, count) = store.list_reviews(title.id, 50, 0).await.expect("list");
        assert_eq!(count, 4);
        for pair in listed.windows(2) {
            let newer = &pair[0];
            let older = &pair[1];
            assert!(
                newer.authored.created_at > older.authored.created_at
                    || (newer.authored.created_at == older.authored.created_at
                        && newer.id < older.id),
                "descending by time, insertion order on ties"
            );
        }
        // Ordering must be identical across page boundaries.
        let (page_one, _) = store.list_reviews(title.id, 2, 0).await.expect("page 1");
        let (page_two, _) = store.list_reviews(title.id, 2, 2).await.expect("page 2");
        let paged: Vec<Uuid> = page_one.iter().chain(&page_two).map(|r| r.id).collect();
        let all: Vec<Uuid> = listed.iter().map(|r| r.id).collect();
        assert_eq!(paged, all);
    }

    #[tokio::test]
    async fn lookups_are_scoped_to_the_routed_parent() {
        let store = memory_store().await;
        let author = seed_user(&store, "one").await;
        let title = seed_title(&store, "Solaris").await;
        let other_title = seed_title(&store, "Stalker").await;

        let review = store
            .insert_review(review_for(title.id, author.id, 8))
            .await
            .expect("review");
        assert!(store
            .review_by_id(title.id, review.id)
            .await
            .expect("scoped fetch")
            .is_some());
        assert!(store
            .review_by_id(other_title.id, review.id)
            .await
            .expect("cross-parent fetch")
            .is_none());

        let comment = store
            .insert_comment(Comment {
                id: Uuid::now_v7(),
                review_id: review.id,
                authored: Authored {
                    author_id: author.id,
                    text: "agreed".to_string(),
                    created_at: Utc::now(),
                },
            })
            .await
            .expect("comment");
        assert!(store
            .comment_by_id(review.id, comment.id)
            .await
            .expect("scoped fetch")
            .is_some());
        assert!(store
            .comment_by_id(Uuid::now_v7(), comment.id)
            .await
            .expect("cross-parent fetch")
            .is_none());
    }

    #[tokio::test]
    async fn deleting_a_review_cascades_to_comments() {
        let store = memory_store().await;
        let author = seed_user(&store, "one").await;
        let title = seed_title(&store, "Solaris").await;
        let review = store
            .insert_review(review_for(title.id, author.id, 8))
            .await
            .expect("review");
        for n in 0..3 {
            store
                .insert_comment(Comment {
                    id: Uuid::now_v7(),
                    review_id: review.id,
                    authored: Authored {
                        author_id: author.id,
                        text: format!("comment {n}"),
                        created_at: Utc::now(),
                    },
                })
                .await
                .expect("comment");
        }

        assert!(store
            .delete_review(title.id, review.id)
            .await
            .expect("delete"));
        let (comments, count) = store.list_comments(review.id, 10, 0).await.expect("list");
        assert!(comments.is_empty());
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn referenced_category_cannot_be_deleted() {
        let store = memory_store().await;
        let title = seed_title(&store, "Solaris").await;

        let category_slug = "solaris-cat";
        let blocked = store.delete_category(category_slug).await;
        assert!(matches!(blocked, Err(AppError::Conflict(_))));

        assert!(store.delete_title(title.id).await.expect("delete title"));
        assert!(store
            .delete_category(category_slug)
            .await
            .expect("now unreferenced"));
    }

    #[tokio::test]
    async fn username_and_email_are_unique() {
        let store = memory_store().await;
        seed_user(&store, "one").await;
        let clash = store
            .insert_user(User {
                id: Uuid::now_v7(),
                username: "one".to_string(),
                email: "fresh@example.com".to_string(),
                bio: String::new(),
                role: Role::User,
                confirmation_hash: None,
                created_at: Utc::now(),
            })
            .await;
        assert!(matches!(clash, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn title_rating_is_the_rounded_mean() {
        let store = memory_store().await;
        let title = seed_title(&store, "Solaris").await;

        let detail = store
            .title_by_id(title.id)
            .await
            .expect("fetch")
            .expect("exists");
        assert_eq!(detail.rating, None);

        for score in [6, 7] {
            let author = seed_user(&store, &format!("u{score}")).await;
            store
                .insert_review(review_for(title.id, author.id, score))
                .await
                .expect("review");
        }
        let detail = store
            .title_by_id(title.id)
            .await
            .expect("fetch")
            .expect("exists");
        // mean 6.5 rounds away from zero in SQLite
        assert_eq!(detail.rating, Some(7));
    }

    #[tokio::test]
    async fn title_listing_filters_combine() {
        let store = memory_store().await;
        let drama = store
            .insert_category(Category {
                id: Uuid::now_v7(),
                name: "Drama".to_string(),
                slug: "drama".to_string(),
            })
            .await
            .expect("category");
        let noir = store
            .insert_genre(Genre {
                id: Uuid::now_v7(),
                name: "Noir".to_string(),
                slug: "noir".to_string(),
            })
            .await
            .expect("genre");

        let tagged = Title {
            id: Uuid::now_v7(),
            name: "The Third Man".to_string(),
            year: 1949,
            description: None,
            category_id: drama.id,
        };
        store
            .insert_title(tagged.clone(), vec![noir.id])
            .await
            .expect("title");
        let untagged = Title {
            id: Uuid::now_v7(),
            name: "Marty".to_string(),
            year: 1955,
            description: None,
            category_id: drama.id,
        };
        store
            .insert_title(untagged, Vec::new())
            .await
            .expect("title");

        let by_genre = domains::TitleFilter {
            genre: Some("noir".to_string()),
            ..Default::default()
        };
        let (found, count) = store.list_titles(by_genre, 10, 0).await.expect("list");
        assert_eq!(count, 1);
        assert_eq!(found[0].id, tagged.id);
        assert_eq!(found[0].genres.len(), 1);

        let by_year_and_search = domains::TitleFilter {
            year: Some(1955),
            search: Some("mar".to_string()),
            ..Default::default()
        };
        let (found, count) = store
            .list_titles(by_year_and_search, 10, 0)
            .await
            .expect("list");
        assert_eq!(count, 1);
        assert_eq!(found[0].name, "Marty");
    }
}

