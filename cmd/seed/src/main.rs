//! Seeds the database with the initial admin account and a small sample
//! catalog. Safe to run repeatedly: existing rows are left alone.

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use configs::Settings;
use domains::{CatalogRepo, Category, Genre, Role, User, UserRepo};
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("loading configuration")?;
    let store = SqliteStore::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("opening database")?;

    let username =
        std::env::var("CRITICA_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("CRITICA_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string());
    if store.user_by_username(&username).await?.is_none() {
        store
            .insert_user(User {
                id: Uuid::now_v7(),
                username: username.clone(),
                email,
                bio: String::new(),
                role: Role::Admin,
                confirmation_hash: None,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(%username, "admin account created; sign up with this username to receive a code");
    } else {
        tracing::info!(%username, "admin account already present");
    }

    for (name, slug) in [("Films", "films"), ("Books", "books"), ("Music", "music")] {
        if store.category_by_slug(slug).await?.is_none() {
            store
                .insert_category(Category {
                    id: Uuid::now_v7(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                })
                .await?;
            tracing::info!(%slug, "category seeded");
        }
    }

    for (name, slug) in [
        ("Drama", "drama"),
        ("Comedy", "comedy"),
        ("Science Fiction", "sci-fi"),
    ] {
        if store.genre_by_slug(slug).await?.is_none() {
            store
                .insert_genre(Genre {
                    id: Uuid::now_v7(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                })
                .await?;
            tracing::info!(%slug, "genre seeded");
        }
    }

    Ok(())
}
