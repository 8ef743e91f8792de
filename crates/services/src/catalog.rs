//! # Catalog Service
//!
//! Categories, genres and titles. Reads are public; every mutation is
//! admin-only. Slug collisions and in-use deletions come back from the
//! storage layer as conflicts and are surfaced as validation failures.

use std::sync::Arc;

use domains::{
    AppError, CatalogRepo, Category, Genre, Identity, Result, Title, TitleDetail, TitleFilter,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::policy;
use crate::validate;

/// Payload for creating a category or a genre; both are (name, slug) pairs.
#[derive(Debug, Deserialize)]
pub struct SlugInput {
    pub name: String,
    pub slug: String,
}

impl SlugInput {
    fn validated(self) -> Result<Self> {
        let mut errors = Vec::new();
        validate::name(&mut errors, &self.name);
        validate::slug(&mut errors, &self.slug);
        validate::finish(errors)?;
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    /// Category slug
    pub category: String,
    /// Genre slugs
    #[serde(default)]
    pub genre: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

pub struct CatalogService {
    catalog: Arc<dyn CatalogRepo>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepo>) -> Self {
        Self { catalog }
    }

    // ── Categories ──────────────────────────────────────────────────────

    pub async fn list_categories(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Category>, i64)> {
        self.catalog.list_categories(search, limit, offset).await
    }

    pub async fn create_category(
        &self,
        actor: Option<&Identity>,
        input: SlugInput,
    ) -> Result<Category> {
        policy::require_admin(actor)?;
        let input = input.validated()?;
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
        };
        match self.catalog.insert_category(category).await {
            Err(AppError::Conflict(_)) => {
                Err(AppError::validation("slug", "slug is already in use"))
            }
            other => other,
        }
    }

    pub async fn delete_category(&self, actor: Option<&Identity>, slug: &str) -> Result<()> {
        policy::require_admin(actor)?;
        match self.catalog.delete_category(slug).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::not_found("category", slug)),
            Err(AppError::Conflict(_)) => Err(AppError::validation(
                "slug",
                "category is still referenced by titles",
            )),
            Err(e) => Err(e),
        }
    }

    // ── Genres ──────────────────────────────────────────────────────────

    pub async fn list_genres(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Genre>, i64)> {
        self.catalog.list_genres(search, limit, offset).await
    }

    pub async fn create_genre(&self, actor: Option<&Identity>, input: SlugInput) -> Result<Genre> {
        policy::require_admin(actor)?;
        let input = input.validated()?;
        let genre = Genre {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
        };
        match self.catalog.insert_genre(genre).await {
            Err(AppError::Conflict(_)) => {
                Err(AppError::validation("slug", "slug is already in use"))
            }
            other => other,
        }
    }

    pub async fn delete_genre(&self, actor: Option<&Identity>, slug: &str) -> Result<()> {
        policy::require_admin(actor)?;
        match self.catalog.delete_genre(slug).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::not_found("genre", slug)),
            Err(AppError::Conflict(_)) => Err(AppError::validation(
                "slug",
                "genre is still linked to titles",
            )),
            Err(e) => Err(e),
        }
    }

    // ── Titles ──────────────────────────────────────────────────────────

    pub async fn list_titles(
        &self,
        filter: TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TitleDetail>, i64)> {
        self.catalog.list_titles(filter, limit, offset).await
    }

    pub async fn get_title(&self, id: Uuid) -> Result<TitleDetail> {
        self.catalog
            .title_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("title", id))
    }

    pub async fn create_title(
        &self,
        actor: Option<&Identity>,
        input: NewTitle,
    ) -> Result<TitleDetail> {
        policy::require_admin(actor)?;

        let mut errors = Vec::new();
        validate::name(&mut errors, &input.name);
        validate::year(&mut errors, input.year);
        validate::finish(errors)?;

        let category = self.resolve_category(&input.category).await?;
        let genre_ids = self.resolve_genres(&input.genre).await?;

        let title = Title {
            id: Uuid::now_v7(),
            name: input.name,
            year: input.year,
            description: input.description,
            category_id: category.id,
        };
        let id = title.id;
        self.catalog.insert_title(title, genre_ids).await?;
        self.get_title(id).await
    }

    pub async fn update_title(
        &self,
        actor: Option<&Identity>,
        id: Uuid,
        patch: TitlePatch,
    ) -> Result<TitleDetail> {
        policy::require_admin(actor)?;
        let current = self.get_title(id).await?;

        let mut errors = Vec::new();
        let name = patch.name.unwrap_or(current.name);
        validate::name(&mut errors, &name);
        let year = patch.year.unwrap_or(current.year);
        validate::year(&mut errors, year);
        validate::finish(errors)?;

        let category_id = match patch.category {
            Some(slug) => self.resolve_category(&slug).await?.id,
            None => current.category.id,
        };
        let genre_ids = match patch.genre {
            Some(slugs) => Some(self.resolve_genres(&slugs).await?),
            None => None,
        };

        let title = Title {
            id,
            name,
            year,
            description: patch.description.or(current.description),
            category_id,
        };
        self.catalog.update_title(&title, genre_ids).await?;
        self.get_title(id).await
    }

    pub async fn delete_title(&self, actor: Option<&Identity>, id: Uuid) -> Result<()> {
        policy::require_admin(actor)?;
        if self.catalog.delete_title(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("title", id))
        }
    }

    /// An unknown slug in a write is the client's mistake, not a missing
    /// route target.
    async fn resolve_category(&self, slug: &str) -> Result<Category> {
        self.catalog
            .category_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::validation("category", format!("unknown category '{slug}'")))
    }

    async fn resolve_genres(&self, slugs: &[String]) -> Result<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let genre = self
                .catalog
                .genre_by_slug(slug)
                .await?
                .ok_or_else(|| AppError::validation("genre", format!("unknown genre '{slug}'")))?;
            ids.push(genre.id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use domains::{MockCatalogRepo, Role};

    fn admin() -> Identity {
        Identity {
            id: Uuid::now_v7(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn catalog_mutation_is_admin_only() {
        let svc = CatalogService::new(Arc::new(MockCatalogRepo::new()));
        let user = Identity {
            id: Uuid::now_v7(),
            role: Role::User,
        };
        let outcome = svc
            .create_category(
                Some(&user),
                SlugInput {
                    name: "Films".to_string(),
                    slug: "films".to_string(),
                },
            )
            .await;
        assert!(matches!(outcome, Err(AppError::Forbidden(_))));

        let moderator = Identity {
            id: Uuid::now_v7(),
            role: Role::Moderator,
        };
        let outcome = svc.delete_genre(Some(&moderator), "noir").await;
        assert!(matches!(outcome, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn duplicate_slug_reads_as_validation_failure() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_insert_category()
            .returning(|_| Err(AppError::Conflict("categories.slug".to_string())));
        let svc = CatalogService::new(Arc::new(repo));

        let who = admin();
        let outcome = svc
            .create_category(
                Some(&who),
                SlugInput {
                    name: "Films".to_string(),
                    slug: "films".to_string(),
                },
            )
            .await;
        assert!(matches!(outcome, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn future_year_is_rejected() {
        let svc = CatalogService::new(Arc::new(MockCatalogRepo::new()));
        let who = admin();
        let outcome = svc
            .create_title(
                Some(&who),
                NewTitle {
                    name: "From The Future".to_string(),
                    year: Utc::now().year() + 1,
                    description: None,
                    category: "films".to_string(),
                    genre: Vec::new(),
                },
            )
            .await;
        assert!(matches!(outcome, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_genre_slug_is_a_field_error() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_category_by_slug().returning(|slug| {
            Ok(Some(Category {
                id: Uuid::now_v7(),
                name: "Films".to_string(),
                slug: slug.to_string(),
            }))
        });
        repo.expect_genre_by_slug().returning(|_| Ok(None));
        let svc = CatalogService::new(Arc::new(repo));

        let who = admin();
        let outcome = svc
            .create_title(
                Some(&who),
                NewTitle {
                    name: "Solaris".to_string(),
                    year: 1972,
                    description: None,
                    category: "films".to_string(),
                    genre: vec!["does-not-exist".to_string()],
                },
            )
            .await;
        assert!(matches!(outcome, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn in_use_category_cannot_be_deleted() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_delete_category()
            .returning(|_| Err(AppError::Conflict("titles.category_id".to_string())));
        let svc = CatalogService::new(Arc::new(repo));

        let who = admin();
        let outcome = svc.delete_category(Some(&who), "films").await;
        assert!(matches!(outcome, Err(AppError::Validation(_))));
    }
}
