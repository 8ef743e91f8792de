//! # Review Service
//!
//! Create/read/update/delete for reviews, enforcing the one-review-per-
//! (title, author) invariant and the score bounds. The storage layer's
//! unique constraint is the source of truth for duplicates; a conflict
//! coming back from an insert is translated into the same validation
//! failure a pre-check would have produced, so concurrent duplicate
//! submissions cannot both succeed.

use std::sync::Arc;

use chrono::Utc;
use domains::{AppError, Authored, CatalogRepo, FieldError, Identity, Result, Review, ReviewRepo};
use serde::Deserialize;
use uuid::Uuid;

use crate::policy::{self, Action};
use crate::validate;

/// Inclusive score range. The bound is configuration, not a literal;
/// the stock deployment uses 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl ScoreBounds {
    pub fn contains(self, score: i32) -> bool {
        (self.min..=self.max).contains(&score)
    }

    fn check(self, errors: &mut Vec<FieldError>, score: i32) {
        if !self.contains(score) {
            errors.push(FieldError::new(
                "score",
                format!("must be an integer between {} and {}", self.min, self.max),
            ));
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewReview {
    pub text: String,
    pub score: i32,
}

/// Client-mutable fields only; author, title and timestamps are never
/// touched by an update.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub score: Option<i32>,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepo>,
    catalog: Arc<dyn CatalogRepo>,
    bounds: ScoreBounds,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepo>,
        catalog: Arc<dyn CatalogRepo>,
        bounds: ScoreBounds,
    ) -> Self {
        Self {
            reviews,
            catalog,
            bounds,
        }
    }

    /// The parent title must exist before anything else is evaluated.
    async fn ensure_title(&self, title_id: Uuid) -> Result<()> {
        match self.catalog.title_by_id(title_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("title", title_id)),
        }
    }

    pub async fn create(
        &self,
        actor: Option<&Identity>,
        title_id: Uuid,
        input: NewReview,
    ) -> Result<Review> {
        self.ensure_title(title_id).await?;
        let actor = policy::require_account(actor)?;

        let mut errors = Vec::new();
        validate::text(&mut errors, &input.text);
        self.bounds.check(&mut errors, input.score);
        validate::finish(errors)?;

        let review = Review {
            id: Uuid::now_v7(),
            title_id,
            score: input.score,
            authored: Authored {
                author_id: actor.id,
                text: input.text,
                created_at: Utc::now(),
            },
        };
        match self.reviews.insert_review(review).await {
            Err(AppError::Conflict(_)) => Err(AppError::validation(
                "title",
                "you have already reviewed this title",
            )),
            other => other,
        }
    }

    /// Newest first; ordering is identical regardless of page boundaries.
    pub async fn list(
        &self,
        title_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64)> {
        self.ensure_title(title_id).await?;
        self.reviews.list_reviews(title_id, limit, offset).await
    }

    pub async fn get(&self, title_id: Uuid, review_id: Uuid) -> Result<Review> {
        self.ensure_title(title_id).await?;
        self.reviews
            .review_by_id(title_id, review_id)
            .await?
            .ok_or_else(|| AppError::not_found("review", review_id))
    }

    pub async fn update(
        &self,
        actor: Option<&Identity>,
        title_id: Uuid,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review> {
        let mut review = self.get(title_id, review_id).await?;
        policy::author_or_privileged(actor, Action::PartialUpdate, review.authored.author_id)?;

        let mut errors = Vec::new();
        if let Some(text) = patch.text {
            validate::text(&mut errors, &text);
            review.authored.text = text;
        }
        if let Some(score) = patch.score {
            self.bounds.check(&mut errors, score);
            review.score = score;
        }
        validate::finish(errors)?;

        self.reviews.update_review(&review).await?;
        Ok(review)
    }

    pub async fn delete(
        &self,
        actor: Option<&Identity>,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<()> {
        let review = self.get(title_id, review_id).await?;
        policy::author_or_privileged(actor, Action::Delete, review.authored.author_id)?;
        if self.reviews.delete_review(title_id, review_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("review", review_id))
        }
    }
}
