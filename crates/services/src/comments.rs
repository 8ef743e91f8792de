//! # Comment Service
//!
//! Comments hang off a review; every lookup is scoped to the review named
//! in the route (and the review to its title), so an id reached through
//! the wrong parent reads as not-found. No uniqueness constraint here.

use std::sync::Arc;

use chrono::Utc;
use domains::{AppError, Authored, Comment, Identity, Result, ReviewRepo};
use serde::Deserialize;
use uuid::Uuid;

use crate::policy::{self, Action};
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentPatch {
    pub text: Option<String>,
}

pub struct CommentService {
    reviews: Arc<dyn ReviewRepo>,
}

impl CommentService {
    pub fn new(reviews: Arc<dyn ReviewRepo>) -> Self {
        Self { reviews }
    }

    /// The parent review must exist under the routed title before anything
    /// else is evaluated.
    async fn ensure_review(&self, title_id: Uuid, review_id: Uuid) -> Result<()> {
        match self.reviews.review_by_id(title_id, review_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("review", review_id)),
        }
    }

    pub async fn create(
        &self,
        actor: Option<&Identity>,
        title_id: Uuid,
        review_id: Uuid,
        input: NewComment,
    ) -> Result<Comment> {
        self.ensure_review(title_id, review_id).await?;
        let actor = policy::require_account(actor)?;

        let mut errors = Vec::new();
        validate::text(&mut errors, &input.text);
        validate::finish(errors)?;

        let comment = Comment {
            id: Uuid::now_v7(),
            review_id,
            authored: Authored {
                author_id: actor.id,
                text: input.text,
                created_at: Utc::now(),
            },
        };
        self.reviews.insert_comment(comment).await
    }

    pub async fn list(
        &self,
        title_id: Uuid,
        review_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64)> {
        self.ensure_review(title_id, review_id).await?;
        self.reviews.list_comments(review_id, limit, offset).await
    }

    pub async fn get(&self, title_id: Uuid, review_id: Uuid, comment_id: Uuid) -> Result<Comment> {
        self.ensure_review(title_id, review_id).await?;
        self.reviews
            .comment_by_id(review_id, comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("comment", comment_id))
    }

    pub async fn update(
        &self,
        actor: Option<&Identity>,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
        patch: CommentPatch,
    ) -> Result<Comment> {
        let mut comment = self.get(title_id, review_id, comment_id).await?;
        policy::author_or_privileged(actor, Action::PartialUpdate, comment.authored.author_id)?;

        let mut errors = Vec::new();
        if let Some(text) = patch.text {
            validate::text(&mut errors, &text);
            comment.authored.text = text;
        }
        validate::finish(errors)?;

        self.reviews.update_comment(&comment).await?;
        Ok(comment)
    }

    pub async fn delete(
        &self,
        actor: Option<&Identity>,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<()> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        policy::author_or_privileged(actor, Action::Delete, comment.authored.author_id)?;
        if self.reviews.delete_comment(review_id, comment_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("comment", comment_id))
        }
    }
}
