//! # Domain Models
//!
//! These structs represent the core entities of Critica.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission tier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Moderators and admins may override ownership on reviews and comments.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Inverse of [`as_str`](Role::as_str); unknown labels fall back to `User`
    /// so a row with a mangled role never grants elevated rights.
    pub fn parse(label: &str) -> Role {
        match label {
            "moderator" => Role::Moderator,
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    pub role: Role,
    /// Argon2 hash of the pending confirmation code, if any. Never leaves
    /// the process.
    #[serde(skip)]
    pub confirmation_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            role: self.role,
        }
    }
}

/// The policy-facing projection of a [`User`]: just enough to decide
/// who may do what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

/// A catalog grouping a title belongs to (e.g. "Films").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// The URL slug (e.g., "films")
    pub slug: String,
}

/// A tag-like classification; a title may carry several.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// The work being reviewed. Write model; reads go through [`TitleDetail`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Uuid,
}

/// Read model for a title: category and genres resolved, plus the rounded
/// mean review score (absent while the title has no reviews).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDetail {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<i64>,
    pub category: Category,
    pub genres: Vec<Genre>,
}

/// Fields shared by everything a user writes: who, what, when.
/// Embedded by value in [`Review`] and [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authored {
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A scored opinion about one title. At most one per (title, author);
/// the storage layer enforces that pair as a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub title_id: Uuid,
    pub score: i32,
    #[serde(flatten)]
    pub authored: Authored,
}

/// A reply to a review. No uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub review_id: Uuid,
    #[serde(flatten)]
    pub authored: Authored,
}
