//! # Account Service
//!
//! Registration with confirmation codes, token exchange, identity
//! resolution, the admin user surface, and the self-service `me` pair.
//! Code generation/hashing and token signing live behind ports; this
//! layer only sequences them.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, CodeDispatcher, CodeIssuer, FieldError, Identity, Result, Role, TokenIssuer, User,
    UserRepo,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy;
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Echo of a successful signup; the code itself travels through the
/// dispatcher, never through the response.
#[derive(Debug, Serialize)]
pub struct SignupReceipt {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Admin-created accounts skip the confirmation flow entirely.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

pub struct AccountService {
    users: Arc<dyn UserRepo>,
    tokens: Arc<dyn TokenIssuer>,
    codes: Arc<dyn CodeIssuer>,
    dispatcher: Arc<dyn CodeDispatcher>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        tokens: Arc<dyn TokenIssuer>,
        codes: Arc<dyn CodeIssuer>,
        dispatcher: Arc<dyn CodeDispatcher>,
    ) -> Self {
        Self {
            users,
            tokens,
            codes,
            dispatcher,
        }
    }

    // ── Signup & token exchange ─────────────────────────────────────────

    /// Registers a new account, or re-issues a code when the exact
    /// (username, email) pair signs up again. Exactly one row is written
    /// either way; a lost race against a concurrent signup surfaces as the
    /// same validation failure the pre-check produces.
    pub async fn signup(&self, req: SignupRequest) -> Result<SignupReceipt> {
        let mut errors = Vec::new();
        validate::username(&mut errors, &req.username);
        validate::email(&mut errors, &req.email);
        validate::finish(errors)?;

        let by_username = self.users.user_by_username(&req.username).await?;
        let by_email = self.users.user_by_email(&req.email).await?;
        let issued = self.codes.issue()?;

        let user = match (by_username, by_email) {
            (Some(by_name), Some(by_mail)) if by_name.id == by_mail.id => {
                let mut user = by_name;
                user.confirmation_hash = Some(issued.hash);
                self.users.update_user(&user).await?;
                user
            }
            (None, None) => {
                let user = User {
                    id: Uuid::now_v7(),
                    username: req.username,
                    email: req.email,
                    bio: String::new(),
                    role: Role::User,
                    confirmation_hash: Some(issued.hash),
                    created_at: Utc::now(),
                };
                match self.users.insert_user(user).await {
                    Err(AppError::Conflict(_)) => {
                        return Err(AppError::validation(
                            "username",
                            "username or email is already registered",
                        ))
                    }
                    other => other?,
                }
            }
            (by_name, by_mail) => {
                let mut errors = Vec::new();
                if by_name.is_some() {
                    errors.push(FieldError::new(
                        "username",
                        "already taken by another account",
                    ));
                }
                if by_mail.is_some() {
                    errors.push(FieldError::new(
                        "email",
                        "already registered to another account",
                    ));
                }
                return Err(AppError::Validation(errors));
            }
        };

        self.dispatcher.dispatch(&user.email, &issued.code).await?;
        tracing::info!(username = %user.username, "confirmation code dispatched");
        Ok(SignupReceipt {
            username: user.username,
            email: user.email,
        })
    }

    /// Exchanges a confirmation code for a bearer token. Codes are single
    /// use: the stored hash is cleared on success.
    pub async fn token(&self, req: TokenRequest) -> Result<String> {
        let mut user = self
            .users
            .user_by_username(&req.username)
            .await?
            .ok_or_else(|| AppError::not_found("user", &req.username))?;

        let Some(hash) = user.confirmation_hash.take() else {
            return Err(AppError::validation(
                "confirmation_code",
                "no confirmation code is pending for this account",
            ));
        };
        if !self.codes.verify(&req.confirmation_code, &hash) {
            return Err(AppError::validation(
                "confirmation_code",
                "confirmation code does not match",
            ));
        }

        self.users.update_user(&user).await?;
        self.tokens.issue(user.id)
    }

    /// Verifies a bearer token and loads the account behind it. Role is
    /// read fresh from the store, so demotions apply to in-flight tokens.
    pub async fn resolve(&self, bearer: &str) -> Result<User> {
        let id = self.tokens.verify(bearer)?;
        self.users
            .user_by_id(id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))
    }

    // ── Admin surface ───────────────────────────────────────────────────

    pub async fn list_users(
        &self,
        actor: Option<&Identity>,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64)> {
        policy::require_admin(actor)?;
        self.users.search_users(search, limit, offset).await
    }

    pub async fn create_user(&self, actor: Option<&Identity>, input: NewUser) -> Result<User> {
        policy::require_admin(actor)?;

        let mut errors = Vec::new();
        validate::username(&mut errors, &input.username);
        validate::email(&mut errors, &input.email);
        validate::finish(errors)?;

        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            bio: input.bio,
            role: input.role,
            confirmation_hash: None,
            created_at: Utc::now(),
        };
        match self.users.insert_user(user).await {
            Err(AppError::Conflict(_)) => Err(AppError::validation(
                "username",
                "username or email is already registered",
            )),
            other => other,
        }
    }

    pub async fn user(&self, actor: Option<&Identity>, username: &str) -> Result<User> {
        policy::require_admin(actor)?;
        self.users
            .user_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("user", username))
    }

    pub async fn patch_user(
        &self,
        actor: Option<&Identity>,
        username: &str,
        patch: UserPatch,
    ) -> Result<User> {
        policy::require_admin(actor)?;
        let user = self
            .users
            .user_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("user", username))?;
        self.apply_patch(user, patch).await
    }

    pub async fn delete_user(&self, actor: Option<&Identity>, username: &str) -> Result<()> {
        policy::require_admin(actor)?;
        let user = self
            .users
            .user_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("user", username))?;
        if self.users.delete_user(user.id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("user", username))
        }
    }

    // ── Self service ────────────────────────────────────────────────────

    /// Role is read-only through `me`; a submitted role is ignored rather
    /// than rejected, matching the public API contract.
    pub async fn patch_me(&self, me: &User, mut patch: UserPatch) -> Result<User> {
        patch.role = None;
        self.apply_patch(me.clone(), patch).await
    }

    async fn apply_patch(&self, mut user: User, patch: UserPatch) -> Result<User> {
        let mut errors = Vec::new();
        if let Some(username) = patch.username {
            validate::username(&mut errors, &username);
            user.username = username;
        }
        if let Some(email) = patch.email {
            validate::email(&mut errors, &email);
            user.email = email;
        }
        validate::finish(errors)?;
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        match self.users.update_user(&user).await {
            Err(AppError::Conflict(_)) => Err(AppError::validation(
                "username",
                "username or email is already registered",
            )),
            Err(e) => Err(e),
            Ok(()) => Ok(user),
        }
    }
}
