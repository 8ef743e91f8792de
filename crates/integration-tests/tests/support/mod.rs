//! Shared fixtures: a full application over an in-memory store, driven
//! through tower without a listening socket.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use api_adapters::AppState;
use auth_adapters::{ConfirmationCodes, JwtIssuer};
use domains::{
    CatalogRepo, Category, CodeDispatcher, Genre, Role, Title, TokenIssuer, User, UserRepo,
};
use services::{AccountService, CatalogService, CommentService, ReviewService, ScoreBounds};
use storage_adapters::SqliteStore;

/// Test double for the outbound mailer: keeps every dispatched code so
/// tests can complete the signup flow.
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl CodeDispatcher for Outbox {
    async fn dispatch(&self, email: &str, code: &str) -> domains::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

impl Outbox {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub tokens: Arc<JwtIssuer>,
    pub outbox: Arc<Outbox>,
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(
        SqliteStore::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory store"),
    );
    let tokens = Arc::new(JwtIssuer::new("integration-secret", 1));
    let outbox = Arc::new(Outbox::default());
    let state = AppState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            tokens.clone(),
            Arc::new(ConfirmationCodes::new(8)),
            outbox.clone(),
        )),
        catalog: Arc::new(CatalogService::new(store.clone())),
        reviews: Arc::new(ReviewService::new(
            store.clone(),
            store.clone(),
            ScoreBounds::default(),
        )),
        comments: Arc::new(CommentService::new(store.clone())),
        page_size: 10,
    };
    TestApp {
        router: api_adapters::router(state),
        store,
        tokens,
        outbox,
    }
}

impl TestApp {
    /// Inserts an account directly and signs a token for it, skipping the
    /// confirmation dance. The auth flow itself is covered in api_auth.
    pub async fn user_with_role(&self, username: &str, role: Role) -> (User, String) {
        let user = self
            .store
            .insert_user(User {
                id: Uuid::now_v7(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                bio: String::new(),
                role,
                confirmation_hash: None,
                created_at: Utc::now(),
            })
            .await
            .expect("seed user");
        let token = self.tokens.issue(user.id).expect("token");
        (user, token)
    }

    pub async fn seed_category(&self, name: &str, slug: &str) -> Category {
        self.store
            .insert_category(Category {
                id: Uuid::now_v7(),
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .await
            .expect("seed category")
    }

    pub async fn seed_genre(&self, name: &str, slug: &str) -> Genre {
        self.store
            .insert_genre(Genre {
                id: Uuid::now_v7(),
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .await
            .expect("seed genre")
    }

    pub async fn seed_title(&self, name: &str) -> Title {
        let category = self
            .seed_category(
                &format!("{name} category"),
                &format!("{}-cat", name.to_lowercase().replace(' ', "-")),
            )
            .await;
        let title = Title {
            id: Uuid::now_v7(),
            name: name.to_string(),
            year: 1999,
            description: None,
            category_id: category.id,
        };
        self.store
            .insert_title(title.clone(), Vec::new())
            .await
            .expect("seed title");
        title
    }

    /// Fires one request at the router and decodes the JSON body (Null for
    /// empty bodies, e.g. 204s).
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("PATCH", path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", path, token, None).await
    }
}
