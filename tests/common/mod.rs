//! Shared test harness: in-memory repository and a router driver.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;
use uuid::Uuid;

use user_api::api::{create_router, AppState};
use user_api::domain::{User, UserChanges, UserRole};
use user_api::errors::{AppError, AppResult};
use user_api::infra::{HealthCheck, UserRepository};
use user_api::Config;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const PASSWORD: &str = "SecurePass123";

pub fn test_config() -> Config {
    Config::new("postgres://unused/test", TEST_JWT_SECRET).expect("valid test config")
}

/// Keeps users in a map; mirrors the unique-email rule of the real table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    fn email_owner(users: &HashMap<Uuid, User>, email: &str) -> Option<Uuid> {
        users.values().find(|u| u.email == email).map(|u| u.id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if Self::email_owner(&users, &user.email).is_some() {
            return Err(AppError::email_taken());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut users = self.users.write().await;
        if let Some(email) = &changes.email {
            if Self::email_owner(&users, email).map_or(false, |owner| owner != id) {
                return Err(AppError::email_taken());
            }
        }
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.apply(changes);
        Ok(user.clone())
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.role = role;
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

/// Health check whose outcome the test controls.
#[derive(Default)]
pub struct StubHealth {
    pub failing: AtomicBool,
}

#[async_trait]
impl HealthCheck for StubHealth {
    async fn ping(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::internal("database unreachable"))
        } else {
            Ok(())
        }
    }
}

/// Raw response pieces.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

/// Full router over the in-memory repository.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub health: Arc<StubHealth>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let health = Arc::new(StubHealth::default());
        let state = AppState::from_repository(users.clone(), health.clone(), test_config());

        Self {
            router: create_router(state),
            users,
            health,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        send(&self.router, method, uri, token, body).await
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        (response.status, response.json())
    }

    /// Register through the API and return the new user's id.
    pub async fn register(&self, email: &str, pseudo: &str) -> Uuid {
        let (status, body) = self
            .request(
                "POST",
                "/api/users/register",
                None,
                Some(json!({ "email": email, "pseudo": pseudo, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/users/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Register a plain user and log them in.
    pub async fn user(&self, email: &str, pseudo: &str) -> (Uuid, String) {
        let id = self.register(email, pseudo).await;
        (id, self.login(email, PASSWORD).await)
    }

    /// Register, promote straight in storage, then log in so the token carries the role.
    pub async fn admin(&self, email: &str, pseudo: &str) -> (Uuid, String) {
        let id = self.register(email, pseudo).await;
        self.users.set_role(id, UserRole::Admin).await.unwrap();
        (id, self.login(email, PASSWORD).await)
    }
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();

    TestResponse {
        status,
        content_type,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}
