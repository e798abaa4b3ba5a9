//! In-memory stand-ins for the store and the identity provider, plus router helpers.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api;
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{UserRow, UserStore};
use crate::services::identity::{Identity, IdentityError, IdentityVerifier};
use crate::state::AppState;

pub const VALID_TOKEN: &str = "valid-token";
pub const EMPTY_IDENTITY_TOKEN: &str = "no-user-token";
pub const TRANSPORT_FAILURE_TOKEN: &str = "provider-down-token";

/// Accepts `VALID_TOKEN`, answers "no user" for `EMPTY_IDENTITY_TOKEN`, fails the
/// call for `TRANSPORT_FAILURE_TOKEN` and rejects everything else.
#[derive(Default)]
pub struct FakeVerifier {
    calls: AtomicUsize,
}

impl FakeVerifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    fn backend_name(&self) -> &'static str {
        "fake"
    }

    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match token {
            VALID_TOKEN => Ok(Some(Identity {
                subject: Uuid::nil(),
                email: Some("caller@example.com".into()),
            })),
            EMPTY_IDENTITY_TOKEN => Ok(None),
            TRANSPORT_FAILURE_TOKEN => Err(IdentityError::Transport(
                "identity provider unreachable".into(),
            )),
            _ => Err(IdentityError::Rejected("401 invalid JWT".into())),
        }
    }
}

/// Keeps rows in a Vec and counts every call, so tests can assert the store was
/// (or was not) touched.
#[derive(Default)]
pub struct InMemoryUserStore {
    rows: Mutex<Vec<UserRow>>,
    calls: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn with_rows(rows: Vec<UserRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<UserRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, id: &str, email: &str, name: Option<&str>) -> RepoResult<UserRow> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.id == id || r.email == email) {
            return Err(RepoError::Conflict);
        }
        let row = UserRow {
            id: id.to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
        };
        rows.push(row.clone());
        Ok(row)
    }
}

/// Every operation fails as if the database connection was lost.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_email(&self, _email: &str) -> RepoResult<Option<UserRow>> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: &str) -> RepoResult<Option<UserRow>> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _id: &str, _email: &str, _name: Option<&str>) -> RepoResult<UserRow> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }
}

/// Lets find_by_email succeed and fails the insert with a unique violation, the
/// shape of two concurrent creates racing on the same email.
pub struct RacingUserStore;

#[async_trait]
impl UserStore for RacingUserStore {
    async fn find_by_email(&self, _email: &str) -> RepoResult<Option<UserRow>> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &str) -> RepoResult<Option<UserRow>> {
        Ok(None)
    }

    async fn insert(&self, _id: &str, _email: &str, _name: Option<&str>) -> RepoResult<UserRow> {
        Err(RepoError::Conflict)
    }
}

pub fn state(users: Arc<dyn UserStore>, identity: Arc<dyn IdentityVerifier>) -> AppState {
    AppState::new(users, identity)
}

/// The `/api` tree as mounted by the application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::routes(state.clone()))
        .with_state(state)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
