//! Shared harness: a fresh server on a temp SQLite file, driven through
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use club_server::{Config, ErrorCode, ServerState, build_app};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MONTHLY_FEE: f64 = 10.0;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    /// Seeded bootstrap admin
    pub admin_id: i64,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = Config::with_work_dir(dir.path().to_string_lossy().into_owned());
        config.dues_monthly_fee = MONTHLY_FEE;
        config.bootstrap_admin.username = "admin".into();
        config.bootstrap_admin.display_name = "Club Admin".into();
        config.bootstrap_admin.password = Some("admin-secret".into());

        let state = ServerState::initialize(&config)
            .await
            .expect("state initializes");
        let admin_id = sqlx::query_scalar::<_, i64>("SELECT id FROM user WHERE role = 'admin'")
            .fetch_one(&state.pool)
            .await
            .expect("bootstrap admin exists");
        let app = build_app(&state);

        Self {
            app,
            state,
            admin_id,
            _dir: dir,
        }
    }

    /// Send a request as `operator` (no header when `None`)
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        operator: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = operator {
            builder = builder.header("x-operator-id", id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self.app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body reads")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, operator: i64) -> (StatusCode, Value) {
        self.call("GET", uri, Some(operator), None).await
    }

    pub async fn post(&self, uri: &str, operator: i64, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(operator), Some(body)).await
    }

    pub async fn put(&self, uri: &str, operator: i64, body: Value) -> (StatusCode, Value) {
        self.call("PUT", uri, Some(operator), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, operator: i64) -> (StatusCode, Value) {
        self.call("DELETE", uri, Some(operator), None).await
    }

    /// Create a user through the API; returns (user id, member id)
    pub async fn create_user(&self, username: &str, display_name: &str, role: &str) -> (i64, i64) {
        let (status, user) = self
            .post(
                "/api/users",
                self.admin_id,
                serde_json::json!({
                    "username": username,
                    "display_name": display_name,
                    "password": "secret-123",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {user}");
        let user_id = user["id"].as_i64().expect("user id");
        let member_id = self.member_of(user_id).await.expect("member created");
        (user_id, member_id)
    }

    /// Member linked to `user_id`
    pub async fn member_of(&self, user_id: i64) -> Option<i64> {
        let (_, members) = self.get("/api/members", self.admin_id).await;
        members.as_array()?.iter().find_map(|m| {
            (m["user_id"].as_i64() == Some(user_id)).then(|| m["id"].as_i64()).flatten()
        })
    }
}

/// Assert an error response: HTTP status and body code both match
pub fn assert_error(response: &(StatusCode, Value), expected: ErrorCode) {
    let (status, body) = response;
    assert_eq!(*status, expected.http_status(), "unexpected status, body: {body}");
    assert_eq!(
        body["code"].as_u64(),
        Some(u64::from(expected.code())),
        "unexpected code, body: {body}"
    );
}
