//! Operator identity, user management and roster sync

mod common;

use club_server::ErrorCode;
use common::{TestApp, assert_error};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.call("GET", "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn api_requires_a_known_operator() {
    let app = TestApp::new().await;

    let missing = app.call("GET", "/api/users", None, None).await;
    assert_error(&missing, ErrorCode::OperatorRequired);

    let unknown = app.get("/api/users", 42).await;
    assert_error(&unknown, ErrorCode::OperatorUnknown);

    let (status, users) = app.get("/api/users", app.admin_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(1));
    assert!(users[0].get("credential_hash").is_none());
}

#[tokio::test]
async fn bootstrap_admin_has_a_member() {
    let app = TestApp::new().await;
    let member_id = app.member_of(app.admin_id).await;
    assert!(member_id.is_some());

    let (_, member) = app
        .get(&format!("/api/members/{}", member_id.unwrap()), app.admin_id)
        .await;
    assert_eq!(member["name"], "Club Admin");
}

#[tokio::test]
async fn creating_a_user_adds_a_member() {
    let app = TestApp::new().await;
    let (user_id, member_id) = app.create_user("kim", "Kim Lee", "member").await;

    let (status, member) = app.get(&format!("/api/members/{member_id}"), app.admin_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["user_id"], user_id);
    assert_eq!(member["name"], "Kim Lee");

    let duplicate = app
        .post(
            "/api/users",
            app.admin_id,
            json!({"username": "KIM", "display_name": "Other", "password": "x1", "role": "member"}),
        )
        .await;
    assert_error(&duplicate, ErrorCode::UsernameExists);
}

#[tokio::test]
async fn invalid_user_payloads_are_rejected() {
    let app = TestApp::new().await;
    let blank = app
        .post(
            "/api/users",
            app.admin_id,
            json!({"username": "lee", "display_name": "  ", "password": "pw", "role": "member"}),
        )
        .await;
    assert_error(&blank, ErrorCode::RequiredField);

    let bad_name = app
        .post(
            "/api/users",
            app.admin_id,
            json!({"username": "no spaces", "display_name": "Lee", "password": "pw", "role": "member"}),
        )
        .await;
    assert_error(&bad_name, ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn renaming_a_user_renames_the_member() {
    let app = TestApp::new().await;
    let (user_id, member_id) = app.create_user("kim", "Kim", "member").await;

    let (status, user) = app
        .put(
            &format!("/api/users/{user_id}"),
            app.admin_id,
            json!({"display_name": "Kim Park"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["display_name"], "Kim Park");

    let (_, member) = app.get(&format!("/api/members/{member_id}"), app.admin_id).await;
    assert_eq!(member["name"], "Kim Park");
}

#[tokio::test]
async fn only_user_managers_change_users() {
    let app = TestApp::new().await;
    let (treasurer, _) = app.create_user("tess", "Tess", "treasurer").await;
    let (member, _) = app.create_user("mo", "Mo", "member").await;

    for operator in [treasurer, member] {
        let denied = app
            .post(
                "/api/users",
                operator,
                json!({"username": "x", "display_name": "X", "password": "pw", "role": "member"}),
            )
            .await;
        assert_error(&denied, ErrorCode::PermissionDenied);
    }

    // reads stay open
    let (status, _) = app.get("/api/users", member).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deactivated_operator_is_rejected() {
    let app = TestApp::new().await;
    let (user_id, _) = app.create_user("mo", "Mo", "member").await;
    let (status, _) = app
        .put(&format!("/api/users/{user_id}"), app.admin_id, json!({"is_active": false}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let rejected = app.get("/api/members", user_id).await;
    assert_error(&rejected, ErrorCode::OperatorDisabled);
}

#[tokio::test]
async fn last_admin_is_protected() {
    let app = TestApp::new().await;
    let admin = format!("/api/users/{}", app.admin_id);

    let demote = app.put(&admin, app.admin_id, json!({"role": "member"})).await;
    assert_error(&demote, ErrorCode::CannotModifyAdmin);

    let deactivate = app.put(&admin, app.admin_id, json!({"is_active": false})).await;
    assert_error(&deactivate, ErrorCode::CannotModifyAdmin);

    let self_delete = app.delete(&admin, app.admin_id).await;
    assert_error(&self_delete, ErrorCode::CannotDeleteSelf);

    // with a second admin the first one may step down
    let (second, _) = app.create_user("root2", "Second Admin", "admin").await;
    let (status, user) = app.put(&admin, second, json!({"role": "treasurer"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["role"], "treasurer");
}

#[tokio::test]
async fn deleting_a_user_without_dues_removes_the_member() {
    let app = TestApp::new().await;
    let (user_id, member_id) = app.create_user("kim", "Kim", "member").await;

    let (status, report) = app.delete(&format!("/api/users/{user_id}"), app.admin_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["removed"], json!([member_id]));

    let gone = app.get(&format!("/api/members/{member_id}"), app.admin_id).await;
    assert_error(&gone, ErrorCode::MemberNotFound);
}

#[tokio::test]
async fn deleting_a_user_with_dues_unlinks_the_member() {
    let app = TestApp::new().await;
    let (user_id, member_id) = app.create_user("kim", "Kim", "member").await;
    let (status, _) = app
        .put(
            &format!("/api/dues/{member_id}/2024/months/1"),
            app.admin_id,
            json!({"paid": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // a linked member cannot be deleted directly
    let linked = app.delete(&format!("/api/members/{member_id}"), app.admin_id).await;
    assert_error(&linked, ErrorCode::MemberHasUser);

    let (_, report) = app.delete(&format!("/api/users/{user_id}"), app.admin_id).await;
    assert_eq!(report["unlinked"], json!([member_id]));

    let (_, member) = app.get(&format!("/api/members/{member_id}"), app.admin_id).await;
    assert!(member["user_id"].is_null());
    assert_eq!(member["name"], "Kim");

    // once unlinked it can go, taking its dues along
    let (status, _) = app.delete(&format!("/api/members/{member_id}"), app.admin_id).await;
    assert_eq!(status, StatusCode::OK);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dues")
        .fetch_one(&app.state.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // the mirrored income stays in the ledger without a member
    let (_, incomes) = app.get("/api/incomes?year=2024", app.admin_id).await;
    assert_eq!(incomes.as_array().map(Vec::len), Some(1));
    assert!(incomes[0]["member_id"].is_null());
}

#[tokio::test]
async fn manual_sync_repairs_drift() {
    let app = TestApp::new().await;
    let (user_id, member_id) = app.create_user("kim", "Kim", "member").await;

    sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(member_id)
        .execute(&app.state.pool)
        .await
        .unwrap();
    assert!(app.member_of(user_id).await.is_none());

    let (status, report) = app.post("/api/members/sync", app.admin_id, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["created"].as_array().map(Vec::len), Some(1));
    assert!(app.member_of(user_id).await.is_some());

    let (_, report) = app.post("/api/members/sync", app.admin_id, json!({})).await;
    assert_eq!(report["created"], json!([]));
}
