//! Monthly dues and their mirror in the income ledger

mod common;

use club_server::ErrorCode;
use common::{MONTHLY_FEE, TestApp, assert_error};
use http::StatusCode;
use serde_json::{Value, json};

fn month(dues: &Value, month: usize) -> &Value {
    &dues["months"][month - 1]
}

async fn dues_incomes(app: &TestApp, year: i32) -> Vec<Value> {
    let (_, incomes) = app.get(&format!("/api/incomes?year={year}"), app.admin_id).await;
    incomes
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|i| i["source"] == "dues")
        .collect()
}

async fn yearly_income(app: &TestApp, year: i32) -> f64 {
    let (_, data) = app.get(&format!("/api/yearly/{year}"), app.admin_id).await;
    data["total_income"].as_f64().unwrap_or(f64::NAN)
}

#[tokio::test]
async fn reading_initializes_a_fresh_year_without_saving() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;

    let (status, dues) = app.get(&format!("/api/dues/{member_id}/2024"), app.admin_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dues["months"].as_array().map(Vec::len), Some(12));
    assert_eq!(dues["unpaid_amount"], json!(MONTHLY_FEE * 12.0));
    assert_eq!(month(&dues, 1)["status"], "unpaid");
    assert_eq!(month(&dues, 1)["color"], "#f44336");
    assert_eq!(dues["updated_at"], 0);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dues")
        .fetch_one(&app.state.pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn unknown_member_has_no_dues() {
    let app = TestApp::new().await;
    let missing = app.get("/api/dues/999/2024", app.admin_id).await;
    assert_error(&missing, ErrorCode::MemberNotFound);

    let write = app
        .put("/api/dues/999/2024/months/1", app.admin_id, json!({"paid": true}))
        .await;
    assert_error(&write, ErrorCode::MemberNotFound);
}

#[tokio::test]
async fn paying_a_month_records_a_dues_income() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;

    let (status, dues) = app
        .put(
            &format!("/api/dues/{member_id}/2024/months/3"),
            app.admin_id,
            json!({"paid": true, "paid_on": "2024-03-15"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{dues}");
    assert_eq!(month(&dues, 3)["paid"], true);
    assert_eq!(month(&dues, 3)["status"], "paid");
    assert_eq!(month(&dues, 3)["color"], "#4caf50");
    assert_eq!(dues["unpaid_amount"], json!(110.0));

    let incomes = dues_incomes(&app, 2024).await;
    assert_eq!(incomes.len(), 1);
    let income = &incomes[0];
    assert_eq!(income["category"], "dues");
    assert_eq!(income["amount"], json!(10.0));
    assert_eq!(income["month"], 3);
    assert_eq!(income["date"], "2024-03-15");
    assert_eq!(income["member_id"], member_id);
    assert_eq!(month(&dues, 3)["income_id"], income["id"]);

    assert_eq!(yearly_income(&app, 2024).await, 10.0);
}

#[tokio::test]
async fn unpaying_removes_the_income() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    let uri = format!("/api/dues/{member_id}/2024/months/5");

    app.put(&uri, app.admin_id, json!({"paid": true})).await;
    let (status, dues) = app.put(&uri, app.admin_id, json!({"paid": false})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(month(&dues, 5)["status"], "unpaid");
    assert!(month(&dues, 5)["income_id"].is_null());
    assert_eq!(dues["unpaid_amount"], json!(120.0));

    assert!(dues_incomes(&app, 2024).await.is_empty());
    assert_eq!(yearly_income(&app, 2024).await, 0.0);
}

#[tokio::test]
async fn amount_edit_on_a_paid_month_follows_into_the_income() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    let uri = format!("/api/dues/{member_id}/2024/months/2");

    app.put(&uri, app.admin_id, json!({"paid": true})).await;
    let (status, dues) = app.put(&uri, app.admin_id, json!({"amount": 25.5})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(month(&dues, 2)["amount"], json!(25.5));

    let incomes = dues_incomes(&app, 2024).await;
    assert_eq!(incomes[0]["amount"], json!(25.5));
    assert_eq!(yearly_income(&app, 2024).await, 25.5);
}

#[tokio::test]
async fn exempt_months_leave_the_running_total() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;

    let (_, dues) = app
        .put(
            &format!("/api/dues/{member_id}/2024/months/7"),
            app.admin_id,
            json!({"status": "exempt"}),
        )
        .await;
    assert_eq!(month(&dues, 7)["status"], "exempt");
    assert_eq!(month(&dues, 7)["color"], "#9e9e9e");
    assert_eq!(dues["unpaid_amount"], json!(110.0));
    assert!(dues_incomes(&app, 2024).await.is_empty());
}

#[tokio::test]
async fn rejected_month_edits() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    let base = format!("/api/dues/{member_id}/2024/months");

    let bad_month = app.put(&format!("{base}/13"), app.admin_id, json!({"paid": true})).await;
    assert_error(&bad_month, ErrorCode::InvalidMonth);

    let zero = app
        .put(&format!("{base}/1"), app.admin_id, json!({"paid": true, "amount": 0}))
        .await;
    assert_error(&zero, ErrorCode::ZeroAmountPayment);

    let conflict = app
        .put(&format!("{base}/1"), app.admin_id, json!({"paid": true, "status": "exempt"}))
        .await;
    assert_error(&conflict, ErrorCode::DuesStatusConflict);

    let negative = app.put(&format!("{base}/1"), app.admin_id, json!({"amount": -5})).await;
    assert_error(&negative, ErrorCode::InvalidAmount);

    let color = app.put(&format!("{base}/1"), app.admin_id, json!({"color": "red"})).await;
    assert_error(&color, ErrorCode::InvalidFormat);

    // nothing was written
    assert!(dues_incomes(&app, 2024).await.is_empty());
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dues")
        .fetch_one(&app.state.pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn paid_on_only_matters_when_paying() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    let base = format!("/api/dues/{member_id}/2024/months");

    // a color edit carries no payment, so its date is not read
    let (status, dues) = app
        .put(
            &format!("{base}/2"),
            app.admin_id,
            json!({"color": "#123456", "paid_on": "not-a-date"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{dues}");
    assert_eq!(month(&dues, 2)["color"], "#123456");

    let bad = app
        .put(&format!("{base}/3"), app.admin_id, json!({"paid": true, "paid_on": "2024-13-01"}))
        .await;
    assert_error(&bad, ErrorCode::InvalidDate);
    assert!(dues_incomes(&app, 2024).await.is_empty());
    let (_, dues) = app.get(&format!("/api/dues/{member_id}/2024"), app.admin_id).await;
    assert_eq!(month(&dues, 3)["paid"], false);
}

#[tokio::test]
async fn deleting_the_dues_income_reopens_the_month() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    app.put(
        &format!("/api/dues/{member_id}/2024/months/4"),
        app.admin_id,
        json!({"paid": true}),
    )
    .await;
    let income_id = dues_incomes(&app, 2024).await[0]["id"].as_i64().unwrap();

    let (status, _) = app.delete(&format!("/api/incomes/{income_id}"), app.admin_id).await;
    assert_eq!(status, StatusCode::OK);

    let (_, dues) = app.get(&format!("/api/dues/{member_id}/2024"), app.admin_id).await;
    assert_eq!(month(&dues, 4)["status"], "unpaid");
    assert!(month(&dues, 4)["income_id"].is_null());
    assert_eq!(dues["unpaid_amount"], json!(120.0));
}

#[tokio::test]
async fn dues_income_keeps_its_period_but_follows_amount_edits() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    app.put(
        &format!("/api/dues/{member_id}/2024/months/6"),
        app.admin_id,
        json!({"paid": true}),
    )
    .await;
    let income_id = dues_incomes(&app, 2024).await[0]["id"].as_i64().unwrap();
    let uri = format!("/api/incomes/{income_id}");

    let moved = app.put(&uri, app.admin_id, json!({"month": 7})).await;
    assert_error(&moved, ErrorCode::DuesIncomeLocked);

    let recategorized = app.put(&uri, app.admin_id, json!({"category": "donation"})).await;
    assert_error(&recategorized, ErrorCode::DuesIncomeLocked);

    // a new payment date keeps the owning period
    let (status, income) = app
        .put(&uri, app.admin_id, json!({"date": "2024-08-02", "amount": 12}))
        .await;
    assert_eq!(status, StatusCode::OK, "{income}");
    assert_eq!(income["month"], 6);
    assert_eq!(income["date"], "2024-08-02");

    let (_, dues) = app.get(&format!("/api/dues/{member_id}/2024"), app.admin_id).await;
    assert_eq!(month(&dues, 6)["amount"], json!(12.0));
    assert_eq!(month(&dues, 6)["status"], "paid");
}

#[tokio::test]
async fn unpaid_override_and_recalculate() {
    let app = TestApp::new().await;
    let (_, member_id) = app.create_user("kim", "Kim", "member").await;
    let base = format!("/api/dues/{member_id}/2024");

    app.put(&format!("{base}/months/1"), app.admin_id, json!({"paid": true})).await;

    let (status, dues) = app
        .put(&format!("{base}/unpaid"), app.admin_id, json!({"unpaid_amount": 5}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dues["unpaid_amount"], json!(5.0));

    let negative = app
        .put(&format!("{base}/unpaid"), app.admin_id, json!({"unpaid_amount": -1}))
        .await;
    assert_error(&negative, ErrorCode::InvalidAmount);

    // the running total clamps at zero
    let (_, dues) = app
        .put(&format!("{base}/months/2"), app.admin_id, json!({"paid": true}))
        .await;
    assert_eq!(dues["unpaid_amount"], json!(0.0));

    let (status, dues) = app
        .call("POST", &format!("{base}/recalculate"), Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dues["unpaid_amount"], json!(100.0));
}

#[tokio::test]
async fn overview_covers_every_member() {
    let app = TestApp::new().await;
    let (_, kim) = app.create_user("kim", "Kim", "member").await;
    app.create_user("lee", "Lee", "member").await;

    app.put(&format!("/api/dues/{kim}/2024/months/1"), app.admin_id, json!({"paid": true}))
        .await;
    app.put(
        &format!("/api/dues/{kim}/2024/months/2"),
        app.admin_id,
        json!({"status": "exempt"}),
    )
    .await;

    let (status, rows) = app.get("/api/dues?year=2024", app.admin_id).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().cloned().unwrap_or_default();
    // admin, kim, lee
    assert_eq!(rows.len(), 3);

    let kim_row = rows.iter().find(|r| r["member_id"] == kim).unwrap();
    assert_eq!(kim_row["member_name"], "Kim");
    assert_eq!(kim_row["paid_months"], 1);
    assert_eq!(kim_row["exempt_months"], 1);
    assert_eq!(kim_row["unpaid_months"], 10);
    assert_eq!(kim_row["paid_total"], json!(10.0));
    assert_eq!(kim_row["statuses"][1], "exempt");

    let lee_row = rows.iter().find(|r| r["member_name"] == "Lee").unwrap();
    assert_eq!(lee_row["unpaid_months"], 12);
    assert_eq!(lee_row["unpaid_amount"], json!(120.0));
}

#[tokio::test]
async fn dues_writes_need_permission() {
    let app = TestApp::new().await;
    let (member_user, member_id) = app.create_user("kim", "Kim", "member").await;
    let (treasurer, _) = app.create_user("tess", "Tess", "treasurer").await;
    let uri = format!("/api/dues/{member_id}/2024/months/1");

    let denied = app.put(&uri, member_user, json!({"paid": true})).await;
    assert_error(&denied, ErrorCode::PermissionDenied);

    let (status, _) = app.put(&uri, treasurer, json!({"paid": true})).await;
    assert_eq!(status, StatusCode::OK);

    // members may still read their dues
    let (status, _) = app.get(&format!("/api/dues/{member_id}/2024"), member_user).await;
    assert_eq!(status, StatusCode::OK);
}
