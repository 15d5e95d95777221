//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine as _;
use genie_core::db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

const SALES_CSV: &str = "Region,Sales\nA,100\nB,200\n";

fn setup_test_app() -> Router {
    setup_test_app_with(GenieConfig::default())
}

fn setup_test_app_with(settings: GenieConfig) -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        allowed_origins: vec![],
        settings,
    };
    create_router(db, None, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    app.clone()
        .oneshot(
            builder
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get_authed(app: &Router, uri: &str, token: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Register and log in, returning the session token
async fn login_as(app: &Router, username: &str) -> String {
    let creds = serde_json::json!({ "username": username, "password": "hunter22" });

    let response = post_json(app, "/api/register", None, creds.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app, "/api/login", None, creds).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

async fn upload_csv(app: &Router, token: &str, filename: &str, csv: &str) -> axum::response::Response {
    upload_bytes(app, token, filename, csv.as_bytes()).await
}

async fn upload_bytes(
    app: &Router,
    token: &str,
    filename: &str,
    data: &[u8],
) -> axum::response::Response {
    let body = serde_json::json!({
        "filename": filename,
        "data": base64::engine::general_purpose::STANDARD.encode(data),
    });
    post_json(app, "/api/upload/json", Some(token), body).await
}

/// Single-sheet workbook with the same rows as SALES_CSV
fn sales_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Region").unwrap();
    sheet.write_string(0, 1, "Sales").unwrap();
    sheet.write_string(1, 0, "A").unwrap();
    sheet.write_number(1, 1, 100.0).unwrap();
    sheet.write_string(2, 0, "B").unwrap();
    sheet.write_number(2, 1, 200.0).unwrap();
    workbook.save_to_buffer().unwrap()
}

async fn upload_count(app: &Router, token: &str) -> usize {
    let response = get_authed(app, "/api/uploads", token).await;
    let json = get_body_json(response).await;
    json.as_array().unwrap().len()
}

// ========== Auth Tests ==========

#[tokio::test]
async fn test_register_and_login() {
    let app = setup_test_app();
    let creds = serde_json::json!({ "username": "  ana  ", "password": "hunter22" });

    let response = post_json(&app, "/api/register", None, creds).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["username"], "ana");
    assert!(json["id"].as_i64().unwrap() > 0);

    let creds = serde_json::json!({ "username": "ANA", "password": "hunter22" });
    let response = post_json(&app, "/api/login", None, creds).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"]["username"], "ana");
    assert_eq!(json["token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = setup_test_app();
    let creds = serde_json::json!({ "username": "ana", "password": "hunter22" });

    let response = post_json(&app, "/api/register", None, creds.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/register", None, creds).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_empty_username() {
    let app = setup_test_app();
    let creds = serde_json::json!({ "username": "   ", "password": "hunter22" });

    let response = post_json(&app, "/api/register", None, creds).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_test_app();
    login_as(&app, "ana").await;

    let creds = serde_json::json!({ "username": "ana", "password": "wrong" });
    let response = post_json(&app, "/api/login", None, creds).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = setup_test_app();
    let creds = serde_json::json!({ "username": "nobody", "password": "x" });

    let response = post_json(&app, "/api/login", None, creds).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup_test_app();

    for uri in ["/api/session", "/api/statistics", "/api/uploads", "/api/table"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = get_authed(&app, "/api/session", "not-a-real-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Authentication required");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let response = post_json(&app, "/api/logout", Some(&token), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);

    let response = get_authed(&app, "/api/session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_session_rejected() {
    let app = setup_test_app_with(GenieConfig {
        session_timeout: std::time::Duration::ZERO,
        ..Default::default()
    });
    let token = login_as(&app, "ana").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = get_authed(&app, "/api/session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ========== Session Tests ==========

#[tokio::test]
async fn test_session_state_and_page() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let response = get_authed(&app, "/api/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["state"], "authenticated");
    assert_eq!(json["user"]["username"], "ana");
    assert_eq!(json["page"], "data");
    assert!(json["dataset"].is_null());

    let response = post_json(
        &app,
        "/api/session/page",
        Some(&token),
        serde_json::json!({ "page": "insights" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["page"], "insights");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = setup_test_app();
    let ana = login_as(&app, "ana").await;
    let ben = login_as(&app, "ben").await;

    let response = upload_csv(&app, &ana, "sales.csv", SALES_CSV).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_authed(&app, "/api/statistics", &ben).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_authed(&app, "/api/uploads", &ben).await;
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

// ========== Upload Tests ==========

#[tokio::test]
async fn test_upload_json() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let csv = "Region,Sales\nA,100\nA,100\nB,\n";
    let response = upload_csv(&app, &token, "sales.csv", csv).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["filename"], "sales.csv");
    assert_eq!(json["summary"]["rows"], 2);
    assert_eq!(json["summary"]["columns"], 2);
    assert_eq!(json["cleaning"]["duplicates_removed"], 1);
    assert_eq!(json["cleaning"]["numeric_cells_filled"], 1);
    assert_eq!(json["columns"][1]["column_type"], "numeric");

    let response = get_authed(&app, "/api/session", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["dataset"]["rows"], 2);
}

#[tokio::test]
async fn test_upload_multipart() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let boundary = "genieboundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"sales.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        csv = SALES_CSV
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header("authorization", format!("Bearer {}", token))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["filename"], "sales.csv");
    assert_eq!(json["summary"]["rows"], 2);
}

#[tokio::test]
async fn test_upload_excel_workbook() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let response = upload_bytes(&app, &token, "sales.xlsx", &sales_workbook()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["filename"], "sales.xlsx");
    assert_eq!(json["summary"]["rows"], 2);

    let response = get_authed(&app, "/api/statistics", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json[0]["name"], "Sales");
    assert_eq!(json[0]["sum"], 300.0);
}

#[tokio::test]
async fn test_upload_rejects_corrupt_workbook() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let response = upload_csv(&app, &token, "sales.xlsx", SALES_CSV).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("workbook"));
}

#[tokio::test]
async fn test_upload_rejects_unknown_extension() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let response = upload_csv(&app, &token, "sales.txt", SALES_CSV).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upload_count(&app, &token).await, 0);
}

#[tokio::test]
async fn test_upload_rejects_bad_base64() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let body = serde_json::json!({ "filename": "sales.csv", "data": "!!not base64!!" });
    let response = post_json(&app, "/api/upload/json", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_size_limit() {
    let app = setup_test_app_with(GenieConfig {
        max_upload_bytes: 16,
        ..Default::default()
    });
    let token = login_as(&app, "ana").await;

    let response = upload_csv(&app, &token, "sales.csv", "Region,Sales\nA,100\nB,200\nC,300\n").await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_row_limit() {
    let app = setup_test_app_with(GenieConfig {
        max_rows: 1,
        ..Default::default()
    });
    let token = login_as(&app, "ana").await;

    let response = upload_csv(&app, &token, "sales.csv", SALES_CSV).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_failed_upload_keeps_previous_dataset() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;
    let response = upload_csv(&app, &token, "sales.xls", SALES_CSV).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_authed(&app, "/api/session", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["dataset"]["rows"], 2);
}

#[tokio::test]
async fn test_upload_history_only_for_installed_datasets() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    upload_csv(&app, &token, "broken.csv", "").await;
    upload_csv(&app, &token, "wide.csv", "A\n1,2\n").await;
    assert_eq!(upload_count(&app, &token).await, 0);

    let response = upload_csv(&app, &token, "sales.csv", SALES_CSV).await;
    let json = get_body_json(response).await;
    assert_eq!(upload_count(&app, &token).await, 1);

    let response = get_authed(&app, "/api/uploads", &token).await;
    let uploads = get_body_json(response).await;
    assert_eq!(uploads[0]["id"], json["upload_id"]);
}

#[tokio::test]
async fn test_list_uploads_newest_first() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    upload_csv(&app, &token, "first.csv", SALES_CSV).await;
    upload_csv(&app, &token, "second.csv", "Units\n1\n2\n").await;

    let response = get_authed(&app, "/api/uploads", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let uploads = json.as_array().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0]["filename"], "second.csv");
    assert_eq!(uploads[1]["filename"], "first.csv");
    assert_eq!(uploads[1]["size_bytes"], SALES_CSV.len());
}

#[tokio::test]
async fn test_table_preview_limit() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let response = get_authed(&app, "/api/table?limit=1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["columns"], serde_json::json!(["Region", "Sales"]));
    assert_eq!(json["rows"], serde_json::json!([["A", 100.0]]));
    assert_eq!(json["total_rows"], 2);
}

// ========== Insight Tests ==========

#[tokio::test]
async fn test_insights_without_dataset() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let response = get_authed(&app, "/api/forecast", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("No dataset loaded"));
}

#[tokio::test]
async fn test_statistics() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let response = get_authed(&app, "/api/statistics", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let stats = json.as_array().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["name"], "Sales");
    assert_eq!(stats[0]["sum"], 300.0);
    assert_eq!(stats[0]["mean"], 150.0);
    assert_eq!(stats[0]["max"], 200.0);
    assert_eq!(stats[0]["min"], 100.0);
}

#[tokio::test]
async fn test_forecast_default_column() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let response = get_authed(&app, "/api/forecast?horizon=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["forecast"]["column"], "Sales");
    assert_eq!(json["forecast"]["predicted"], 300.0);
    assert_eq!(json["series"], serde_json::json!([300.0, 400.0]));
}

#[tokio::test]
async fn test_forecast_horizon_is_capped() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let uri = format!("/api/forecast?horizon={}", usize::MAX);
    let response = get_authed(&app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), genie_core::insights::MAX_HORIZON);
    assert_eq!(series[1], 400.0);
}

#[tokio::test]
async fn test_forecast_errors() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let response = get_authed(&app, "/api/forecast?column=Region", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    upload_csv(&app, &token, "one.csv", "Sales\n5\n").await;
    let response = get_authed(&app, "/api/forecast", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Insufficient data"));
}

#[tokio::test]
async fn test_group_totals() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", "Region,Sales\nB,5\nA,100\nB,200\n").await;

    let response = get_authed(&app, "/api/groups?group=Region&value=Sales", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json[0]["label"], "A");
    assert_eq!(json[0]["total"], 100.0);
    assert_eq!(json[1]["label"], "B");
    assert_eq!(json[1]["total"], 205.0);
    assert_eq!(json[1]["count"], 2);

    let response = get_authed(&app, "/api/groups?group=Nope&value=Sales", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_histogram() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", "Region,Sales\nA,0\nB,10\nC,20\nD,40\n").await;

    let response = get_authed(&app, "/api/histogram?bins=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["column"], "Sales");
    assert_eq!(
        json["bins"],
        serde_json::json!([
            { "start": 0.0, "end": 20.0, "count": 2 },
            { "start": 20.0, "end": 40.0, "count": 2 },
        ])
    );

    let response = get_authed(&app, "/api/histogram?column=Sales", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["bins"].as_array().unwrap().len(), 10);

    let response = get_authed(&app, "/api/histogram?column=Region", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = get_authed(&app, "/api/histogram?bins=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_formats() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let response = get_authed(&app, "/api/report", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["format"], "text");
    assert_eq!(json["lines"][0], "Dataset Summary:");
    assert_eq!(json["lines"][1], "Rows: 2");
    assert!(json["rendered"]
        .as_str()
        .unwrap()
        .contains("Next predicted value for Sales: 300.00"));

    let response = get_authed(&app, "/api/report?format=md", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["format"], "markdown");
    assert!(json["rendered"].as_str().unwrap().starts_with("# Dataset Summary"));

    let response = get_authed(&app, "/api/report?format=pdf", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Ask Tests ==========

#[tokio::test]
async fn test_ask_total() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let body = serde_json::json!({ "question": "What is the total sales?" });
    let response = post_json(&app, "/api/ask", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["intent"], "total");
    assert_eq!(json["column"], "Sales");
    assert_eq!(json["value"], 300.0);
    assert_eq!(json["text"], "Total Sales is 300.00");
}

#[tokio::test]
async fn test_ask_unknown_intent_returns_help() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let body = serde_json::json!({ "question": "tell me a joke" });
    let response = post_json(&app, "/api/ask", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["intent"], "unknown");
    assert_eq!(json["text"], genie_core::query::HELP_TEXT);
}

#[tokio::test]
async fn test_ask_empty_question() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;
    upload_csv(&app, &token, "sales.csv", SALES_CSV).await;

    let body = serde_json::json!({ "question": "   " });
    let response = post_json(&app, "/api/ask", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_without_dataset() {
    let app = setup_test_app();
    let token = login_as(&app, "ana").await;

    let body = serde_json::json!({ "question": "total sales" });
    let response = post_json(&app, "/api/ask", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Security Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"username":"a","password":"b"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

#[test]
fn test_bearer_token_parsing() {
    let mut headers = axum::http::HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
    assert_eq!(bearer_token(&headers), Some("abc123"));

    headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
    assert_eq!(bearer_token(&headers), None);

    headers.insert("authorization", HeaderValue::from_static("Bearer "));
    assert_eq!(bearer_token(&headers), None);
}
