// ABOUTME: Common test utilities for integration tests
// ABOUTME: Provides test server setup, database helpers, and HTTP client utilities

// Each integration test binary uses its own subset of these helpers
#![allow(dead_code)]

use procura_api::ApiState;
use procura_auth::{hash_password, TokenSigner};
use procura_core::UserCreateInput;
use procura_storage::DbState;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "admin-password-1";
pub const VENDOR_PASSWORD: &str = "vendor-password-1";

/// Test context containing server URL and database state
pub struct TestContext {
    pub base_url: String,
    pub db: DbState,
    pub _temp_dir: TempDir,
}

/// Create a test server with an isolated database
pub async fn setup_test_server() -> TestContext {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("procura-test.db");
    let database_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create database pool");

    DbState::configure_and_migrate(&pool)
        .await
        .expect("Failed to run migrations");

    let db = DbState::new(pool);

    let state = ApiState::new(
        db.clone(),
        TokenSigner::with_default_ttl(b"integration-test-secret"),
        procura_auth::RESET_TOKEN_TTL_SECS,
        "http://localhost:5173".to_string(),
    );

    let app = procura_api::create_router(state);

    // Bind to random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    // Spawn server
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    TestContext {
        base_url,
        db,
        _temp_dir: temp_dir,
    }
}

fn request(
    method: reqwest::Method,
    base_url: &str,
    path: &str,
    token: Option<&str>,
) -> reqwest::RequestBuilder {
    let client = reqwest::Client::new();
    let mut builder = client.request(method, format!("{}{}", base_url, path));
    if let Some(token) = token {
        builder = builder.bearer_auth(token);
    }
    builder
}

/// Helper to make GET requests
pub async fn get(base_url: &str, path: &str, token: Option<&str>) -> reqwest::Response {
    request(reqwest::Method::GET, base_url, path, token)
        .send()
        .await
        .expect("Failed to make GET request")
}

/// Helper to make POST requests with JSON body
pub async fn post_json(
    base_url: &str,
    path: &str,
    body: &Value,
    token: Option<&str>,
) -> reqwest::Response {
    request(reqwest::Method::POST, base_url, path, token)
        .json(body)
        .send()
        .await
        .expect("Failed to make POST request")
}

/// Helper to make PUT requests with JSON body
pub async fn put_json(
    base_url: &str,
    path: &str,
    body: &Value,
    token: Option<&str>,
) -> reqwest::Response {
    request(reqwest::Method::PUT, base_url, path, token)
        .json(body)
        .send()
        .await
        .expect("Failed to make PUT request")
}

/// Helper to make DELETE requests
pub async fn delete(base_url: &str, path: &str, token: Option<&str>) -> reqwest::Response {
    request(reqwest::Method::DELETE, base_url, path, token)
        .send()
        .await
        .expect("Failed to make DELETE request")
}

/// Log in and return the session token
pub async fn login(ctx: &TestContext, username: &str, password: &str) -> String {
    let response = post_json(
        &ctx.base_url,
        "/auth/login",
        &json!({ "username": username, "password": password }),
        None,
    )
    .await;
    assert_eq!(response.status(), 200, "login failed for {}", username);

    let body: Value = response.json().await.unwrap();
    body["data"]["access"].as_str().unwrap().to_string()
}

/// Seed a staff user directly (the out-of-band bootstrap path) and log in
pub async fn seed_admin(ctx: &TestContext) -> String {
    ctx.db
        .user_storage
        .create_user(UserCreateInput {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            is_staff: true,
        })
        .await
        .expect("Failed to seed admin");

    login(ctx, "admin", ADMIN_PASSWORD).await
}

/// Create a category through the API and return its id
pub async fn create_category(ctx: &TestContext, admin_token: &str, name: &str) -> String {
    let response = post_json(
        &ctx.base_url,
        "/categories",
        &json!({ "name": name }),
        Some(admin_token),
    )
    .await;
    assert_eq!(response.status(), 201, "category create failed");

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

/// A vendor registration payload with unique-enough identifiers derived
/// from the given tag.
pub fn vendor_registration(tag: &str, category_id: Option<&str>) -> Value {
    json!({
        "username": format!("vendor_{}", tag),
        "email": format!("{}@example.com", tag),
        "first_name": "Ven",
        "last_name": format!("Dor {}", tag),
        "password": VENDOR_PASSWORD,
        "gst_number": format!("GST-{}", tag),
        "pan_number": format!("PAN-{}", tag),
        "mobile_number": format!("98-{}", tag),
        "employee_count": 4,
        "revenue": 125000.5,
        "category_id": category_id,
    })
}

/// Register a vendor through the API and return its vendor id
pub async fn register_vendor(ctx: &TestContext, tag: &str, category_id: Option<&str>) -> String {
    let response = post_json(
        &ctx.base_url,
        "/register/vendor",
        &vendor_registration(tag, category_id),
        None,
    )
    .await;
    assert_eq!(response.status(), 201, "vendor registration failed");

    let body: Value = response.json().await.unwrap();
    body["data"]["vendor_id"].as_str().unwrap().to_string()
}

/// Flip a vendor to APPROVED through the admin update endpoint
pub async fn approve_vendor(ctx: &TestContext, admin_token: &str, vendor_id: &str) {
    let response = put_json(
        &ctx.base_url,
        &format!("/vendors/{}", vendor_id),
        &json!({ "status": "APPROVED" }),
        Some(admin_token),
    )
    .await;
    assert_eq!(response.status(), 200, "vendor approval failed");
}

/// Count rows in a table, optionally filtered by one column
pub async fn count_rows(ctx: &TestContext, table: &str, filter: Option<(&str, &str)>) -> i64 {
    let query = match filter {
        Some((column, _)) => format!("SELECT COUNT(*) FROM {} WHERE {} = ?", table, column),
        None => format!("SELECT COUNT(*) FROM {}", table),
    };
    let mut q = sqlx::query_scalar(&query);
    if let Some((_, value)) = filter {
        q = q.bind(value);
    }
    q.fetch_one(&ctx.db.pool).await.unwrap()
}
