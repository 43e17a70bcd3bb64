//! Environment-backed integration tests for Harborfront.
//!
//! Everything in this crate drives a running server over HTTP, so the
//! tests are `#[ignore]`d by default. They require:
//!
//! - a running `PostgreSQL` database
//! - the server running (`cargo run -p harborfront-server`)
//! - catalog credentials in the environment for the order tests
//!
//! Run with:
//!
//! ```bash
//! cargo test -p harborfront-integration-tests -- --ignored
//! ```
//!
//! The base URL defaults to `http://localhost:3000` and can be
//! overridden with `HARBORFRONT_BASE_URL`. The membership tests that
//! need an admin account read `ADMIN_EMAIL` / `ADMIN_PASSWORD` and
//! skip themselves when those are absent.

#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("HARBORFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Plain HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A unique throwaway email per test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

/// A registered user's credentials and token pair.
pub struct Session {
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

fn session_from_body(email: &str, body: &Value) -> Session {
    Session {
        email: email.to_string(),
        access_token: body["accessToken"]
            .as_str()
            .expect("response carries accessToken")
            .to_string(),
        refresh_token: body["refreshToken"]
            .as_str()
            .expect("response carries refreshToken")
            .to_string(),
    }
}

/// Register a fresh user and return its session.
pub async fn register(client: &Client, email: &str, password: &str) -> Session {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED, "registration failed");
    let body: Value = resp.json().await.expect("Failed to parse register response");
    session_from_body(email, &body)
}

/// Log an existing user in and return its session.
pub async fn login(client: &Client, email: &str, password: &str) -> Session {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::OK, "login failed");
    let body: Value = resp.json().await.expect("Failed to parse login response");
    session_from_body(email, &body)
}

/// Create a store owned by the session's user, returning its id.
pub async fn create_store(client: &Client, session: &Session, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/stores", base_url()))
        .bearer_auth(&session.access_token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create store");

    assert_eq!(resp.status(), StatusCode::CREATED, "store creation failed");
    let body: Value = resp.json().await.expect("Failed to parse store response");
    body["store"]["id"].as_i64().expect("store id")
}
