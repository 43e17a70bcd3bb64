//! Integration tests for the one-store-per-user invariant.
//!
//! Requires a running server and database; run with `-- --ignored`.
//! The add-member test additionally needs `ADMIN_EMAIL` /
//! `ADMIN_PASSWORD` for an existing admin account and skips itself
//! when they are absent.

use harborfront_integration_tests::{base_url, client, create_store, login, register, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

/// Admin credentials from the environment, if configured.
fn admin_credentials() -> Option<(String, String)> {
    let email = std::env::var("ADMIN_EMAIL").ok()?;
    let password = std::env::var("ADMIN_PASSWORD").ok()?;
    Some((email, password))
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn second_store_for_the_same_user_is_conflict() {
    let client = client();
    let session = register(&client, &unique_email("owner"), "secret1").await;

    create_store(&client, &session, "Acme").await;

    // The second attempt must fail, never silently re-affiliate.
    let resp = client
        .post(format!("{}/api/stores", base_url()))
        .bearer_auth(&session.access_token)
        .json(&json!({ "name": "Acme Two" }))
        .send()
        .await
        .expect("Failed to attempt second store");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The caller still sees exactly one store.
    let resp = client
        .get(format!("{}/api/stores", base_url()))
        .bearer_auth(&session.access_token)
        .send()
        .await
        .expect("Failed to list stores");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse store list");
    let stores = body["stores"].as_array().expect("stores array");
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["name"], "Acme");
}

#[tokio::test]
#[ignore = "requires a running server, database, and admin credentials"]
async fn adding_an_affiliated_user_is_conflict() {
    let Some((admin_email, admin_password)) = admin_credentials() else {
        return;
    };

    let client = client();
    let admin = login(&client, &admin_email, &admin_password).await;

    // Two users, each already affiliated with their own store.
    let first = register(&client, &unique_email("first"), "secret1").await;
    create_store(&client, &first, "First Harbor").await;
    let second = register(&client, &unique_email("second"), "secret1").await;
    let second_store = create_store(&client, &second, "Second Harbor").await;

    let resp = client
        .post(format!("{}/api/stores/{second_store}/users", base_url()))
        .bearer_auth(&admin.access_token)
        .json(&json!({ "email": first.email }))
        .send()
        .await
        .expect("Failed to attempt member add");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn adding_a_member_requires_admin() {
    let client = client();
    let owner = register(&client, &unique_email("plain-owner"), "secret1").await;
    let store_id = create_store(&client, &owner, "No Admin Here").await;
    let joiner = register(&client, &unique_email("joiner"), "secret1").await;

    let resp = client
        .post(format!("{}/api/stores/{store_id}/users", base_url()))
        .bearer_auth(&owner.access_token)
        .json(&json!({ "email": joiner.email }))
        .send()
        .await
        .expect("Failed to attempt member add");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
