//! Integration tests for the authentication flow: refresh rotation,
//! the rotation race, logout, and forgot-password enumeration safety.
//!
//! Requires a running server and database; run with `-- --ignored`.

use harborfront_integration_tests::{base_url, client, register, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn refresh_url() -> String {
    format!("{}/api/auth/refresh-token", base_url())
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn refresh_rotation_is_single_use() {
    let client = client();
    let session = register(&client, &unique_email("rotate"), "secret1").await;

    // First use wins and hands back a new pair.
    let resp = client
        .post(refresh_url())
        .json(&json!({ "refreshToken": session.refresh_token }))
        .send()
        .await
        .expect("Failed to refresh");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse refresh response");
    let new_token = body["refreshToken"].as_str().expect("refreshToken");
    assert_ne!(new_token, session.refresh_token);

    // Replaying the consumed token fails.
    let resp = client
        .post(refresh_url())
        .json(&json!({ "refreshToken": session.refresh_token }))
        .send()
        .await
        .expect("Failed to replay token");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The replacement is still good for one use.
    let resp = client
        .post(refresh_url())
        .json(&json!({ "refreshToken": new_token }))
        .send()
        .await
        .expect("Failed to use replacement token");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn concurrent_rotation_has_exactly_one_winner() {
    let client = client();
    let session = register(&client, &unique_email("race"), "secret1").await;

    let body = json!({ "refreshToken": session.refresh_token });
    let (a, b) = tokio::join!(
        client.post(refresh_url()).json(&body).send(),
        client.post(refresh_url()).json(&body).send(),
    );

    let statuses = [
        a.expect("first rotation request failed").status(),
        b.expect("second rotation request failed").status(),
    ];
    let wins = statuses.iter().filter(|s| s.is_success()).count();
    let losses = statuses
        .iter()
        .filter(|s| **s == StatusCode::UNAUTHORIZED)
        .count();

    assert_eq!(wins, 1, "exactly one rotation may win, got {statuses:?}");
    assert_eq!(losses, 1, "the loser must be rejected, got {statuses:?}");
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn logout_is_idempotent() {
    let client = client();
    let session = register(&client, &unique_email("logout"), "secret1").await;
    let url = format!("{}/api/auth/logout", base_url());
    let body = json!({ "refreshToken": session.refresh_token });

    for _ in 0..2 {
        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .expect("Failed to log out");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // The revoked token no longer rotates.
    let resp = client
        .post(refresh_url())
        .json(&body)
        .send()
        .await
        .expect("Failed to attempt rotation after logout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn forgot_password_does_not_reveal_accounts() {
    let client = client();
    let session = register(&client, &unique_email("forgot"), "secret1").await;
    let url = format!("{}/api/auth/forgot-password", base_url());

    let known_resp = client
        .post(&url)
        .json(&json!({ "email": session.email }))
        .send()
        .await
        .expect("Failed to request reset for known account");
    assert_eq!(known_resp.status(), StatusCode::OK);
    let known: Value = known_resp.json().await.expect("Failed to parse response");

    let unknown_resp = client
        .post(&url)
        .json(&json!({ "email": unique_email("ghost") }))
        .send()
        .await
        .expect("Failed to request reset for unknown account");
    assert_eq!(unknown_resp.status(), StatusCode::OK);
    let unknown: Value = unknown_resp.json().await.expect("Failed to parse response");

    assert_eq!(known["message"], unknown["message"]);
    assert!(unknown.get("resetToken").is_none());
}
