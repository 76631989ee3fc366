use bastion_core::Role;
use chrono::Duration;
use serde_json::{Value, json};

use crate::helpers::{TestApp, token};

async fn sweep(app: &TestApp, access_token: &str) -> reqwest::Response {
    app.post_authorized("/admin/revocations/sweep", access_token, &json!({}))
        .await
}

#[tokio::test]
async fn should_forbid_non_admins() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let access_token = token(&app.login("alice").await, "access_token");

    assert_eq!(sweep(&app, &access_token).await.status().as_u16(), 403);

    let response = app
        .http_client
        .post(format!("{}/admin/revocations/sweep", app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_remove_only_expired_revocations() {
    let app = TestApp::new().await;
    app.add_user("root", Role::Admin).await;
    app.add_user("alice", Role::User).await;

    let alice = app.login("alice").await;
    app.post_logout(&token(&alice, "access_token")).await;
    app.post_refresh(&token(&alice, "refresh_token")).await;

    let admin = token(&app.login("root").await, "access_token");
    let body: Value = sweep(&app, &admin).await.json().await.unwrap();
    assert_eq!(body["removed"], 0);

    app.clock.advance(Duration::days(8));
    let admin = token(&app.login("root").await, "access_token");

    let response = sweep(&app, &admin).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["removed"], 2);
    assert_eq!(app.scheme.revocations().len().await, 0);
}
