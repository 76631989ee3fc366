use bastion_core::Role;
use serde_json::Value;

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn should_revoke_the_presented_access_token() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let access_token = token(&app.login("alice").await, "access_token");

    assert_eq!(app.post_logout(&access_token).await.status().as_u16(), 200);

    assert_eq!(app.get_me(&access_token).await.status().as_u16(), 401);
    assert_eq!(app.post_logout(&access_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn should_leave_the_refresh_token_usable() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let pair = app.login("alice").await;

    app.post_logout(&token(&pair, "access_token")).await;

    let response = app.post_refresh(&token(&pair, "refresh_token")).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn should_return_401_without_a_bearer_token() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .post(format!("{}/auth/logout", app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 401);

    for bearer in ["garbage", "a.b.c"] {
        assert_eq!(app.post_logout(bearer).await.status().as_u16(), 401);
    }
}

#[tokio::test]
async fn should_not_accept_a_refresh_token_as_bearer() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let refresh_token = token(&app.login("alice").await, "refresh_token");

    let response = app.get_me(&refresh_token).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid or expired token");
}
