use bastion_core::Role;
use chrono::Duration;
use serde_json::{Value, json};
use tokio::task::JoinSet;

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn should_rotate_the_token_pair() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let first = app.login("alice").await;

    let response = app.post_refresh(&token(&first, "refresh_token")).await;

    assert_eq!(response.status().as_u16(), 200);
    let second: Value = response.json().await.unwrap();
    assert_ne!(second["refresh_token"], first["refresh_token"]);
    assert_ne!(second["access_token"], first["access_token"]);

    let me: Value = app
        .get_me(&token(&second, "access_token"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(me["username"], "alice");
}

#[tokio::test]
async fn should_reject_a_refresh_token_used_twice() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let refresh_token = token(&app.login("alice").await, "refresh_token");

    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 200);
    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_refresh_win() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let refresh_token = token(&app.login("alice").await, "refresh_token");

    let mut requests = JoinSet::new();
    for _ in 0..10 {
        let client = app.http_client.clone();
        let url = format!("{}/auth/refresh", app.address);
        let body = json!({ "refresh_token": refresh_token });
        requests.spawn(async move {
            client
                .post(url)
                .json(&body)
                .send()
                .await
                .expect("Failed to execute request.")
                .status()
                .as_u16()
        });
    }

    let statuses = requests.join_all().await;

    assert_eq!(statuses.iter().filter(|status| **status == 200).count(), 1);
    assert_eq!(statuses.iter().filter(|status| **status == 401).count(), 9);
}

#[tokio::test]
async fn should_not_accept_an_access_token() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let access_token = token(&app.login("alice").await, "access_token");

    assert_eq!(app.post_refresh(&access_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn should_reject_an_expired_refresh_token() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let refresh_token = token(&app.login("alice").await, "refresh_token");

    app.clock.advance(Duration::days(7) + Duration::seconds(1));

    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 401);
}
