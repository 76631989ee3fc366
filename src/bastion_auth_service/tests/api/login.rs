use bastion_core::Role;
use chrono::Duration;
use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, token};

#[tokio::test]
async fn should_return_200_with_token_pair_when_two_factor_is_off() {
    let app = TestApp::new().await;
    let principal = app.add_user("alice", Role::User).await;

    let body = app.login("alice").await;

    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert!(body.get("two_factor_token").is_none());

    let response = app.get_me(&token(&body, "access_token")).await;
    assert_eq!(response.status().as_u16(), 200);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["id"], principal.id.as_i64());
    assert_eq!(me["username"], "alice");
    assert_eq!(me["role"], "user");
}

#[tokio::test]
async fn should_not_reveal_whether_the_user_exists() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;

    let wrong_password = app
        .post_login(&json!({ "username": "alice", "password": "not-the-password" }))
        .await;
    let unknown_user = app
        .post_login(&json!({ "username": "mallory", "password": "not-the-password" }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_user.status().as_u16(), 401);
    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_user: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn should_return_400_for_malformed_input() {
    let app = TestApp::new().await;

    let cases = [
        json!({ "username": "a", "password": PASSWORD }),
        json!({ "username": "not a name!", "password": PASSWORD }),
        json!({ "username": "alice", "password": "short" }),
    ];

    for body in cases {
        let response = app.post_login(&body).await;
        assert_eq!(response.status().as_u16(), 400, "input: {body}");
    }
}

#[tokio::test]
async fn should_lock_out_after_repeated_failures_until_the_window_passes() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let wrong = json!({ "username": "alice", "password": "not-the-password" });
    let right = json!({ "username": "alice", "password": PASSWORD });

    for _ in 0..5 {
        assert_eq!(app.post_login(&wrong).await.status().as_u16(), 401);
    }

    // The correct password does not help while locked out.
    assert_eq!(app.post_login(&right).await.status().as_u16(), 429);

    app.clock.advance(Duration::minutes(16));
    assert_eq!(app.post_login(&right).await.status().as_u16(), 200);
}

#[tokio::test]
async fn should_lock_out_the_client_address_across_usernames() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;

    for name in ["bob", "carol", "dave", "erin", "frank"] {
        let response = app
            .post_login(&json!({ "username": name, "password": PASSWORD }))
            .await;
        assert_eq!(response.status().as_u16(), 401);
    }

    let response = app
        .post_login(&json!({ "username": "alice", "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 429);
}
