use bastion_core::{Clock, TotpSecret};
use chrono::Duration;
use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, token};

async fn pending_token(app: &TestApp, name: &str) -> String {
    let response = app
        .post_login(&json!({ "username": name, "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(body.get("access_token").is_none());
    assert!(body.get("refresh_token").is_none());
    assert_eq!(body["expires_in"], 300);
    token(&body, "two_factor_token")
}

/// A syntactically valid code that is wrong for every step inside the drift window.
fn wrong_code(app: &TestApp, secret: &TotpSecret) -> String {
    let now = app.clock.now();
    let valid: Vec<String> = [-30, 0, 30]
        .into_iter()
        .map(|offset| {
            app.totp
                .code_at(secret, now + Duration::seconds(offset))
                .unwrap()
                .as_str()
                .to_string()
        })
        .collect();

    (0..10)
        .map(|digit| digit.to_string().repeat(6))
        .find(|code| !valid.contains(code))
        .unwrap()
}

#[tokio::test]
async fn should_issue_token_pair_after_a_valid_code() {
    let app = TestApp::new().await;
    let (principal, secret) = app.add_user_with_two_factor("alice").await;

    let pending = pending_token(&app, "alice").await;
    let response = app
        .post_login_two_factor(&json!({
            "two_factor_token": pending,
            "code": app.current_code(&secret),
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let me: Value = app
        .get_me(&token(&body, "access_token"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(me["id"], principal.id.as_i64());
}

#[tokio::test]
async fn should_reject_a_replayed_pending_token() {
    let app = TestApp::new().await;
    let (_, secret) = app.add_user_with_two_factor("alice").await;
    let pending = pending_token(&app, "alice").await;
    let body = json!({ "two_factor_token": pending, "code": app.current_code(&secret) });

    assert_eq!(app.post_login_two_factor(&body).await.status().as_u16(), 200);
    assert_eq!(app.post_login_two_factor(&body).await.status().as_u16(), 401);
}

#[tokio::test]
async fn should_reject_tokens_of_another_purpose() {
    let app = TestApp::new().await;
    let (_, secret) = app.add_user_with_two_factor("alice").await;
    let pending = pending_token(&app, "alice").await;
    let pair: Value = app
        .post_login_two_factor(&json!({
            "two_factor_token": pending,
            "code": app.current_code(&secret),
        }))
        .await
        .json()
        .await
        .unwrap();

    for field in ["access_token", "refresh_token"] {
        let response = app
            .post_login_two_factor(&json!({
                "two_factor_token": token(&pair, field),
                "code": app.current_code(&secret),
            }))
            .await;
        assert_eq!(response.status().as_u16(), 401, "{field} accepted");
    }
}

#[tokio::test]
async fn should_reject_an_expired_pending_token() {
    let app = TestApp::new().await;
    let (_, secret) = app.add_user_with_two_factor("alice").await;
    let pending = pending_token(&app, "alice").await;

    app.clock.advance(Duration::minutes(6));
    let response = app
        .post_login_two_factor(&json!({
            "two_factor_token": pending,
            "code": app.current_code(&secret),
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_count_wrong_codes_towards_lockout() {
    let app = TestApp::new().await;
    let (_, secret) = app.add_user_with_two_factor("alice").await;
    let pending = pending_token(&app, "alice").await;
    let wrong = json!({ "two_factor_token": pending, "code": wrong_code(&app, &secret) });

    for _ in 0..5 {
        assert_eq!(app.post_login_two_factor(&wrong).await.status().as_u16(), 401);
    }

    let response = app
        .post_login_two_factor(&json!({
            "two_factor_token": pending,
            "code": app.current_code(&secret),
        }))
        .await;
    assert_eq!(response.status().as_u16(), 429);
}

#[tokio::test]
async fn should_return_400_for_a_malformed_code() {
    let app = TestApp::new().await;
    app.add_user_with_two_factor("alice").await;
    let pending = pending_token(&app, "alice").await;

    for code in ["12345", "1234567", "12ab56"] {
        let response = app
            .post_login_two_factor(&json!({ "two_factor_token": pending, "code": code }))
            .await;
        assert_eq!(response.status().as_u16(), 400, "code: {code}");
    }
}
