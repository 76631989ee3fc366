use bastion_core::{Role, TotpSecret};
use secrecy::Secret;
use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, token};

async fn setup(app: &TestApp, access_token: &str) -> TotpSecret {
    let response = app
        .post_authorized("/auth/2fa/setup", access_token, &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(
        body["otpauth_uri"]
            .as_str()
            .unwrap()
            .starts_with("otpauth://totp/")
    );
    TotpSecret::new(Secret::from(token(&body, "secret")))
}

#[tokio::test]
async fn should_require_the_second_factor_once_enabled() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let access_token = token(&app.login("alice").await, "access_token");

    let secret = setup(&app, &access_token).await;

    // Setup alone does not switch the second factor on.
    let body = app.login("alice").await;
    assert!(body.get("access_token").is_some());

    let response = app
        .post_authorized(
            "/auth/2fa/enable",
            &access_token,
            &json!({ "code": app.current_code(&secret) }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = app.login("alice").await;
    assert!(body.get("two_factor_token").is_some());
    assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn should_return_409_for_enrollment_out_of_order() {
    let app = TestApp::new().await;
    app.add_user("alice", Role::User).await;
    let access_token = token(&app.login("alice").await, "access_token");

    let response = app
        .post_authorized("/auth/2fa/enable", &access_token, &json!({ "code": "123456" }))
        .await;
    assert_eq!(response.status().as_u16(), 409);

    let secret = setup(&app, &access_token).await;
    let code = json!({ "code": app.current_code(&secret) });
    assert_eq!(
        app.post_authorized("/auth/2fa/enable", &access_token, &code)
            .await
            .status()
            .as_u16(),
        200
    );

    assert_eq!(
        app.post_authorized("/auth/2fa/enable", &access_token, &code)
            .await
            .status()
            .as_u16(),
        409
    );
    assert_eq!(
        app.post_authorized("/auth/2fa/setup", &access_token, &json!({}))
            .await
            .status()
            .as_u16(),
        409
    );
}

#[tokio::test]
async fn should_disable_only_with_the_account_password() {
    let app = TestApp::new().await;
    let (_, secret) = app.add_user_with_two_factor("alice").await;

    let pending = app
        .post_login(&json!({ "username": "alice", "password": PASSWORD }))
        .await
        .json::<Value>()
        .await
        .unwrap();
    let pair: Value = app
        .post_login_two_factor(&json!({
            "two_factor_token": token(&pending, "two_factor_token"),
            "code": app.current_code(&secret),
        }))
        .await
        .json()
        .await
        .unwrap();
    let access_token = token(&pair, "access_token");

    let response = app
        .post_authorized(
            "/auth/2fa/disable",
            &access_token,
            &json!({ "password": "not-the-password" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post_authorized(
            "/auth/2fa/disable",
            &access_token,
            &json!({ "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = app.login("alice").await;
    assert!(body.get("access_token").is_some());

    let response = app
        .post_authorized(
            "/auth/2fa/disable",
            &access_token,
            &json!({ "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 409);
}
