use std::sync::Arc;

use bastion_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, HashMapRevocationStore, JwtTokenService,
    ManualClock, TotpRsVerifier, config::constants::test::APP_ADDRESS,
};
use bastion_application::{AuthPolicy, AuthPorts, Authenticator};
use bastion_auth_service::AuthService;
use bastion_core::{
    Clock, CredentialStore, Password, PasswordHasher, Principal, Role, TotpSecret,
    TotpVerifier, TwoFactorState, Username,
};
use chrono::Utc;
use secrecy::Secret;
use serde_json::{Value, json};

pub const PASSWORD: &str = "s3cure-passw0rd";

pub type TestScheme = Authenticator<
    HashMapCredentialStore,
    HashMapRevocationStore,
    Argon2PasswordHasher,
    JwtTokenService<ManualClock>,
    TotpRsVerifier,
    ManualClock,
>;

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub clock: ManualClock,
    pub totp: TotpRsVerifier,
    pub scheme: Arc<TestScheme>,
}

impl TestApp {
    pub async fn new() -> Self {
        let clock = ManualClock::new(Utc::now());
        let totp = TotpRsVerifier::new("bastion-test");
        let tokens = JwtTokenService::new(
            Secret::from("test-signing-key-that-is-long-enough".to_string()),
            "bastion-test",
            clock.clone(),
        )
        .expect("Failed to build token service");

        let scheme = Arc::new(Authenticator::new(
            AuthPorts {
                credentials: HashMapCredentialStore::new(),
                revocations: HashMapRevocationStore::new(),
                hasher: Argon2PasswordHasher,
                tokens,
                totp: totp.clone(),
                clock: clock.clone(),
            },
            AuthPolicy::default(),
        ));

        let listener = tokio::net::TcpListener::bind(APP_ADDRESS)
            .await
            .expect("Failed to bind address");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let service = AuthService::new(scheme.clone());
        tokio::spawn(async move {
            service
                .run_standalone(listener, None)
                .await
                .expect("Failed to run auth service");
        });

        Self {
            address,
            http_client: reqwest::Client::new(),
            clock,
            totp,
            scheme,
        }
    }

    pub async fn add_user(&self, name: &str, role: Role) -> Principal {
        let hash = Argon2PasswordHasher
            .hash(&password(PASSWORD))
            .await
            .expect("Failed to hash password");
        self.scheme
            .credentials()
            .create_user(Username::parse(name).unwrap(), hash, role)
            .await
            .expect("Failed to create user")
    }

    pub async fn add_user_with_two_factor(&self, name: &str) -> (Principal, TotpSecret) {
        let principal = self.add_user(name, Role::User).await;
        let secret = self.totp.generate_secret();
        self.scheme
            .credentials()
            .set_two_factor(principal.id, TwoFactorState::enabled(secret.clone()))
            .await
            .expect("Failed to enable two-factor");
        (principal, secret)
    }

    pub fn current_code(&self, secret: &TotpSecret) -> String {
        self.totp
            .code_at(secret, self.clock.now())
            .expect("Failed to generate code")
            .as_str()
            .to_string()
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.post("/auth/login", body).await
    }

    pub async fn post_login_two_factor(&self, body: &Value) -> reqwest::Response {
        self.post("/auth/login/2fa", body).await
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/auth/refresh", &json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn post_logout(&self, access_token: &str) -> reqwest::Response {
        self.http_client
            .post(format!("{}/auth/logout", &self.address))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_me(&self, access_token: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/auth/me", &self.address))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_authorized(
        &self,
        path: &str,
        access_token: &str,
        body: &Value,
    ) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", &self.address, path))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Logs in a user without a second factor and returns the token pair body.
    pub async fn login(&self, name: &str) -> Value {
        let response = self
            .post_login(&json!({ "username": name, "password": PASSWORD }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to parse body")
    }
}

pub fn password(value: &str) -> Password {
    Password::parse(Secret::from(value.to_string())).unwrap()
}

pub fn token(body: &Value, field: &str) -> String {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing {field} in {body}"))
        .to_string()
}
