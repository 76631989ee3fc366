use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, State},
};
use bastion_core::{
    AuthenticationScheme, ClientAddress, IssuedToken, LoginOutcome, Password, TokenPair, Username,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::error::AuthApiError;

#[tracing::instrument(name = "Login", skip_all, fields(client = %addr.ip()))]
pub async fn login<A>(
    State(scheme): State<Arc<A>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError>
where
    A: AuthenticationScheme,
{
    let username = Username::parse(request.username)?;
    let password = Password::parse(request.password)?;

    let outcome = scheme
        .login(username, password, ClientAddress::from(addr.ip()))
        .await?;

    Ok(Json(outcome.into()))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Authenticated(TokenResponse),
    TwoFactorRequired(TwoFactorChallenge),
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        match outcome {
            LoginOutcome::Authenticated(pair) => LoginResponse::Authenticated(pair.into()),
            LoginOutcome::TwoFactorRequired { pending_token } => {
                LoginResponse::TwoFactorRequired(pending_token.into())
            }
        }
    }
}

/// Final credentials. `expires_in` is the access token lifetime in seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            expires_in: pair.access.expires_in().num_seconds(),
            access_token: pair.access.token.into_string(),
            refresh_token: pair.refresh.token.into_string(),
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TwoFactorChallenge {
    pub two_factor_token: String,
    pub expires_in: i64,
}

impl From<IssuedToken> for TwoFactorChallenge {
    fn from(pending: IssuedToken) -> Self {
        Self {
            expires_in: pending.expires_in().num_seconds(),
            two_factor_token: pending.token.into_string(),
        }
    }
}
