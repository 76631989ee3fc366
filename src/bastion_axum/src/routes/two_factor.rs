use std::{net::SocketAddr, sync::Arc};

use axum::{
    Extension, Json,
    extract::{ConnectInfo, State},
    http::StatusCode,
};
use bastion_core::{
    AuthContext, ClientAddress, OneTimeCode, Password, SupportsTwoFactorEnrollment,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::error::AuthApiError;

#[tracing::instrument(name = "2FA setup", skip_all, fields(user_id = %context.principal.id))]
pub async fn setup_two_factor<A>(
    State(scheme): State<Arc<A>>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<TwoFactorSetupResponse>, AuthApiError>
where
    A: SupportsTwoFactorEnrollment,
{
    let setup = scheme.begin_two_factor_setup(&context).await?;

    Ok(Json(TwoFactorSetupResponse {
        secret: setup.secret_base32().to_string(),
        otpauth_uri: setup.provisioning_uri,
    }))
}

#[tracing::instrument(name = "2FA enable", skip_all, fields(user_id = %context.principal.id))]
pub async fn enable_two_factor<A>(
    State(scheme): State<Arc<A>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<EnableTwoFactorRequest>,
) -> Result<StatusCode, AuthApiError>
where
    A: SupportsTwoFactorEnrollment,
{
    let code = OneTimeCode::parse(request.code)?;

    scheme
        .confirm_two_factor(&context, code, ClientAddress::from(addr.ip()))
        .await?;

    Ok(StatusCode::OK)
}

#[tracing::instrument(name = "2FA disable", skip_all, fields(user_id = %context.principal.id))]
pub async fn disable_two_factor<A>(
    State(scheme): State<Arc<A>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<DisableTwoFactorRequest>,
) -> Result<StatusCode, AuthApiError>
where
    A: SupportsTwoFactorEnrollment,
{
    let password = Password::parse(request.password)?;

    scheme
        .disable_two_factor(&context, password, ClientAddress::from(addr.ip()))
        .await?;

    Ok(StatusCode::OK)
}

/// The secret is shown once, at setup. It is never returned again.
#[derive(Debug, Serialize, Deserialize)]
pub struct TwoFactorSetupResponse {
    pub secret: String,
    pub otpauth_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct EnableTwoFactorRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct DisableTwoFactorRequest {
    pub password: Secret<String>,
}
