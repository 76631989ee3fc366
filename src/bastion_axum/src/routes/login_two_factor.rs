use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, State},
};
use bastion_core::{AuthenticationScheme, ClientAddress, OneTimeCode};
use serde::Deserialize;

use crate::{error::AuthApiError, routes::login::TokenResponse};

/// Second step of a login: exchange the pending token and a TOTP code for the token pair.
#[tracing::instrument(name = "Login 2FA", skip_all, fields(client = %addr.ip()))]
pub async fn login_two_factor<A>(
    State(scheme): State<Arc<A>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginTwoFactorRequest>,
) -> Result<Json<TokenResponse>, AuthApiError>
where
    A: AuthenticationScheme,
{
    let code = OneTimeCode::parse(request.code)?;

    let pair = scheme
        .complete_two_factor(
            &request.two_factor_token,
            code,
            ClientAddress::from(addr.ip()),
        )
        .await?;

    Ok(Json(pair.into()))
}

#[derive(Debug, Deserialize)]
pub struct LoginTwoFactorRequest {
    pub two_factor_token: String,
    pub code: String,
}
