use std::sync::Arc;

use axum::{Json, extract::State};
use bastion_core::AuthenticationScheme;
use serde::Deserialize;

use crate::{error::AuthApiError, routes::login::TokenResponse};

#[tracing::instrument(name = "Refresh", skip_all)]
pub async fn refresh<A>(
    State(scheme): State<Arc<A>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AuthApiError>
where
    A: AuthenticationScheme,
{
    let pair = scheme.refresh(&request.refresh_token).await?;

    Ok(Json(pair.into()))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
