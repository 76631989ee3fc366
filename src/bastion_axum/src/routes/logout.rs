use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode};
use bastion_core::{AuthContext, AuthenticationScheme};

use crate::error::AuthApiError;

/// Revokes the access token the request was authenticated with.
#[tracing::instrument(name = "Logout", skip_all, fields(user_id = %context.principal.id))]
pub async fn logout<A>(
    State(scheme): State<Arc<A>>,
    Extension(context): Extension<AuthContext>,
) -> Result<StatusCode, AuthApiError>
where
    A: AuthenticationScheme,
{
    scheme.logout(&context).await?;

    Ok(StatusCode::OK)
}
