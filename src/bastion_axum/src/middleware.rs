//! Bearer-token gate for protected routes.
//!
//! `require_auth` validates the access token, checks it has not been revoked and inserts the
//! resulting [`AuthContext`] into the request extensions. Handlers behind it take
//! `Extension<AuthContext>` instead of reading the token themselves.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use bastion_core::{AuthContext, AuthenticationScheme, Role};

use crate::error::AuthApiError;

pub async fn require_auth<A>(
    State(scheme): State<Arc<A>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthApiError>
where
    A: AuthenticationScheme,
{
    let token = bearer_token(request.headers())
        .ok_or(AuthApiError::MissingToken)?
        .to_owned();

    let context = scheme.authenticate(&token).await?;
    tracing::Span::current().record("user_id", context.principal.id.as_i64());

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Must be layered inside [`require_auth`].
pub async fn require_admin(
    Extension(context): Extension<AuthContext>,
    request: Request,
    next: Next,
) -> Result<Response, AuthApiError> {
    context.require_role(Role::Admin)?;
    Ok(next.run(request).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
