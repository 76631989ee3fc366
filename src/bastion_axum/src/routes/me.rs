use axum::{Extension, Json};
use bastion_core::{AuthContext, Role, TokenId};
use serde::{Deserialize, Serialize};

/// Echoes the request context built by the bearer middleware.
pub async fn me(Extension(context): Extension<AuthContext>) -> Json<MeResponse> {
    Json(context.into())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub token_id: TokenId,
    /// Unix seconds.
    pub expires_at: i64,
}

impl From<AuthContext> for MeResponse {
    fn from(context: AuthContext) -> Self {
        Self {
            id: context.principal.id.as_i64(),
            username: context.principal.username.into(),
            role: context.principal.role,
            token_id: context.token_id,
            expires_at: context.expires_at.timestamp(),
        }
    }
}
