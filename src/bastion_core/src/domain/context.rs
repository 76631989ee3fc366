use chrono::{DateTime, Utc};

use crate::{
    domain::{
        principal::{Principal, Role},
        token::{TokenClaims, TokenId},
    },
    error::AuthError,
};

/// Identity attached to an authenticated request.
///
/// Built from a validated, unrevoked access token and handed to downstream handlers
/// explicitly instead of through untyped request-scoped lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub principal: Principal,
    pub token_id: TokenId,
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.principal.role == role {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

impl From<TokenClaims> for AuthContext {
    fn from(claims: TokenClaims) -> Self {
        Self {
            principal: claims.principal(),
            token_id: claims.token_id,
            expires_at: claims.expires_at,
        }
    }
}
