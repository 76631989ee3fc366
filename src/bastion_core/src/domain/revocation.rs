use chrono::{DateTime, Utc};

use crate::domain::token::{TokenClaims, TokenId};

/// A revoked token id, kept until the token would have expired anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationEntry {
    pub token_id: TokenId,
    pub expires_at: DateTime<Utc>,
}

impl RevocationEntry {
    pub fn new(token_id: TokenId, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_id,
            expires_at,
        }
    }

    /// Eligible for garbage collection.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl From<&TokenClaims> for RevocationEntry {
    fn from(claims: &TokenClaims) -> Self {
        Self::new(claims.token_id.clone(), claims.expires_at)
    }
}
