use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    error::{ConfigurationError, TokenError},
    principal::{Principal, Role, UserId},
    username::Username,
};

/// Unique, unguessable token identifier (the JWT `jti`). Used as the revocation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(Uuid);

impl TokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(id: &str) -> Result<Self, TokenError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| TokenError::Invalid(format!("malformed token id: {e}")))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Security domain a token is scoped to. Purposes are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenPurpose {
    #[serde(rename = "access")]
    Access,
    #[serde(rename = "refresh")]
    Refresh,
    #[serde(rename = "pending-2fa")]
    PendingTwoFactor,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::Refresh => "refresh",
            TokenPurpose::PendingTwoFactor => "pending-2fa",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenPurpose {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenPurpose::Access),
            "refresh" => Ok(TokenPurpose::Refresh),
            "pending-2fa" => Ok(TokenPurpose::PendingTwoFactor),
            other => Err(TokenError::Invalid(format!("unknown purpose {other}"))),
        }
    }
}

/// Verified contents of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject_id: UserId,
    pub username: Username,
    pub role: Role,
    pub token_id: TokenId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub issuer: String,
    pub purpose: TokenPurpose,
}

impl TokenClaims {
    pub fn principal(&self) -> Principal {
        Principal::new(self.subject_id, self.username.clone(), self.role)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Encoded bearer token as handed to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SignedToken {
    fn from(s: String) -> Self {
        SignedToken(s)
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: SignedToken,
    pub claims: TokenClaims,
}

impl IssuedToken {
    pub fn expires_in(&self) -> Duration {
        self.claims.expires_at - self.claims.issued_at
    }
}

/// Access and refresh tokens for one subject, each with its own token id.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Longest lifetime any token purpose may be configured with.
fn max_token_ttl() -> Duration {
    Duration::days(365)
}

/// Lifetimes of the three token purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    access_ttl: Duration,
    refresh_ttl: Duration,
    pending_two_factor_ttl: Duration,
}

impl TokenPolicy {
    pub fn new(
        access_ttl: Duration,
        refresh_ttl: Duration,
        pending_two_factor_ttl: Duration,
    ) -> Result<Self, ConfigurationError> {
        for (purpose, ttl) in [
            (TokenPurpose::Access, access_ttl),
            (TokenPurpose::Refresh, refresh_ttl),
            (TokenPurpose::PendingTwoFactor, pending_two_factor_ttl),
        ] {
            if ttl <= Duration::zero() {
                return Err(ConfigurationError::NonPositiveTtl(purpose));
            }
            if ttl > max_token_ttl() {
                return Err(ConfigurationError::TtlTooLong(purpose));
            }
        }

        Ok(Self {
            access_ttl,
            refresh_ttl,
            pending_two_factor_ttl,
        })
    }

    pub fn ttl(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Access => self.access_ttl,
            TokenPurpose::Refresh => self.refresh_ttl,
            TokenPurpose::PendingTwoFactor => self.pending_two_factor_ttl,
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            pending_two_factor_ttl: Duration::minutes(5),
        }
    }
}
