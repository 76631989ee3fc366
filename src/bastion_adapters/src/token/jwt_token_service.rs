use bastion_core::{
    Clock, ConfigurationError, IssuedToken, Principal, Role, SignedToken, TokenClaims, TokenError,
    TokenId, TokenPurpose, TokenService, UserId, Username,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::config::constants::MIN_SIGNING_KEY_BYTES;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// HS256 token service. Expiry is judged by the injected clock, not the system time.
#[derive(Clone)]
pub struct JwtTokenService<C> {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    clock: C,
}

impl<C: Clock> JwtTokenService<C> {
    /// Refuses to build with a missing or short key rather than sign with it.
    pub fn new(
        secret: Secret<String>,
        issuer: impl Into<String>,
        clock: C,
    ) -> Result<Self, ConfigurationError> {
        let key = secret.expose_secret().as_bytes();
        if key.is_empty() {
            return Err(ConfigurationError::MissingSigningKey);
        }
        if key.len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigurationError::WeakSigningKey {
                min: MIN_SIGNING_KEY_BYTES,
                actual: key.len(),
            });
        }

        let issuer = issuer.into();
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub", "jti"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            issuer,
            clock,
        })
    }
}

impl<C: Clock> TokenService for JwtTokenService<C> {
    #[tracing::instrument(name = "JwtTokenService::issue", skip_all, fields(user_id = %principal.id, purpose = %purpose))]
    fn issue(
        &self,
        principal: &Principal,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::Signing(format!("non-positive ttl for {purpose}")));
        }

        // Whole seconds, so the returned claims equal what validation later decodes.
        let issued_at = DateTime::<Utc>::from_timestamp(self.clock.now().timestamp(), 0)
            .ok_or_else(|| TokenError::Signing("clock out of range".to_string()))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let claims = TokenClaims {
            subject_id: principal.id,
            username: principal.username.clone(),
            role: principal.role,
            token_id: TokenId::new(),
            issued_at,
            expires_at,
            issuer: self.issuer.clone(),
            purpose,
        };

        let token = encode(
            &Header::new(ALGORITHM),
            &WireClaims::from(&claims),
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token: SignedToken::new(token),
            claims,
        })
    }

    fn validate(&self, token: &str, expected: TokenPurpose) -> Result<TokenClaims, TokenError> {
        let wire = decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        let claims = TokenClaims::try_from(wire)?;

        if claims.expires_at <= claims.issued_at {
            return Err(TokenError::Invalid("expiry precedes issue time".to_string()));
        }
        if claims.is_expired(self.clock.now()) {
            return Err(TokenError::Invalid("token expired".to_string()));
        }
        if claims.purpose != expected {
            return Err(TokenError::WrongPurpose {
                expected,
                actual: claims.purpose,
            });
        }

        Ok(claims)
    }
}

/// Claim set as it appears inside the JWT.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    user_id: i64,
    username: String,
    role: Role,
    jti: String,
    iat: i64,
    exp: i64,
    iss: String,
    purpose: TokenPurpose,
}

impl From<&TokenClaims> for WireClaims {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            sub: claims.subject_id.to_string(),
            user_id: claims.subject_id.as_i64(),
            username: claims.username.as_str().to_string(),
            role: claims.role,
            jti: claims.token_id.to_string(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            iss: claims.issuer.clone(),
            purpose: claims.purpose,
        }
    }
}

impl TryFrom<WireClaims> for TokenClaims {
    type Error = TokenError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        if wire.sub != wire.user_id.to_string() {
            return Err(TokenError::Invalid("subject mismatch".to_string()));
        }
        let timestamp = |seconds: i64| {
            DateTime::<Utc>::from_timestamp(seconds, 0)
                .ok_or_else(|| TokenError::Invalid("timestamp out of range".to_string()))
        };

        Ok(TokenClaims {
            subject_id: UserId::new(wire.user_id),
            username: Username::parse(wire.username)
                .map_err(|e| TokenError::Invalid(e.to_string()))?,
            role: wire.role,
            token_id: TokenId::parse(&wire.jti)?,
            issued_at: timestamp(wire.iat)?,
            expires_at: timestamp(wire.exp)?,
            issuer: wire.iss,
            purpose: wire.purpose,
        })
    }
}
