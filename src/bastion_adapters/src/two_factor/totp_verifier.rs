use bastion_core::{OneTimeCode, TotpSecret, TotpVerifier, Username};
use chrono::{DateTime, Utc};
use data_encoding::BASE32_NOPAD;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;
use totp_rs::{Algorithm, TOTP};

const DIGITS: usize = 6;
const SKEW: u8 = 1;
const STEP_SECONDS: u64 = 30;
const SECRET_BYTES: usize = 20;

#[derive(Debug, Error)]
pub enum TotpVerifierError {
    #[error("Invalid TOTP secret: {0}")]
    InvalidSecret(String),
    #[error("Time before the Unix epoch")]
    TimeOutOfRange,
}

/// RFC 6238 codes: SHA1, six digits, 30 second step, one step of drift either way.
#[derive(Debug, Clone)]
pub struct TotpRsVerifier {
    issuer: String,
}

impl TotpRsVerifier {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }

    fn totp(&self, secret: &TotpSecret) -> Result<TOTP, TotpVerifierError> {
        let bytes = BASE32_NOPAD
            .decode(secret.as_ref().expose_secret().as_bytes())
            .map_err(|e| TotpVerifierError::InvalidSecret(e.to_string()))?;

        TOTP::new(Algorithm::SHA1, DIGITS, SKEW, STEP_SECONDS, bytes)
            .map_err(|e| TotpVerifierError::InvalidSecret(e.to_string()))
    }

    /// The code an authenticator app would show at `at`.
    pub fn code_at(
        &self,
        secret: &TotpSecret,
        at: DateTime<Utc>,
    ) -> Result<OneTimeCode, TotpVerifierError> {
        let time = u64::try_from(at.timestamp()).map_err(|_| TotpVerifierError::TimeOutOfRange)?;
        let code = self.totp(secret)?.generate(time);
        OneTimeCode::parse(code).map_err(|e| TotpVerifierError::InvalidSecret(e.to_string()))
    }
}

impl TotpVerifier for TotpRsVerifier {
    fn verify(&self, secret: &TotpSecret, code: &OneTimeCode, at: DateTime<Utc>) -> bool {
        let Ok(time) = u64::try_from(at.timestamp()) else {
            return false;
        };
        match self.totp(secret) {
            Ok(totp) => totp.check(code.as_str(), time),
            Err(e) => {
                tracing::warn!(error = %e, "Stored TOTP secret is unusable");
                false
            }
        }
    }

    fn generate_secret(&self) -> TotpSecret {
        let bytes: [u8; SECRET_BYTES] = rand::random();
        TotpSecret::new(Secret::from(BASE32_NOPAD.encode(&bytes)))
    }

    fn provisioning_uri(&self, account: &Username, secret: &TotpSecret) -> String {
        format!(
            "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm=SHA1&digits={DIGITS}&period={STEP_SECONDS}",
            issuer = urlencoding::encode(&self.issuer),
            account = urlencoding::encode(account.as_str()),
            secret = secret.as_ref().expose_secret(),
        )
    }
}
