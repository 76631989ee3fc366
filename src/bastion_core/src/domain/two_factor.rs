use secrecy::{ExposeSecret, Secret};

use crate::domain::error::ValidationError;

/// Base32-encoded TOTP shared secret.
#[derive(Debug, Clone)]
pub struct TotpSecret(Secret<String>);

impl TotpSecret {
    pub fn new(encoded: Secret<String>) -> Self {
        Self(encoded)
    }
}

impl AsRef<Secret<String>> for TotpSecret {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Six-digit code typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    pub fn parse(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code))
        } else {
            Err(ValidationError::InvalidOneTimeCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Second-factor state owned by the credential store.
#[derive(Debug, Clone, Default)]
pub struct TwoFactorState {
    pub secret: Option<TotpSecret>,
    pub enabled: bool,
}

impl TwoFactorState {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Secret stored but not yet confirmed with a valid code.
    pub fn pending(secret: TotpSecret) -> Self {
        Self {
            secret: Some(secret),
            enabled: false,
        }
    }

    pub fn enabled(secret: TotpSecret) -> Self {
        Self {
            secret: Some(secret),
            enabled: true,
        }
    }

    /// The secret to verify against, if the second factor is actually in force.
    pub fn active_secret(&self) -> Option<&TotpSecret> {
        if self.enabled {
            self.secret.as_ref()
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_secret().is_some()
    }

    pub fn pending_secret(&self) -> Option<&TotpSecret> {
        if self.enabled {
            None
        } else {
            self.secret.as_ref()
        }
    }
}

/// Material returned when enrollment starts.
#[derive(Debug, Clone)]
pub struct TwoFactorSetup {
    pub secret: TotpSecret,
    pub provisioning_uri: String,
}

impl TwoFactorSetup {
    pub fn secret_base32(&self) -> &str {
        self.secret.as_ref().expose_secret()
    }
}
