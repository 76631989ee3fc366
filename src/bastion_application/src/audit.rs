use bastion_core::{ClientAddress, UserId};

/// Security-relevant events written to the `audit` tracing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    LoginSuccess,
    LoginFailure,
    LoginLockedOut,
    TwoFactorSuccess,
    TwoFactorFailure,
    TokenRefreshSuccess,
    TokenRefreshFailure,
    LogoutSuccess,
    TwoFactorEnabled,
    TwoFactorDisabled,
}

impl AuditEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEvent::LoginSuccess => "LOGIN_SUCCESS",
            AuditEvent::LoginFailure => "LOGIN_FAILURE",
            AuditEvent::LoginLockedOut => "LOGIN_LOCKED_OUT",
            AuditEvent::TwoFactorSuccess => "2FA_SUCCESS",
            AuditEvent::TwoFactorFailure => "2FA_FAILURE",
            AuditEvent::TokenRefreshSuccess => "TOKEN_REFRESH_SUCCESS",
            AuditEvent::TokenRefreshFailure => "TOKEN_REFRESH_FAILURE",
            AuditEvent::LogoutSuccess => "LOGOUT_SUCCESS",
            AuditEvent::TwoFactorEnabled => "2FA_ENABLED",
            AuditEvent::TwoFactorDisabled => "2FA_DISABLED",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AuditEvent::LoginFailure
                | AuditEvent::LoginLockedOut
                | AuditEvent::TwoFactorFailure
                | AuditEvent::TokenRefreshFailure
        )
    }

    pub fn emit(self, user_id: Option<UserId>, client: Option<&ClientAddress>, details: &str) {
        let user_id = user_id.map(|id| id.as_i64());
        let client = client.map(ClientAddress::as_str);
        if self.is_failure() {
            tracing::warn!(target: "audit", event = self.as_str(), user_id, client, details);
        } else {
            tracing::info!(target: "audit", event = self.as_str(), user_id, client, details);
        }
    }
}
