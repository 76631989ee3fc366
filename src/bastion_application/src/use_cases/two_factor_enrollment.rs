use bastion_core::{
    AuthContext, AuthError, ClientAddress, Clock, CredentialRecord, CredentialStore, OneTimeCode,
    Password, PasswordHasher, TotpVerifier, TwoFactorSetup, TwoFactorState,
};

use crate::{
    attempt_tracker::{AttemptKey, AttemptTracker},
    audit::AuditEvent,
};

/// Two-factor enrollment: setup, enable with a valid code, disable with the password.
///
/// State is written back through the credential store; the core never keeps it.
pub struct TwoFactorEnrollmentUseCase<'a, S, H, V, C>
where
    S: CredentialStore,
    H: PasswordHasher,
    V: TotpVerifier,
    C: Clock,
{
    credentials: &'a S,
    hasher: &'a H,
    totp: &'a V,
    attempts: &'a AttemptTracker<C>,
    clock: &'a C,
}

impl<'a, S, H, V, C> TwoFactorEnrollmentUseCase<'a, S, H, V, C>
where
    S: CredentialStore,
    H: PasswordHasher,
    V: TotpVerifier,
    C: Clock,
{
    pub fn new(
        credentials: &'a S,
        hasher: &'a H,
        totp: &'a V,
        attempts: &'a AttemptTracker<C>,
        clock: &'a C,
    ) -> Self {
        Self {
            credentials,
            hasher,
            totp,
            attempts,
            clock,
        }
    }

    async fn record_for(&self, context: &AuthContext) -> Result<CredentialRecord, AuthError> {
        self.credentials
            .lookup(&context.principal.username)
            .await?
            .filter(|record| record.principal.id == context.principal.id)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Generate a fresh secret and store it not-yet-enabled. Calling it again replaces a
    /// pending secret.
    #[tracing::instrument(name = "TwoFactorEnrollmentUseCase::begin", skip_all, fields(user_id = %context.principal.id))]
    pub async fn begin(&self, context: &AuthContext) -> Result<TwoFactorSetup, AuthError> {
        let record = self.record_for(context).await?;
        if record.two_factor.is_active() {
            return Err(AuthError::TwoFactorAlreadyEnabled);
        }

        let secret = self.totp.generate_secret();
        let provisioning_uri = self
            .totp
            .provisioning_uri(&context.principal.username, &secret);
        self.credentials
            .set_two_factor(context.principal.id, TwoFactorState::pending(secret.clone()))
            .await?;

        Ok(TwoFactorSetup {
            secret,
            provisioning_uri,
        })
    }

    #[tracing::instrument(name = "TwoFactorEnrollmentUseCase::confirm", skip_all, fields(user_id = %context.principal.id))]
    pub async fn confirm(
        &self,
        context: &AuthContext,
        code: OneTimeCode,
        client: ClientAddress,
    ) -> Result<(), AuthError> {
        let keys = AttemptKey::for_login(&context.principal.username, &client);
        if self.attempts.any_locked_out(&keys) {
            return Err(AuthError::LockedOut);
        }

        let record = self.record_for(context).await?;
        if record.two_factor.is_active() {
            return Err(AuthError::TwoFactorAlreadyEnabled);
        }
        let secret = record
            .two_factor
            .pending_secret()
            .ok_or(AuthError::TwoFactorNotEnrolled)?;

        if !self.totp.verify(secret, &code, self.clock.now()) {
            self.attempts.record_failures(&keys);
            AuditEvent::TwoFactorFailure.emit(
                Some(context.principal.id),
                Some(&client),
                "enrollment code",
            );
            return Err(AuthError::InvalidCredentials);
        }

        self.credentials
            .set_two_factor(context.principal.id, TwoFactorState::enabled(secret.clone()))
            .await?;
        self.attempts.reset_all(&keys);
        AuditEvent::TwoFactorEnabled.emit(Some(context.principal.id), Some(&client), "");
        Ok(())
    }

    /// Disabling needs the password and is lockout-gated like a login.
    #[tracing::instrument(name = "TwoFactorEnrollmentUseCase::disable", skip_all, fields(user_id = %context.principal.id))]
    pub async fn disable(
        &self,
        context: &AuthContext,
        password: Password,
        client: ClientAddress,
    ) -> Result<(), AuthError> {
        let keys = AttemptKey::for_login(&context.principal.username, &client);
        if self.attempts.any_locked_out(&keys) {
            return Err(AuthError::LockedOut);
        }

        let record = self.record_for(context).await?;
        if !record.two_factor.is_active() {
            return Err(AuthError::TwoFactorNotEnrolled);
        }

        if !self.hasher.verify(&password, &record.password_hash).await? {
            self.attempts.record_failures(&keys);
            AuditEvent::LoginFailure.emit(
                Some(context.principal.id),
                Some(&client),
                "wrong password on 2fa disable",
            );
            return Err(AuthError::InvalidCredentials);
        }

        self.credentials
            .set_two_factor(context.principal.id, TwoFactorState::disabled())
            .await?;
        self.attempts.reset_all(&keys);
        AuditEvent::TwoFactorDisabled.emit(Some(context.principal.id), Some(&client), "");
        Ok(())
    }
}
