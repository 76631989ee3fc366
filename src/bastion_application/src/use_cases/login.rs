use bastion_core::{
    AuthError, ClientAddress, Clock, CredentialStore, LoginOutcome, Password, PasswordHasher,
    TokenPolicy, TokenPurpose, TokenService, TotpVerifier, Username,
};

use crate::{
    attempt_tracker::{AttemptKey, AttemptTracker},
    audit::AuditEvent,
    second_factor::SecondFactorVerifier,
    use_cases::issue_pair,
};

/// Login use case - the password step of the login flow
pub struct LoginUseCase<'a, S, H, T, V, C>
where
    S: CredentialStore,
    H: PasswordHasher,
    T: TokenService,
    V: TotpVerifier,
    C: Clock,
{
    credentials: &'a S,
    hasher: &'a H,
    tokens: &'a T,
    totp: &'a V,
    attempts: &'a AttemptTracker<C>,
    policy: &'a TokenPolicy,
}

impl<'a, S, H, T, V, C> LoginUseCase<'a, S, H, T, V, C>
where
    S: CredentialStore,
    H: PasswordHasher,
    T: TokenService,
    V: TotpVerifier,
    C: Clock,
{
    pub fn new(
        credentials: &'a S,
        hasher: &'a H,
        tokens: &'a T,
        totp: &'a V,
        attempts: &'a AttemptTracker<C>,
        policy: &'a TokenPolicy,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
            totp,
            attempts,
            policy,
        }
    }

    /// Execute the login use case
    ///
    /// Lockout is checked before the credential store is touched. "No such user" and "wrong
    /// password" fail the same way and both count against the username and the client address.
    /// With the second factor active the attempt counters are left alone and a pending token is
    /// returned instead of final credentials.
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        username: Username,
        password: Password,
        client: ClientAddress,
    ) -> Result<LoginOutcome, AuthError> {
        let keys = AttemptKey::for_login(&username, &client);

        if self.attempts.any_locked_out(&keys) {
            AuditEvent::LoginLockedOut.emit(None, Some(&client), username.as_str());
            return Err(AuthError::LockedOut);
        }

        let Some(record) = self.credentials.lookup(&username).await? else {
            self.attempts.record_failures(&keys);
            AuditEvent::LoginFailure.emit(None, Some(&client), "unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(&password, &record.password_hash).await? {
            self.attempts.record_failures(&keys);
            AuditEvent::LoginFailure.emit(
                Some(record.principal.id),
                Some(&client),
                "wrong password",
            );
            return Err(AuthError::InvalidCredentials);
        }

        if record.two_factor.is_active() {
            let verifier = SecondFactorVerifier::new(
                self.tokens,
                self.totp,
                self.policy.ttl(TokenPurpose::PendingTwoFactor),
            );
            let pending_token = verifier.issue_pending_token(&record.principal)?;
            tracing::info!(user_id = %record.principal.id, "Second factor required");
            return Ok(LoginOutcome::TwoFactorRequired { pending_token });
        }

        self.attempts.reset_all(&keys);
        let pair = issue_pair(self.tokens, &record.principal, self.policy)?;
        AuditEvent::LoginSuccess.emit(Some(record.principal.id), Some(&client), "");

        Ok(LoginOutcome::Authenticated(pair))
    }
}
