use bastion_core::{
    AuthError, ClientAddress, Clock, CredentialStore, OneTimeCode, RevocationEntry,
    RevocationStore, TokenPair, TokenPolicy, TokenPurpose, TokenService, TotpVerifier,
};

use crate::{
    attempt_tracker::{AttemptKey, AttemptTracker},
    audit::AuditEvent,
    second_factor::SecondFactorVerifier,
    use_cases::issue_pair,
};

/// Completes a login that stopped at the second factor.
pub struct CompleteTwoFactorUseCase<'a, S, R, T, V, C>
where
    S: CredentialStore,
    R: RevocationStore,
    T: TokenService,
    V: TotpVerifier,
    C: Clock,
{
    credentials: &'a S,
    revocations: &'a R,
    tokens: &'a T,
    totp: &'a V,
    attempts: &'a AttemptTracker<C>,
    clock: &'a C,
    policy: &'a TokenPolicy,
}

impl<'a, S, R, T, V, C> CompleteTwoFactorUseCase<'a, S, R, T, V, C>
where
    S: CredentialStore,
    R: RevocationStore,
    T: TokenService,
    V: TotpVerifier,
    C: Clock,
{
    pub fn new(
        credentials: &'a S,
        revocations: &'a R,
        tokens: &'a T,
        totp: &'a V,
        attempts: &'a AttemptTracker<C>,
        clock: &'a C,
        policy: &'a TokenPolicy,
    ) -> Self {
        Self {
            credentials,
            revocations,
            tokens,
            totp,
            attempts,
            clock,
            policy,
        }
    }

    /// Execute the second-factor step
    ///
    /// The pending token is purpose-checked and single-use. The code is an attempt surface of
    /// its own, so lockout is re-checked and a wrong code counts as a failure for both keys.
    #[tracing::instrument(name = "CompleteTwoFactorUseCase::execute", skip_all, fields(client = %client))]
    pub async fn execute(
        &self,
        pending_token: &str,
        code: OneTimeCode,
        client: ClientAddress,
    ) -> Result<TokenPair, AuthError> {
        let verifier = SecondFactorVerifier::new(
            self.tokens,
            self.totp,
            self.policy.ttl(TokenPurpose::PendingTwoFactor),
        );
        let claims = verifier.validate_pending_token(pending_token)?;

        if self.revocations.is_revoked(&claims.token_id).await? {
            AuditEvent::TwoFactorFailure.emit(
                Some(claims.subject_id),
                Some(&client),
                "pending token replayed",
            );
            return Err(AuthError::TokenReused);
        }

        let keys = AttemptKey::for_login(&claims.username, &client);
        if self.attempts.any_locked_out(&keys) {
            AuditEvent::LoginLockedOut.emit(Some(claims.subject_id), Some(&client), "2fa step");
            return Err(AuthError::LockedOut);
        }

        let record = self
            .credentials
            .lookup(&claims.username)
            .await?
            .filter(|record| record.principal.id == claims.subject_id)
            .ok_or(AuthError::InvalidToken)?;
        // Second factor switched off since the password step.
        let secret = record
            .two_factor
            .active_secret()
            .ok_or(AuthError::InvalidToken)?;

        if !verifier.verify_code(secret, &code, self.clock.now()) {
            self.attempts.record_failures(&keys);
            AuditEvent::TwoFactorFailure.emit(Some(claims.subject_id), Some(&client), "wrong code");
            return Err(AuthError::InvalidCredentials);
        }

        if !self.revocations.revoke(RevocationEntry::from(&claims)).await? {
            AuditEvent::TwoFactorFailure.emit(
                Some(claims.subject_id),
                Some(&client),
                "pending token replayed",
            );
            return Err(AuthError::TokenReused);
        }

        self.attempts.reset_all(&keys);
        let pair = issue_pair(self.tokens, &record.principal, self.policy)?;
        AuditEvent::TwoFactorSuccess.emit(Some(claims.subject_id), Some(&client), "");

        Ok(pair)
    }
}
