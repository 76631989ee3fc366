use async_trait::async_trait;
use bastion_core::{
    AuthContext, AuthError, AuthenticationScheme, ClientAddress, Clock, CredentialStore,
    LockoutPolicy, LoginOutcome, OneTimeCode, Password, PasswordHasher, RevocationStore,
    SupportsRevocationSweep, SupportsTwoFactorEnrollment, TokenPair, TokenPolicy, TokenService,
    TotpVerifier, TwoFactorSetup, Username,
};

use crate::{
    attempt_tracker::AttemptTracker,
    use_cases::{
        authenticate::AuthenticateUseCase, complete_two_factor::CompleteTwoFactorUseCase,
        login::LoginUseCase, logout::LogoutUseCase, refresh::RefreshUseCase,
        sweep_revocations::SweepRevocationsUseCase,
        two_factor_enrollment::TwoFactorEnrollmentUseCase,
    },
};

/// Collaborators the orchestrator is built from.
pub struct AuthPorts<S, R, H, T, V, C> {
    pub credentials: S,
    pub revocations: R,
    pub hasher: H,
    pub tokens: T,
    pub totp: V,
    pub clock: C,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthPolicy {
    pub tokens: TokenPolicy,
    pub lockout: LockoutPolicy,
}

/// The authentication orchestrator.
///
/// Owns its collaborators and the attempt tracker; every request borrows them into a short-lived
/// use case. Share it between requests behind an `Arc`.
pub struct Authenticator<S, R, H, T, V, C> {
    credentials: S,
    revocations: R,
    hasher: H,
    tokens: T,
    totp: V,
    clock: C,
    attempts: AttemptTracker<C>,
    policy: TokenPolicy,
}

impl<S, R, H, T, V, C> Authenticator<S, R, H, T, V, C>
where
    S: CredentialStore + 'static,
    R: RevocationStore + 'static,
    H: PasswordHasher + 'static,
    T: TokenService + 'static,
    V: TotpVerifier + 'static,
    C: Clock + Clone,
{
    pub fn new(ports: AuthPorts<S, R, H, T, V, C>, policy: AuthPolicy) -> Self {
        let AuthPorts {
            credentials,
            revocations,
            hasher,
            tokens,
            totp,
            clock,
        } = ports;

        Self {
            attempts: AttemptTracker::new(policy.lockout, clock.clone()),
            credentials,
            revocations,
            hasher,
            tokens,
            totp,
            clock,
            policy: policy.tokens,
        }
    }

    pub fn attempts(&self) -> &AttemptTracker<C> {
        &self.attempts
    }

    pub fn credentials(&self) -> &S {
        &self.credentials
    }

    pub fn revocations(&self) -> &R {
        &self.revocations
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn enrollment(&self) -> TwoFactorEnrollmentUseCase<'_, S, H, V, C> {
        TwoFactorEnrollmentUseCase::new(
            &self.credentials,
            &self.hasher,
            &self.totp,
            &self.attempts,
            &self.clock,
        )
    }
}

#[async_trait]
impl<S, R, H, T, V, C> AuthenticationScheme for Authenticator<S, R, H, T, V, C>
where
    S: CredentialStore + 'static,
    R: RevocationStore + 'static,
    H: PasswordHasher + 'static,
    T: TokenService + 'static,
    V: TotpVerifier + 'static,
    C: Clock + Clone,
{
    async fn login(
        &self,
        username: Username,
        password: Password,
        client: ClientAddress,
    ) -> Result<LoginOutcome, AuthError> {
        LoginUseCase::new(
            &self.credentials,
            &self.hasher,
            &self.tokens,
            &self.totp,
            &self.attempts,
            &self.policy,
        )
        .execute(username, password, client)
        .await
    }

    async fn complete_two_factor(
        &self,
        pending_token: &str,
        code: OneTimeCode,
        client: ClientAddress,
    ) -> Result<TokenPair, AuthError> {
        CompleteTwoFactorUseCase::new(
            &self.credentials,
            &self.revocations,
            &self.tokens,
            &self.totp,
            &self.attempts,
            &self.clock,
            &self.policy,
        )
        .execute(pending_token, code, client)
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        RefreshUseCase::new(&self.revocations, &self.tokens, &self.policy)
            .execute(refresh_token)
            .await
    }

    async fn logout(&self, context: &AuthContext) -> Result<(), AuthError> {
        LogoutUseCase::new(&self.revocations).execute(context).await
    }

    async fn authenticate(&self, bearer: &str) -> Result<AuthContext, AuthError> {
        AuthenticateUseCase::new(&self.revocations, &self.tokens)
            .execute(bearer)
            .await
    }
}

#[async_trait]
impl<S, R, H, T, V, C> SupportsTwoFactorEnrollment for Authenticator<S, R, H, T, V, C>
where
    S: CredentialStore + 'static,
    R: RevocationStore + 'static,
    H: PasswordHasher + 'static,
    T: TokenService + 'static,
    V: TotpVerifier + 'static,
    C: Clock + Clone,
{
    async fn begin_two_factor_setup(
        &self,
        context: &AuthContext,
    ) -> Result<TwoFactorSetup, AuthError> {
        self.enrollment().begin(context).await
    }

    async fn confirm_two_factor(
        &self,
        context: &AuthContext,
        code: OneTimeCode,
        client: ClientAddress,
    ) -> Result<(), AuthError> {
        self.enrollment().confirm(context, code, client).await
    }

    async fn disable_two_factor(
        &self,
        context: &AuthContext,
        password: Password,
        client: ClientAddress,
    ) -> Result<(), AuthError> {
        self.enrollment().disable(context, password, client).await
    }
}

#[async_trait]
impl<S, R, H, T, V, C> SupportsRevocationSweep for Authenticator<S, R, H, T, V, C>
where
    S: CredentialStore + 'static,
    R: RevocationStore + 'static,
    H: PasswordHasher + 'static,
    T: TokenService + 'static,
    V: TotpVerifier + 'static,
    C: Clock + Clone,
{
    async fn sweep_revocations(&self) -> Result<u64, AuthError> {
        SweepRevocationsUseCase::new(&self.revocations, &self.attempts, &self.clock)
            .execute()
            .await
    }
}
