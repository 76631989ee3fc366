use async_trait::async_trait;
use bastion_adapters::{
    HashMapCredentialStore, HashMapRevocationStore, JwtTokenService, ManualClock, TotpRsVerifier,
};
use bastion_core::{
    CredentialRecord, Password, PasswordHash, PasswordHasher, PasswordHasherError, Principal,
    Role, TokenPolicy, TotpSecret, TotpVerifier, TwoFactorState, UserId, Username,
    ClientAddress,
};
use chrono::{TimeZone, Utc};
use secrecy::{ExposeSecret, Secret};

use crate::{
    attempt_tracker::AttemptTracker,
    authenticator::{AuthPolicy, AuthPorts, Authenticator},
    use_cases::{
        complete_two_factor::CompleteTwoFactorUseCase, login::LoginUseCase,
        refresh::RefreshUseCase, two_factor_enrollment::TwoFactorEnrollmentUseCase,
    },
};

/// Stores the password as-is so tests skip the cost of Argon2.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(password.as_ref().clone()))
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(password.as_ref().expose_secret() == hash.as_ref().expose_secret())
    }
}

pub type TestAuthenticator = Authenticator<
    HashMapCredentialStore,
    HashMapRevocationStore,
    PlainTextHasher,
    JwtTokenService<ManualClock>,
    TotpRsVerifier,
    ManualClock,
>;

pub struct TestHarness {
    pub clock: ManualClock,
    pub tokens: JwtTokenService<ManualClock>,
    pub totp: TotpRsVerifier,
    pub credentials: HashMapCredentialStore,
    pub revocations: HashMapRevocationStore,
    pub hasher: PlainTextHasher,
    pub attempts: AttemptTracker<ManualClock>,
    pub policy: TokenPolicy,
}

impl TestHarness {
    pub fn new() -> Self {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let tokens = JwtTokenService::new(
            Secret::from("test-signing-key-with-at-least-32-bytes".to_string()),
            "bastion",
            clock.clone(),
        )
        .unwrap();

        Self {
            attempts: AttemptTracker::new(Default::default(), clock.clone()),
            tokens,
            totp: TotpRsVerifier::new("bastion"),
            credentials: HashMapCredentialStore::default(),
            revocations: HashMapRevocationStore::default(),
            hasher: PlainTextHasher,
            policy: TokenPolicy::default(),
            clock,
        }
    }

    pub async fn add_user(&self, id: i64, name: &str, plain: &str) -> Principal {
        self.insert(id, name, plain, TwoFactorState::disabled())
            .await
    }

    pub async fn add_user_with_two_factor(
        &self,
        id: i64,
        name: &str,
        plain: &str,
    ) -> (Principal, TotpSecret) {
        let secret = self.totp.generate_secret();
        let principal = self
            .insert(id, name, plain, TwoFactorState::enabled(secret.clone()))
            .await;
        (principal, secret)
    }

    async fn insert(
        &self,
        id: i64,
        name: &str,
        plain: &str,
        two_factor: TwoFactorState,
    ) -> Principal {
        let principal = principal(id, name);
        let password_hash = self.hasher.hash(&password(plain)).await.unwrap();
        self.credentials
            .add_user(CredentialRecord {
                principal: principal.clone(),
                password_hash,
                two_factor,
            })
            .await
            .unwrap();
        principal
    }

    pub fn authenticator(&self) -> TestAuthenticator {
        Authenticator::new(
            AuthPorts {
                credentials: self.credentials.clone(),
                revocations: self.revocations.clone(),
                hasher: self.hasher,
                tokens: self.tokens.clone(),
                totp: self.totp.clone(),
                clock: self.clock.clone(),
            },
            AuthPolicy::default(),
        )
    }

    pub fn login_use_case(
        &self,
    ) -> LoginUseCase<
        '_,
        HashMapCredentialStore,
        PlainTextHasher,
        JwtTokenService<ManualClock>,
        TotpRsVerifier,
        ManualClock,
    > {
        LoginUseCase::new(
            &self.credentials,
            &self.hasher,
            &self.tokens,
            &self.totp,
            &self.attempts,
            &self.policy,
        )
    }

    pub fn complete_two_factor_use_case(
        &self,
    ) -> CompleteTwoFactorUseCase<
        '_,
        HashMapCredentialStore,
        HashMapRevocationStore,
        JwtTokenService<ManualClock>,
        TotpRsVerifier,
        ManualClock,
    > {
        CompleteTwoFactorUseCase::new(
            &self.credentials,
            &self.revocations,
            &self.tokens,
            &self.totp,
            &self.attempts,
            &self.clock,
            &self.policy,
        )
    }

    pub fn refresh_use_case(
        &self,
    ) -> RefreshUseCase<'_, HashMapRevocationStore, JwtTokenService<ManualClock>> {
        RefreshUseCase::new(&self.revocations, &self.tokens, &self.policy)
    }

    pub fn enrollment_use_case(
        &self,
    ) -> TwoFactorEnrollmentUseCase<
        '_,
        HashMapCredentialStore,
        PlainTextHasher,
        TotpRsVerifier,
        ManualClock,
    > {
        TwoFactorEnrollmentUseCase::new(
            &self.credentials,
            &self.hasher,
            &self.totp,
            &self.attempts,
            &self.clock,
        )
    }
}

pub fn principal(id: i64, name: &str) -> Principal {
    Principal::new(UserId::new(id), username(name), Role::User)
}

pub fn username(name: &str) -> Username {
    Username::parse(name).unwrap()
}

pub fn password(plain: &str) -> Password {
    Password::parse(Secret::from(plain.to_string())).unwrap()
}

pub fn client() -> ClientAddress {
    ClientAddress::new("203.0.113.7")
}
