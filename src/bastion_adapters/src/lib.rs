pub mod clock;
pub mod config;
pub mod password;
pub mod persistence;
pub mod token;
pub mod two_factor;

pub use clock::{ManualClock, SystemClock};
pub use config::settings::Settings;
pub use password::argon2_password_hasher::Argon2PasswordHasher;
pub use persistence::{
    hashmap_credential_store::HashMapCredentialStore,
    hashmap_revocation_store::HashMapRevocationStore,
    postgres_credential_store::PostgresCredentialStore,
    postgres_revocation_store::PostgresRevocationStore,
    redis_revocation_store::RedisRevocationStore,
};
pub use token::jwt_token_service::JwtTokenService;
pub use two_factor::totp_verifier::{TotpRsVerifier, TotpVerifierError};
