pub mod attempt_tracker;
pub mod audit;
pub mod authenticator;
pub mod second_factor;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use attempt_tracker::{AttemptKey, AttemptRecord, AttemptTracker};
pub use audit::AuditEvent;
pub use authenticator::{AuthPolicy, AuthPorts, Authenticator};
pub use second_factor::SecondFactorVerifier;
pub use use_cases::{
    authenticate::AuthenticateUseCase,
    complete_two_factor::CompleteTwoFactorUseCase,
    login::LoginUseCase,
    logout::LogoutUseCase,
    refresh::RefreshUseCase,
    sweep_revocations::SweepRevocationsUseCase,
    two_factor_enrollment::TwoFactorEnrollmentUseCase,
};
