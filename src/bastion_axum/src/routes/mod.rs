//! Axum route handlers.
//!
//! Handlers parse the request body into domain types, call the authentication scheme held in
//! router state, and turn the outcome into JSON. Every rejection is an [`AuthApiError`].
//!
//! [`AuthApiError`]: crate::error::AuthApiError

pub mod login;
pub mod login_two_factor;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod sweep;
pub mod two_factor;

pub use login::{LoginRequest, LoginResponse, TokenResponse, TwoFactorChallenge, login};
pub use login_two_factor::{LoginTwoFactorRequest, login_two_factor};
pub use logout::logout;
pub use me::{MeResponse, me};
pub use refresh::{RefreshRequest, refresh};
pub use sweep::{SweepResponse, sweep_revocations};
pub use two_factor::{
    DisableTwoFactorRequest, EnableTwoFactorRequest, TwoFactorSetupResponse, disable_two_factor,
    enable_two_factor, setup_two_factor,
};
