pub mod client;
pub mod context;
pub mod error;
pub mod lockout;
pub mod password;
pub mod principal;
pub mod revocation;
pub mod token;
pub mod two_factor;
pub mod username;
