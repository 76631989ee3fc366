//! # Bastion - Authentication Core Library
//!
//! This is a facade crate that re-exports all public APIs from the bastion components.
//! Use this crate to get access to all authentication functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! bastion = { path = "../bastion" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Username`, `Password`, `Principal`, `TokenClaims`, etc.
//! - **Ports**: `CredentialStore`, `RevocationStore`, `TokenService`, `TotpVerifier`, ...
//! - **Application**: `Authenticator`, `AttemptTracker`, and the use cases behind it
//! - **Adapters**: `JwtTokenService`, `TotpRsVerifier`, PostgreSQL / Redis / in-memory stores
//! - **Service**: `AuthService` - The main entry point for serving the routes

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use bastion_core::*;
}

// Re-export most commonly used core types at the root level
pub use bastion_core::{
    AuthContext, AuthError, ClientAddress, ConfigurationError, LockoutPolicy, LoginOutcome,
    OneTimeCode, Password, Principal, Role, TokenError, TokenPair, TokenPolicy, TokenPurpose,
    UserId, Username, ValidationError,
};

// ============================================================================
// Ports and Strategies
// ============================================================================

/// Repository and service trait definitions
pub mod ports {
    pub use bastion_core::{
        Clock, CredentialRecord, CredentialStore, CredentialStoreError, PasswordHasher,
        PasswordHasherError, RevocationStore, RevocationStoreError, TokenService, TotpVerifier,
    };
}

pub use bastion_core::{
    AuthenticationScheme, Clock, CredentialStore, RevocationStore, SupportsRevocationSweep,
    SupportsTwoFactorEnrollment, TokenService, TotpVerifier,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Use cases, attempt tracking and the orchestrator
pub mod application {
    pub use bastion_application::*;
}

pub use bastion_application::{AttemptTracker, AuthPolicy, AuthPorts, Authenticator};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers and middleware
    pub mod http {
        pub use bastion_axum::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use bastion_adapters::persistence::*;
    }

    /// Configuration
    pub mod config {
        pub use bastion_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use bastion_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, HashMapRevocationStore, JwtTokenService,
    ManualClock, PostgresCredentialStore, PostgresRevocationStore, RedisRevocationStore,
    Settings, SystemClock, TotpRsVerifier,
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

/// Main auth service
pub use bastion_auth_service::{
    AllowedOrigins, AuthService, get_postgres_pool, get_redis_client, run_migrations, seed_admin,
    spawn_revocation_sweeper,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
