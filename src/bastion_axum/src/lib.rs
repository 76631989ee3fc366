//! Axum transport for the bastion authentication core.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  bastion_core: AuthenticationScheme      │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  bastion_axum                            │
//! │  - route handlers over Arc<A: scheme>    │
//! │  - bearer-token middleware               │
//! │  - AuthError -> HTTP status mapping      │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use axum::{Router, middleware, routing::{get, post}};
//! use bastion_axum::{middleware::require_auth, routes};
//!
//! let protected = Router::new()
//!     .route("/auth/me", get(routes::me))
//!     .route_layer(middleware::from_fn_with_state(scheme.clone(), require_auth::<A>));
//!
//! let app = Router::new()
//!     .route("/auth/login", post(routes::login::<A>))
//!     .merge(protected)
//!     .with_state(scheme);
//! ```

pub mod error;
pub mod middleware;
pub mod routes;

pub use error::{AuthApiError, ErrorResponse};
pub use middleware::{bearer_token, require_admin, require_auth};
