pub mod allowed_origins;
pub mod auth_service;
pub mod bootstrap;
pub mod helpers;
pub mod sweeper;
mod tracing;

pub use allowed_origins::AllowedOrigins;
pub use auth_service::AuthService;
pub use bootstrap::seed_admin;
pub use helpers::{get_postgres_pool, get_redis_client, get_redis_connection, run_migrations};
pub use sweeper::spawn_revocation_sweeper;
