use std::sync::Arc;

use redis::{Client, Connection, RedisResult};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use tokio::sync::RwLock;

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
///
/// # Returns
/// Result containing the PgPool or an error
pub async fn get_postgres_pool(url: &Secret<String>) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}

/// Apply the `users` and `revoked_tokens` migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../auth-service/migrations").run(pool).await
}

/// Create a Redis client
///
/// # Arguments
/// * `redis_hostname` - Redis server hostname
///
/// # Returns
/// Result containing the Redis client or an error
pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}

/// Open a Redis connection shared the way the Redis stores expect it
pub fn get_redis_connection(redis_hostname: &str) -> RedisResult<Arc<RwLock<Connection>>> {
    let connection = get_redis_client(redis_hostname)?.get_connection()?;
    Ok(Arc::new(RwLock::new(connection)))
}

