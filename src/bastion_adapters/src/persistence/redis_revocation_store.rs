use std::sync::Arc;

use bastion_core::{Clock, RevocationEntry, RevocationStore, RevocationStoreError, TokenId};
use chrono::{DateTime, Utc};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Revocation set in Redis. Keys carry their own TTL, so Redis does the sweeping.
#[derive(Clone)]
pub struct RedisRevocationStore<C> {
    conn: Arc<RwLock<Connection>>,
    clock: C,
}

impl<C: Clock> RedisRevocationStore<C> {
    pub fn new(conn: Arc<RwLock<Connection>>, clock: C) -> Self {
        Self { conn, clock }
    }
}

/// Keys must outlive the token they revoke, so the remaining lifetime is rounded up to the next
/// whole second and one more second is added on top.
fn ttl_millis(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = (expires_at - now).num_milliseconds().max(0);
    let whole_seconds = (remaining + 999) / 1000;
    (whole_seconds + 1) * 1000
}

fn unavailable(e: redis::RedisError) -> RevocationStoreError {
    RevocationStoreError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl<C: Clock> RevocationStore for RedisRevocationStore<C> {
    async fn revoke(&self, entry: RevocationEntry) -> Result<bool, RevocationStoreError> {
        let key = get_key(&entry.token_id);
        let ttl = ttl_millis(entry.expires_at, self.clock.now());

        let mut conn = self.conn.write().await;
        // SET NX answers nil when the key already exists.
        let inserted: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(entry.expires_at.timestamp())
            .arg("NX")
            .arg("PX")
            .arg(ttl)
            .query(&mut *conn)
            .map_err(unavailable)?;

        Ok(inserted.is_some())
    }

    async fn is_revoked(&self, token_id: &TokenId) -> Result<bool, RevocationStoreError> {
        let key = get_key(token_id);
        let mut conn = self.conn.write().await;
        conn.exists(&key).map_err(unavailable)
    }

    async fn sweep_expired(&self, _now: DateTime<Utc>) -> Result<u64, RevocationStoreError> {
        Ok(0)
    }
}

const REVOKED_TOKEN_KEY_PREFIX: &str = "revoked_token:";

fn get_key(token_id: &TokenId) -> String {
    format!("{}{}", REVOKED_TOKEN_KEY_PREFIX, token_id)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn ttl_outlives_the_token() {
        let now = expiry() - Duration::milliseconds(10_900);
        let ttl = ttl_millis(expiry(), now);

        assert!(now + Duration::milliseconds(ttl) > expiry());
        assert_eq!(ttl, 12_000);
    }

    #[test]
    fn whole_second_lifetimes_still_get_a_margin() {
        assert_eq!(ttl_millis(expiry(), expiry() - Duration::seconds(10)), 11_000);
    }

    #[test]
    fn expired_entries_keep_a_short_ttl() {
        assert_eq!(ttl_millis(expiry(), expiry() + Duration::minutes(5)), 1_000);
    }

    #[test]
    fn keys_are_prefixed() {
        let id = TokenId::new();
        assert_eq!(get_key(&id), format!("revoked_token:{id}"));
    }
}
