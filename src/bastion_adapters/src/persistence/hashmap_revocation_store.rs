use std::collections::{HashMap, hash_map::Entry};
use std::sync::Arc;

use bastion_core::{RevocationEntry, RevocationStore, RevocationStoreError, TokenId};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Single-process revocation set. Check-and-insert happens under one write lock.
#[derive(Default, Clone)]
pub struct HashMapRevocationStore {
    entries: Arc<RwLock<HashMap<TokenId, DateTime<Utc>>>>,
}

impl HashMapRevocationStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait::async_trait]
impl RevocationStore for HashMapRevocationStore {
    async fn revoke(&self, entry: RevocationEntry) -> Result<bool, RevocationStoreError> {
        let mut entries = self.entries.write().await;
        match entries.entry(entry.token_id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(entry.expires_at);
                Ok(true)
            }
        }
    }

    async fn is_revoked(&self, token_id: &TokenId) -> Result<bool, RevocationStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(token_id))
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, RevocationStoreError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|token_id, expires_at| {
            !RevocationEntry::new(token_id.clone(), *expires_at).is_expired(now)
        });
        Ok((before - entries.len()) as u64)
    }
}
