use std::collections::HashMap;
use std::sync::Arc;

use bastion_core::{
    CredentialRecord, CredentialStore, CredentialStoreError, PasswordHash, Principal, Role,
    TwoFactorState, UserId, Username,
};
use tokio::sync::RwLock;

#[derive(Default, Clone)]
pub struct HashMapCredentialStore {
    users: Arc<RwLock<HashMap<Username, CredentialRecord>>>,
}

impl HashMapCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a fully specified record, id and second-factor state included.
    pub async fn add_user(&self, record: CredentialRecord) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.principal.username) {
            return Err(CredentialStoreError::UserAlreadyExists);
        }
        users.insert(record.principal.username.clone(), record);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for HashMapCredentialStore {
    async fn lookup(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn set_two_factor(
        &self,
        user_id: UserId,
        state: TwoFactorState,
    ) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let record = users
            .values_mut()
            .find(|record| record.principal.id == user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;

        record.two_factor = state;
        Ok(())
    }

    async fn create_user(
        &self,
        username: Username,
        password_hash: PasswordHash,
        role: Role,
    ) -> Result<Principal, CredentialStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&username) {
            return Err(CredentialStoreError::UserAlreadyExists);
        }

        let next_id = users
            .values()
            .map(|record| record.principal.id.as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let principal = Principal::new(UserId::new(next_id), username.clone(), role);
        users.insert(
            username,
            CredentialRecord {
                principal: principal.clone(),
                password_hash,
                two_factor: TwoFactorState::disabled(),
            },
        );
        Ok(principal)
    }
}
