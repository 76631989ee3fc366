pub mod hashmap_credential_store;
pub mod hashmap_revocation_store;
pub mod postgres_credential_store;
pub mod postgres_revocation_store;
pub mod redis_revocation_store;
