//! Key-value store seam.

use async_trait::async_trait;
use mockall::automock;

use crate::storage::errors::StoreError;

/// A value read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    pub value: String,
}

#[automock]
#[async_trait]
/// String key-value storage, with a per-call `shared` flag selecting the shared or the
/// personal namespace.
pub trait KeyValueStore: Send + Sync {
    /// Reads `key`, returning `None` when it has never been written.
    async fn get(&self, key: &str, shared: bool) -> Result<Option<StoredValue>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String, shared: bool) -> Result<(), StoreError>;
}
