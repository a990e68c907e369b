//! In-memory store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::{KeyValueStore, StoreError, StoredValue};

/// Process-local store, used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<(bool, String), String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str, shared: bool) -> Result<Option<StoredValue>, StoreError> {
        Ok(self
            .values
            .read()
            .await
            .get(&(shared, key.to_string()))
            .map(|value| StoredValue {
                value: value.clone(),
            }))
    }

    async fn set(&self, key: &str, value: String, shared: bool) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert((shared, key.to_string()), value);

        Ok(())
    }
}
