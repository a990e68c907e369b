//! App Context

use std::{path::PathBuf, sync::Arc};

use crate::{
    catalog::CatalogController,
    confirm::Confirm,
    notifications::Notifier,
    storage::{FileStore, KeyValueStore, MemoryStore},
};

/// Composition root: owns the catalog controller for the lifetime of the session.
#[derive(Debug)]
pub struct AppContext {
    pub catalog: CatalogController,
}

impl AppContext {
    /// Build the application context over any store and load the catalog from it.
    pub async fn from_store(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let mut catalog = CatalogController::new(store, notifier, confirm);

        catalog.load().await;

        Self { catalog }
    }

    /// Build the application context from a store file path.
    pub async fn from_store_path(
        path: impl Into<PathBuf>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self::from_store(Arc::new(FileStore::new(path)), notifier, confirm).await
    }

    /// Build an application context that keeps nothing beyond the process.
    pub async fn in_memory(notifier: Arc<dyn Notifier>, confirm: Arc<dyn Confirm>) -> Self {
        Self::from_store(Arc::new(MemoryStore::new()), notifier, confirm).await
    }
}
