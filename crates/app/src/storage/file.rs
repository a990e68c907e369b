//! JSON file store

use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::storage::{KeyValueStore, StoreError, StoredValue};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    shared: BTreeMap<String, String>,

    #[serde(default)]
    personal: BTreeMap<String, String>,
}

impl StoreFile {
    fn namespace(&self, shared: bool) -> &BTreeMap<String, String> {
        if shared { &self.shared } else { &self.personal }
    }

    fn namespace_mut(&mut self, shared: bool) -> &mut BTreeMap<String, String> {
        if shared {
            &mut self.shared
        } else {
            &mut self.personal
        }
    }
}

/// Store backed by a single JSON file. Writes go to a sibling temp file that is then
/// renamed over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_file(&self) -> Result<StoreFile, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(StoreFile::default()),
            Ok(contents) => serde_json::from_str(&contents).map_err(StoreError::Corrupt),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("store file {} does not exist yet", self.path.display());

                Ok(StoreFile::default())
            }
            Err(error) => Err(error.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");

        self.path.with_file_name(name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str, shared: bool) -> Result<Option<StoredValue>, StoreError> {
        let file = self.read_file().await?;

        Ok(file
            .namespace(shared)
            .get(key)
            .map(|value| StoredValue {
                value: value.clone(),
            }))
    }

    async fn set(&self, key: &str, value: String, shared: bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut file = self.read_file().await?;
        file.namespace_mut(shared).insert(key.to_string(), value);

        let contents = serde_json::to_string_pretty(&file).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        fs::write(&temp, contents).await?;
        fs::rename(&temp, &self.path).await?;

        debug!("wrote key {key} to {}", self.path.display());

        Ok(())
    }
}
