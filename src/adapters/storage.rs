use crate::domain::ports::Storage;
use crate::utils::error::PersistError;
use crate::utils::validation::is_valid_storage_key;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type PersistResult<T> = std::result::Result<T, PersistError>;

fn check_quota(key: &str, value: &str, quota: Option<usize>) -> PersistResult<()> {
    match quota {
        Some(quota) if value.len() > quota => Err(PersistError::QuotaExceeded {
            key: key.to_string(),
            size: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

/// One JSON file per key inside a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    quota: Option<usize>,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            quota: None,
        }
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn item_path(&self, key: &str) -> PersistResult<PathBuf> {
        if !is_valid_storage_key(key) {
            return Err(PersistError::Unavailable {
                key: key.to_string(),
                reason: "key must be a plain file name".to_string(),
            });
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl Storage for LocalStorage {
    async fn read_item(&self, key: &str) -> PersistResult<Option<String>> {
        let path = self.item_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Io(e)),
        }
    }

    async fn write_item(&self, key: &str, value: &str) -> PersistResult<()> {
        let path = self.item_path(key)?;
        check_quota(key, value, self.quota)?;

        fs::create_dir_all(&self.base_path)?;

        // write-then-rename so a crash never leaves half a blob behind
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> PersistResult<()> {
        let path = self.item_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Io(e)),
        }
    }
}

/// Process-local storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn lock(&self, key: &str) -> PersistResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items.lock().map_err(|_| PersistError::Unavailable {
            key: key.to_string(),
            reason: "storage lock poisoned".to_string(),
        })
    }
}

impl Storage for MemoryStorage {
    async fn read_item(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.lock(key)?.get(key).cloned())
    }

    async fn write_item(&self, key: &str, value: &str) -> PersistResult<()> {
        check_quota(key, value, self.quota)?;
        self.lock(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> PersistResult<()> {
        self.lock(key)?.remove(key);
        Ok(())
    }
}
