use crate::domain::model::Store;
use crate::domain::ports::{PresetCatalog, Storage};
use crate::utils::error::PersistError;

pub const DEFAULT_STORAGE_KEY: &str = "randomizerData";

/// Loads the static catalog. Any failure yields an empty store; the error is only logged.
pub async fn load_initial(catalog: &dyn PresetCatalog) -> Store {
    match catalog.fetch().await {
        Ok(store) => {
            tracing::debug!(
                "Loaded {} presets from {}",
                store.ranges.len(),
                catalog.describe()
            );
            store
        }
        Err(e) => {
            tracing::warn!(
                "Could not load preset catalog from {}: {}; starting with empty state",
                catalog.describe(),
                e
            );
            Store::empty()
        }
    }
}

/// Reads and writes the whole store under one fixed key.
pub struct Persistence<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// `None` when the key is absent, the blob does not parse, or the medium fails.
    pub async fn load_durable(&self) -> Option<Store> {
        let raw = match self.storage.read_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No durable data under key '{}'", self.key);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read durable data: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Option<Store>>(&raw) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Ignoring unparsable durable data under '{}': {}", self.key, e);
                None
            }
        }
    }

    pub async fn save_durable(&self, store: &Store) -> Result<(), PersistError> {
        let blob = serde_json::to_string(store)?;
        self.storage.write_item(&self.key, &blob).await?;
        tracing::debug!("Saved store ({} bytes) under '{}'", blob.len(), self.key);
        Ok(())
    }

    pub async fn clear_durable(&self) -> Result<(), PersistError> {
        self.storage.remove_item(&self.key).await
    }
}

/// Startup precedence: presets always come from the catalog; history and
/// statistics come from the durable copy when one loads.
pub async fn bootstrap<S: Storage>(
    catalog: &dyn PresetCatalog,
    persistence: &Persistence<S>,
) -> Store {
    let initial = load_initial(catalog).await;

    match persistence.load_durable().await {
        Some(durable) => {
            tracing::info!(
                "Restored {} draws from durable storage",
                durable.statistics.total_rolls
            );
            Store {
                ranges: initial.ranges,
                history: durable.history,
                statistics: durable.statistics,
            }
        }
        None => initial,
    }
}
