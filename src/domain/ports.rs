use crate::domain::model::Store;
use crate::utils::error::{PersistError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Durable key-value medium holding whole serialized blobs.
pub trait Storage: Send + Sync {
    fn read_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = std::result::Result<Option<String>, PersistError>> + Send;

    fn write_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = std::result::Result<(), PersistError>> + Send;

    fn remove_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = std::result::Result<(), PersistError>> + Send;
}

/// Uniform source over `[0.0, 1.0)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&mut self) -> f64;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Static, read-only preset catalog resource.
#[async_trait]
pub trait PresetCatalog: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<Store>;
}

pub trait ConfigProvider: Send + Sync {
    fn store_dir(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn storage_quota(&self) -> Option<usize>;
    fn catalog_source(&self) -> &str;
    fn catalog_timeout(&self) -> Duration;
    fn reveal_delay(&self) -> Duration;
    fn message_clear_delay(&self) -> Duration;
    fn timestamp_format(&self) -> &str;
    fn history_limit(&self) -> usize;
    fn default_bounds(&self) -> (i64, i64);
}
