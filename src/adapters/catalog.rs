use crate::domain::model::Store;
use crate::domain::ports::PresetCatalog;
use crate::utils::error::{RandomizerError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub const BUNDLED_SOURCE: &str = "bundled";

const BUNDLED_DATA: &str = include_str!("../../assets/data.json");

fn parse_catalog(source_name: &str, content: &str) -> Result<Store> {
    serde_json::from_str(content).map_err(|e| RandomizerError::ResourceLoad {
        source_name: source_name.to_string(),
        message: format!("invalid catalog JSON: {}", e),
    })
}

/// Catalog compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

#[async_trait]
impl PresetCatalog for BundledCatalog {
    fn describe(&self) -> String {
        "bundled catalog".to_string()
    }

    async fn fetch(&self) -> Result<Store> {
        parse_catalog(&self.describe(), BUNDLED_DATA)
    }
}

#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PresetCatalog for FileCatalog {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Store> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RandomizerError::ResourceLoad {
                source_name: self.describe(),
                message: e.to_string(),
            })?;
        parse_catalog(&self.describe(), &content)
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    url: String,
    client: Client,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl PresetCatalog for HttpCatalog {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Store> {
        tracing::debug!("Fetching preset catalog from: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        tracing::debug!("Catalog response status: {}", response.status());
        if !response.status().is_success() {
            return Err(RandomizerError::ResourceLoad {
                source_name: self.describe(),
                message: format!("HTTP status {}", response.status()),
            });
        }

        let body = response.text().await?;
        parse_catalog(&self.describe(), &body)
    }
}

/// `bundled`, an `http(s)://` URL, or a filesystem path.
pub fn catalog_from_source(source: &str, timeout: Duration) -> Result<Box<dyn PresetCatalog>> {
    let source = source.trim();
    if source.is_empty() || source.eq_ignore_ascii_case(BUNDLED_SOURCE) {
        return Ok(Box::new(BundledCatalog));
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        validate_url("catalog.source", source)?;
        return Ok(Box::new(HttpCatalog::new(source, timeout)?));
    }

    Ok(Box::new(FileCatalog::new(source)))
}
