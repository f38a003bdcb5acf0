use crate::adapters::catalog::BUNDLED_SOURCE;
use crate::core::persistence::DEFAULT_STORAGE_KEY;
use crate::core::range::validate;
use crate::core::session::DEFAULT_TIMESTAMP_FORMAT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RandomizerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_storage_key,
    validate_url, validate_within, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub range: RangeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: String,
    pub key: String,
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: ".randomizer".to_string(),
            key: DEFAULT_STORAGE_KEY.to_string(),
            quota_bytes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// `bundled`, a file path, or an http(s) URL.
    pub source: String,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: BUNDLED_SOURCE.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub reveal_delay_ms: u64,
    pub message_clear_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 500,
            message_clear_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub timestamp_format: String,
    pub history_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            history_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub min: i64,
    pub max: i64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| RandomizerError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RandomizerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        // 驗證存儲設定
        validate_path("storage.dir", &self.storage.dir)?;
        validate_storage_key("storage.key", &self.storage.key)?;
        if let Some(quota) = self.storage.quota_bytes {
            validate_positive_number("storage.quota_bytes", quota, 1)?;
        }

        // 驗證預設目錄來源
        let source = self.catalog.source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            validate_url("catalog.source", source)?;
        } else if !source.eq_ignore_ascii_case(BUNDLED_SOURCE) {
            validate_path("catalog.source", source)?;
        }
        validate_positive_number("catalog.timeout_seconds", self.catalog.timeout_seconds as usize, 1)?;

        // 驗證延遲時間
        validate_within("timing.reveal_delay_ms", self.timing.reveal_delay_ms, 0, MAX_DELAY_MS)?;
        validate_within("timing.message_clear_ms", self.timing.message_clear_ms, 0, MAX_DELAY_MS)?;

        validate_non_empty_string("display.timestamp_format", &self.display.timestamp_format)?;
        validate_positive_number("display.history_limit", self.display.history_limit, 1)?;

        validate(self.range.min, self.range.max).map_err(|e| {
            RandomizerError::ConfigValidationError {
                field: "range".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn store_dir(&self) -> &str {
        &self.storage.dir
    }

    fn storage_key(&self) -> &str {
        &self.storage.key
    }

    fn storage_quota(&self) -> Option<usize> {
        self.storage.quota_bytes
    }

    fn catalog_source(&self) -> &str {
        &self.catalog.source
    }

    fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_seconds)
    }

    fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.timing.reveal_delay_ms)
    }

    fn message_clear_delay(&self) -> Duration {
        Duration::from_millis(self.timing.message_clear_ms)
    }

    fn timestamp_format(&self) -> &str {
        &self.display.timestamp_format
    }

    fn history_limit(&self) -> usize {
        self.display.history_limit
    }

    fn default_bounds(&self) -> (i64, i64) {
        (self.range.min, self.range.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_key(), "randomizerData");
        assert_eq!(config.reveal_delay(), Duration::from_millis(500));
        assert_eq!(config.message_clear_delay(), Duration::from_millis(3000));
        assert_eq!(config.default_bounds(), (1, 10));
    }

    #[test]
    fn test_partial_sections_override_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
[storage]
dir = "/tmp/rand"

[catalog]
source = "https://example.com/data.json"

[range]
min = -5
max = 5
"#,
        )
        .unwrap();

        assert_eq!(config.store_dir(), "/tmp/rand");
        assert_eq!(config.storage_key(), "randomizerData");
        assert_eq!(config.catalog_source(), "https://example.com/data.json");
        assert_eq!(config.default_bounds(), (-5, 5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("SMALL_RANDOMIZER_TEST_DIR", "/var/lib/rand");
        let config = AppConfig::from_toml_str(
            r#"
[storage]
dir = "${SMALL_RANDOMIZER_TEST_DIR}"
key = "${SMALL_RANDOMIZER_UNSET_VAR}"
"#,
        )
        .unwrap();

        assert_eq!(config.storage.dir, "/var/lib/rand");
        assert_eq!(config.storage.key, "${SMALL_RANDOMIZER_UNSET_VAR}");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.range = RangeConfig { min: 3, max: 3 };
        assert!(matches!(
            config.validate(),
            Err(RandomizerError::ConfigValidationError { .. })
        ));

        let mut config = AppConfig::default();
        config.storage.key = "my data".to_string();
        assert!(matches!(
            config.validate(),
            Err(RandomizerError::InvalidConfigValueError { ref field, .. }) if field == "storage.key"
        ));

        let mut config = AppConfig::default();
        config.storage.key = "a/b".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.display.history_limit = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.catalog.source = "http://".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.timing.reveal_delay_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("[storage\ndir = 1"),
            Err(RandomizerError::ConfigValidationError { .. })
        ));
    }
}
