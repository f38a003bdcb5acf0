use thiserror::Error;

/// Raised by the range selector when the lower bound is not strictly below the upper one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Minimum must be less than maximum! (got {min}-{max})")]
pub struct InvalidRangeError {
    pub min: i64,
    pub max: i64,
}

/// Durable storage failures. Always recovered locally: logged, never rolled back.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("storage unavailable for key '{key}': {reason}")]
    Unavailable { key: String, reason: String },

    #[error("quota exceeded for key '{key}': {size} bytes exceeds quota of {quota} bytes")]
    QuotaExceeded { key: String, size: usize, quota: usize },

    #[error("failed to serialize store: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RandomizerError {
    #[error("Invalid range: {0}")]
    InvalidRange(#[from] InvalidRangeError),

    #[error("No valid range is active; fix the range before drawing")]
    NoActiveRange,

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    #[error("Failed to load resource '{source_name}': {message}")]
    ResourceLoad { source_name: String, message: String },

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl RandomizerError {
    /// Configuration problems stop the program; everything else leaves the session usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            RandomizerError::ConfigError { .. }
                | RandomizerError::ConfigValidationError { .. }
                | RandomizerError::InvalidConfigValueError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RandomizerError::InvalidRange(_) => "Minimum must be less than maximum!".to_string(),
            RandomizerError::NoActiveRange => "Invalid range!".to_string(),
            RandomizerError::UnknownPreset { name } => format!("There is no preset named '{}'", name),
            RandomizerError::ResourceLoad { source_name, .. } => {
                format!("Could not load presets from {}", source_name)
            }
            RandomizerError::Persist(_) => "Could not save the draw history".to_string(),
            RandomizerError::ConfigError { message } => format!("Configuration problem: {}", message),
            RandomizerError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            RandomizerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RandomizerError::InvalidRange(_) | RandomizerError::NoActiveRange => {
                "Pick a minimum that is strictly smaller than the maximum"
            }
            RandomizerError::UnknownPreset { .. } => "Run `small-randomizer presets` to list the available presets",
            RandomizerError::ResourceLoad { .. } => "Check the catalog path or URL, or use the bundled catalog",
            RandomizerError::Persist(_) => "Check that the storage directory is writable and has free space",
            RandomizerError::HttpError(_) => "Check network connectivity and the catalog URL",
            RandomizerError::ConfigError { .. }
            | RandomizerError::ConfigValidationError { .. }
            | RandomizerError::InvalidConfigValueError { .. } => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, RandomizerError>;
