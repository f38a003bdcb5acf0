use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "small-randomizer")]
#[command(about = "Random number generator with a persistent draw history and statistics")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the durable store
    #[arg(long, global = true)]
    pub store_dir: Option<String>,

    /// Preset catalog: `bundled`, a file path, or an http(s) URL
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Seed the generator for reproducible draws
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Draw immediately
    Roll {
        #[arg(long, allow_negative_numbers = true)]
        min: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,

        /// Use the bounds of a named preset
        #[arg(long, conflicts_with_all = ["min", "max"])]
        preset: Option<String>,

        #[arg(long, default_value = "1")]
        count: usize,
    },
    /// Interactive mode with delayed reveal; reads commands from stdin
    Play {
        #[arg(long, allow_negative_numbers = true)]
        min: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,
    },
    /// List preset ranges
    Presets,
    /// Show the most recent draws
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show draw statistics
    Stats,
    /// Clear history and statistics
    Reset,
}

impl CliConfig {
    /// File configuration (or defaults) with command-line overrides applied, validated.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.store_dir {
            config.storage.dir = dir.clone();
        }
        if let Some(catalog) = &self.catalog {
            config.catalog.source = catalog.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roll_with_negative_bounds() {
        let cli = CliConfig::parse_from([
            "small-randomizer",
            "roll",
            "--min",
            "-10",
            "--max",
            "-2",
            "--count",
            "3",
        ]);
        assert_eq!(
            cli.command,
            Command::Roll {
                min: Some(-10),
                max: Some(-2),
                preset: None,
                count: 3
            }
        );
    }

    #[test]
    fn test_preset_conflicts_with_bounds() {
        let result = CliConfig::try_parse_from([
            "small-randomizer",
            "roll",
            "--preset",
            "Dice",
            "--min",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_overrides_apply() {
        let cli = CliConfig::parse_from([
            "small-randomizer",
            "stats",
            "--store-dir",
            "/tmp/somewhere",
            "--catalog",
            "presets.json",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.storage.dir, "/tmp/somewhere");
        assert_eq!(config.catalog.source, "presets.json");
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let cli = CliConfig::parse_from([
            "small-randomizer",
            "presets",
            "--config",
            "/definitely/not/here.toml",
        ]);
        let err = cli.resolve().unwrap_err();
        assert!(!err.is_recoverable());
    }
}
