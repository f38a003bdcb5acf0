pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::catalog::{catalog_from_source, BundledCatalog, FileCatalog, HttpCatalog};
pub use crate::adapters::clock::{FixedClock, SystemClock};
pub use crate::adapters::random::{AnySource, SeededSource, ThreadRngSource};
pub use crate::adapters::storage::{LocalStorage, MemoryStorage};
pub use crate::config::AppConfig;
pub use crate::core::draw::DrawEngine;
pub use crate::core::persistence::{bootstrap, load_initial, Persistence};
pub use crate::core::range::validate;
pub use crate::core::scheduler::{DrawEvent, DrawScheduler, Timing};
pub use crate::core::session::{DrawOutcome, Session};
pub use crate::core::summary::StatsSummary;
pub use crate::domain::model::{DrawRecord, FrequencyEntry, PresetRange, Range, Statistics, Store};
pub use crate::utils::error::{InvalidRangeError, PersistError, RandomizerError, Result};
