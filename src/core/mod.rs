pub mod draw;
pub mod persistence;
pub mod range;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod summary;

pub use crate::domain::model::{DrawRecord, FrequencyEntry, PresetRange, Range, Statistics, Store};
pub use crate::domain::ports::{Clock, ConfigProvider, PresetCatalog, RandomSource, Storage};
pub use crate::utils::error::Result;
