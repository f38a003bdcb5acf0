// Adapters layer: concrete implementations of the domain ports (storage, catalog, randomness, time).

pub mod catalog;
pub mod clock;
pub mod random;
pub mod storage;
