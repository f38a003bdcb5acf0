use crate::core::draw::DrawEngine;
use crate::core::persistence::{bootstrap, Persistence};
use crate::core::range::{parse_inputs, validate, validate_preset};
use crate::core::summary::StatsSummary;
use crate::domain::model::{DrawRecord, PresetRange, Range, Store};
use crate::domain::ports::{Clock, ConfigProvider, PresetCatalog, RandomSource, Storage};
use crate::utils::error::{InvalidRangeError, RandomizerError, Result};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub record: DrawRecord,
    pub range: Range,
    /// `false` when the durable write failed; the in-memory store is updated regardless.
    pub persisted: bool,
}

impl DrawOutcome {
    pub fn message(&self) -> String {
        format!(
            "Generated number {} in range {}",
            self.record.number, self.range
        )
    }
}

/// Everything one randomizer page owns: active range, store, engine, persistence.
pub struct Session<S: Storage, R: RandomSource, C: Clock> {
    store: Store,
    active_range: Option<Range>,
    range_error: Option<InvalidRangeError>,
    engine: DrawEngine<R>,
    persistence: Persistence<S>,
    clock: C,
    timestamp_format: String,
}

impl<S: Storage, R: RandomSource, C: Clock> Session<S, R, C> {
    pub fn new(
        store: Store,
        persistence: Persistence<S>,
        engine: DrawEngine<R>,
        clock: C,
        initial: (i64, i64),
    ) -> Self {
        let mut session = Self {
            store,
            active_range: None,
            range_error: None,
            engine,
            persistence,
            clock,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        };
        // an invalid initial range just leaves drawing disabled
        let _ = session.set_range(initial.0, initial.1);
        session
    }

    /// Loads catalog and durable state according to `config`, then applies its defaults.
    pub async fn open<P: ConfigProvider>(
        config: &P,
        catalog: &dyn PresetCatalog,
        storage: S,
        source: R,
        clock: C,
    ) -> Self {
        let persistence = Persistence::with_key(storage, config.storage_key());
        let store = bootstrap(catalog, &persistence).await;

        Self::new(
            store,
            persistence,
            DrawEngine::new(source),
            clock,
            config.default_bounds(),
        )
        .with_timestamp_format(config.timestamp_format())
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn presets(&self) -> &[PresetRange] {
        &self.store.ranges
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(&self.store.statistics)
    }

    pub fn active_range(&self) -> Option<Range> {
        self.active_range
    }

    pub fn can_draw(&self) -> bool {
        self.active_range.is_some()
    }

    /// The message to show while the range is invalid.
    pub fn range_error(&self) -> Option<&InvalidRangeError> {
        self.range_error.as_ref()
    }

    pub fn set_range(&mut self, min: i64, max: i64) -> std::result::Result<Range, InvalidRangeError> {
        self.apply(validate(min, max))
    }

    pub fn set_range_from_input(
        &mut self,
        min_text: &str,
        max_text: &str,
    ) -> std::result::Result<Range, InvalidRangeError> {
        let (min, max) = parse_inputs(min_text, max_text);
        self.set_range(min, max)
    }

    pub fn select_preset(&mut self, name: &str) -> Result<Range> {
        let preset = self
            .store
            .ranges
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RandomizerError::UnknownPreset {
                name: name.to_string(),
            })?;

        let checked = validate_preset(preset);
        Ok(self.apply(checked)?)
    }

    fn apply(
        &mut self,
        checked: std::result::Result<Range, InvalidRangeError>,
    ) -> std::result::Result<Range, InvalidRangeError> {
        match checked {
            Ok(range) => {
                self.active_range = Some(range);
                self.range_error = None;
                Ok(range)
            }
            Err(e) => {
                self.active_range = None;
                self.range_error = Some(e);
                Err(e)
            }
        }
    }

    /// Draws within the active range, records it, and mirrors the store to durable storage.
    pub async fn draw(&mut self) -> Result<DrawOutcome> {
        let range = self.active_range.ok_or(RandomizerError::NoActiveRange)?;

        let number = self.engine.draw(&range);
        let record = self
            .store
            .record(number, &range, self.clock.now(), &self.timestamp_format);
        tracing::debug!("Drew {} in {}", number, range);

        let persisted = match self.persistence.save_durable(&self.store).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to persist draw history: {}", e);
                false
            }
        };

        Ok(DrawOutcome {
            record,
            range,
            persisted,
        })
    }

    /// Forgets history and statistics, on disk and then in memory. If the
    /// durable copy cannot be removed the in-memory results are left intact.
    pub async fn reset(&mut self) -> Result<()> {
        self.persistence.clear_durable().await?;
        self.store.clear_results();
        tracing::info!("Cleared draw history under '{}'", self.persistence.key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::random::SeededSource;
    use crate::adapters::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn session_with(
        storage: MemoryStorage,
        presets: Vec<PresetRange>,
    ) -> Session<MemoryStorage, SeededSource, FixedClock> {
        let store = Store {
            ranges: presets,
            ..Store::default()
        };
        Session::new(
            store,
            Persistence::new(storage),
            DrawEngine::new(SeededSource::new(1)),
            FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()),
            (1, 10),
        )
    }

    fn dice() -> PresetRange {
        PresetRange {
            name: "Dice".to_string(),
            min: 1,
            max: 6,
            description: "Six sides".to_string(),
        }
    }

    #[tokio::test]
    async fn test_draw_records_and_persists() {
        let storage = MemoryStorage::new();
        let mut session = session_with(storage.clone(), vec![]);

        let outcome = session.draw().await.unwrap();

        assert!(outcome.persisted);
        assert!((1..=10).contains(&outcome.record.number));
        assert_eq!(outcome.record.date, "2024-05-01T08:30:00.000Z");
        assert_eq!(session.store().statistics.total_rolls, 1);
        assert!(outcome.message().starts_with("Generated number"));

        let saved: Store = serde_json::from_str(&storage.get("randomizerData").unwrap()).unwrap();
        assert_eq!(&saved, session.store());
    }

    #[tokio::test]
    async fn test_invalid_range_disables_drawing() {
        let mut session = session_with(MemoryStorage::new(), vec![]);

        assert!(session.set_range(5, 5).is_err());
        assert!(!session.can_draw());
        assert_eq!(session.range_error(), Some(&InvalidRangeError { min: 5, max: 5 }));
        assert!(matches!(
            session.draw().await,
            Err(RandomizerError::NoActiveRange)
        ));
        assert_eq!(session.store().statistics.total_rolls, 0);

        session.set_range_from_input("2", "4").unwrap();
        assert!(session.can_draw());
        assert!(session.range_error().is_none());
    }

    #[tokio::test]
    async fn test_select_preset() {
        let mut session = session_with(MemoryStorage::new(), vec![dice()]);

        let range = session.select_preset("dice").unwrap();
        assert_eq!((range.min(), range.max()), (1, 6));
        assert_eq!(session.active_range(), Some(range));

        assert!(matches!(
            session.select_preset("d100"),
            Err(RandomizerError::UnknownPreset { .. })
        ));
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_in_memory_update() {
        let storage = MemoryStorage::new().with_quota(Some(8));
        let mut session = session_with(storage.clone(), vec![]);

        let outcome = session.draw().await.unwrap();

        assert!(!outcome.persisted);
        assert_eq!(session.store().statistics.total_rolls, 1);
        assert!(storage.get("randomizerData").is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_results_and_durable_copy() {
        let storage = MemoryStorage::new();
        let mut session = session_with(storage.clone(), vec![dice()]);
        session.draw().await.unwrap();

        session.reset().await.unwrap();

        assert!(session.store().is_pristine());
        assert_eq!(session.presets().len(), 1);
        assert!(storage.get("randomizerData").is_none());
    }
}
