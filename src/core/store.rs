use crate::domain::model::{
    DrawRecord, FrequencyEntry, Range, Statistics, Store, HISTORY_CAPACITY, LAST_ROLLS_CAPACITY,
    TOP_FREQUENCIES,
};
use chrono::{DateTime, Utc};

impl Store {
    /// Folds one draw into history and statistics. Persisting the result is the
    /// caller's job (see `Session::draw`).
    pub fn record(
        &mut self,
        number: i64,
        range: &Range,
        now: DateTime<Utc>,
        timestamp_format: &str,
    ) -> DrawRecord {
        let record = DrawRecord::new(number, range, now, timestamp_format);

        self.history.insert(0, record.clone());
        self.history.truncate(HISTORY_CAPACITY);

        self.statistics.record(number);

        record
    }

    /// Drops history and statistics; presets are kept.
    pub fn clear_results(&mut self) {
        self.history.clear();
        self.statistics = Statistics::default();
    }
}

impl Statistics {
    pub fn record(&mut self, number: i64) {
        self.total_rolls += 1;

        self.last_rolls.insert(0, number);
        self.last_rolls.truncate(LAST_ROLLS_CAPACITY);

        match self
            .most_frequent_numbers
            .iter_mut()
            .find(|entry| entry.number == number)
        {
            Some(entry) => entry.count += 1,
            None => self
                .most_frequent_numbers
                .push(FrequencyEntry { number, count: 1 }),
        }

        // stable: equal counts keep insertion order
        self.most_frequent_numbers
            .sort_by(|a, b| b.count.cmp(&a.count));
        self.most_frequent_numbers.truncate(TOP_FREQUENCIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::range::validate;
    use chrono::TimeZone;

    const FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, second).unwrap()
    }

    #[test]
    fn test_record_scenario_from_repeated_draws() {
        let mut store = Store::empty();
        let range = validate(1, 10).unwrap();

        for (i, n) in [3, 7, 3, 3, 7].into_iter().enumerate() {
            store.record(n, &range, at(i as u32), FORMAT);
        }

        let stats = &store.statistics;
        assert_eq!(stats.total_rolls, 5);
        assert_eq!(stats.last_rolls, vec![7, 3, 3, 7, 3]);
        assert_eq!(stats.most_frequent_numbers[0], FrequencyEntry { number: 3, count: 3 });
        assert_eq!(stats.most_frequent_numbers[1], FrequencyEntry { number: 7, count: 2 });
        assert_eq!(store.history.len(), 5);
        assert_eq!(store.history[0].number, 7);
        assert_eq!(store.history[0].range, "1-10");
    }

    #[test]
    fn test_history_is_capped_and_drops_oldest() {
        let mut store = Store::empty();
        let range = validate(0, 1000).unwrap();

        for n in 0..51 {
            store.record(n, &range, at(0), FORMAT);
        }

        assert_eq!(store.history.len(), HISTORY_CAPACITY);
        assert_eq!(store.history[0].number, 50);
        assert_eq!(store.history.last().unwrap().number, 1);
        assert!(store.history.iter().all(|r| r.number != 0));
        assert_eq!(store.statistics.total_rolls, 51);
    }

    #[test]
    fn test_last_rolls_capped_at_ten() {
        let mut stats = Statistics::default();
        for n in 0..25 {
            stats.record(n);
        }
        assert_eq!(stats.last_rolls, (15..25).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_frequency_ties_keep_insertion_order_and_cap() {
        let mut stats = Statistics::default();
        for n in [9, 8, 7, 6, 5, 4] {
            stats.record(n);
        }

        let numbers: Vec<i64> = stats.most_frequent_numbers.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![9, 8, 7, 6, 5]);

        stats.record(6);
        assert_eq!(stats.most_frequent_numbers[0], FrequencyEntry { number: 6, count: 2 });
        assert_eq!(stats.most_frequent_numbers.len(), TOP_FREQUENCIES);
        assert!(stats
            .most_frequent_numbers
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_clear_results_keeps_presets() {
        let mut store = Store {
            ranges: vec![crate::domain::model::PresetRange {
                name: "Coin".to_string(),
                min: 0,
                max: 1,
                description: String::new(),
            }],
            ..Store::default()
        };
        store.record(1, &validate(0, 1).unwrap(), at(0), FORMAT);
        store.clear_results();

        assert!(store.is_pristine());
        assert_eq!(store.ranges.len(), 1);
    }
}
