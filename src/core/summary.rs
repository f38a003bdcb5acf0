use crate::domain::model::{DrawRecord, Statistics, Store};
use std::fmt;

/// The four stat tiles shown next to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSummary {
    pub total_rolls: u64,
    pub last_roll: Option<i64>,
    pub most_frequent: Option<i64>,
    /// Mean of `last_rolls`, rounded half up.
    pub recent_average: Option<i64>,
}

impl From<&Statistics> for StatsSummary {
    fn from(stats: &Statistics) -> Self {
        let recent_average = if stats.last_rolls.is_empty() {
            None
        } else {
            let sum: i128 = stats.last_rolls.iter().map(|&n| i128::from(n)).sum();
            let mean = sum as f64 / stats.last_rolls.len() as f64;
            Some((mean + 0.5).floor() as i64)
        };

        Self {
            total_rolls: stats.total_rolls,
            last_roll: stats.last_rolls.first().copied(),
            most_frequent: stats.most_frequent_numbers.first().map(|e| e.number),
            recent_average,
        }
    }
}

fn tile(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total rolls:            {}", self.total_rolls)?;
        writeln!(f, "Last roll:              {}", tile(self.last_roll))?;
        writeln!(f, "Most frequent number:   {}", tile(self.most_frequent))?;
        write!(f, "Average (last 10):      {}", tile(self.recent_average))
    }
}

/// Newest `limit` records.
pub fn recent_history(store: &Store, limit: usize) -> &[DrawRecord] {
    &store.history[..store.history.len().min(limit)]
}

pub fn render_history(records: &[DrawRecord]) -> String {
    if records.is_empty() {
        return "History is empty".to_string();
    }

    records
        .iter()
        .map(|r| format!("{:>8}  {:<14}  {}", r.number, r.range, r.timestamp))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FrequencyEntry;

    #[test]
    fn test_summary_of_empty_statistics() {
        let summary = StatsSummary::from(&Statistics::default());
        assert_eq!(summary.total_rolls, 0);
        assert_eq!(summary.last_roll, None);
        assert_eq!(summary.most_frequent, None);
        assert_eq!(summary.recent_average, None);
        assert!(summary.to_string().contains("Last roll:              -"));
    }

    #[test]
    fn test_summary_rounds_half_up() {
        let stats = Statistics {
            total_rolls: 12,
            most_frequent_numbers: vec![FrequencyEntry { number: 3, count: 3 }],
            last_rolls: vec![2, 3],
        };
        let summary = StatsSummary::from(&stats);
        assert_eq!(summary.last_roll, Some(2));
        assert_eq!(summary.most_frequent, Some(3));
        assert_eq!(summary.recent_average, Some(3));

        let negative = Statistics {
            last_rolls: vec![-2, -3],
            ..Statistics::default()
        };
        assert_eq!(StatsSummary::from(&negative).recent_average, Some(-2));
    }

    #[test]
    fn test_recent_history_limits() {
        let store = Store::empty();
        assert!(recent_history(&store, 10).is_empty());
        assert_eq!(render_history(recent_history(&store, 10)), "History is empty");
    }
}
