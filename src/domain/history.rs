// Rolling weather history - bounded, deduplicated append log
use super::weather::WeatherSample;
use std::collections::HashSet;

pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Result of a single append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Sample was added; `evicted` oldest entries were dropped to stay within the cap.
    Appended { evicted: usize },
    /// An entry with the same timestamp already exists; the history is unchanged.
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct WeatherHistory {
    samples: Vec<WeatherSample>,
    cap: usize,
}

impl Default for WeatherHistory {
    fn default() -> Self {
        Self::with_cap(DEFAULT_HISTORY_CAP)
    }
}

impl WeatherHistory {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            samples: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Concatenate, drop repeated timestamps keeping the first seen, then keep the newest `cap`.
    pub fn append(&mut self, sample: WeatherSample) -> AppendOutcome {
        self.samples.push(sample);

        let before = self.samples.len();
        let mut seen = HashSet::with_capacity(before);
        self.samples.retain(|s| seen.insert(s.timestamp));
        if self.samples.len() < before {
            return AppendOutcome::Duplicate;
        }

        let evicted = self.samples.len().saturating_sub(self.cap);
        if evicted > 0 {
            self.samples.drain(..evicted);
        }

        AppendOutcome::Appended { evicted }
    }

    pub fn snapshot(&self) -> Vec<WeatherSample> {
        self.samples.clone()
    }

    pub fn latest(&self) -> Option<&WeatherSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub fn cap(&self) -> usize {
        self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn sample(minute: i64, temperature: f64) -> WeatherSample {
        WeatherSample::new(at(minute), temperature, 1.0)
    }

    #[test]
    fn test_append_to_empty_history() {
        let mut history = WeatherHistory::default();
        assert!(history.is_empty());

        let outcome = history.append(sample(0, 5.0));

        assert_eq!(outcome, AppendOutcome::Appended { evicted: 0 });
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|s| s.temperature), Some(5.0));
    }

    #[test]
    fn test_keeps_last_twenty_in_append_order() {
        let mut history = WeatherHistory::default();
        for minute in 0..25 {
            history.append(sample(minute, minute as f64));
        }

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 20);
        let minutes: Vec<f64> = snapshot.iter().map(|s| s.temperature).collect();
        let expected: Vec<f64> = (5..25).map(|m| m as f64).collect();
        assert_eq!(minutes, expected);
    }

    #[test]
    fn test_eviction_count_reported() {
        let mut history = WeatherHistory::with_cap(2);
        history.append(sample(0, 0.0));
        history.append(sample(1, 1.0));

        assert_eq!(history.append(sample(2, 2.0)), AppendOutcome::Appended { evicted: 1 });
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_duplicate_timestamp_keeps_first_seen() {
        let mut history = WeatherHistory::default();
        history.append(sample(0, 5.0));
        history.append(sample(1, 6.0));

        let outcome = history.append(sample(0, 99.0));

        assert_eq!(outcome, AppendOutcome::Duplicate);
        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshot()[0].temperature, 5.0);
        assert_eq!(history.latest().map(|s| s.temperature), Some(6.0));
    }

    #[test]
    fn test_identical_fetches_grow_by_one() {
        let mut history = WeatherHistory::default();
        history.append(sample(3, 1.0));
        let before = history.len();

        history.append(sample(7, 2.0));
        history.append(sample(7, 2.0));

        assert_eq!(history.len(), before + 1);
    }

    #[test]
    fn test_cap_and_uniqueness_hold_for_mixed_sequence() {
        let mut history = WeatherHistory::default();
        // Revisits earlier minutes so duplicates land both inside and outside the window
        for step in 0..200i64 {
            let minute = (step * 7) % 31;
            history.append(sample(minute, step as f64));

            let snapshot = history.snapshot();
            assert!(snapshot.len() <= 20);
            let unique: HashSet<_> = snapshot.iter().map(|s| s.timestamp).collect();
            assert_eq!(unique.len(), snapshot.len());
        }
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut history = WeatherHistory::default();
        history.append(sample(0, 1.0));

        let mut snapshot = history.snapshot();
        snapshot.clear();

        assert_eq!(history.len(), 1);
    }
}
