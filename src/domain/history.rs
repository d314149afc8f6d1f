// Rolling metric history - fixed-capacity ring buffer with derived aggregates
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded FIFO buffer of recent samples for one metric. Pushing beyond
/// capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    capacity: usize,
    samples: VecDeque<f64>,
}

/// Aggregates computed over the current buffer contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub samples: usize,
}

impl RollingHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.samples.iter().any(|s| *s == value)
    }

    /// Min/max/mean over the buffer; `None` while the buffer is empty.
    pub fn summary(&self) -> Option<HistorySummary> {
        if self.samples.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &s in &self.samples {
            min = min.min(s);
            max = max.max(s);
            sum += s;
        }
        Some(HistorySummary {
            min,
            max,
            mean: sum / self.samples.len() as f64,
            samples: self.samples.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest_at_capacity() {
        let mut history = RollingHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            history.push(v);
        }

        assert_eq!(history.len(), 3);
        assert!(!history.contains(1.0));
        assert!(history.contains(4.0));
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut history = RollingHistory::new(5);
        for v in 0..50 {
            history.push(v as f64);
            assert!(history.len() <= 5);
        }
    }

    #[test]
    fn test_empty_history_has_no_summary() {
        let history = RollingHistory::new(10);
        assert!(history.is_empty());
        assert!(history.summary().is_none());
    }

    #[test]
    fn test_summary_aggregates() {
        let mut history = RollingHistory::new(10);
        for v in [400.0, 500.0, 600.0] {
            history.push(v);
        }

        let summary = history.summary().unwrap();
        assert_eq!(summary.min, 400.0);
        assert_eq!(summary.max, 600.0);
        assert_eq!(summary.mean, 500.0);
        assert_eq!(summary.samples, 3);
    }

    #[test]
    fn test_summary_tracks_eviction() {
        let mut history = RollingHistory::new(2);
        history.push(100.0);
        history.push(200.0);
        history.push(300.0);

        let summary = history.summary().unwrap();
        assert_eq!(summary.min, 200.0);
        assert_eq!(summary.max, 300.0);
    }
}
