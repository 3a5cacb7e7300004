//! Duration/value histograms summarized as count, sum, min, max.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Summary of a distribution of observed values.
///
/// No buckets are kept; recording and summary retrieval are both O(1).
/// The f64 fields live in `AtomicU64` bit patterns so individual values
/// are never torn under concurrent recording.
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    sum_bits: AtomicU64,
    min_bits: AtomicU64,
    max_bits: AtomicU64,
}

/// Point-in-time summary of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
            min_bits: AtomicU64::new(f64::INFINITY.to_bits()),
            max_bits: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
        }
    }

    /// Record one observation.
    pub fn record(&self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.count.fetch_add(1, Ordering::Relaxed);
        update_f64(&self.sum_bits, |sum| sum + value);
        update_f64(&self.min_bits, |min| min.min(value));
        update_f64(&self.max_bits, |max| max.max(value));
    }

    pub fn summary(&self) -> HistogramSummary {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return HistogramSummary {
                count: 0,
                sum: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        HistogramSummary {
            count,
            sum: f64::from_bits(self.sum_bits.load(Ordering::Relaxed)),
            min: f64::from_bits(self.min_bits.load(Ordering::Relaxed)),
            max: f64::from_bits(self.max_bits.load(Ordering::Relaxed)),
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// CAS loop over an f64 stored as bits.
fn update_f64(cell: &AtomicU64, f: impl Fn(f64) -> f64) {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = f(f64::from_bits(current)).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(observed) => current = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_summary_is_zeroed() {
        let histogram = Histogram::new();
        let summary = histogram.summary();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.max, 0.0);
    }

    #[test]
    fn test_summary_tracks_bounds() {
        let histogram = Histogram::new();
        histogram.record(12.5);
        histogram.record(3.0);
        histogram.record(40.0);

        let summary = histogram.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 3.0);
        assert_eq!(summary.max, 40.0);
        assert!((summary.sum - 55.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_observations_ignored() {
        let histogram = Histogram::new();
        histogram.record(f64::NAN);
        histogram.record(f64::INFINITY);
        assert_eq!(histogram.summary().count, 0);
    }

    #[test]
    fn test_concurrent_recording_sums_exactly() {
        let histogram = Arc::new(Histogram::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let histogram = histogram.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        histogram.record(2.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let summary = histogram.summary();
        assert_eq!(summary.count, 2000);
        assert_eq!(summary.sum, 4000.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 2.0);
    }
}
