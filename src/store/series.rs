//! Per-name series buffer: chronological points with age-based purging.

use std::collections::VecDeque;

use serde::Serialize;

use crate::store::point::MetricPoint;

/// Ordered buffer of points for one metric name.
///
/// Invariant: timestamps are non-decreasing front to back. Appends carry
/// the sampling order, so an out-of-order timestamp is clamped up to the
/// previous point's rather than breaking the ordering.
#[derive(Debug, Default)]
pub struct SeriesBuffer {
    points: VecDeque<MetricPoint>,
}

/// Aggregates over the currently retained window of one series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub last: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl SeriesBuffer {
    pub fn append(&mut self, mut point: MetricPoint, retention_ms: u64, now_ms: u64) {
        if let Some(last) = self.points.back() {
            if point.timestamp_ms < last.timestamp_ms {
                point.timestamp_ms = last.timestamp_ms;
            }
        }
        self.points.push_back(point);
        self.purge(retention_ms, now_ms);
    }

    /// Drop points whose age exceeds the retention window.
    pub fn purge(&mut self, retention_ms: u64, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(retention_ms);
        while let Some(front) = self.points.front() {
            if front.timestamp_ms < cutoff {
                self.points.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &MetricPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Summary over the retained points, `None` when the window is empty.
    pub fn summary(&self) -> Option<SeriesSummary> {
        let last = self.points.back()?.value;
        let count = self.points.len();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in &self.points {
            sum += point.value;
            min = min.min(point.value);
            max = max.max(point.value);
        }
        Some(SeriesSummary {
            last,
            average: sum / count as f64,
            min,
            max,
            count,
        })
    }
}
