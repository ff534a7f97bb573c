//! Request metrics for the HTTP surface: counts, failures, latency.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::ErrorKind;

/// Latency samples kept for averages and percentiles; older ones are dropped.
pub const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Collects per-request metrics for recommendation calls.
///
/// Counters cover every request; latency statistics cover the most recent
/// `MAX_LATENCY_SAMPLES` successes.
#[derive(Debug)]
pub struct MetricsCollector {
    latencies_us: VecDeque<f64>,
    total_requests: u64,
    unknown_title: u64,
    invalid_request: u64,
    internal_failures: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            latencies_us: VecDeque::new(),
            total_requests: 0,
            unknown_title: 0,
            invalid_request: 0,
            internal_failures: 0,
        }
    }

    /// Record a successful recommendation request with its duration.
    pub fn record_success(&mut self, duration: Duration) {
        self.total_requests += 1;
        if self.latencies_us.len() == MAX_LATENCY_SAMPLES {
            self.latencies_us.pop_front();
        }
        self.latencies_us.push_back(duration.as_micros() as f64);
    }

    /// Record a failed recommendation request.
    pub fn record_failure(&mut self, kind: ErrorKind) {
        self.total_requests += 1;
        match kind {
            ErrorKind::UnknownTitle => self.unknown_title += 1,
            ErrorKind::InvalidRequest => self.invalid_request += 1,
            ErrorKind::Data | ErrorKind::Index => self.internal_failures += 1,
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn total_failures(&self) -> u64 {
        self.unknown_title + self.invalid_request + self.internal_failures
    }

    pub fn unknown_title(&self) -> u64 {
        self.unknown_title
    }

    pub fn invalid_request(&self) -> u64 {
        self.invalid_request
    }

    pub fn internal_failures(&self) -> u64 {
        self.internal_failures
    }

    /// Number of latency samples currently retained.
    pub fn latency_samples(&self) -> usize {
        self.latencies_us.len()
    }

    /// Average latency of successful requests in microseconds.
    pub fn avg_latency_us(&self) -> f64 {
        if self.latencies_us.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.latencies_us.iter().sum();
        sum / self.latencies_us.len() as f64
    }

    /// Get a percentile of request latency (e.g., 50.0, 95.0, 99.0).
    pub fn percentile_latency_us(&self, percentile: f64) -> f64 {
        if self.latencies_us.is_empty() {
            return 0.0;
        }

        let mut sorted: Vec<f64> = self.latencies_us.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let index = ((percentile / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[index.min(sorted.len() - 1)]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counts() {
        let mut m = MetricsCollector::new();
        m.record_success(Duration::from_micros(10));
        m.record_failure(ErrorKind::UnknownTitle);
        m.record_failure(ErrorKind::Index);
        m.record_failure(ErrorKind::Data);

        assert_eq!(m.total_requests(), 4);
        assert_eq!(m.total_failures(), 3);
        assert_eq!(m.unknown_title(), 1);
        assert_eq!(m.invalid_request(), 0);
        assert_eq!(m.internal_failures(), 2);
    }

    #[test]
    fn test_metrics_latency() {
        let mut m = MetricsCollector::new();
        m.record_success(Duration::from_micros(100));
        m.record_success(Duration::from_micros(200));
        m.record_success(Duration::from_micros(300));

        assert!((m.avg_latency_us() - 200.0).abs() < 1.0);
        assert!((m.percentile_latency_us(50.0) - 200.0).abs() < 1.0);
        assert!((m.percentile_latency_us(99.0) - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_latency_samples_are_bounded() {
        let mut m = MetricsCollector::new();
        for i in 0..MAX_LATENCY_SAMPLES + 500 {
            m.record_success(Duration::from_micros(i as u64));
        }

        assert_eq!(m.latency_samples(), MAX_LATENCY_SAMPLES);
        assert_eq!(m.total_requests(), (MAX_LATENCY_SAMPLES + 500) as u64);
        // The oldest 500 samples (0..500us) were dropped.
        assert!((m.percentile_latency_us(0.0) - 500.0).abs() < 1.0);
    }

    #[test]
    fn test_metrics_empty() {
        let m = MetricsCollector::new();
        assert_eq!(m.avg_latency_us(), 0.0);
        assert_eq!(m.percentile_latency_us(99.0), 0.0);
    }
}
