use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcomes are recorded in hundredths of a bucket.
const SCALE: f64 = 100.0;

/// Running distribution of served outcomes.
pub struct OutcomeStats {
    histogram: Mutex<Histogram<u64>>,
    served: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub served: u64,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
    pub max: f64,
}

impl OutcomeStats {
    pub fn new(partition_size: usize) -> Self {
        let high = ((partition_size as f64 * SCALE) as u64).max(2);
        let histogram = Histogram::<u64>::new_with_max(high, 3).expect("histogram bounds");
        Self {
            histogram: Mutex::new(histogram),
            served: AtomicU64::new(0),
        }
    }

    pub fn record(&self, outcome: f64) {
        self.served.fetch_add(1, Ordering::Relaxed);
        self.histogram.lock().saturating_record((outcome * SCALE) as u64);
    }

    pub fn served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }

    pub fn summary(&self) -> OutcomeSummary {
        let h = self.histogram.lock();
        OutcomeSummary {
            served: self.served(),
            mean: h.mean() / SCALE,
            p50: h.value_at_quantile(0.5) as f64 / SCALE,
            p90: h.value_at_quantile(0.9) as f64 / SCALE,
            p99: h.value_at_quantile(0.99) as f64 / SCALE,
            max: h.max() as f64 / SCALE,
        }
    }
}
