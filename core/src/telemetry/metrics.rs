use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    samples_ingested: usize,
    reports_built: usize,
    records_skipped: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                samples_ingested: 0,
                reports_built: 0,
                records_skipped: 0,
            }),
        }
    }

    pub fn record_samples(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples_ingested += count;
        }
    }

    pub fn record_report(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.reports_built += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.records_skipped += 1;
        }
    }

    /// (samples ingested, reports built, records skipped)
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (
                metrics.samples_ingested,
                metrics.reports_built,
                metrics.records_skipped,
            )
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
