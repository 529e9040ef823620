use std::sync::Mutex;

/// Counters for the click-driven lookup path: selections served and lookups
/// that failed (bad index, vanished image file).
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    selections: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                selections: 0,
                errors: 0,
            }),
        }
    }

    pub fn record_selection(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.selections += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.selections, metrics.errors)
        } else {
            (0, 0)
        }
    }

    /// Counter summary in the form the viewer prints on shutdown.
    pub fn summary(&self) -> String {
        let (selections, errors) = self.snapshot();
        format!("{} selections served, {} lookup errors", selections, errors)
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
