use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Timing {
    pub label: String,
    pub elapsed: Duration,
}

impl Timing {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }
}

#[derive(Default)]
pub struct PerfRecorder {
    timings: Mutex<Vec<Timing>>,
}

impl PerfRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measure<T, F>(&self, label: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let out = f();
        let timing = Timing {
            label: label.to_string(),
            elapsed: start.elapsed(),
        };
        info!(elapsed_ms = timing.millis(), "Time to {label}");
        self.timings.lock().push(timing);
        out
    }

    pub fn snapshot(&self) -> Vec<Timing> {
        self.timings.lock().clone()
    }

    pub fn last(&self) -> Option<Timing> {
        self.timings.lock().last().cloned()
    }

    pub fn total(&self, label: &str) -> Duration {
        self.timings
            .lock()
            .iter()
            .filter(|t| t.label == label)
            .map(|t| t.elapsed)
            .sum()
    }

    pub fn reset(&self) {
        self.timings.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::PerfRecorder;

    #[test]
    fn test_measure_returns_value_and_records() {
        let recorder = PerfRecorder::new();
        let value = recorder.measure("compute", || 40 + 2);
        assert_eq!(value, 42);
        let timings = recorder.snapshot();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].label, "compute");
    }

    #[test]
    fn test_total_and_reset() {
        let recorder = PerfRecorder::new();
        recorder.measure("a", || ());
        recorder.measure("b", || ());
        recorder.measure("a", || ());
        assert_eq!(recorder.snapshot().len(), 3);
        assert!(recorder.total("a") >= recorder.snapshot()[0].elapsed);
        assert_eq!(recorder.last().map(|t| t.label), Some("a".to_string()));
        recorder.reset();
        assert!(recorder.snapshot().is_empty());
    }
}
