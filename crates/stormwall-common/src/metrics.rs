//! ---
//! sw_section: "01-core-functionality"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Frame timing and jitter measurement."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

/// Running statistics of the absolute deviation between actual and target
/// frame intervals. Storage is constant regardless of how many frames are seen.
#[derive(Debug, Default)]
pub struct JitterHistogram {
    stats: Mutex<RunningStats>,
}

#[derive(Debug, Default, Clone, Copy)]
struct RunningStats {
    count: u64,
    mean: f64,
    // Sum of squared deviations from the mean (Welford).
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }
}

impl JitterHistogram {
    pub fn record(&self, jitter: Duration) {
        let micros = jitter.as_secs_f64() * 1_000_000.0;
        self.stats.lock().push(micros);
    }

    pub fn summary(&self) -> Option<JitterSummary> {
        let stats = *self.stats.lock();
        if stats.count == 0 {
            return None;
        }
        let variance = if stats.count > 1 {
            stats.m2 / (stats.count - 1) as f64
        } else {
            0.0
        };
        Some(JitterSummary {
            mean_us: stats.mean,
            std_dev_us: variance.sqrt(),
            max_us: stats.max,
            min_us: stats.min,
            samples: stats.count,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JitterSummary {
    pub mean_us: f64,
    pub std_dev_us: f64,
    pub max_us: f64,
    pub min_us: f64,
    pub samples: u64,
}

/// Scores measured frame times against a target period.
#[derive(Debug)]
pub struct FrameClock {
    target_interval: Duration,
    histogram: JitterHistogram,
}

impl FrameClock {
    pub fn new(target_interval: Duration) -> Self {
        Self {
            target_interval,
            histogram: JitterHistogram::default(),
        }
    }

    /// Record a frame that took `elapsed` and hand the frame time back.
    pub fn observe(&self, elapsed: Duration) -> Duration {
        let jitter = if elapsed > self.target_interval {
            elapsed - self.target_interval
        } else {
            self.target_interval - elapsed
        };
        self.histogram.record(jitter);
        elapsed
    }

    pub fn target_interval(&self) -> Duration {
        self.target_interval
    }

    pub fn histogram(&self) -> &JitterHistogram {
        &self.histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clock_has_no_summary() {
        let clock = FrameClock::new(Duration::from_millis(16));
        assert_eq!(clock.target_interval(), Duration::from_millis(16));
        assert!(clock.histogram().summary().is_none());
    }

    #[test]
    fn jitter_is_absolute_deviation() {
        let clock = FrameClock::new(Duration::from_millis(10));
        assert_eq!(
            clock.observe(Duration::from_millis(14)),
            Duration::from_millis(14)
        );
        clock.observe(Duration::from_millis(6));
        let summary = clock.histogram().summary().unwrap();
        assert_eq!(summary.samples, 2);
        assert!((summary.max_us - 4_000.0).abs() < 1e-6);
        assert!((summary.min_us - 4_000.0).abs() < 1e-6);
        assert!((summary.mean_us - 4_000.0).abs() < 1e-6);
        assert!(summary.std_dev_us.abs() < 1e-6);
    }

    #[test]
    fn running_summary_matches_sample_statistics() {
        let histogram = JitterHistogram::default();
        for micros in [2u64, 4, 4, 4, 5, 5, 7, 9] {
            histogram.record(Duration::from_micros(micros));
        }
        let summary = histogram.summary().unwrap();
        assert_eq!(summary.samples, 8);
        assert!((summary.mean_us - 5.0).abs() < 1e-9);
        // Sample variance of the set is 32 / 7.
        assert!((summary.std_dev_us - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);
        assert!((summary.min_us - 2.0).abs() < 1e-9);
        assert!((summary.max_us - 9.0).abs() < 1e-9);
    }

    #[test]
    fn an_hour_of_frames_keeps_constant_state() {
        let clock = FrameClock::new(Duration::from_micros(16_667));
        for frame in 0..216_000u64 {
            let wobble = Duration::from_micros(frame % 100);
            clock.observe(Duration::from_micros(16_667) + wobble);
        }
        assert_eq!(
            std::mem::size_of::<JitterHistogram>(),
            std::mem::size_of::<Mutex<RunningStats>>()
        );
        let summary = clock.histogram().summary().unwrap();
        assert_eq!(summary.samples, 216_000);
        assert!((summary.max_us - 99.0).abs() < 1e-6);
        assert!(summary.min_us.abs() < 1e-6);
        assert!((summary.mean_us - 49.5).abs() < 1e-6);
    }
}
