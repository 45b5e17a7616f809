//! ---
//! sw_section: "01-core-functionality"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Conversions between ticks and wall-clock time."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::time::Duration;

/// Number of whole ticks that fit in `duration` at `tick_rate_hz`.
pub fn ticks_in(duration: Duration, tick_rate_hz: f64) -> u64 {
    let ticks = (duration.as_secs_f64() * tick_rate_hz).floor();
    if ticks.is_finite() && ticks > 0.0 {
        ticks as u64
    } else {
        0
    }
}

/// Simulated time covered by `ticks` at `tick_rate_hz`.
pub fn simulated_time(ticks: u64, tick_rate_hz: f64) -> Duration {
    if tick_rate_hz <= 0.0 || !tick_rate_hz.is_finite() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(ticks as f64 / tick_rate_hz)
}

/// Convert a duration into microseconds, saturating at `u64::MAX`.
pub fn duration_to_micros(duration: Duration) -> u64 {
    duration
        .as_secs()
        .saturating_mul(1_000_000)
        .saturating_add(u64::from(duration.subsec_micros()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_conversions() {
        assert_eq!(ticks_in(Duration::from_secs(2), 60.0), 120);
        assert_eq!(ticks_in(Duration::from_millis(10), 60.0), 0);
        assert_eq!(simulated_time(120, 60.0), Duration::from_secs(2));
        assert_eq!(simulated_time(5, 0.0), Duration::ZERO);
    }

    #[test]
    fn micros_saturate() {
        assert_eq!(duration_to_micros(Duration::from_millis(3)), 3_000);
        assert_eq!(duration_to_micros(Duration::MAX), u64::MAX);
    }
}
