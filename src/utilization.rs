// Interface utilization from octet counters and nominal speed.
// Pure functions: anomalies (zero speed, counter wrap, negative deltas) degrade to 0%, never fail.

/// Poll period assumed when no sampling interval is supplied (seconds).
pub const DEFAULT_INTERVAL_SECS: f64 = 300.0;

/// (in %, out %) for octet deltas observed over `interval_secs` on a link of `speed_bps`.
///
/// Negative deltas (counter reset or 32-bit rollover) clamp to 0; results clamp to [0, 100].
/// Zero speed or a non-positive interval means unknown capacity and yields (0, 0).
pub fn calculate_interface_utilization(
    in_octets: i64,
    out_octets: i64,
    speed_bps: u64,
    interval_secs: f64,
) -> (f64, f64) {
    if speed_bps == 0 || interval_secs.is_nan() || interval_secs <= 0.0 {
        return (0.0, 0.0);
    }
    let speed = speed_bps as f64;
    let percent = |octets: i64| {
        let bps = octets.max(0) as f64 * 8.0 / interval_secs;
        clamp_percent(bps / speed * 100.0)
    };
    (percent(in_octets), percent(out_octets))
}

pub fn calculate_with_default_interval(
    in_octets: i64,
    out_octets: i64,
    speed_bps: u64,
) -> (f64, f64) {
    calculate_interface_utilization(in_octets, out_octets, speed_bps, DEFAULT_INTERVAL_SECS)
}

/// Cumulative mode: total octets straight against speed, used when no previous reading exists.
pub fn utilization_from_totals(in_octets: u64, out_octets: u64, speed_bps: u64) -> (f64, f64) {
    if speed_bps == 0 {
        return (0.0, 0.0);
    }
    let speed = speed_bps as f64;
    let percent = |octets: u64| clamp_percent(octets as f64 * 8.0 * 100.0 / speed);
    (percent(in_octets), percent(out_octets))
}

/// Signed difference between two cumulative counter readings; negative after a wrap or reset.
pub fn counter_delta(previous: u64, current: u64) -> i64 {
    let delta = i128::from(current) - i128::from(previous);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Clamp into [0, 100]; NaN maps to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_percent_handles_non_finite() {
        assert_eq!(clamp_percent(f64::NAN), 0.0);
        assert_eq!(clamp_percent(f64::INFINITY), 100.0);
        assert_eq!(clamp_percent(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn counter_delta_is_signed() {
        assert_eq!(counter_delta(100, 250), 150);
        assert_eq!(counter_delta(250, 100), -150);
        assert_eq!(counter_delta(0, u64::MAX), i64::MAX);
    }
}
