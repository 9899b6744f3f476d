// Qualitative trend: recent mean vs. earliest mean, ±10% relative change

use crate::models::Trend;

const TREND_WINDOW: usize = 5;
const TREND_THRESHOLD: f64 = 0.10;

pub fn analyze_trend(series: &[f64]) -> Trend {
    let n = series.len();
    if n < 2 {
        return Trend::Unknown;
    }
    let k = TREND_WINDOW.min(n);
    let first = mean(&series[..k]);
    let last = mean(&series[n - k..]);

    if first.abs() < f64::EPSILON {
        return if last > f64::EPSILON {
            Trend::Increasing
        } else {
            Trend::Stable
        };
    }
    let change = (last - first) / first.abs();
    if change > TREND_THRESHOLD {
        Trend::Increasing
    } else if change < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_directions() {
        let rising = [10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let falling: Vec<f64> = rising.iter().rev().copied().collect();
        assert_eq!(analyze_trend(&rising), Trend::Increasing);
        assert_eq!(analyze_trend(&falling), Trend::Decreasing);
        assert_eq!(
            analyze_trend(&[50.0, 51.0, 49.0, 50.0, 50.0, 52.0, 48.0, 51.0]),
            Trend::Stable
        );
    }

    #[test]
    fn short_series_is_unknown() {
        assert_eq!(analyze_trend(&[]), Trend::Unknown);
        assert_eq!(analyze_trend(&[42.0]), Trend::Unknown);
    }

    #[test]
    fn zero_baseline() {
        assert_eq!(
            analyze_trend(&[0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0]),
            Trend::Increasing
        );
        assert_eq!(analyze_trend(&[0.0, 0.0, 0.0]), Trend::Stable);
    }
}
