// Regression models over an index-based series (x = 0..n-1). Raw projections, unclamped.

const SINGULAR_EPSILON: f64 = 1e-10;
const MOVING_AVERAGE_WINDOW: usize = 5;

/// Least-squares (slope, intercept). Fewer than two points: slope 0, intercept the lone value.
pub(super) fn linear_coefficients(y: &[f64]) -> (f64, f64) {
    let n = y.len();
    if n < 2 {
        return (0.0, y.first().copied().unwrap_or(0.0));
    }
    let nf = n as f64;
    let sum_x = (nf - 1.0) * nf / 2.0;
    let sum_x2 = (nf - 1.0) * nf * (2.0 * nf - 1.0) / 6.0;
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = y.iter().enumerate().map(|(i, v)| i as f64 * v).sum();

    let denom = nf * sum_x2 - sum_x * sum_x;
    let slope = if denom.abs() < SINGULAR_EPSILON {
        0.0
    } else {
        (nf * sum_xy - sum_x * sum_y) / denom
    };
    let intercept = (sum_y - slope * sum_x) / nf;
    (slope, intercept)
}

pub(super) fn project_linear(y: &[f64], periods: usize) -> Vec<f64> {
    let (slope, intercept) = linear_coefficients(y);
    let n = y.len();
    (0..periods)
        .map(|i| slope * (n + i) as f64 + intercept)
        .collect()
}

/// (a, b, c) of `a·x² + b·x + c` from the normal equations; None when n < 3 or singular.
pub(super) fn quadratic_coefficients(y: &[f64]) -> Option<(f64, f64, f64)> {
    if y.len() < 3 {
        return None;
    }
    // s[k] = Σ x^k for k in 0..=4, t[k] = Σ x^k·y for k in 0..=2
    let mut s = [0.0f64; 5];
    let mut t = [0.0f64; 3];
    for (i, v) in y.iter().enumerate() {
        let x = i as f64;
        let mut p = 1.0;
        for (k, sk) in s.iter_mut().enumerate() {
            *sk += p;
            if let Some(tk) = t.get_mut(k) {
                *tk += p * v;
            }
            p *= x;
        }
    }

    let m = [[s[4], s[3], s[2]], [s[3], s[2], s[1]], [s[2], s[1], s[0]]];
    let rhs = [t[2], t[1], t[0]];
    let det = det3(&m);
    if det.abs() < SINGULAR_EPSILON {
        return None;
    }
    let solve = |col: usize| {
        let mut mc = m;
        for (row, r) in mc.iter_mut().enumerate() {
            r[col] = rhs[row];
        }
        det3(&mc) / det
    };
    Some((solve(0), solve(1), solve(2)))
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Quadratic projection, falling back to linear for short or degenerate series.
pub(super) fn project_quadratic(y: &[f64], periods: usize) -> Vec<f64> {
    let Some((a, b, c)) = quadratic_coefficients(y) else {
        return project_linear(y, periods);
    };
    let n = y.len();
    (0..periods)
        .map(|i| {
            let x = (n + i) as f64;
            a * x * x + b * x + c
        })
        .collect()
}

/// Trailing mean over `min(5, n)` points; the first `window - 1` points stay raw.
pub(super) fn smooth(y: &[f64]) -> Vec<f64> {
    let window = MOVING_AVERAGE_WINDOW.min(y.len());
    y.iter()
        .enumerate()
        .map(|(i, v)| {
            if i + 1 < window {
                *v
            } else {
                let slice = &y[i + 1 - window..=i];
                slice.iter().sum::<f64>() / window as f64
            }
        })
        .collect()
}

pub(super) fn project_moving_average(y: &[f64], periods: usize) -> Vec<f64> {
    let smoothed = smooth(y);
    let Some(&last) = smoothed.last() else {
        return Vec::new();
    };
    let trend = match smoothed.len() {
        0 | 1 => 0.0,
        n => last - smoothed[n - 2],
    };
    (0..periods)
        .map(|i| last + trend * (i + 1) as f64)
        .collect()
}
