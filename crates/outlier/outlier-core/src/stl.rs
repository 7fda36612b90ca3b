//! Seasonal-trend decomposition by LOESS (STL).
//!
//! Additive decomposition `Y = T + S + R` following Cleveland et al. (1990):
//! an inner loop alternates cycle-subseries smoothing, a low-pass filter and
//! trend smoothing; an optional outer loop recomputes bisquare robustness
//! weights from the remainder. All local regressions are linear and every
//! point is evaluated (no jumps).

use outlier_api::{validate_seasonal_window, StlConfig};
use outlier_spi::{Decomposer, DecompositionResult, OutlierError, Result};
use serde::{Deserialize, Serialize};

const ROBUST_INNER_ITERATIONS: usize = 2;
const ROBUST_OUTER_ITERATIONS: usize = 15;
const INNER_ITERATIONS: usize = 5;

/// STL decomposer with fully resolved smoothing windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StlDecomposer {
    period: usize,
    seasonal: usize,
    trend: usize,
    low_pass: usize,
    inner_iterations: usize,
    outer_iterations: usize,
    robust: bool,
}

impl StlDecomposer {
    /// Create from configuration, validating every window.
    pub fn new(config: &StlConfig) -> Result<Self> {
        if config.period < 2 {
            return Err(OutlierError::invalid_parameter(
                "period",
                format!("must be at least 2, got {}", config.period),
            ));
        }
        validate_seasonal_window(config.seasonal)?;

        let trend = config
            .trend
            .unwrap_or_else(|| default_trend_window(config.period, config.seasonal));
        check_window("trend", trend, config.period)?;

        let low_pass = config.low_pass.unwrap_or_else(|| next_odd(config.period + 1));
        check_window("low_pass", low_pass, config.period)?;

        let (inner_iterations, outer_iterations) = if config.robust {
            (ROBUST_INNER_ITERATIONS, ROBUST_OUTER_ITERATIONS)
        } else {
            (INNER_ITERATIONS, 0)
        };

        Ok(Self {
            period: config.period,
            seasonal: config.seasonal,
            trend,
            low_pass,
            inner_iterations,
            outer_iterations,
            robust: config.robust,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn seasonal_window(&self) -> usize {
        self.seasonal
    }

    pub fn trend_window(&self) -> usize {
        self.trend
    }

    pub fn low_pass_window(&self) -> usize {
        self.low_pass
    }

    pub fn is_robust(&self) -> bool {
        self.robust
    }

    /// One pass of the inner loop; updates `trend` and `seasonal` in place.
    fn inner_pass(
        &self,
        y: &[f64],
        trend: &mut Vec<f64>,
        seasonal: &mut [f64],
        weights: Option<&[f64]>,
    ) {
        let n = y.len();
        let p = self.period;

        let detrended: Vec<f64> = y.iter().zip(trend.iter()).map(|(v, t)| v - t).collect();
        let cycle = cycle_subseries(&detrended, p, self.seasonal, weights);
        let low = loess(&low_pass_filter(&cycle, p), self.low_pass, None);

        for i in 0..n {
            seasonal[i] = cycle[p + i] - low[i];
        }

        let deseasonalized: Vec<f64> = y.iter().zip(seasonal.iter()).map(|(v, s)| v - s).collect();
        *trend = loess(&deseasonalized, self.trend, weights);
    }
}

impl Decomposer for StlDecomposer {
    fn decompose(&self, values: &[f64]) -> Result<DecompositionResult> {
        let n = values.len();
        if n <= self.period {
            return Err(OutlierError::InsufficientData {
                required: self.period + 1,
                actual: n,
            });
        }
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(OutlierError::invalid_parameter(
                "values",
                format!("non-finite value at position {}", position),
            ));
        }

        let mut trend = vec![0.0; n];
        let mut seasonal = vec![0.0; n];
        let mut weights = vec![1.0; n];
        let mut reweight = false;

        for outer in 0..=self.outer_iterations {
            for _ in 0..self.inner_iterations {
                let w = if reweight { Some(weights.as_slice()) } else { None };
                self.inner_pass(values, &mut trend, &mut seasonal, w);
            }
            if outer < self.outer_iterations {
                weights = robustness_weights(values, &trend, &seasonal);
                reweight = true;
            }
        }

        if self.robust {
            weights = robustness_weights(values, &trend, &seasonal);
        }

        let residual = values
            .iter()
            .zip(&trend)
            .zip(&seasonal)
            .map(|((v, t), s)| v - t - s)
            .collect();

        Ok(DecompositionResult {
            trend,
            seasonal,
            residual,
            weights,
        })
    }
}

/// Smallest odd integer at or above `1.5 * period / (1 - 1.5 / seasonal)`.
pub fn default_trend_window(period: usize, seasonal: usize) -> usize {
    let raw = (1.5 * period as f64 / (1.0 - 1.5 / seasonal as f64)).ceil() as usize;
    next_odd(raw)
}

fn next_odd(x: usize) -> usize {
    if x % 2 == 0 {
        x + 1
    } else {
        x
    }
}

fn check_window(name: &str, window: usize, period: usize) -> Result<()> {
    if window < 3 || window % 2 == 0 || window <= period {
        return Err(OutlierError::invalid_parameter(
            name,
            format!(
                "window {} must be odd, at least 3 and larger than the period {}",
                window, period
            ),
        ));
    }
    Ok(())
}

/// Local linear fit at position `xs` using points `left..=right` with tricube
/// neighbourhood weights. Returns `None` when every weight vanishes.
fn local_fit(
    y: &[f64],
    window: usize,
    xs: f64,
    left: usize,
    right: usize,
    robustness: Option<&[f64]>,
) -> Option<f64> {
    let n = y.len();
    let range = (n - 1) as f64;
    let mut h = (xs - left as f64).max(right as f64 - xs);
    if window > n {
        h += ((window - n) / 2) as f64;
    }
    let h_upper = 0.999 * h;
    let h_lower = 0.001 * h;

    let mut w = vec![0.0; right - left + 1];
    let mut total = 0.0;
    for (k, j) in (left..=right).enumerate() {
        let r = (j as f64 - xs).abs();
        if r <= h_upper {
            let mut wj = if r <= h_lower {
                1.0
            } else {
                (1.0 - (r / h).powi(3)).powi(3)
            };
            if let Some(rw) = robustness {
                wj *= rw[j];
            }
            w[k] = wj;
            total += wj;
        }
    }
    if total <= 0.0 {
        return None;
    }
    for wj in &mut w {
        *wj /= total;
    }

    if h > 0.0 {
        let center: f64 = (left..=right).zip(&w).map(|(j, wj)| wj * j as f64).sum();
        let spread: f64 = (left..=right)
            .zip(&w)
            .map(|(j, wj)| wj * (j as f64 - center).powi(2))
            .sum();
        if spread.sqrt() > 0.001 * range {
            let slope = (xs - center) / spread;
            for (j, wj) in (left..=right).zip(w.iter_mut()) {
                *wj *= slope * (j as f64 - center) + 1.0;
            }
        }
    }

    Some((left..=right).zip(&w).map(|(j, wj)| wj * y[j]).sum())
}

/// LOESS smoothing of a whole sequence with a sliding `window`-point
/// neighbourhood.
fn loess(y: &[f64], window: usize, robustness: Option<&[f64]>) -> Vec<f64> {
    let n = y.len();
    if n < 2 {
        return y.to_vec();
    }

    let mut out = vec![0.0; n];
    if window >= n {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = local_fit(y, window, i as f64, 0, n - 1, robustness).unwrap_or(y[i]);
        }
        return out;
    }

    let half = (window + 1) / 2;
    let (mut left, mut right) = (0, window - 1);
    for (i, slot) in out.iter_mut().enumerate() {
        if i + 1 > half && right != n - 1 {
            left += 1;
            right += 1;
        }
        *slot = local_fit(y, window, i as f64, left, right, robustness).unwrap_or(y[i]);
    }
    out
}

/// Smooth each cycle-subseries and extend it by one period at both ends.
///
/// The output has `n + 2 * period` points: position `period + i` holds the
/// smoothed value for observation `i`.
fn cycle_subseries(
    y: &[f64],
    period: usize,
    window: usize,
    robustness: Option<&[f64]>,
) -> Vec<f64> {
    let n = y.len();
    let mut out = vec![0.0; n + 2 * period];

    for phase in 0..period.min(n) {
        let idx: Vec<usize> = (phase..n).step_by(period).collect();
        let k = idx.len();
        let sub: Vec<f64> = idx.iter().map(|&i| y[i]).collect();
        let sub_weights: Option<Vec<f64>> =
            robustness.map(|rw| idx.iter().map(|&i| rw[i]).collect());
        let sub_weights = sub_weights.as_deref();

        let smoothed = loess(&sub, window, sub_weights);

        let right = window.min(k) - 1;
        let before = local_fit(&sub, window, -1.0, 0, right, sub_weights).unwrap_or(smoothed[0]);
        let left = k.saturating_sub(window);
        let after =
            local_fit(&sub, window, k as f64, left, k - 1, sub_weights).unwrap_or(smoothed[k - 1]);

        out[phase] = before;
        for (m, value) in smoothed.iter().enumerate() {
            out[(m + 1) * period + phase] = *value;
        }
        out[(k + 1) * period + phase] = after;
    }
    out
}

fn moving_average(x: &[f64], window: usize) -> Vec<f64> {
    let width = window as f64;
    let mut sum: f64 = x[..window].iter().sum();
    let mut out = Vec::with_capacity(x.len() - window + 1);
    out.push(sum / width);
    for j in window..x.len() {
        sum += x[j] - x[j - window];
        out.push(sum / width);
    }
    out
}

/// Moving averages of length `period`, `period` and 3; shortens the input by
/// `2 * period`.
fn low_pass_filter(x: &[f64], period: usize) -> Vec<f64> {
    let once = moving_average(x, period);
    let twice = moving_average(&once, period);
    moving_average(&twice, 3)
}

/// Bisquare weights of `|remainder| / (6 * median |remainder|)`.
fn robustness_weights(y: &[f64], trend: &[f64], seasonal: &[f64]) -> Vec<f64> {
    let remainder: Vec<f64> = y
        .iter()
        .zip(trend)
        .zip(seasonal)
        .map(|((v, t), s)| (v - t - s).abs())
        .collect();

    let mut sorted = remainder.clone();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let median = 0.5 * (sorted[(n - 1) / 2] + sorted[n / 2]);
    let scale = 6.0 * median;
    let upper = 0.999 * scale;
    let lower = 0.001 * scale;

    remainder
        .iter()
        .map(|&r| {
            if r <= lower {
                1.0
            } else if r <= upper {
                (1.0 - (r / scale).powi(2)).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}
