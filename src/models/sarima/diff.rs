//! Differencing utilities for seasonal ARIMA models.

use super::polynomial::multiply;

/// Apply differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Seasonal differencing order
/// * `period` - Seasonal period
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if d == 0 || period == 0 {
        return series.to_vec();
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Coefficients `c` of `(1 - B)^d (1 - B^s)^D`, lowest power first.
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = multiply(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = multiply(&poly, &seasonal);
        }
    }
    poly
}

/// Apply a differencing polynomial: `w_t = Σ c_k y_{t-k}`.
///
/// The result is `poly.len() - 1` observations shorter than `series`.
pub fn apply_differencing(series: &[f64], poly: &[f64]) -> Vec<f64> {
    let lag = poly.len().saturating_sub(1);
    if series.len() <= lag {
        return Vec::new();
    }
    (lag..series.len())
        .map(|t| poly.iter().enumerate().map(|(k, c)| c * series[t - k]).sum())
        .collect()
}

/// Undo differencing for values that continue `history`.
///
/// Each element of `differenced` is a future `w`; the matching level is
/// `y_t = w_t - Σ_{k≥1} c_k y_{t-k}`, where earlier levels come from
/// `history` and the values already integrated.
pub fn integrate(history: &[f64], differenced: &[f64], poly: &[f64]) -> Vec<f64> {
    let mut extended = history.to_vec();
    extended.reserve(differenced.len());

    for &w in differenced {
        let t = extended.len();
        let carried: f64 = poly
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(k, _)| *k <= t)
            .map(|(k, c)| c * extended[t - k])
            .sum();
        extended.push(w - carried);
    }

    extended.split_off(history.len())
}
