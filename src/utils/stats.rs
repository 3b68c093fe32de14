//! Statistical utility functions.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal};

/// Quantile function of the standard normal distribution.
///
/// # Example
/// ```
/// use milk_forecast::utils::quantile_normal;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(p))
        .unwrap_or(f64::NAN)
}

/// Standard normal survival function, P(Z > x).
pub fn normal_sf(x: f64) -> f64 {
    Normal::new(0.0, 1.0).map(|n| n.sf(x)).unwrap_or(f64::NAN)
}

/// Chi-squared survival function, P(X > x) with `df` degrees of freedom.
pub fn chi_squared_sf(x: f64, df: usize) -> f64 {
    if x.is_nan() || df == 0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    ChiSquared::new(df as f64)
        .map(|d| d.sf(x))
        .unwrap_or(f64::NAN)
}

/// F distribution CDF and survival function at `x`, as `(cdf, sf)`.
pub fn f_cdf_sf(x: f64, d1: f64, d2: f64) -> (f64, f64) {
    match FisherSnedecor::new(d1, d2) {
        Ok(dist) if x.is_finite() && x >= 0.0 => (dist.cdf(x), dist.sf(x)),
        _ => (f64::NAN, f64::NAN),
    }
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the non-NaN entries.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Central moment of order `k` (population, n denominator).
pub fn central_moment(values: &[f64], k: i32) -> f64 {
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(k)).sum::<f64>() / values.len() as f64
}

/// Sample skewness, m3 / m2^1.5.
pub fn skewness(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return f64::NAN;
    }
    let m2 = central_moment(values, 2);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    central_moment(values, 3) / m2.powf(1.5)
}

/// Sample kurtosis, m4 / m2^2 (3 for a normal distribution).
pub fn kurtosis(values: &[f64]) -> f64 {
    if values.len() < 4 {
        return f64::NAN;
    }
    let m2 = central_moment(values, 2);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    central_moment(values, 4) / (m2 * m2)
}

/// Calculate the autocorrelation at a given lag.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return f64::NAN;
    }
    let m = mean(values);
    let n = values.len();

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for i in 0..n {
        denominator += (values[i] - m).powi(2);
        if i >= lag {
            numerator += (values[i] - m) * (values[i - lag] - m);
        }
    }

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Partial autocorrelations at lags `1..=max_lag` (Durbin-Levinson on the sample ACF).
pub fn partial_autocorrelation(values: &[f64], max_lag: usize) -> Vec<f64> {
    if max_lag == 0 || values.len() <= max_lag {
        return vec![0.0; max_lag];
    }

    let acf: Vec<f64> = (0..=max_lag).map(|k| autocorrelation(values, k)).collect();
    let mut pacf = Vec::with_capacity(max_lag);
    let mut phi: Vec<f64> = Vec::new();

    for k in 1..=max_lag {
        let num = acf[k] - (1..k).map(|j| phi[j - 1] * acf[k - j]).sum::<f64>();
        let den = 1.0 - (1..k).map(|j| phi[j - 1] * acf[j]).sum::<f64>();
        let phi_kk = if den.abs() < 1e-12 { 0.0 } else { num / den };

        let mut next = vec![0.0; k];
        for j in 1..k {
            next[j - 1] = phi[j - 1] - phi_kk * phi[k - j - 1];
        }
        next[k - 1] = phi_kk;
        phi = next;
        pacf.push(phi_kk);
    }

    pacf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_normal_known_values() {
        assert_relative_eq!(quantile_normal(0.5), 0.0, epsilon = 1e-6);
        assert_relative_eq!(quantile_normal(0.975), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(quantile_normal(0.025), -1.959964, epsilon = 1e-5);
    }

    #[test]
    fn quantile_normal_boundary_values() {
        assert_eq!(quantile_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn normal_sf_is_symmetric() {
        assert_relative_eq!(normal_sf(0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(normal_sf(1.96) + normal_sf(-1.96), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn chi_squared_sf_known_values() {
        // df = 2 is exponential with mean 2: P(X > 2) = e^-1
        assert_relative_eq!(chi_squared_sf(2.0, 2), (-1.0f64).exp(), epsilon = 1e-9);
        // df = 10 critical value at 5%
        assert_relative_eq!(chi_squared_sf(18.307, 10), 0.05, epsilon = 1e-4);
        assert_eq!(chi_squared_sf(0.0, 3), 1.0);
        assert!(chi_squared_sf(1.0, 0).is_nan());
    }

    #[test]
    fn f_distribution_at_one_is_half_for_equal_dof() {
        let (cdf, sf) = f_cdf_sf(1.0, 20.0, 20.0);
        assert_relative_eq!(cdf, 0.5, epsilon = 1e-9);
        assert_relative_eq!(sf, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn mean_and_variance() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn nan_mean_skips_nan() {
        assert_relative_eq!(nan_mean(&[f64::NAN, 1.0, 3.0]), 2.0);
        assert!(nan_mean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn skewness_and_kurtosis_of_symmetric_data() {
        let values = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(skewness(&values), 0.0, epsilon = 1e-12);
        // m2 = 2, m4 = 6.8 -> 1.7
        assert_relative_eq!(kurtosis(&values), 1.7, epsilon = 1e-12);
        assert!(skewness(&[1.0, 1.0, 1.0]).is_nan());
    }

    #[test]
    fn autocorrelation_lag_0_is_1() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(autocorrelation(&values, 0), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn pacf_first_lag_equals_acf() {
        let values: Vec<f64> = (0..50).map(|i| ((i * 7) % 11) as f64).collect();
        let pacf = partial_autocorrelation(&values, 3);
        assert_eq!(pacf.len(), 3);
        assert_relative_eq!(pacf[0], autocorrelation(&values, 1), epsilon = 1e-12);
    }

    #[test]
    fn pacf_of_ar1_cuts_off() {
        // Uniform shocks on [-0.5, 0.5) from a 64-bit LCG.
        let mut state: u64 = 42;
        let mut shock = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
        };
        let mut values = vec![0.0; 400];
        for i in 1..400 {
            values[i] = 0.7 * values[i - 1] + shock();
        }
        let pacf = partial_autocorrelation(&values, 3);
        assert!(pacf[0] > 0.5);
        assert!(pacf[1].abs() < 0.2);
        assert!(pacf[0].abs() < 1.0);
    }
}
