//! Residual diagnostic tests for fitted models.
//!
//! Provides tests to validate that standardized residuals are white noise,
//! normally distributed and homoskedastic.

use crate::utils::stats::{central_moment, chi_squared_sf, f_cdf_sf, kurtosis, skewness};
use serde::Serialize;

/// Ljung-Box test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LjungBoxResult {
    /// Test statistic Q
    pub statistic: f64,
    /// P-value
    pub p_value: f64,
    /// Number of lags tested
    pub lags: usize,
    /// Degrees of freedom
    pub df: usize,
}

impl LjungBoxResult {
    /// Check if residuals pass at given significance level.
    /// Returns true if we fail to reject null (residuals are white noise).
    pub fn is_white_noise(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Perform Ljung-Box test for autocorrelation in residuals.
///
/// Tests null hypothesis that residuals are independently distributed (white noise).
///
/// # Arguments
/// * `residuals` - Model residuals
/// * `lags` - Number of lags to include (default: min(10, n/5))
/// * `fitted_params` - Number of fitted parameters (for degrees of freedom adjustment)
pub fn ljung_box(residuals: &[f64], lags: Option<usize>, fitted_params: usize) -> LjungBoxResult {
    let n = residuals.len();

    if n < 3 {
        return LjungBoxResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            df: 0,
        };
    }

    let lags = lags.unwrap_or_else(|| 10.min(n / 5).max(1));
    let lags = lags.min(n - 1);
    let df = lags.saturating_sub(fitted_params).max(1);

    let mean: f64 = residuals.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = residuals.iter().map(|&x| x - mean).collect();

    let var: f64 = centered.iter().map(|&x| x * x).sum::<f64>();
    if var == 0.0 {
        return LjungBoxResult {
            statistic: 0.0,
            p_value: 1.0,
            lags,
            df,
        };
    }

    let mut q = 0.0;
    for k in 1..=lags {
        let acf_k: f64 = centered
            .iter()
            .skip(k)
            .zip(centered.iter())
            .map(|(&a, &b)| a * b)
            .sum::<f64>()
            / var;

        q += (acf_k * acf_k) / (n - k) as f64;
    }
    q *= n as f64 * (n + 2) as f64;

    LjungBoxResult {
        statistic: q,
        p_value: chi_squared_sf(q, df),
        lags,
        df,
    }
}

/// Jarque-Bera normality test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JarqueBeraResult {
    /// JB = n/6 * (S^2 + (K - 3)^2 / 4)
    pub statistic: f64,
    /// P-value from chi-squared with 2 degrees of freedom
    pub p_value: f64,
    pub skewness: f64,
    /// Kurtosis (3 for a normal distribution)
    pub kurtosis: f64,
}

impl JarqueBeraResult {
    /// True if normality is not rejected at `alpha`.
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Jarque-Bera test for normality of residuals.
pub fn jarque_bera(residuals: &[f64]) -> JarqueBeraResult {
    let n = residuals.len();
    let s = skewness(residuals);
    let k = kurtosis(residuals);

    if s.is_nan() || k.is_nan() {
        return JarqueBeraResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            skewness: s,
            kurtosis: k,
        };
    }

    let jb = n as f64 / 6.0 * (s * s + (k - 3.0).powi(2) / 4.0);
    JarqueBeraResult {
        statistic: jb,
        p_value: chi_squared_sf(jb, 2),
        skewness: s,
        kurtosis: k,
    }
}

/// Heteroskedasticity (break in variance) test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeteroskedasticityResult {
    /// Sum of squares of the last `h` residuals over that of the first `h`.
    pub statistic: f64,
    /// Two-sided p-value from F(h, h)
    pub p_value: f64,
    /// Size of each comparison block
    pub block: usize,
}

/// Test for a change in residual variance between the first and last thirds.
///
/// Null hypothesis: equal variance. Uses blocks of `h = round(n / 3)`.
pub fn heteroskedasticity(residuals: &[f64]) -> HeteroskedasticityResult {
    let n = residuals.len();
    let h = (n as f64 / 3.0).round() as usize;

    if h < 2 {
        return HeteroskedasticityResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            block: h,
        };
    }

    let numerator: f64 = residuals[n - h..].iter().map(|r| r * r).sum();
    let denominator: f64 = residuals[..h].iter().map(|r| r * r).sum();

    if denominator == 0.0 {
        return HeteroskedasticityResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            block: h,
        };
    }

    let statistic = numerator / denominator;
    let (cdf, sf) = f_cdf_sf(statistic, h as f64, h as f64);
    HeteroskedasticityResult {
        statistic,
        p_value: (2.0 * cdf.min(sf)).min(1.0),
        block: h,
    }
}

/// Population variance of the residuals (n denominator).
pub fn residual_variance(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return f64::NAN;
    }
    central_moment(residuals, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn white_noise(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| ((i as f64 * 12.9898).sin() * 43758.5453).fract())
            .collect()
    }

    // ==================== ljung_box ====================

    #[test]
    fn ljung_box_white_noise() {
        let residuals = white_noise(200);
        let result = ljung_box(&residuals, Some(10), 0);

        assert!(result.statistic >= 0.0);
        assert!(result.p_value >= 0.0 && result.p_value <= 1.0);
        assert_eq!(result.lags, 10);
        assert_eq!(result.df, 10);
    }

    #[test]
    fn ljung_box_autocorrelated() {
        let mut residuals = vec![0.0; 100];
        residuals[0] = 1.0;
        for i in 1..100 {
            residuals[i] = 0.9 * residuals[i - 1] + 0.1 * ((i * 17) % 23) as f64 / 23.0;
        }

        let result = ljung_box(&residuals, Some(10), 0);

        assert!(result.statistic > 0.0);
        assert!(result.p_value < 0.05);
        assert!(!result.is_white_noise(0.05));
    }

    #[test]
    fn ljung_box_lag_one_matches_formula() {
        let residuals = [1.0, -1.0, 2.0, -2.0, 0.5, -0.5];
        let result = ljung_box(&residuals, Some(1), 0);

        let n = residuals.len() as f64;
        let mean = residuals.iter().sum::<f64>() / n;
        let c: Vec<f64> = residuals.iter().map(|r| r - mean).collect();
        let r1 = c.windows(2).map(|w| w[0] * w[1]).sum::<f64>() / c.iter().map(|x| x * x).sum::<f64>();
        let expected = n * (n + 2.0) * r1 * r1 / (n - 1.0);

        assert_relative_eq!(result.statistic, expected, epsilon = 1e-12);
        assert_eq!(result.df, 1);
    }

    #[test]
    fn ljung_box_constant() {
        let residuals = vec![1.0; 50];
        let result = ljung_box(&residuals, Some(5), 0);

        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn ljung_box_short() {
        let result = ljung_box(&[1.0, 2.0], Some(5), 0);
        assert!(result.statistic.is_nan());
    }

    #[test]
    fn ljung_box_with_fitted_params() {
        let residuals = white_noise(100);
        let result_0 = ljung_box(&residuals, Some(10), 0);
        let result_2 = ljung_box(&residuals, Some(10), 2);

        assert_eq!(result_0.df, 10);
        assert_eq!(result_2.df, 8);
        assert_relative_eq!(result_0.statistic, result_2.statistic);
    }

    // ==================== jarque_bera ====================

    #[test]
    fn jarque_bera_symmetric_platykurtic() {
        let residuals = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let result = jarque_bera(&residuals);

        assert_relative_eq!(result.skewness, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.kurtosis, 1.7, epsilon = 1e-12);
        // 5/6 * (1.3^2 / 4)
        assert_relative_eq!(result.statistic, 5.0 / 6.0 * 1.69 / 4.0, epsilon = 1e-12);
        assert!(result.p_value > 0.5);
    }

    #[test]
    fn jarque_bera_rejects_skewed_data() {
        let mut residuals = vec![0.0; 200];
        for (i, r) in residuals.iter_mut().enumerate() {
            *r = if i % 20 == 0 { 10.0 } else { -0.5 };
        }
        let result = jarque_bera(&residuals);
        assert!(result.skewness > 1.0);
        assert!(!result.is_normal(0.05));
    }

    #[test]
    fn jarque_bera_constant_is_nan() {
        let result = jarque_bera(&[1.0; 10]);
        assert!(result.statistic.is_nan());
    }

    // ==================== heteroskedasticity ====================

    #[test]
    fn heteroskedasticity_equal_blocks() {
        let residuals: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let result = heteroskedasticity(&residuals);

        assert_eq!(result.block, 10);
        assert_relative_eq!(result.statistic, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn heteroskedasticity_detects_growing_variance() {
        let residuals: Vec<f64> = (0..90)
            .map(|i| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                sign * (1.0 + i as f64 / 10.0)
            })
            .collect();
        let result = heteroskedasticity(&residuals);

        assert_eq!(result.block, 30);
        assert!(result.statistic > 5.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn heteroskedasticity_short_is_nan() {
        let result = heteroskedasticity(&[1.0, 2.0, 3.0]);
        assert!(result.statistic.is_nan());
    }

    #[test]
    fn residual_variance_population() {
        assert_relative_eq!(residual_variance(&[1.0, -1.0, 1.0, -1.0]), 1.0);
        assert!(residual_variance(&[]).is_nan());
    }
}
