//! Model fit summary for a fitted SARIMA model.

use crate::validation::{HeteroskedasticityResult, JarqueBeraResult, LjungBoxResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

const WIDTH: usize = 78;

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    /// Estimate divided by its standard error
    pub z: f64,
    /// Two-sided p-value of `z`
    pub p_value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Estimation results and residual diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFitSummary {
    pub model: String,
    pub dep_variable: String,
    pub nobs: usize,
    /// Observations entering the likelihood (burn-in excluded).
    pub nobs_effective: usize,
    pub sample_start: Option<NaiveDate>,
    pub sample_end: Option<NaiveDate>,
    pub covariance_type: String,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    pub coefficients: Vec<Coefficient>,
    /// Coverage of the coefficient intervals
    pub confidence_level: f64,
    pub ljung_box: LjungBoxResult,
    pub jarque_bera: JarqueBeraResult,
    pub heteroskedasticity: HeteroskedasticityResult,
    pub iterations: usize,
    pub converged: bool,
}

impl ModelFitSummary {
    /// Look up a coefficient by name (`"ar.L1"`, `"ma.S.L12"`, `"sigma2"`, ...).
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    /// Non-seasonal AR estimates in lag order.
    pub fn ar_coefficients(&self) -> Vec<f64> {
        self.estimates_with_prefix("ar.L")
    }

    /// Seasonal MA estimates in lag order.
    pub fn seasonal_ma_coefficients(&self) -> Vec<f64> {
        self.estimates_with_prefix("ma.S.L")
    }

    /// Estimated innovation variance.
    pub fn sigma2(&self) -> f64 {
        self.coefficient("sigma2")
            .map(|c| c.estimate)
            .unwrap_or(f64::NAN)
    }

    fn estimates_with_prefix(&self, prefix: &str) -> Vec<f64> {
        self.coefficients
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .map(|c| c.estimate)
            .collect()
    }

    /// Fixed-width text rendering.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

fn pair(left: &str, left_value: &str, right: &str, right_value: &str) -> String {
    let half = WIDTH / 2;
    let l = format!("{:<w$}", left, w = half.saturating_sub(left_value.len() + 1));
    let r = format!("{:<w$}", right, w = half.saturating_sub(right_value.len() + 2));
    format!("{} {} {} {}", l, left_value, r, right_value)
}

fn number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", decimals, value)
    } else {
        "nan".to_string()
    }
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%m-%d-%Y").to_string())
        .unwrap_or_default()
}

impl fmt::Display for ModelFitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(WIDTH);
        let light = "-".repeat(WIDTH);

        writeln!(f, "{:^w$}", "SARIMAX Results", w = WIDTH)?;
        writeln!(f, "{}", heavy)?;
        writeln!(
            f,
            "{}",
            pair(
                "Dep. Variable:",
                &self.dep_variable,
                "No. Observations:",
                &self.nobs.to_string()
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "Model:",
                &self.model,
                "Log Likelihood",
                &number(self.log_likelihood, 3)
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "Sample:",
                &date(self.sample_start),
                "AIC",
                &number(self.aic, 3)
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "",
                &format!("- {}", date(self.sample_end)),
                "BIC",
                &number(self.bic, 3)
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "Covariance Type:",
                &self.covariance_type,
                "HQIC",
                &number(self.hqic, 3)
            )
        )?;
        writeln!(f, "{}", heavy)?;

        let lower_label = format!("[{:.3}", (1.0 - self.confidence_level) / 2.0);
        let upper_label = format!("{:.3}]", 1.0 - (1.0 - self.confidence_level) / 2.0);
        writeln!(
            f,
            "{:<14}{:>10}{:>11}{:>11}{:>11}{:>11}{:>10}",
            "", "coef", "std err", "z", "P>|z|", lower_label, upper_label
        )?;
        writeln!(f, "{}", light)?;
        for c in &self.coefficients {
            writeln!(
                f,
                "{:<14}{:>10}{:>11}{:>11}{:>11}{:>11}{:>10}",
                c.name,
                number(c.estimate, 4),
                number(c.std_error, 3),
                number(c.z, 3),
                number(c.p_value, 3),
                number(c.lower, 3),
                number(c.upper, 3)
            )?;
        }
        writeln!(f, "{}", heavy)?;

        writeln!(
            f,
            "{}",
            pair(
                "Ljung-Box (L1) (Q):",
                &number(self.ljung_box.statistic, 2),
                "Jarque-Bera (JB):",
                &number(self.jarque_bera.statistic, 2)
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "Prob(Q):",
                &number(self.ljung_box.p_value, 2),
                "Prob(JB):",
                &number(self.jarque_bera.p_value, 2)
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "Heteroskedasticity (H):",
                &number(self.heteroskedasticity.statistic, 2),
                "Skew:",
                &number(self.jarque_bera.skewness, 2)
            )
        )?;
        writeln!(
            f,
            "{}",
            pair(
                "Prob(H) (two-sided):",
                &number(self.heteroskedasticity.p_value, 2),
                "Kurtosis:",
                &number(self.jarque_bera.kurtosis, 2)
            )
        )?;
        writeln!(f, "{}", heavy)?;

        if !self.converged {
            writeln!(f, "Warning: optimizer did not converge.")?;
        }
        write!(
            f,
            "Optimizer: Nelder-Mead, {} iterations. Covariance from the outer product of gradients.",
            self.iterations
        )
    }
}
