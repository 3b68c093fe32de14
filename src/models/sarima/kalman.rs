//! State-space form of a stationary ARMA process and its Kalman filter.
//!
//! Uses the Harvey representation: with `r = max(p, q + 1)`,
//!
//! ```text
//! w_t     = Z α_t,                 Z = [1, 0, ..., 0]
//! α_{t+1} = T α_t + R ε_{t+1},     R = [1, θ_1, ..., θ_{r-1}]'
//! ```
//!
//! where `T` holds the AR coefficients in its first column and ones on the
//! superdiagonal. The scale is concentrated out, so the filter runs with unit
//! innovation variance.

use crate::error::{FitError, Result};
use std::f64::consts::PI;

const LYAPUNOV_MAX_ITER: usize = 100;
const LYAPUNOV_TOLERANCE: f64 = 1e-12;

type Matrix = Vec<Vec<f64>>;

/// Time-invariant ARMA state-space model.
#[derive(Debug, Clone)]
pub struct StateSpace {
    /// First column of the transition matrix, padded to the state dimension.
    ar: Vec<f64>,
    /// Selection vector `R`.
    selection: Vec<f64>,
}

impl StateSpace {
    /// Build the state-space form of `w_t = Σ φ_i w_{t-i} + ε_t + Σ θ_j ε_{t-j}`.
    pub fn arma(ar: &[f64], ma: &[f64]) -> Self {
        let dim = ar.len().max(ma.len() + 1);

        let mut first_column = vec![0.0; dim];
        first_column[..ar.len()].copy_from_slice(ar);

        let mut selection = vec![0.0; dim];
        selection[0] = 1.0;
        selection[1..=ma.len()].copy_from_slice(ma);

        Self {
            ar: first_column,
            selection,
        }
    }

    /// State dimension.
    pub fn dim(&self) -> usize {
        self.ar.len()
    }

    /// `T a`.
    pub fn transition_state(&self, state: &[f64]) -> Vec<f64> {
        let r = self.dim();
        (0..r)
            .map(|i| {
                let shifted = if i + 1 < r { state[i + 1] } else { 0.0 };
                self.ar[i] * state[0] + shifted
            })
            .collect()
    }

    /// `T M` using the companion structure of `T`.
    fn transition_left(&self, m: &Matrix) -> Matrix {
        let r = self.dim();
        (0..r)
            .map(|i| {
                (0..r)
                    .map(|j| {
                        let shifted = if i + 1 < r { m[i + 1][j] } else { 0.0 };
                        self.ar[i] * m[0][j] + shifted
                    })
                    .collect()
            })
            .collect()
    }

    /// `T P T' + R R'` for symmetric `P`.
    fn predict_covariance(&self, p: &Matrix) -> Matrix {
        // T P T' = T (T P)'
        let tp = self.transition_left(p);
        let mut out = self.transition_left(&transpose(&tp));
        for (i, row) in out.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v += self.selection[i] * self.selection[j];
            }
        }
        out
    }

    /// Dense transition matrix.
    fn transition_matrix(&self) -> Matrix {
        let r = self.dim();
        let mut t = vec![vec![0.0; r]; r];
        for i in 0..r {
            t[i][0] = self.ar[i];
            if i + 1 < r {
                t[i][i + 1] = 1.0;
            }
        }
        t
    }

    /// Unconditional state covariance, the solution of `P = T P T' + R R'`.
    ///
    /// Solved with the doubling algorithm: after `k` steps `P` holds the
    /// first `2^k` terms of `Σ T^j R R' T'^j`.
    pub fn stationary_covariance(&self) -> Result<Matrix> {
        let r = self.dim();
        let mut p: Matrix = (0..r)
            .map(|i| (0..r).map(|j| self.selection[i] * self.selection[j]).collect())
            .collect();
        let mut a = self.transition_matrix();

        for _ in 0..LYAPUNOV_MAX_ITER {
            let apa = matmul(&matmul(&a, &p), &transpose(&a));
            let scale = max_abs(&p).max(1.0);
            let change = max_abs(&apa);
            for (row, inc) in p.iter_mut().zip(&apa) {
                for (v, d) in row.iter_mut().zip(inc) {
                    *v += d;
                }
            }
            if !change.is_finite() {
                break;
            }
            if change <= LYAPUNOV_TOLERANCE * scale {
                return Ok(p);
            }
            a = matmul(&a, &a);
        }

        Err(FitError::Computation(
            "stationary covariance did not converge; AR part is not stationary".to_string(),
        )
        .into())
    }

    /// Run the Kalman filter over `observations`, starting from the
    /// stationary distribution with zero mean.
    pub fn filter(&self, observations: &[f64]) -> Result<FilterOutput> {
        let r = self.dim();
        let mut state = vec![0.0; r];
        let mut cov = self.stationary_covariance()?;

        let mut innovations = Vec::with_capacity(observations.len());
        let mut variances = Vec::with_capacity(observations.len());

        for (t, &w) in observations.iter().enumerate() {
            let f = cov[0][0];
            if !(f.is_finite() && f > 0.0) {
                return Err(FitError::Computation(format!(
                    "non-positive forecast error variance at step {}",
                    t
                ))
                .into());
            }
            let v = w - state[0];
            innovations.push(v);
            variances.push(f);

            // Measurement update.
            let gain: Vec<f64> = cov.iter().map(|row| row[0] / f).collect();
            for i in 0..r {
                state[i] += gain[i] * v;
            }
            let first_row = cov[0].clone();
            for (i, row) in cov.iter_mut().enumerate() {
                for (j, value) in row.iter_mut().enumerate() {
                    *value -= gain[i] * first_row[j];
                }
            }

            // Time update.
            state = self.transition_state(&state);
            cov = self.predict_covariance(&cov);
        }

        Ok(FilterOutput {
            innovations,
            variances,
            predicted_state: state,
        })
    }
}

/// One pass of the Kalman filter.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    /// One-step prediction errors `v_t`.
    pub innovations: Vec<f64>,
    /// Their variances `F_t` at unit scale.
    pub variances: Vec<f64>,
    /// State prediction for the step after the last observation.
    pub predicted_state: Vec<f64>,
}

impl FilterOutput {
    /// Number of filtered observations.
    pub fn len(&self) -> usize {
        self.innovations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.innovations.is_empty()
    }

    /// Maximum likelihood estimate of the scale, `Σ v²/F / n`.
    pub fn scale(&self) -> f64 {
        let n = self.len() as f64;
        self.innovations
            .iter()
            .zip(&self.variances)
            .map(|(v, f)| v * v / f)
            .sum::<f64>()
            / n
    }

    /// Log-likelihood with the scale concentrated out, with that scale.
    pub fn concentrated_loglike(&self) -> (f64, f64) {
        let n = self.len() as f64;
        let sigma2 = self.scale();
        let log_det: f64 = self.variances.iter().map(|f| f.ln()).sum();
        let ll = -0.5 * n * ((2.0 * PI).ln() + 1.0 + sigma2.ln()) - 0.5 * log_det;
        (ll, sigma2)
    }

    /// Per-observation log-likelihood contributions at scale `sigma2`.
    pub fn loglike_obs(&self, sigma2: f64) -> Vec<f64> {
        self.innovations
            .iter()
            .zip(&self.variances)
            .map(|(v, f)| {
                let var = sigma2 * f;
                -0.5 * ((2.0 * PI).ln() + var.ln() + v * v / var)
            })
            .collect()
    }

    /// Innovations divided by their standard deviation at scale `sigma2`.
    pub fn standardized(&self, sigma2: f64) -> Vec<f64> {
        self.innovations
            .iter()
            .zip(&self.variances)
            .map(|(v, f)| v / (sigma2 * f).sqrt())
            .collect()
    }
}

fn transpose(m: &Matrix) -> Matrix {
    let n = m.len();
    (0..n).map(|i| (0..n).map(|j| m[j][i]).collect()).collect()
}

fn matmul(a: &Matrix, b: &Matrix) -> Matrix {
    let n = a.len();
    let mut out = vec![vec![0.0; n]; n];
    for i in 0..n {
        for k in 0..n {
            let aik = a[i][k];
            if aik == 0.0 {
                continue;
            }
            for j in 0..n {
                out[i][j] += aik * b[k][j];
            }
        }
    }
    out
}

fn max_abs(m: &Matrix) -> f64 {
    m.iter().flat_map(|row| row.iter()).fold(0.0, |acc: f64, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v.abs())
        }
    })
}
