//! Parameter vectors and the stationarity-enforcing transform.

use super::polynomial::{lag_polynomial, multiply};
use super::spec::SARIMASpec;

/// Largest reflection coefficient accepted when mapping back to the
/// unconstrained space.
const MAX_REFLECTION: f64 = 0.99;

/// Map unconstrained reals to the coefficients of a stationary AR polynomial.
///
/// Each input becomes a partial autocorrelation `r = x / sqrt(1 + x²)` in
/// (-1, 1); the Durbin-Levinson recursion then builds the coefficients
/// `φ` of `1 - φ_1 B - ... - φ_n B^n`, whose roots lie outside the unit circle.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let mut phi: Vec<f64> = Vec::with_capacity(unconstrained.len());
    for &x in unconstrained {
        let r = x / (1.0 + x * x).sqrt();
        let k = phi.len();
        let mut next: Vec<f64> = (0..k).map(|i| phi[i] - r * phi[k - 1 - i]).collect();
        next.push(r);
        phi = next;
    }
    phi
}

/// Inverse of [`constrain_stationary`].
///
/// Reflection coefficients are clipped to ±0.99 so the result stays finite.
pub fn unconstrain_stationary(constrained: &[f64]) -> Vec<f64> {
    let n = constrained.len();
    let mut phi = constrained.to_vec();
    let mut reflections = vec![0.0; n];

    for k in (0..n).rev() {
        let r = phi[k].clamp(-MAX_REFLECTION, MAX_REFLECTION);
        reflections[k] = r;
        let denom = 1.0 - r * r;
        phi = (0..k).map(|i| (phi[i] + r * phi[k - 1 - i]) / denom).collect();
    }

    reflections
        .iter()
        .map(|r| r / (1.0 - r * r).sqrt())
        .collect()
}

/// Reflection coefficients (partial autocorrelations) mapped to the
/// unconstrained space.
pub fn reflections_to_unconstrained(reflections: &[f64]) -> Vec<f64> {
    reflections
        .iter()
        .map(|r| {
            let r = r.clamp(-MAX_REFLECTION, MAX_REFLECTION);
            r / (1.0 - r * r).sqrt()
        })
        .collect()
}

/// ARMA coefficients of a SARIMA model, grouped by role.
///
/// AR coefficients follow `y_t = φ_1 y_{t-1} + ...`; MA coefficients follow
/// `ε_t + θ_1 ε_{t-1} + ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct SARIMAParams {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SARIMAParams {
    /// All-zero coefficients for `spec`.
    pub fn zeros(spec: &SARIMASpec) -> Self {
        Self {
            ar: vec![0.0; spec.p],
            ma: vec![0.0; spec.q],
            seasonal_ar: vec![0.0; spec.seasonal_p],
            seasonal_ma: vec![0.0; spec.seasonal_q],
        }
    }

    /// Split a flat vector in estimation order (ar, ma, seasonal ar, seasonal ma).
    ///
    /// Returns `None` if the length does not match the `SARIMASpec`.
    pub fn from_slice(spec: &SARIMASpec, values: &[f64]) -> Option<Self> {
        if values.len() != spec.num_coefficients() {
            return None;
        }
        let (ar, rest) = values.split_at(spec.p);
        let (ma, rest) = rest.split_at(spec.q);
        let (seasonal_ar, seasonal_ma) = rest.split_at(spec.seasonal_p);
        Some(Self {
            ar: ar.to_vec(),
            ma: ma.to_vec(),
            seasonal_ar: seasonal_ar.to_vec(),
            seasonal_ma: seasonal_ma.to_vec(),
        })
    }

    /// Build from an unconstrained vector; AR parts are stationary and MA
    /// parts invertible by construction.
    pub fn from_unconstrained(spec: &SARIMASpec, x: &[f64]) -> Option<Self> {
        let raw = Self::from_slice(spec, x)?;
        Some(Self {
            ar: constrain_stationary(&raw.ar),
            ma: negate(constrain_stationary(&raw.ma)),
            seasonal_ar: constrain_stationary(&raw.seasonal_ar),
            seasonal_ma: negate(constrain_stationary(&raw.seasonal_ma)),
        })
    }

    /// Map back to the unconstrained optimisation space.
    pub fn to_unconstrained(&self) -> Vec<f64> {
        let mut x = unconstrain_stationary(&self.ar);
        x.extend(unconstrain_stationary(&negate(self.ma.clone())));
        x.extend(unconstrain_stationary(&self.seasonal_ar));
        x.extend(unconstrain_stationary(&negate(self.seasonal_ma.clone())));
        x
    }

    /// Flat vector in estimation order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.ar
            .iter()
            .chain(&self.ma)
            .chain(&self.seasonal_ar)
            .chain(&self.seasonal_ma)
            .copied()
            .collect()
    }

    /// Full AR lag polynomial `φ(B)Φ(B^s)`.
    pub fn ar_polynomial(&self, period: usize) -> Vec<f64> {
        multiply(
            &lag_polynomial(&self.ar, -1.0, 1),
            &lag_polynomial(&self.seasonal_ar, -1.0, period),
        )
    }

    /// Full MA lag polynomial `θ(B)Θ(B^s)`.
    pub fn ma_polynomial(&self, period: usize) -> Vec<f64> {
        multiply(
            &lag_polynomial(&self.ma, 1.0, 1),
            &lag_polynomial(&self.seasonal_ma, 1.0, period),
        )
    }

    /// Reduced-form ARMA coefficients `(φ*, θ*)` of the expanded polynomials.
    pub fn reduced(&self, period: usize) -> (Vec<f64>, Vec<f64>) {
        let ar: Vec<f64> = self.ar_polynomial(period)[1..].iter().map(|c| -c).collect();
        let ma: Vec<f64> = self.ma_polynomial(period)[1..].to_vec();
        (ar, ma)
    }
}

fn negate(mut values: Vec<f64>) -> Vec<f64> {
    values.iter_mut().for_each(|v| *v = -*v);
    values
}
