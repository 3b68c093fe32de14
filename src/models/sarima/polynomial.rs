//! Lag polynomial arithmetic.
//!
//! Polynomials are stored lowest power first, so `[1.0, -0.5]` is `1 - 0.5B`.

/// Product of two lag polynomials.
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `1 + sign·(c_1 B^k + c_2 B^2k + ...)` with `k = spacing`.
///
/// AR polynomials use `sign = -1`, MA polynomials `sign = 1`.
pub fn lag_polynomial(coefficients: &[f64], sign: f64, spacing: usize) -> Vec<f64> {
    let spacing = spacing.max(1);
    let mut poly = vec![0.0; coefficients.len() * spacing + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * spacing] = sign * c;
    }
    poly
}

/// MA(∞) weights `ψ_0..ψ_{n-1}` of `ar(B) y = ma(B) ε`.
///
/// Both polynomials must start with 1.
pub fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(n);
    for j in 0..n {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut value = ma.get(j).copied().unwrap_or(0.0);
        for i in 1..=j.min(ar.len().saturating_sub(1)) {
            value -= ar[i] * psi[j - i];
        }
        psi.push(value);
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn multiply_expands_product() {
        // (1 - 0.5B)(1 + 0.2B) = 1 - 0.3B - 0.1B^2
        let p = multiply(&[1.0, -0.5], &[1.0, 0.2]);
        assert_relative_eq!(p[0], 1.0);
        assert_relative_eq!(p[1], -0.3);
        assert_relative_eq!(p[2], -0.1);
    }

    #[test]
    fn lag_polynomial_seasonal_spacing() {
        let p = lag_polynomial(&[0.4], 1.0, 3);
        assert_eq!(p, vec![1.0, 0.0, 0.0, 0.4]);

        let p = lag_polynomial(&[0.5, 0.2], -1.0, 1);
        assert_eq!(p, vec![1.0, -0.5, -0.2]);
    }

    #[test]
    fn psi_weights_ar1_are_geometric() {
        let psi = psi_weights(&[1.0, -0.6], &[1.0], 5);
        for (j, w) in psi.iter().enumerate() {
            assert_relative_eq!(*w, 0.6f64.powi(j as i32), epsilon = 1e-12);
        }
    }

    #[test]
    fn psi_weights_random_walk_are_ones() {
        let psi = psi_weights(&[1.0, -1.0], &[1.0], 4);
        assert_eq!(psi, vec![1.0; 4]);
    }

    #[test]
    fn psi_weights_ma_terms() {
        let psi = psi_weights(&[1.0], &[1.0, 0.3, -0.2], 4);
        assert_eq!(psi, vec![1.0, 0.3, -0.2, 0.0]);
    }
}
