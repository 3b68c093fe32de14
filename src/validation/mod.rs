//! Statistical diagnostics for fitted models.
//!
//! # Example
//!
//! ```
//! use milk_forecast::validation::{heteroskedasticity, jarque_bera, ljung_box};
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb = ljung_box(&residuals, Some(1), 0);
//! if lb.is_white_noise(0.05) {
//!     println!("Residuals pass Ljung-Box test");
//! }
//!
//! let jb = jarque_bera(&residuals);
//! let h = heteroskedasticity(&residuals);
//! println!("JB = {:.2}, H = {:.2}", jb.statistic, h.statistic);
//! ```

pub mod residual_tests;

pub use residual_tests::{
    heteroskedasticity, jarque_bera, ljung_box, residual_variance, HeteroskedasticityResult,
    JarqueBeraResult, LjungBoxResult,
};
