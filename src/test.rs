//! Assertions for testing fits and numeric results.
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - `assert_eq!` equivalent for floats.
//! - Tolerance defaults to a few ulps relative to the larger operand; pass `tol = <value>` for an absolute tolerance.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] for slices, arrays and vectors.
//!
//! ### [`crate::assert_y`]
//! Spot-checks the prediction of a fit at a given `x`.
//!
//! ### [`crate::assert_r_squared`]
//! Asserts that the fit's R² relative to its source data is above a certain threshold.
//! See [`crate::SplineFit::r_squared`] for more details.

/// Default tolerance used by [`crate::assert_close`] when none is given.
///
/// `8ε · max(1, |a|, |b|)`
#[must_use]
pub fn default_tolerance(a: f64, b: f64) -> f64 {
    8.0 * f64::EPSILON * 1f64.max(a.abs()).max(b.abs())
}
