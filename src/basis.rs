//! Piecewise polynomial basis functions for regression
//!
//! This module defines the [`Basis`] trait, which abstracts the columns a model
//! contributes to a design matrix. The intercept column is always added by the
//! design matrix itself, so a basis only describes the predictor-derived columns.
//!
//! # Provided Bases
//! - [`LinearSplineBasis`]: `x, (x - k₁)₊, …` - piecewise linear, continuous at the knots.
//! - [`CubicPolynomialBasis`]: `x, x², x³` - a single global cubic, no knots.
//! - [`CubicSplineBasis`]: `x, x², x³, (x - k₁)₊³, …` - piecewise cubic with continuous second derivatives.
//! - [`NaturalSplineBasis`]: a cubic spline constrained to be linear beyond the boundary knots.
//!
//! # Truncated powers
//! The spline bases are built from the positive-part operator
//!
//! ```text
//! (x - k)₊ = max(0, x - k)
//! ```
//!
//! which is zero at or below the knot `k`. See [`truncated_power`] and [`KnotColumns`].
//!
//! # Natural spline providers
//! The natural spline basis is produced by an injected [`NaturalSplineProvider`], so the
//! walkthrough does not depend on one particular construction. The default,
//! [`TruncatedPowerNaturalSpline`], uses the truncated power formulation.
//!
//! # Rolling Your Own
//! 1. Implement `Basis` for your type.
//! 2. Define how to populate a design row in `fill_matrix_row`.
//! 3. Implement `solve_function` to evaluate a single column.
use std::ops::RangeInclusive;

use nalgebra::MatrixViewMut;

use crate::{error::Result, knots::KnotSet};

pub(crate) mod linear_spline;
pub use linear_spline::LinearSplineBasis;

pub(crate) mod cubic_polynomial;
pub use cubic_polynomial::CubicPolynomialBasis;

pub(crate) mod cubic_spline;
pub use cubic_spline::CubicSplineBasis;

pub(crate) mod natural_spline;
pub use natural_spline::{NaturalSplineBasis, TruncatedPowerNaturalSpline};

/// A set of predictor-derived design matrix columns.
///
/// Most of the time, you want to use a built-in basis type, such as [`LinearSplineBasis`] or [`CubicSplineBasis`].
///
/// It is not meant to be used on it's own, but through [`crate::SplineFit`], which is generic over basis.
pub trait Basis: Sized + Clone + std::fmt::Debug + Send + Sync {
    /// Returns the number of columns this basis contributes, excluding the intercept.
    fn k(&self) -> usize;

    /// Populates a row of the design matrix with this basis evaluated at `x`.
    ///
    /// All `k()` values are written into `row` starting at column `start_index`.
    ///
    /// # Parameters
    /// - `start_index`: Column index where writing begins.
    /// - `x`: The evaluation point.
    /// - `row`: Mutable row buffer.
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: f64,
        mut row: MatrixViewMut<f64, R, C, RS, CS>,
    ) {
        for j in 0..self.k() {
            row[start_index + j] = self.solve_function(j, x);
        }
    }

    /// Evaluates the jth column of this basis at `x`.
    ///
    /// Formally, the basis provides functions φ₀, φ₁, …, φₖ₋₁, and solves `φⱼ(x)`
    fn solve_function(&self, j: usize, x: f64) -> f64;

    /// A short human readable label for the jth column, such as `(x - 6)₊³`.
    fn column_label(&self, j: usize) -> String;

    /// Knots used by this basis, if any
    fn knots(&self) -> Option<&KnotSet> {
        None
    }

    /// The truncated power columns of this basis, evaluated over all of `x`.
    ///
    /// When present they are the last `len()` columns of the basis, in knot order, and the
    /// design matrix copies them in directly instead of evaluating them row by row.
    fn knot_columns(&self, _x: &[f64]) -> Option<KnotColumns> {
        None
    }
}

/// The truncated power function `max(0, x - knot)^degree`.
///
/// Zero at or below the knot; the comparison is non-strict, so `x == knot` contributes nothing.
///
/// ```
/// # use splinefit::basis::truncated_power;
/// assert_eq!(truncated_power(9.0, 6.0, 1), 3.0);
/// assert_eq!(truncated_power(6.0, 6.0, 1), 0.0);
/// assert_eq!(truncated_power(20.0, 18.0, 3), 8.0);
/// ```
#[must_use]
pub fn truncated_power(x: f64, knot: f64, degree: i32) -> f64 {
    if x <= knot {
        0.0
    } else {
        (x - knot).powi(degree)
    }
}

/// Truncated power columns, one per knot, in knot order.
///
/// This is the part of a spline basis that depends on the knots; the polynomial part
/// (`x`, `x²`, …) is added by the full basis.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotColumns {
    knots: Vec<f64>,
    columns: Vec<Vec<f64>>,
}
impl KnotColumns {
    /// Builds one column per knot: `column_k[i] = max(0, x[i] - knot_k)^degree`.
    #[must_use]
    pub fn new(x: &[f64], knots: &KnotSet, degree: i32) -> Self {
        let columns = knots
            .iter()
            .map(|knot| x.iter().map(|&x| truncated_power(x, knot, degree)).collect())
            .collect();

        Self {
            knots: knots.as_slice().to_vec(),
            columns,
        }
    }

    /// Number of columns; always equal to the number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The column belonging to the knot at `index` (in ascending knot order).
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// The column belonging to a given knot value.
    #[must_use]
    pub fn for_knot(&self, knot: f64) -> Option<&[f64]> {
        let index = self.knots.iter().position(|&k| k == knot)?;
        self.column(index)
    }

    /// The values of every column at row `i`, in knot order.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<Vec<f64>> {
        self.columns.iter().map(|c| c.get(i).copied()).collect()
    }

    /// Iterates over `(knot, column)` pairs in knot order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> {
        self.knots
            .iter()
            .copied()
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

/// A source of natural cubic spline bases.
///
/// The walkthrough treats natural spline construction as an injected capability, so any
/// construction that spans the natural spline space for the given knots can be swapped in.
pub trait NaturalSplineProvider {
    /// The basis type produced by this provider
    type Basis: Basis;

    /// Builds a natural spline basis for the given interior knots.
    ///
    /// `boundary` is the range of the predictor; the spline is linear outside of it.
    ///
    /// # Errors
    /// Returns an error if the knots are not strictly inside the boundary.
    fn natural_basis(&self, knots: &KnotSet, boundary: RangeInclusive<f64>) -> Result<Self::Basis>;
}

/// Formats a truncated power label such as `(x - 6)₊` or `(x - 6)₊³`.
pub(crate) fn truncated_label(knot: f64, degree: i32) -> String {
    let power = if degree == 1 {
        String::new()
    } else {
        crate::display::superscript(&degree.to_string())
    };

    if knot < 0.0 {
        format!("(x + {})₊{power}", -knot)
    } else {
        format!("(x - {knot})₊{power}")
    }
}
