use std::ops::RangeInclusive;

use crate::{
    basis::{truncated_power, Basis, NaturalSplineProvider},
    error::Result,
    knots::KnotSet,
};

/// Natural cubic spline basis in truncated power form.
///
/// A natural spline is a cubic spline with the added constraint that it is linear beyond
/// the two boundary knots. For `K` interior knots plus the two boundary knots
/// `ξ₁ < … < ξₖ₊₂`, the basis is:
///
/// ```text
/// x, N₁(x), …, Nₖ(x)
///
/// Nⱼ(x) = dⱼ(x) - dₖ₊₁(x)
/// dⱼ(x) = [(x - ξⱼ)₊³ - (x - ξₖ₊₂)₊³] / (ξₖ₊₂ - ξⱼ)
/// ```
///
/// Together with the intercept this spans the `K + 2` dimensional space of natural cubic
/// splines with those knots.
///
/// Built through [`TruncatedPowerNaturalSpline`], or any other [`NaturalSplineProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalSplineBasis {
    knots: KnotSet,

    /// Boundary and interior knots, in ascending order
    all_knots: Vec<f64>,
}
impl NaturalSplineBasis {
    /// Creates a new natural spline basis.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::KnotOutOfRange`] if any interior knot is not strictly inside `boundary`.
    pub fn new(knots: KnotSet, boundary: RangeInclusive<f64>) -> Result<Self> {
        knots.validate_within(&boundary)?;

        let mut all_knots = Vec::with_capacity(knots.len() + 2);
        all_knots.push(*boundary.start());
        all_knots.extend(knots.iter());
        all_knots.push(*boundary.end());

        Ok(Self { knots, all_knots })
    }

    /// The boundary knots; the basis is linear outside of this range.
    #[must_use]
    pub fn boundary(&self) -> RangeInclusive<f64> {
        let lo = self.all_knots[0];
        let hi = self.all_knots[self.all_knots.len() - 1];
        lo..=hi
    }

    /// `dⱼ(x)`, for `j` indexing into the full knot sequence.
    fn d(&self, j: usize, x: f64) -> f64 {
        let last = self.all_knots[self.all_knots.len() - 1];
        let knot = self.all_knots[j];
        (truncated_power(x, knot, 3) - truncated_power(x, last, 3)) / (last - knot)
    }
}
impl Basis for NaturalSplineBasis {
    fn k(&self) -> usize {
        1 + self.knots.len()
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: f64) -> f64 {
        match j {
            0 => x,
            _ => {
                let penultimate = self.all_knots.len() - 2;
                self.d(j - 1, x) - self.d(penultimate, x)
            }
        }
    }

    fn column_label(&self, j: usize) -> String {
        match j {
            0 => "x".to_string(),
            _ => format!("N{}(x)", crate::display::subscript(&j.to_string())),
        }
    }

    fn knots(&self) -> Option<&KnotSet> {
        Some(&self.knots)
    }
}

/// The default natural spline provider.
///
/// Produces a [`NaturalSplineBasis`] using the truncated power formulation, with the
/// boundary knots placed at the ends of the predictor's range.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncatedPowerNaturalSpline;
impl NaturalSplineProvider for TruncatedPowerNaturalSpline {
    type Basis = NaturalSplineBasis;

    fn natural_basis(&self, knots: &KnotSet, boundary: RangeInclusive<f64>) -> Result<Self::Basis> {
        NaturalSplineBasis::new(knots.clone(), boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_close, error::Error};

    fn basis() -> NaturalSplineBasis {
        TruncatedPowerNaturalSpline
            .natural_basis(&KnotSet::default(), 1.0..=24.0)
            .unwrap()
    }

    #[test]
    fn test_natural_spline_shape() {
        let basis = basis();
        assert_eq!(basis.k(), 4);
        assert_eq!(basis.boundary(), 1.0..=24.0);

        let labels: Vec<_> = (0..basis.k()).map(|j| basis.column_label(j)).collect();
        assert_eq!(labels, vec!["x", "N₁(x)", "N₂(x)", "N₃(x)"]);
    }

    #[test]
    fn test_natural_spline_linear_beyond_boundary() {
        let basis = basis();
        for j in 0..basis.k() {
            let f = |x: f64| basis.solve_function(j, x);

            // Above the upper boundary knot
            for x in [26.0, 30.0, 100.0] {
                let second_diff = f(x + 1.0) - 2.0 * f(x) + f(x - 1.0);
                assert_close!(second_diff, 0.0, tol = 1e-6);
            }

            // Below the lower boundary knot
            for x in [-10.0, -1.0, 0.0] {
                let second_diff = f(x + 0.5) - 2.0 * f(x) + f(x - 0.5);
                assert_close!(second_diff, 0.0, tol = 1e-9);
            }
        }
    }

    #[test]
    fn test_natural_spline_is_cubic_inside() {
        let basis = basis();

        // Between 18 and 24 the first column is curved
        let f = |x: f64| basis.solve_function(1, x);
        let second_diff = f(21.0) - 2.0 * f(20.0) + f(19.0);
        assert!(second_diff.abs() > 1e-3);
    }

    #[test]
    fn test_natural_spline_rejects_boundary_knots() {
        let err = TruncatedPowerNaturalSpline
            .natural_basis(&KnotSet::default(), 6.0..=24.0)
            .unwrap_err();
        assert!(matches!(err, Error::KnotOutOfRange { .. }));
    }
}
