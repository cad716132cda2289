use crate::{
    basis::{truncated_label, truncated_power, Basis, KnotColumns},
    knots::KnotSet,
};

/// Piecewise linear spline basis.
///
/// ```text
/// x, (x - k₁)₊, (x - k₂)₊, …, (x - kₙ)₊
/// ```
///
/// The fitted curve is a set of straight segments joined at the knots. Each truncated column
/// lets the slope change at its knot while keeping the curve continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSplineBasis {
    knots: KnotSet,
}
impl LinearSplineBasis {
    /// Creates a new linear spline basis with the given knots.
    #[must_use]
    pub fn new(knots: KnotSet) -> Self {
        Self { knots }
    }
}
impl Basis for LinearSplineBasis {
    fn k(&self) -> usize {
        1 + self.knots.len()
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: f64) -> f64 {
        match j {
            0 => x,
            _ => truncated_power(x, self.knots.as_slice()[j - 1], 1),
        }
    }

    fn column_label(&self, j: usize) -> String {
        match j {
            0 => "x".to_string(),
            _ => truncated_label(self.knots.as_slice()[j - 1], 1),
        }
    }

    fn knots(&self) -> Option<&KnotSet> {
        Some(&self.knots)
    }

    fn knot_columns(&self, x: &[f64]) -> Option<KnotColumns> {
        Some(KnotColumns::new(x, &self.knots, 1))
    }
}
