use crate::{
    basis::{truncated_label, truncated_power, Basis, KnotColumns},
    display::superscript,
    knots::KnotSet,
};

/// Cubic spline basis in truncated power form.
///
/// ```text
/// x, x², x³, (x - k₁)₊³, …, (x - kₙ)₊³
/// ```
///
/// Piecewise cubic, with continuous first and second derivatives at every knot.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// The truncated power basis is simple to read but poorly conditioned for wide predictor
/// ranges: `x³` and `(x - k)₊³` grow quickly and are nearly collinear. The least squares
/// solver rescales every column before testing rank, which keeps wide ranges usable, but
/// B-splines are the usual remedy.
/// </div>
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSplineBasis {
    knots: KnotSet,
}
impl CubicSplineBasis {
    /// Creates a new cubic spline basis with the given knots.
    #[must_use]
    pub fn new(knots: KnotSet) -> Self {
        Self { knots }
    }
}
impl Basis for CubicSplineBasis {
    fn k(&self) -> usize {
        3 + self.knots.len()
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: f64) -> f64 {
        match j {
            0 => x,
            1 => x * x,
            2 => x * x * x,
            _ => truncated_power(x, self.knots.as_slice()[j - 3], 3),
        }
    }

    fn column_label(&self, j: usize) -> String {
        match j {
            0 => "x".to_string(),
            1 | 2 => format!("x{}", superscript(&(j + 1).to_string())),
            _ => truncated_label(self.knots.as_slice()[j - 3], 3),
        }
    }

    fn knots(&self) -> Option<&KnotSet> {
        Some(&self.knots)
    }

    fn knot_columns(&self, x: &[f64]) -> Option<KnotColumns> {
        Some(KnotColumns::new(x, &self.knots, 3))
    }
}
