use crate::{basis::Basis, display::superscript};

/// Global cubic polynomial basis.
///
/// The standard (non-normalized) monomial powers of `x`, without the constant term:
///
/// ```text
/// x, x², x³
/// ```
///
/// A single cubic cannot bend more than twice, so it is the baseline the spline bases are
/// compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CubicPolynomialBasis;
impl CubicPolynomialBasis {
    /// Highest power in the basis
    pub const DEGREE: usize = 3;

    /// Creates a new cubic polynomial basis.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}
impl Basis for CubicPolynomialBasis {
    fn k(&self) -> usize {
        Self::DEGREE
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: f64,
        mut row: nalgebra::MatrixViewMut<f64, R, C, RS, CS>,
    ) {
        let x2 = x * x;
        row[start_index] = x;
        row[start_index + 1] = x2;
        row[start_index + 2] = x2 * x;
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: f64) -> f64 {
        match j {
            0 => x,
            1 => x * x,
            _ => x * x * x,
        }
    }

    fn column_label(&self, j: usize) -> String {
        match j {
            0 => "x".to_string(),
            _ => format!("x{}", superscript(&(j + 1).to_string())),
        }
    }
}
