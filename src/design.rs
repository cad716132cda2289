//! Design matrices for least squares fits
//!
//! A [`DesignMatrix`] has one row per observation and one column per model parameter.
//! Column 0 is always the intercept; the remaining columns come from a [`Basis`].
use nalgebra::DMatrix;

use crate::{
    basis::Basis,
    error::{Error, Result},
};

/// Label used for the intercept column
pub const INTERCEPT_LABEL: &str = "(Intercept)";

/// A labelled design matrix: an intercept column followed by predictor-derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    matrix: DMatrix<f64>,
    labels: Vec<String>,
}
impl DesignMatrix {
    /// Builds the design matrix for a basis evaluated at each of `x`.
    ///
    /// The result has `x.len()` rows and `1 + basis.k()` columns. Truncated power columns
    /// come from [`Basis::knot_columns`], one per knot in knot order; everything else is filled
    /// row by row.
    #[must_use]
    pub fn new<B: Basis>(basis: &B, x: &[f64]) -> Self {
        let k = basis.k();
        let mut matrix = DMatrix::zeros(x.len(), k + 1);

        match basis.knot_columns(x) {
            Some(knot_columns) => {
                let leading = k - knot_columns.len();
                for (mut row, &x) in matrix.row_iter_mut().zip(x) {
                    row[0] = 1.0;
                    for j in 0..leading {
                        row[1 + j] = basis.solve_function(j, x);
                    }
                }

                for (offset, (_, column)) in knot_columns.iter().enumerate() {
                    matrix.column_mut(1 + leading + offset).copy_from_slice(column);
                }
            }

            None => {
                for (mut row, &x) in matrix.row_iter_mut().zip(x) {
                    row[0] = 1.0;
                    basis.fill_matrix_row(1, x, row);
                }
            }
        }

        let labels = std::iter::once(INTERCEPT_LABEL.to_string())
            .chain((0..k).map(|j| basis.column_label(j)))
            .collect();

        Self { matrix, labels }
    }

    /// Builds a design matrix from explicit, labelled columns. The intercept column is prepended.
    ///
    /// # Errors
    /// Returns [`Error::RaggedColumn`] if the columns differ in length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n = columns.first().map_or(0, |(_, c)| c.len());
        if let Some((label, column)) = columns.iter().find(|(_, c)| c.len() != n) {
            return Err(Error::RaggedColumn {
                column: label.clone(),
                expected: n,
                found: column.len(),
            });
        }

        let mut matrix = DMatrix::from_element(n, columns.len() + 1, 1.0);
        let mut labels = Vec::with_capacity(columns.len() + 1);
        labels.push(INTERCEPT_LABEL.to_string());
        for (j, (label, column)) in columns.into_iter().enumerate() {
            matrix.column_mut(j + 1).copy_from_slice(&column);
            labels.push(label);
        }

        Ok(Self { matrix, labels })
    }

    /// Number of observations
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of parameters, including the intercept
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Column labels, starting with the intercept
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The underlying matrix
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// A copy of column `j`, or `None` if out of range
    #[must_use]
    pub fn column(&self, j: usize) -> Option<Vec<f64>> {
        (j < self.ncols()).then(|| self.matrix.column(j).iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        basis::{CubicPolynomialBasis, CubicSplineBasis, LinearSplineBasis},
        knots::KnotSet,
    };

    #[test]
    fn test_linear_spline_design() {
        let x: Vec<f64> = (1..=24).map(f64::from).collect();
        let design = DesignMatrix::new(&LinearSplineBasis::new(KnotSet::default()), &x);
        assert_eq!(design.nrows(), 24);
        assert_eq!(design.ncols(), 5);
        assert_eq!(
            design.labels(),
            &["(Intercept)", "x", "(x - 6)₊", "(x - 12)₊", "(x - 18)₊"]
        );

        // x = 9 and x = 20
        let m = design.matrix();
        assert_eq!(m.row(8).iter().copied().collect::<Vec<_>>(), vec![1.0, 9.0, 3.0, 0.0, 0.0]);
        assert_eq!(m.row(19).iter().copied().collect::<Vec<_>>(), vec![1.0, 20.0, 14.0, 8.0, 2.0]);
        assert_eq!(design.column(0), Some(vec![1.0; 24]));
        assert!(design.column(5).is_none());
    }

    #[test]
    fn test_cubic_spline_design() {
        let x: Vec<f64> = (1..=24).map(f64::from).collect();
        let design = DesignMatrix::new(&CubicSplineBasis::new(KnotSet::default()), &x);
        assert_eq!(design.ncols(), 7);

        let row: Vec<f64> = design.matrix().row(19).iter().copied().collect();
        assert_eq!(&row[4..], &[2744.0, 512.0, 8.0]);
    }

    #[test]
    fn test_knot_columns_match_row_evaluation() {
        let x: Vec<f64> = (1..=24).map(f64::from).collect();
        let basis = CubicSplineBasis::new(KnotSet::default());
        let design = DesignMatrix::new(&basis, &x);

        let knot_columns = basis.knot_columns(&x).unwrap();
        for (j, (knot, column)) in knot_columns.iter().enumerate() {
            assert_eq!(design.column(4 + j).as_deref(), Some(column));
            assert_eq!(design.labels()[4 + j], basis.column_label(3 + j));
            assert_eq!(column[knot as usize - 1], 0.0);
        }

        for (i, &x) in x.iter().enumerate() {
            for j in 0..basis.k() {
                assert_eq!(design.matrix()[(i, j + 1)], basis.solve_function(j, x));
            }
        }
    }

    #[test]
    fn test_basis_without_knot_columns() {
        let x = [1.0, 2.0, 3.0];
        let design = DesignMatrix::new(&CubicPolynomialBasis::new(), &x);
        assert_eq!(design.column(3), Some(vec![1.0, 8.0, 27.0]));
    }

    #[test]
    fn test_from_columns() {
        let design = DesignMatrix::from_columns(vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![3.0, 4.0]),
        ])
        .unwrap();
        assert_eq!(design.ncols(), 3);
        assert_eq!(design.labels(), &["(Intercept)", "a", "b"]);
        assert_eq!(design.column(2), Some(vec![3.0, 4.0]));

        let err = DesignMatrix::from_columns(vec![
            ("a".to_string(), vec![1.0]),
            ("b".to_string(), vec![1.0, 2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::RaggedColumn { found: 2, expected: 1, .. }));
    }
}
