use std::{borrow::Cow, ops::RangeInclusive};

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    basis::{Basis, CubicPolynomialBasis, CubicSplineBasis, LinearSplineBasis, NaturalSplineBasis},
    design::DesignMatrix,
    display::{self, format_p_value, format_significant, Align, Table, DEFAULT_SIGNIFICANT_DIGITS},
    error::{Error, Result},
    statistics::{self, Confidence, FiveNumberSummary, ScoringMethod, Significance},
    value::{CoordExt, SteppedValues},
};

/// Piecewise linear spline fit
///
/// Straight segments joined at the knots: `β₀ + β₁x + Σ γⱼ(x - kⱼ)₊`
pub type LinearSplineFit<'data> = SplineFit<'data, LinearSplineBasis>;

/// Global cubic polynomial fit
///
/// A single cubic over the whole range: `β₀ + β₁x + β₂x² + β₃x³`
pub type CubicFit<'data> = SplineFit<'data, CubicPolynomialBasis>;

/// Cubic spline fit in truncated power form
///
/// `β₀ + β₁x + β₂x² + β₃x³ + Σ γⱼ(x - kⱼ)₊³`
pub type CubicSplineFit<'data> = SplineFit<'data, CubicSplineBasis>;

/// Natural cubic spline fit
///
/// A cubic spline constrained to be linear beyond the boundary knots.
pub type NaturalSplineFit<'data> = SplineFit<'data, NaturalSplineBasis>;

/// An ordinary least squares solution for a design matrix.
///
/// Solved through the singular value decomposition of the design matrix itself, rather
/// than the normal equations, so the conditioning of `XᵀX` never comes into play.
///
/// Holds the coefficient estimates along with everything needed for inference: residuals,
/// the unscaled covariance `(XᵀX)⁻¹`, and the residual variance.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquares {
    labels: Vec<String>,
    coefficients: Vec<f64>,
    xtx_inverse: DMatrix<f64>,
    y: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    rank: usize,
}
impl LeastSquares {
    /// Solves `min ‖y - Xβ‖²` for a design matrix `X`.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// Each column is first scaled to unit norm, `X = X̃D`. With `X̃ = UΣVᵀ`, the solution is
    /// `β = D⁻¹VΣ⁻¹Uᵀy` and `(XᵀX)⁻¹ = D⁻¹VΣ⁻²VᵀD⁻¹`.
    ///
    /// Singular values of `X̃` at or below `σ_max · max(n, p) · ε` are treated as zero. Any such value
    /// means the columns are (numerically) collinear, and the fit is rejected rather than
    /// silently picking one of infinitely many solutions.
    /// </div>
    ///
    /// # Errors
    /// Returns [`Error::DegenerateRegression`] if:
    /// - There are no more observations than parameters (`n ≤ p`)
    /// - The design matrix is rank deficient
    /// - The solution contains NaN
    ///
    /// Returns [`Error::SampleMismatch`] if `y` does not have one value per design row.
    #[allow(clippy::cast_precision_loss)]
    pub fn solve(design: &DesignMatrix, y: &[f64]) -> Result<Self> {
        let (n, p) = (design.nrows(), design.ncols());
        if y.len() != n {
            return Err(Error::SampleMismatch {
                x: n,
                y: y.len(),
                mean: n,
            });
        }

        let degenerate = |rank| Error::DegenerateRegression { n, k: p, rank };
        if n == 0 || p == 0 {
            return Err(degenerate(0));
        }

        // Unit-norm columns, so the rank test sees collinearity rather than column scale
        let norms: Vec<f64> = design
            .matrix()
            .column_iter()
            .map(|c| match c.norm() {
                norm if norm > 0.0 && norm.is_finite() => norm,
                _ => 1.0,
            })
            .collect();
        let inv_norms = DVector::from_iterator(p, norms.iter().map(|n| n.recip()));
        let mut scaled = design.matrix().clone();
        for (mut column, norm) in scaled.column_iter_mut().zip(&norms) {
            column /= *norm;
        }

        let decomp = SVD::new(scaled, true, true);

        // Calculate epsilon value
        // ~= machine_epsilon * max(size) * max_singular
        let sigma_max = decomp.singular_values.max();
        let epsilon = f64::EPSILON * n.max(p) as f64 * sigma_max;
        let rank = decomp.singular_values.iter().filter(|&&s| s > epsilon).count();
        log::debug!("Design matrix {n}x{p}, rank {rank}, σ_max = {sigma_max:.3e}");

        if n <= p || rank < p {
            return Err(degenerate(rank));
        }

        // Solve for β in `SVD * β = y`
        let b = DVector::from_column_slice(y);
        let scaled_beta = decomp.solve(&b, epsilon).map_err(|_| degenerate(rank))?;
        let beta = scaled_beta.component_mul(&inv_norms);
        let coefficients: Vec<f64> = beta.iter().copied().collect();
        if coefficients.iter().any(|c| c.is_nan()) {
            return Err(degenerate(rank));
        }

        // (XᵀX)⁻¹ = D⁻¹ V Σ⁻² Vᵀ D⁻¹, with D the column norms
        let v_t = decomp.v_t.as_ref().ok_or_else(|| degenerate(rank))?;
        let inv_sq = DVector::from_iterator(p, decomp.singular_values.iter().map(|s| (s * s).recip()));
        let d_inv = DMatrix::from_diagonal(&inv_norms);
        let xtx_inverse = &d_inv * v_t.transpose() * DMatrix::from_diagonal(&inv_sq) * v_t * &d_inv;

        let fitted: Vec<f64> = (design.matrix() * &beta).iter().copied().collect();
        let residuals = y.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        Ok(Self {
            labels: design.labels().to_vec(),
            coefficients,
            xtx_inverse,
            y: y.to_vec(),
            fitted,
            residuals,
            rank,
        })
    }

    /// Column labels, starting with `(Intercept)`
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Estimated coefficients, one per design column
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of observations
    #[must_use]
    pub fn n(&self) -> usize {
        self.y.len()
    }

    /// Number of parameters, including the intercept
    #[must_use]
    pub fn p(&self) -> usize {
        self.coefficients.len()
    }

    /// Numerical rank of the design matrix; always equal to [`LeastSquares::p`] for a successful fit
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Residual degrees of freedom, `n - p`
    #[must_use]
    pub fn df_residual(&self) -> usize {
        self.n() - self.p()
    }

    /// Fitted values `Xβ`, one per observation
    #[must_use]
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Residuals `y - Xβ`, one per observation
    #[must_use]
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Residual sum of squares
    #[must_use]
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }

    /// Unbiased estimate of the error variance, `RSS / (n - p)`
    #[must_use]
    pub fn residual_variance(&self) -> f64 {
        statistics::residual_variance(self.y.iter().copied(), self.fitted.iter().copied(), self.p())
    }

    /// Residual standard error, `√(RSS / (n - p))`
    #[must_use]
    pub fn residual_standard_error(&self) -> f64 {
        self.residual_variance().sqrt()
    }

    /// Covariance matrix of the coefficient estimates, `σ²(XᵀX)⁻¹`
    #[must_use]
    pub fn covariance(&self) -> DMatrix<f64> {
        &self.xtx_inverse * self.residual_variance()
    }

    /// Standard error of each coefficient
    #[must_use]
    pub fn standard_errors(&self) -> Vec<f64> {
        let variance = self.residual_variance();
        self.xtx_inverse
            .diagonal()
            .iter()
            .map(|d| (d * variance).sqrt())
            .collect()
    }

    /// t statistic of each coefficient, testing `βⱼ = 0`
    #[must_use]
    pub fn t_values(&self) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(self.standard_errors())
            .map(|(b, se)| b / se)
            .collect()
    }

    /// Two-sided p value of each coefficient's t statistic
    #[must_use]
    pub fn p_values(&self) -> Vec<f64> {
        let df = self.df_residual();
        self.t_values()
            .into_iter()
            .map(|t| statistics::t_test_p_value(t, df))
            .collect()
    }

    /// Significance code of each coefficient
    #[must_use]
    pub fn significance(&self) -> Vec<Significance> {
        self.p_values()
            .into_iter()
            .map(Significance::from_p_value)
            .collect()
    }

    /// Confidence interval `β ± t·SE` for each coefficient
    #[must_use]
    pub fn confidence_intervals(&self, confidence: Confidence) -> Vec<RangeInclusive<f64>> {
        let t = confidence.t_score(self.df_residual());
        self.coefficients
            .iter()
            .zip(self.standard_errors())
            .map(|(b, se)| (b - t * se)..=(b + t * se))
            .collect()
    }

    /// Proportion of variance explained
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        statistics::r_squared(self.y.iter().copied(), self.fitted.iter().copied())
    }

    /// R² adjusted for the number of parameters
    #[must_use]
    pub fn adjusted_r_squared(&self) -> f64 {
        statistics::adjusted_r_squared(self.r_squared(), self.n(), self.p())
    }

    /// Overall F statistic, testing all non-intercept coefficients against zero.
    ///
    /// Returns `(F, df1, df2)`, or `None` for an intercept-only model.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn f_statistic(&self) -> Option<(f64, usize, usize)> {
        let df1 = self.p().checked_sub(1).filter(|&d| d > 0)?;
        let df2 = self.df_residual();

        let y_mean = statistics::mean(self.y.iter().copied());
        let tss: f64 = self.y.iter().map(|y| (y - y_mean).powi(2)).sum();
        let rss = self.rss();

        let f = ((tss - rss) / df1 as f64) / (rss / df2 as f64);
        Some((f, df1, df2))
    }

    /// p value of the overall F statistic, or NaN for an intercept-only model
    #[must_use]
    pub fn f_p_value(&self) -> f64 {
        self.f_statistic()
            .map_or(f64::NAN, |(f, df1, df2)| statistics::f_test_p_value(f, df1, df2))
    }

    /// Gaussian log-likelihood of the fit
    #[must_use]
    pub fn log_likelihood(&self) -> f64 {
        statistics::gaussian_log_likelihood(self.y.iter().copied(), self.fitted.iter().copied())
    }

    /// Scores the model with an information criterion; lower is better
    #[must_use]
    pub fn model_score(&self, method: ScoringMethod) -> f64 {
        method.calculate(self.log_likelihood(), self.n(), self.p())
    }

    /// Akaike information criterion
    #[must_use]
    pub fn aic(&self) -> f64 {
        self.model_score(ScoringMethod::AIC)
    }

    /// Bayesian information criterion
    #[must_use]
    pub fn bic(&self) -> f64 {
        self.model_score(ScoringMethod::BIC)
    }

    /// One row per coefficient, in design column order
    #[must_use]
    pub fn coefficient_table(&self) -> Vec<CoefficientRow> {
        let se = self.standard_errors();
        let t = self.t_values();
        let p = self.p_values();

        self.labels
            .iter()
            .enumerate()
            .map(|(j, label)| CoefficientRow {
                label: label.clone(),
                estimate: self.coefficients[j],
                std_error: se[j],
                t_value: t[j],
                p_value: p[j],
                significance: Significance::from_p_value(p[j]),
            })
            .collect()
    }
}

/// One line of a coefficient table.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CoefficientRow {
    /// Design column label
    pub label: String,

    /// Estimated coefficient
    pub estimate: f64,

    /// Standard error of the estimate
    pub std_error: f64,

    /// t statistic
    pub t_value: f64,

    /// Two-sided p value
    pub p_value: f64,

    /// Significance code
    pub significance: Significance,
}

/// Represents a least squares regression fit using a given basis.
///
/// This struct wraps a design matrix built from a [`Basis`] and the resulting [`LeastSquares`]
/// solution, and provides methods for evaluating the fitted curve and its statistics.
///
/// Most of the time, you'll use one of the type aliases:
/// - [`crate::LinearSplineFit`] — piecewise linear.
/// - [`crate::CubicFit`] — a single global cubic.
/// - [`crate::CubicSplineFit`] — piecewise cubic.
/// - [`crate::NaturalSplineFit`] — piecewise cubic, linear beyond the boundary.
///
/// # How it works
/// - Builds a **design matrix** with shape `[rows, 1 + k]`: an intercept column, then the
///   `k` basis functions evaluated at each `x`.
/// - Solves the least squares problem through the **SVD** of the design matrix.
///
/// # Example
/// ```
/// # use splinefit::{LinearSplineFit, basis::LinearSplineBasis, knots::KnotSet};
/// let data: Vec<(f64, f64)> = (1..=10).map(|x| (f64::from(x), f64::from(x).sqrt())).collect();
/// let basis = LinearSplineBasis::new(KnotSet::new([5.0]).unwrap());
/// let fit = LinearSplineFit::new(&data, basis).unwrap();
/// println!("Coefficients: {:?}", fit.coefficients());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SplineFit<'data, B: Basis> {
    data: Cow<'data, [(f64, f64)]>,
    basis: B,
    solution: LeastSquares,
}
impl<'data, B: Basis> SplineFit<'data, B> {
    /// Fits the basis to the given `(x, y)` points.
    ///
    /// # Errors
    /// - [`Error::DegenerateRegression`]: the design matrix is rank deficient, or there are
    ///   too few points for the number of columns.
    pub fn new(data: impl Into<Cow<'data, [(f64, f64)]>>, basis: B) -> Result<Self> {
        let data: Cow<_> = data.into();
        let x: Vec<f64> = data.x();
        let y: Vec<f64> = data.y();

        let design = DesignMatrix::new(&basis, &x);
        let solution = LeastSquares::solve(&design, &y)?;

        Ok(Self {
            data,
            basis,
            solution,
        })
    }

    /// Returns an owned version of this fit, with a full copy of the data.
    #[must_use]
    pub fn to_owned(&self) -> SplineFit<'static, B> {
        SplineFit {
            data: Cow::Owned(self.data.to_vec()),
            basis: self.basis.clone(),
            solution: self.solution.clone(),
        }
    }

    /// The basis this fit was built from
    #[must_use]
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// The least squares solution, with all of its inference statistics
    #[must_use]
    pub fn solution(&self) -> &LeastSquares {
        &self.solution
    }

    /// The source data
    #[must_use]
    pub fn data(&self) -> &[(f64, f64)] {
        &self.data
    }

    /// Range of x values in the source data
    #[must_use]
    pub fn x_range(&self) -> RangeInclusive<f64> {
        self.data.x_range().unwrap_or(0.0..=0.0)
    }

    /// Estimated coefficients; the intercept comes first
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        self.solution.coefficients()
    }

    /// Residuals `y - ŷ` at each data point
    #[must_use]
    pub fn residuals(&self) -> &[f64] {
        self.solution.residuals()
    }

    /// Proportion of variance explained
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.solution.r_squared()
    }

    /// Evaluates the fitted curve at `x`.
    ///
    /// ```math
    /// y(x) = β₀ + Σ βⱼ₊₁ φⱼ(x)
    /// ```
    ///
    /// Unlike the source data, `x` is not restricted to the fitted range; splines extrapolate
    /// according to their outermost piece.
    #[must_use]
    pub fn y(&self, x: f64) -> f64 {
        let coefficients = self.coefficients();
        coefficients[0]
            + coefficients[1..]
                .iter()
                .enumerate()
                .map(|(j, c)| c * self.basis.solve_function(j, x))
                .sum::<f64>()
    }

    /// Evaluates the curve at multiple x-values, returning `(x, y)` pairs.
    pub fn solve(&self, x: impl IntoIterator<Item = f64>) -> Vec<(f64, f64)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }

    /// Evaluates the curve at evenly spaced points over a range.
    #[must_use]
    pub fn solve_range(&self, range: RangeInclusive<f64>, step: f64) -> Vec<(f64, f64)> {
        self.solve(SteppedValues::new(range, step))
    }

    /// Fitted `(x, ŷ)` pairs at the source x-values
    #[must_use]
    pub fn fitted_points(&self) -> Vec<(f64, f64)> {
        self.data
            .x_iter()
            .zip(self.solution.fitted_values().iter().copied())
            .collect()
    }

    /// The fitted equation, e.g. `y(x) = 9.8 + 0.31·x - 1.2·(x - 6)₊`
    #[must_use]
    pub fn equation(&self) -> String {
        let mut labels = self.solution.labels().to_vec();
        if let Some(intercept) = labels.first_mut() {
            intercept.clear();
        }

        let mut output = String::new();
        // Writing to a String cannot fail
        let _ = display::format_equation(
            &mut output,
            &labels,
            self.coefficients(),
            DEFAULT_SIGNIFICANT_DIGITS,
        );
        output
    }

    /// A printable regression summary with the given model title.
    #[must_use]
    pub fn summary<'a>(&'a self, title: &'a str) -> FitSummary<'a> {
        FitSummary {
            title,
            solution: &self.solution,
        }
    }

    /// Returns the properties of the fit, for comparing models side by side.
    #[must_use]
    pub fn properties(&self, model: &str) -> FitProperties {
        FitProperties::new(model, &self.solution)
    }
}

impl<B: Basis> std::fmt::Display for SplineFit<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.equation())
    }
}

/// A set of diagnostic properties for a fit.
///
/// Can be serialized to JSON or other formats.
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
pub struct FitProperties {
    /// Name of the model
    pub model: String,

    /// Number of parameters, including the intercept
    pub parameters: usize,

    /// Residual degrees of freedom
    pub df: usize,

    /// Residual sum of squares
    pub rss: f64,

    /// R²
    pub r_squared: f64,

    /// Adjusted R²
    pub adjusted_r_squared: f64,

    /// Residual standard error
    pub sigma: f64,

    /// Akaike information criterion
    pub aic: f64,

    /// Bayesian information criterion
    pub bic: f64,
}
impl FitProperties {
    /// Collects the properties of a solved model.
    #[must_use]
    pub fn new(model: &str, solution: &LeastSquares) -> Self {
        Self {
            model: model.to_string(),
            parameters: solution.p(),
            df: solution.df_residual(),
            rss: solution.rss(),
            r_squared: solution.r_squared(),
            adjusted_r_squared: solution.adjusted_r_squared(),
            sigma: solution.residual_standard_error(),
            aic: solution.aic(),
            bic: solution.bic(),
        }
    }
}

/// A regression summary, in the familiar layout:
///
/// ```text
/// Linear spline
///
/// Residuals:
///     Min       1Q   Median      3Q     Max
/// -1.9021  -0.5562  0.02514  0.6350  1.7345
///
/// Coefficients:
///              Estimate  Std. Error  t value  Pr(>|t|)
/// (Intercept)     9.652      0.9718    9.932  < 2e-16  ***
/// …
/// ---
/// Signif. codes:  0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1
///
/// Residual standard error: 0.9853 on 19 degrees of freedom
/// Multiple R-squared:  0.9412,  Adjusted R-squared:  0.9288
/// F-statistic: 76.01 on 4 and 19 DF,  p-value: 1.15e-11
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FitSummary<'a> {
    title: &'a str,
    solution: &'a LeastSquares,
}
impl std::fmt::Display for FitSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = DEFAULT_SIGNIFICANT_DIGITS;
        let s = self.solution;
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;

        //
        // Residual quantiles
        let quantiles = FiveNumberSummary::new(s.residuals().iter().copied()).labelled();
        let mut residuals = Table::new(quantiles.iter().map(|(label, _)| *label));
        residuals.push_row(quantiles.iter().map(|(_, v)| format_significant(*v, digits)));
        writeln!(f, "Residuals:")?;
        write!(f, "{residuals}")?;
        writeln!(f)?;

        //
        // Coefficients
        let mut coefficients = Table::new(["", "Estimate", "Std. Error", "t value", "Pr(>|t|)", ""])
            .with_alignment([Align::Left, Align::Right, Align::Right, Align::Right, Align::Right, Align::Left]);
        for row in s.coefficient_table() {
            coefficients.push_row([
                row.label,
                format_significant(row.estimate, digits),
                format_significant(row.std_error, digits),
                format_significant(row.t_value, digits),
                format_p_value(row.p_value),
                row.significance.code().to_string(),
            ]);
        }
        writeln!(f, "Coefficients:")?;
        write!(f, "{coefficients}")?;
        writeln!(f, "---")?;
        writeln!(f, "Signif. codes:  {}", Significance::LEGEND)?;
        writeln!(f)?;

        //
        // Overall fit
        writeln!(
            f,
            "Residual standard error: {} on {} degrees of freedom",
            format_significant(s.residual_standard_error(), digits),
            s.df_residual()
        )?;
        writeln!(
            f,
            "Multiple R-squared:  {},  Adjusted R-squared:  {}",
            format_significant(s.r_squared(), digits),
            format_significant(s.adjusted_r_squared(), digits)
        )?;
        if let Some((stat, df1, df2)) = s.f_statistic() {
            writeln!(
                f,
                "F-statistic: {} on {df1} and {df2} DF,  p-value: {}",
                format_significant(stat, digits),
                format_p_value(s.f_p_value())
            )?;
        }

        Ok(())
    }
}
