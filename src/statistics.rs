//! Functions and tools for evaluating regression fits
//!
//! This module provides the summary statistics reported for every fitted model.
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//! - [`adjusted_r_squared`]: R² adjusted for number of parameters. Use to compare models of different sizes.
//! - [`residual_variance`]: Unbiased estimate of variance of errors after fitting.
//! - [`gaussian_log_likelihood`]: Log-likelihood of the fit under normally distributed errors.
//!
//! # Inference
//! - [`t_test_p_value`]: Two-sided p value for a coefficient's t statistic.
//! - [`f_test_p_value`]: Upper tail p value for the overall F statistic.
//! - [`Significance`]: The familiar `***`, `**`, `*`, `.` significance codes.
//! - [`Confidence`]: Confidence levels, with t critical values for a given df.
//!
//! # Model Selection
//! - [`ScoringMethod`]: Information criteria (AIC, BIC). Lower is better.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`quantile`]: Sample quantile, using linear interpolation between order statistics.
//! - [`FiveNumberSummary`]: Min, quartiles, median and max; the "Residuals" line of a summary.
//!
//! # Examples
//!
//! ```rust
//! use splinefit::statistics::{r_squared, ScoringMethod, gaussian_log_likelihood};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! // Goodness-of-fit
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! println!("R² = {r2}");
//!
//! // Model scoring
//! let ll = gaussian_log_likelihood(y.into_iter(), y_fit.into_iter());
//! let score = ScoringMethod::AIC.calculate(ll, 3, 2);
//! println!("AIC score = {score}");
//! ```
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Residual sum of squares, `Σ (y_i - y_fit_i)²`.
pub fn residual_sum_of_squares(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
) -> f64 {
    y.zip(y_fit).map(|(y, y_fit)| (y - y_fit).powi(2)).sum()
}

/// Computes the residual variance of a model's predictions.
///
/// Residual variance is the unbiased estimate of the variance of the
/// errors (σ²) after fitting a model. It's used for standard errors of the fitted parameters.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// σ² = Σ (y_i - y_fit_i)² / (n - k)
/// where
///   y_i = observed values, y_fit_i = predicted values,
///   n = number of observations, k = number of model parameters
/// ```
/// </div>
///
/// Returns zero if there are no residual degrees of freedom.
///
/// # Example
/// ```rust
/// # use splinefit::statistics::residual_variance;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![0.9, 2.1, 2.95];
/// let variance = residual_variance(y.into_iter(), y_fit.into_iter(), 2);
/// assert!((variance - 0.0225).abs() < 1e-12);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn residual_variance(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
    k: usize,
) -> f64 {
    let mut ss = 0.0;
    let mut n = 0usize;
    for (y, y_fit) in y.zip(y_fit) {
        ss += (y - y_fit).powi(2);
        n += 1;
    }

    if n <= k {
        return 0.0;
    }
    ss / (n - k) as f64
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared is a number between 0 and 1 that tells you how well the model explains the data:
/// - `0` means the model explains none of the variation.
/// - `1` means the model explains all the variation.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
/// </div>
///
/// A constant response has no variance to explain; R² is then 1 for a perfect fit and 0 otherwise.
///
/// # Example
/// ```rust
/// # use splinefit::statistics::r_squared;
/// let y = vec![1.0, 2.0, 3.0];
/// let r2 = r_squared(y.iter().copied(), y.iter().copied());
/// assert_eq!(r2, 1.0);
/// ```
pub fn r_squared(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let (y, y_fit): (Vec<f64>, Vec<f64>) = y.zip(y_fit).unzip();
    let y_mean = mean(y.iter().copied());

    let ss_total: f64 = y.iter().map(|y| (y - y_mean).powi(2)).sum();
    let ss_residual = residual_sum_of_squares(y.iter().copied(), y_fit.iter().copied());

    if ss_total == 0.0 {
        return if ss_residual == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_residual / ss_total
}

/// R² adjusted for the number of parameters in the model.
///
/// ```math
/// R²_adj = 1 - (1 - R²) (n - 1) / (n - p)
/// where
///   n = number of observations, p = number of parameters including the intercept
/// ```
///
/// Returns NaN if `n <= p`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn adjusted_r_squared(r2: f64, n: usize, p: usize) -> f64 {
    if n <= p {
        return f64::NAN;
    }

    1.0 - (1.0 - r2) * (n - 1) as f64 / (n - p) as f64
}

/// Log-likelihood of a least squares fit, assuming independent normally distributed errors.
///
/// Uses the maximum likelihood estimate of the error variance, `σ̂² = RSS / n`:
///
/// ```math
/// ln L = -n/2 · (ln(2π) + ln(RSS / n) + 1)
/// ```
///
/// A perfect fit has an unbounded likelihood; this returns `+∞` in that case.
#[allow(clippy::cast_precision_loss)]
pub fn gaussian_log_likelihood(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
) -> f64 {
    let mut rss = 0.0;
    let mut n = 0usize;
    for (y, y_fit) in y.zip(y_fit) {
        rss += (y - y_fit).powi(2);
        n += 1;
    }

    if n == 0 {
        return f64::NAN;
    }

    let n = n as f64;
    -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (rss / n).ln() + 1.0)
}

/// Computes the arithmetic mean of a sequence of values.
///
/// Returns NaN if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = splinefit::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn mean(data: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in data {
        sum += value;
        count += 1;
    }
    sum / count as f64
}

/// Sample quantile of already sorted data, interpolating linearly between order statistics.
///
/// This is the "type 7" definition used by most statistics packages:
/// `h = (n - 1)·prob`, and the result interpolates between `sorted[⌊h⌋]` and `sorted[⌈h⌉]`.
///
/// Returns NaN for empty data. `prob` is clamped to `[0, 1]`.
///
/// ```rust
/// # use splinefit::statistics::quantile;
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&sorted, 0.5), 2.5);
/// assert_eq!(quantile(&sorted, 0.25), 1.75);
/// ```
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(sorted: &[f64], prob: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let h = (sorted.len() - 1) as f64 * prob.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Minimum, quartiles, median and maximum of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FiveNumberSummary {
    /// Smallest value
    pub min: f64,

    /// First quartile
    pub q1: f64,

    /// Median
    pub median: f64,

    /// Third quartile
    pub q3: f64,

    /// Largest value
    pub max: f64,
}
impl FiveNumberSummary {
    /// Summarises a dataset. NaN values are sorted to the end.
    #[must_use]
    pub fn new(data: impl Iterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = data.collect();
        sorted.sort_by(f64::total_cmp);

        Self {
            min: quantile(&sorted, 0.0),
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: quantile(&sorted, 1.0),
        }
    }

    /// The five values in order, with their conventional labels.
    #[must_use]
    pub fn labelled(&self) -> [(&'static str, f64); 5] {
        [
            ("Min", self.min),
            ("1Q", self.q1),
            ("Median", self.median),
            ("3Q", self.q3),
            ("Max", self.max),
        ]
    }
}

/// Two-sided p value of a t statistic with `df` degrees of freedom.
///
/// ```math
/// p = 2 · P(T > |t|)
/// ```
///
/// Returns NaN if `df` is zero or `t` is NaN.
///
/// ```rust
/// # use splinefit::statistics::t_test_p_value;
/// // t = 2.086 is the 97.5th percentile of t with 20 df
/// let p = t_test_p_value(2.086, 20);
/// assert!((p - 0.05).abs() < 1e-3);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn t_test_p_value(t: f64, df: usize) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }

    match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// Upper tail p value of an F statistic with `(df1, df2)` degrees of freedom.
///
/// Returns NaN if either df is zero or `f` is NaN.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn f_test_p_value(f: f64, df1: usize, df2: usize) -> f64 {
    if f.is_nan() {
        return f64::NAN;
    }

    match FisherSnedecor::new(df1 as f64, df2 as f64) {
        Ok(dist) => dist.sf(f.max(0.0)),
        Err(_) => f64::NAN,
    }
}

/// Significance code for a p value.
///
/// | Code  | p value       |
/// |-------|---------------|
/// | `***` | `< 0.001`     |
/// | `**`  | `< 0.01`      |
/// | `*`   | `< 0.05`      |
/// | `.`   | `< 0.1`       |
/// |       | otherwise     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum Significance {
    /// p < 0.001
    VeryHigh,

    /// p < 0.01
    High,

    /// p < 0.05
    Moderate,

    /// p < 0.1
    Weak,

    /// Not significant
    NotSignificant,
}
impl Significance {
    /// Legend explaining the codes, in the usual single-line layout.
    pub const LEGEND: &'static str = "0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1";

    /// Classifies a p value. NaN is never significant.
    #[must_use]
    pub fn from_p_value(p: f64) -> Self {
        match p {
            p if p < 0.001 => Self::VeryHigh,
            p if p < 0.01 => Self::High,
            p if p < 0.05 => Self::Moderate,
            p if p < 0.1 => Self::Weak,
            _ => Self::NotSignificant,
        }
    }

    /// The code itself, such as `**`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::VeryHigh => "***",
            Self::High => "**",
            Self::Moderate => "*",
            Self::Weak => ".",
            Self::NotSignificant => "",
        }
    }
}
impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.code())
    }
}

/// Methods for scoring a regression model.
///
/// These are used to compare the spline variants against each other; lower is better.
///
/// # Selecting a method
/// - `AIC`: Picks a slightly more complex model if it fits better.
/// - `BIC`: Prefers simpler models, even if the fit is slightly worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMethod {
    /// Akaike Information Criterion. Uses a more lenient penalty for model complexity
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// AIC = 2k - 2 ln L
    /// where
    ///   L = likelihood of the model
    ///   k = number of estimated parameters, including the error variance
    /// ```
    /// </div>
    AIC,

    /// Bayesian Information Criterion. Uses a stricter penalty for model complexity.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// BIC = k ln(n) - 2 ln L
    /// ```
    /// </div>
    BIC,
}
impl ScoringMethod {
    /// Calculate the model's score using this scoring method.
    ///
    /// # Parameters
    /// - `log_likelihood`: See [`gaussian_log_likelihood`].
    /// - `n`: Number of observations.
    /// - `p`: Number of regression coefficients, including the intercept.
    ///   The error variance is counted as one more parameter.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate(self, log_likelihood: f64, n: usize, p: usize) -> f64 {
        let k = (p + 1) as f64;
        match self {
            ScoringMethod::AIC => 2.0 * k - 2.0 * log_likelihood,
            ScoringMethod::BIC => k * (n as f64).ln() - 2.0 * log_likelihood,
        }
    }
}

/// Confidence levels for coefficient intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    /// 90% confidence level
    P90,

    /// 95% confidence level
    P95,

    /// 99% confidence level
    P99,

    /// Custom confidence level, as a fraction in `(0, 1)`
    Custom(f64),
}
impl Confidence {
    /// Returns the confidence level as a fraction.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        match self {
            Confidence::P90 => 0.9,
            Confidence::P95 => 0.95,
            Confidence::P99 => 0.99,
            Confidence::Custom(p) => *p,
        }
    }

    /// Returns the alpha level (1 - confidence level).
    #[must_use]
    pub fn alpha(&self) -> f64 {
        1.0 - self.percentage()
    }

    /// Returns the two-sided t critical value for this level and `df` degrees of freedom.
    ///
    /// Returns infinity when `df` is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn t_score(self, df: usize) -> f64 {
        match StudentsT::new(0.0, 1.0, df as f64) {
            Ok(dist) => dist.inverse_cdf(1.0 - self.alpha() / 2.0),
            Err(_) => f64::INFINITY,
        }
    }
}
impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percentage() * 100.0)
    }
}
