//! Synthetic data for the walkthrough
//!
//! A [`Sample`] is a fixed set of observations `yᵢ = μ(xᵢ) + εᵢ` at `x = 1, 2, …, n`, where
//! `μ` is a [`MeanCurve`] and `εᵢ` is independent normal noise from a seeded generator.
//!
//! The same seed always produces bit-identical samples, so every model in a run is
//! fitted against exactly the same data.
//!
//! ```rust
//! # use splinefit::sample::{MeanCurve, Sample};
//! let a = Sample::generate(24, 42, &MeanCurve::default(), 1.0).unwrap();
//! let b = Sample::generate(24, 42, &MeanCurve::default(), 1.0).unwrap();
//! assert_eq!(a, b);
//! ```
use std::ops::RangeInclusive;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{
    error::{Error, Result},
    value::{min_max, SteppedValues},
};

/// The true mean function the data is drawn around.
///
/// ```math
/// μ(x) = intercept + slope·x + amplitude·sin(2πx / period)
/// ```
///
/// A trend plus one full oscillation over the default 24 points; smooth, but too wavy for
/// a single low degree polynomial.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeanCurve {
    /// Value of the trend line at `x = 0`
    pub intercept: f64,

    /// Slope of the trend line
    pub slope: f64,

    /// Height of the oscillation
    pub amplitude: f64,

    /// Length of one full oscillation
    pub period: f64,
}
impl Default for MeanCurve {
    fn default() -> Self {
        Self {
            intercept: 10.0,
            slope: 0.25,
            amplitude: 5.0,
            period: 24.0,
        }
    }
}
impl MeanCurve {
    /// Evaluates the curve at `x`
    #[must_use]
    pub fn y(&self, x: f64) -> f64 {
        self.intercept
            + self.slope * x
            + self.amplitude * (std::f64::consts::TAU * x / self.period).sin()
    }

    /// Evaluates the curve at `points` evenly spaced values across `range`
    #[must_use]
    pub fn solve_range(&self, range: RangeInclusive<f64>, points: usize) -> Vec<(f64, f64)> {
        SteppedValues::with_points(range, points)
            .map(|x| (x, self.y(x)))
            .collect()
    }
}

/// A set of noisy observations around a known mean.
///
/// Immutable once built; `x`, `y` and `mean` always have the same, non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    x: Vec<f64>,
    y: Vec<f64>,
    mean: Vec<f64>,
}
impl Sample {
    /// Draws a sample of length `n`.
    ///
    /// - `x[i] = i + 1`
    /// - `mean[i] = curve.y(x[i])`
    /// - `y[i] = mean[i] + noise_sd · zᵢ`, with `zᵢ` standard normal draws from a [`StdRng`] seeded with `seed`
    ///
    /// # Errors
    /// - [`Error::InvalidSampleLength`] if `n` is zero
    /// - [`Error::InvalidNoise`] if `noise_sd` is negative or not finite
    #[allow(clippy::cast_precision_loss)]
    pub fn generate(n: usize, seed: u64, curve: &MeanCurve, noise_sd: f64) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidSampleLength(n));
        } else if !noise_sd.is_finite() || noise_sd < 0.0 {
            return Err(Error::InvalidNoise(noise_sd));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let x: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        let mean: Vec<f64> = x.iter().map(|&x| curve.y(x)).collect();
        let y = mean
            .iter()
            .map(|m| {
                let z: f64 = rng.sample(StandardNormal);
                m + noise_sd * z
            })
            .collect();

        log::debug!("Generated {n} observations from seed {seed}");
        Ok(Self { x, y, mean })
    }

    /// Builds a sample from caller-provided data.
    ///
    /// # Errors
    /// - [`Error::InvalidSampleLength`] if the columns are empty
    /// - [`Error::SampleMismatch`] if the columns differ in length
    pub fn from_parts(x: Vec<f64>, y: Vec<f64>, mean: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() || x.len() != mean.len() {
            return Err(Error::SampleMismatch {
                x: x.len(),
                y: y.len(),
                mean: mean.len(),
            });
        } else if x.is_empty() {
            return Err(Error::InvalidSampleLength(0));
        }

        Ok(Self { x, y, mean })
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false; samples cannot be empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Predictor values
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Observed responses
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// True mean at each predictor value
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Observations as `(x, y)` pairs
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }

    /// True mean as `(x, mean)` pairs
    #[must_use]
    pub fn mean_points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.mean.iter().copied()).collect()
    }

    /// Range of the predictor
    #[must_use]
    pub fn x_range(&self) -> RangeInclusive<f64> {
        min_max(self.x.iter().copied()).unwrap_or(0.0..=0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    #[test]
    fn test_generate_is_deterministic() {
        let curve = MeanCurve::default();
        let a = Sample::generate(24, 7, &curve, 1.0).unwrap();
        let b = Sample::generate(24, 7, &curve, 1.0).unwrap();
        assert_eq!(a.y(), b.y());

        let c = Sample::generate(24, 8, &curve, 1.0).unwrap();
        assert_ne!(a.y(), c.y());
    }

    #[test]
    fn test_sample_shape() {
        let sample = Sample::generate(24, 1, &MeanCurve::default(), 1.0).unwrap();
        assert_eq!(sample.len(), 24);
        assert_eq!(sample.x()[0], 1.0);
        assert_eq!(sample.x()[23], 24.0);
        assert_eq!(sample.x_range(), 1.0..=24.0);
        assert_eq!(sample.points().len(), 24);
        assert_eq!(sample.mean_points()[5], (6.0, MeanCurve::default().y(6.0)));
    }

    #[test]
    fn test_mean_curve() {
        let curve = MeanCurve::default();
        assert_close!(curve.y(0.0), 10.0);
        assert_close!(curve.y(6.0), 10.0 + 1.5 + 5.0, tol = 1e-12);
        assert_close!(curve.y(24.0), 16.0, tol = 1e-12);
        assert_eq!(curve.solve_range(0.0..=24.0, 49).len(), 49);
    }

    #[test]
    fn test_zero_noise_is_the_mean() {
        let sample = Sample::generate(12, 3, &MeanCurve::default(), 0.0).unwrap();
        assert_eq!(sample.y(), sample.mean());
    }

    #[test]
    fn test_noise_scale() {
        let sample = Sample::generate(2000, 11, &MeanCurve::default(), 2.0).unwrap();
        let residuals: Vec<f64> = sample.y().iter().zip(sample.mean()).map(|(y, m)| y - m).collect();
        let mean = crate::statistics::mean(residuals.iter().copied());
        let sd = crate::statistics::residual_variance(residuals.iter().copied(), std::iter::repeat(mean), 1).sqrt();

        // Loose bounds; 2000 draws put the sample sd well within 10% of the truth
        assert!(mean.abs() < 0.2, "mean = {mean}");
        assert!((sd - 2.0).abs() < 0.2, "sd = {sd}");
    }

    #[test]
    fn test_invalid_input() {
        let curve = MeanCurve::default();
        assert!(matches!(
            Sample::generate(0, 1, &curve, 1.0),
            Err(Error::InvalidSampleLength(0))
        ));
        assert!(matches!(
            Sample::generate(5, 1, &curve, f64::NAN),
            Err(Error::InvalidNoise(_))
        ));

        let err = Sample::from_parts(vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(Sample::from_parts(vec![], vec![], vec![]).is_err());
        assert!(Sample::from_parts(vec![1.0], vec![2.0], vec![2.5]).is_ok());
    }
}
