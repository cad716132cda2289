//! Iteration utilities for predictor values and `(x, y)` data.
//!
//! # Iterators
//!
//! - [`SteppedValues`]: A floating-point range iterator with a specified step,
//!   used to build evaluation grids for smooth fitted curves.
//!
//! # Traits
//!
//! - [`CoordExt`]: Accessors for the `x` and `y` channels of a set of points.
//!
//! # Example
//!
//! ```rust
//! use splinefit::value::SteppedValues;
//!
//! // 0.0, 0.25, 0.5, 0.75, 1.0
//! let grid: Vec<f64> = SteppedValues::new(0.0..=1.0, 0.25).collect();
//! assert_eq!(grid.len(), 5);
//! ```
use std::ops::RangeInclusive;

/// Iterator over a range of floating-point values with a specified step.
///
/// This iterator yields values starting from `start` up to and including `end`,
/// incrementing by `step` on each iteration.
///
/// Values are computed as `start + i * step` so rounding errors do not accumulate.
#[derive(Debug, Clone)]
pub struct SteppedValues {
    range: RangeInclusive<f64>,
    step: f64,
    index: f64,
}
impl SteppedValues {
    /// Creates a new iterator over stepped values in a range
    ///
    /// Will yield values starting from `range.start` up to and including `range.end`.
    /// A step that is not positive and finite, or an empty span, yields only `range.start`.
    #[must_use]
    pub fn new(range: RangeInclusive<f64>, step: f64) -> Self {
        Self {
            range,
            step,
            index: 0.0,
        }
    }

    /// Creates an iterator yielding exactly `points` evenly spaced values across `range`.
    ///
    /// Fewer than 2 points yields only the start of the range.
    #[must_use]
    pub fn with_points(range: RangeInclusive<f64>, points: usize) -> Self {
        let span = range.end() - range.start();
        let step = if points < 2 {
            f64::INFINITY
        } else {
            span / (points - 1) as f64
        };
        Self::new(range, step)
    }

    /// Returns the number of steps remaining in the iterator
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn len(&self) -> usize {
        let span = self.range.end() - self.range.start();
        if !(self.step > 0.0 && self.step.is_finite() && span > 0.0) {
            return usize::from(self.index == 0.0 && self.range.start() <= self.range.end());
        }

        let value = self.range.start() + self.index * self.step;
        if value > self.range.end() + self.tolerance() {
            return 0;
        }

        let steps = ((self.range.end() - value) / self.step + 1e-9).floor();
        (steps as usize).saturating_add(1)
    }

    fn tolerance(&self) -> f64 {
        self.step.abs() * 1e-9
    }

    /// Returns true if the iterator is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl Iterator for SteppedValues {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }

        let value = if self.index == 0.0 {
            *self.range.start()
        } else {
            self.range.start() + self.index * self.step
        };
        self.index += 1.0;

        // Rounding can land just past the end; the endpoint itself is always yielded
        Some(value.min(*self.range.end()))
    }
}

/// Extension trait for accessing the `x` and `y` coordinates of a set of points.
///
/// # Examples
///
/// ```
/// # use splinefit::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// assert_eq!(data.x_range(), Some(0.0..=2.0));
/// ```
pub trait CoordExt {
    /// Returns an iterator over the x-coordinates.
    fn x_iter(&self) -> impl Iterator<Item = f64>;

    /// Returns an iterator over the y-coordinates.
    fn y_iter(&self) -> impl Iterator<Item = f64>;

    /// Collects the x-coordinates.
    fn x(&self) -> Vec<f64> {
        self.x_iter().collect()
    }

    /// Collects the y-coordinates.
    fn y(&self) -> Vec<f64> {
        self.y_iter().collect()
    }

    /// Returns the range of x-coordinates, or `None` if there are no points.
    fn x_range(&self) -> Option<RangeInclusive<f64>> {
        min_max(self.x_iter())
    }

    /// Returns the range of y-coordinates, or `None` if there are no points.
    fn y_range(&self) -> Option<RangeInclusive<f64>> {
        min_max(self.y_iter())
    }
}
impl CoordExt for [(f64, f64)] {
    fn x_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|(_, y)| *y)
    }
}

/// Smallest and largest value of an iterator, ignoring NaN.
pub(crate) fn min_max(values: impl Iterator<Item = f64>) -> Option<RangeInclusive<f64>> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                Some((min, max)) => (min.min(v), max.max(v)),
                None => (v, v),
            })
        })
        .map(|(min, max)| min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range() {
        let range = SteppedValues::new(0.0..=1.0, 0.1);
        assert_eq!(range.len(), 11);

        let values: Vec<_> = range.collect();
        assert_eq!(values.len(), 11);
        assert_eq!(values.last().copied(), Some(1.0));
    }

    #[test]
    fn test_with_points() {
        let values: Vec<_> = SteppedValues::with_points(1.0..=24.0, 200).collect();
        assert_eq!(values.len(), 200);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[199], 24.0);

        let single: Vec<_> = SteppedValues::with_points(3.0..=4.0, 1).collect();
        assert_eq!(single, vec![3.0]);
    }

    #[test]
    fn test_degenerate_steps() {
        let flat: Vec<_> = SteppedValues::with_points(3.0..=3.0, 5).take(10).collect();
        assert_eq!(flat, vec![3.0]);

        for step in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let range = SteppedValues::new(0.0..=1.0, step);
            assert_eq!(range.len(), 1);
            assert_eq!(range.take(10).collect::<Vec<_>>(), vec![0.0]);
        }

        // Reversed ranges are empty
        assert!(SteppedValues::new(1.0..=0.0, 0.1).is_empty());
    }

    #[test]
    fn test_coord_ranges() {
        let data = vec![(3.0, f64::NAN), (1.0, 5.0), (2.0, -1.0)];
        assert_eq!(data.x_range(), Some(1.0..=3.0));
        assert_eq!(data.y_range(), Some(-1.0..=5.0));

        let empty: Vec<(f64, f64)> = Vec::new();
        assert_eq!(empty.x_range(), None);
    }
}
