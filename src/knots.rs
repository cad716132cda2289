//! Knot sets for piecewise polynomial bases
//!
//! A [`KnotSet`] is a small, ordered set of breakpoints on the predictor's domain where
//! a piecewise basis function is allowed to change shape.
//!
//! Knot sets are validated when they are built:
//! - Knots are sorted into ascending order
//! - Empty sets, non-finite knots and duplicates are rejected
//!
//! Use [`KnotSet::validate_within`] to also require that every knot lies strictly inside
//! the range of the predictor - a knot at or beyond the edge of the data produces a column
//! that is zero (or collinear with the others) for every observation.
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// An ordered set of distinct, finite knots.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct KnotSet(Vec<f64>);
impl KnotSet {
    /// Creates a new knot set.
    ///
    /// Knots are sorted into ascending order.
    ///
    /// # Errors
    /// - [`Error::EmptyKnots`] if no knots are given
    /// - [`Error::NonFiniteKnot`] if any knot is NaN or infinite
    /// - [`Error::DuplicateKnot`] if two knots share a location
    pub fn new(knots: impl IntoIterator<Item = f64>) -> Result<Self> {
        let mut knots: Vec<f64> = knots.into_iter().collect();
        if knots.is_empty() {
            return Err(Error::EmptyKnots);
        }

        if let Some(bad) = knots.iter().find(|k| !k.is_finite()) {
            return Err(Error::NonFiniteKnot(*bad));
        }

        knots.sort_by(f64::total_cmp);
        if let Some(pair) = knots.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::DuplicateKnot(pair[0]));
        }

        Ok(Self(knots))
    }

    /// Checks that every knot lies strictly inside `range`.
    ///
    /// # Errors
    /// Returns [`Error::KnotOutOfRange`] for the first knot at or outside either end of the range.
    pub fn validate_within(&self, range: &RangeInclusive<f64>) -> Result<()> {
        let (min, max) = (*range.start(), *range.end());
        match self.0.iter().find(|&&k| k <= min || k >= max) {
            Some(&knot) => Err(Error::KnotOutOfRange { knot, min, max }),
            None => Ok(()),
        }
    }

    /// Number of knots in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; knot sets cannot be empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The knots, in ascending order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterates over the knots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Smallest knot
    #[must_use]
    pub fn first(&self) -> f64 {
        self.0[0]
    }

    /// Largest knot
    #[must_use]
    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }
}

impl Default for KnotSet {
    /// Three interior knots at 6, 12 and 18; the walkthrough's default for a predictor running 1 to 24.
    fn default() -> Self {
        Self(vec![6.0, 12.0, 18.0])
    }
}

impl TryFrom<Vec<f64>> for KnotSet {
    type Error = Error;

    fn try_from(value: Vec<f64>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<KnotSet> for Vec<f64> {
    fn from(value: KnotSet) -> Self {
        value.0
    }
}

impl std::fmt::Display for KnotSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let knots: Vec<String> = self.0.iter().map(|k| format!("{k}")).collect();
        write!(f, "{{{}}}", knots.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_knots() {
        let knots = KnotSet::new([18.0, 6.0, 12.0]).unwrap();
        assert_eq!(knots.as_slice(), &[6.0, 12.0, 18.0]);
        assert_eq!(knots.first(), 6.0);
        assert_eq!(knots.last(), 18.0);
        assert_eq!(knots.to_string(), "{6, 12, 18}");
    }

    #[test]
    fn test_rejects_invalid_knots() {
        assert!(matches!(KnotSet::new([]), Err(Error::EmptyKnots)));
        assert!(matches!(
            KnotSet::new([6.0, f64::NAN]),
            Err(Error::NonFiniteKnot(_))
        ));
        assert!(matches!(
            KnotSet::new([12.0, 6.0, 12.0]),
            Err(Error::DuplicateKnot(k)) if k == 12.0
        ));
    }

    #[test]
    fn test_validate_within() {
        let knots = KnotSet::default();
        assert!(knots.validate_within(&(1.0..=24.0)).is_ok());

        // Knots at the edge of the data are rejected
        let err = knots.validate_within(&(6.0..=24.0)).unwrap_err();
        assert!(matches!(err, Error::KnotOutOfRange { knot, .. } if knot == 6.0));
        assert!(err.is_invalid_input());

        let err = knots.validate_within(&(1.0..=10.0)).unwrap_err();
        assert!(matches!(err, Error::KnotOutOfRange { knot, .. } if knot == 12.0));
    }

    #[test]
    fn test_deserialize_validates() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            knots: KnotSet,
        }

        let ok: Wrapper = toml::from_str("knots = [12.0, 6.0]").unwrap();
        assert_eq!(ok.knots.as_slice(), &[6.0, 12.0]);

        let bad = toml::from_str::<Wrapper>("knots = [6.0, 6.0]");
        assert!(bad.is_err());
    }
}
