//! # Splinefit
//! ## Piecewise polynomials, one knot at a time
//!
//! A single cubic polynomial has a hard time following a curve that bends more than twice.
//! Splines fix that by gluing simple pieces together at a handful of **knots**, and they can
//! still be fitted by plain ordinary least squares: every piece is just another column in the
//! design matrix.
//!
//! This crate walks through that idea end to end:
//! - Draw a reproducible noisy sample around a known, wavy mean ([`sample`])
//! - Build linear spline, cubic polynomial, cubic spline and natural spline bases ([`basis`])
//! - Fit each by least squares, with the usual inference statistics ([`SplineFit`])
//! - Print regression summaries and plot the fits over the data ([`display`], [`plotting`])
//!
//! ```rust
//! # use splinefit::{CubicSplineFit, basis::CubicSplineBasis, knots::KnotSet, sample::{MeanCurve, Sample}, assert_r_squared};
//! let sample = Sample::generate(24, 42, &MeanCurve::default(), 1.0).unwrap();
//! let points = sample.points();
//!
//! let fit = CubicSplineFit::new(&points, CubicSplineBasis::new(KnotSet::default())).unwrap();
//! println!("{}", fit.summary("Cubic spline"));
//! assert_r_squared!(fit, 0.8);
//! ```
//!
//! # Core Concepts
//! - A [`knots::KnotSet`] is a sorted set of distinct breakpoints, shared by every piecewise model in a run.
//! - A [`basis::Basis`] turns a predictor value into the columns of one design matrix row:
//!     - [`basis::LinearSplineBasis`]: `x, (x - k)₊, …` - straight pieces joined at each knot
//!     - [`basis::CubicPolynomialBasis`]: `x, x², x³` - no knots at all
//!     - [`basis::CubicSplineBasis`]: `x, x², x³, (x - k)₊³, …` - smooth cubic pieces
//!     - [`basis::NaturalSplineBasis`]: a cubic spline constrained to be linear beyond the data
//!         - Supplied through a [`basis::NaturalSplineProvider`], so other formulations can be swapped in
//! - A [`SplineFit`] is the least squares solution for a basis and a data set.
//!     - It is rejected with [`error::Error::DegenerateRegression`] if the design matrix is rank deficient
//!     - [`SplineFit::summary`] prints the familiar regression table
//! - A [`walkthrough::Walkthrough`] runs the whole pipeline from a [`config::Config`].
//!
//! # Testing utilities
//!
//! Assertion macros for floating point results and fit quality are exported from [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

pub mod basis;
pub mod config;
pub mod design;
pub mod display;
pub mod error;
pub mod knots;
pub mod plotting;
pub mod sample;
pub mod statistics;
pub mod value;
pub mod walkthrough;

mod fit;
pub use fit::*;

pub use nalgebra;
