//! Error types for spline fitting and rendering
//!
//! This module defines the failure modes of the walkthrough pipeline, along
//! with a convenient `Result` alias. They fall into four groups:
//! - Invalid input: bad sample lengths or knot sets
//! - Degenerate fits: the design matrix cannot support a unique least-squares solution
//! - I/O: plot artifacts or configuration files could not be read or written
//! - Rendering: the plotting backend failed, or the requested run mode is not compiled in
use std::path::PathBuf;

/// Errors that can occur while generating data, fitting models, or rendering results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested sample length cannot produce any observations.
    #[error("Sample length must be positive, got {0}")]
    InvalidSampleLength(usize),

    /// Caller-provided sample columns do not line up.
    #[error("Sample columns have mismatched lengths: {x} predictor values, {y} responses, {mean} mean values")]
    SampleMismatch {
        /// Number of predictor values
        x: usize,
        /// Number of observed responses
        y: usize,
        /// Number of true-mean values
        mean: usize,
    },

    /// Noise scale must be a finite, non-negative standard deviation.
    #[error("Noise standard deviation must be finite and non-negative, got {0}")]
    InvalidNoise(f64),

    /// A design matrix column does not have one value per observation.
    #[error("Design column `{column}` has {found} values, expected {expected}")]
    RaggedColumn {
        /// Label of the offending column
        column: String,
        /// Number of observations
        expected: usize,
        /// Number of values in the column
        found: usize,
    },

    /// A knot set needs at least one knot.
    #[error("Knot set is empty")]
    EmptyKnots,

    /// Knots must be finite numbers.
    #[error("Knot `{0}` is not a finite number")]
    NonFiniteKnot(f64),

    /// Two knots at the same location would produce identical basis columns.
    #[error("Knot `{0}` appears more than once; duplicate knots collapse basis columns")]
    DuplicateKnot(f64),

    /// Knots must lie strictly inside the range of the predictor.
    #[error("Knot `{knot}` is outside the predictor range ({min}, {max})")]
    KnotOutOfRange {
        /// Offending knot
        knot: f64,
        /// Smallest predictor value
        min: f64,
        /// Largest predictor value
        max: f64,
    },

    /// The design matrix is singular or rank deficient.
    ///
    /// Usually caused by collapsed knots, or too few observations for the number of columns.
    #[error(
        "Degenerate regression: design matrix has rank {rank} but {k} columns; the data may be insufficient or the columns collinear. [n: {n}, k: {k}]"
    )]
    DegenerateRegression {
        /// Number of observations
        n: usize,
        /// Number of design matrix columns
        k: usize,
        /// Detected numerical rank
        rank: usize,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The plotting backend failed.
    #[error("Error drawing plot: {0}")]
    Plot(String),

    /// The run mode requires a renderer that was not compiled in.
    #[error("The `{0}` feature is required for this run mode")]
    RendererUnavailable(&'static str),
}

impl Error {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by invalid caller input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidSampleLength(_)
                | Self::SampleMismatch { .. }
                | Self::InvalidNoise(_)
                | Self::RaggedColumn { .. }
                | Self::EmptyKnots
                | Self::NonFiniteKnot(_)
                | Self::DuplicateKnot(_)
                | Self::KnotOutOfRange { .. }
        )
    }
}

/// Result type for spline fitting
pub type Result<T> = std::result::Result<T, Error>;
