//! Figures and the backends that draw them
//!
//! The pipeline builds backend-agnostic [`Figure`]s and hands them to a [`PlotBackend`]
//! chosen from the run's [`OutputConfig`]:
//! - [`RunMode::Files`] writes each figure to disk using `plotters` (requires the `plotting` feature)
//! - [`RunMode::Interactive`] draws each figure in the terminal using `ratatui` (requires the `interactive` feature)
//!
//! ```rust,no_run
//! # use splinefit::{config::OutputConfig, plotting::{self, Figure, SeriesRole}};
//! let figure = Figure::new("demo", "Demo")
//!     .with_points("Observed", SeriesRole::Observed, vec![(1.0, 2.0), (2.0, 3.5)]);
//!
//! let mut backend = plotting::backend_for(&OutputConfig::default()).unwrap();
//! backend.render(&figure).unwrap();
//! ```
mod backend;
pub use backend::*;

mod element;
pub use element::*;

#[cfg(feature = "plotting")]
mod palette;

use crate::{
    config::{OutputConfig, RunMode},
    error::{Error, Result},
};

/// Creates the backend for the configured run mode.
///
/// # Errors
/// - [`Error::RendererUnavailable`] if the run mode's cargo feature is disabled
/// - Any error from setting the backend up, such as an unwritable output directory
pub fn backend_for(output: &OutputConfig) -> Result<Box<dyn PlotBackend>> {
    let backend: Box<dyn PlotBackend> = match output.mode {
        #[cfg(feature = "plotting")]
        RunMode::Files => Box::new(backend::plotters::FileBackend::new(output)?),

        #[cfg(feature = "interactive")]
        RunMode::Interactive => Box::new(backend::terminal::TerminalBackend::new()?),

        #[allow(unreachable_patterns)]
        mode => return Err(Error::RendererUnavailable(required_feature(mode))),
    };

    log::debug!("Rendering to {}", backend.describe());
    Ok(backend)
}

/// Cargo feature a run mode depends on
#[must_use]
pub fn required_feature(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Files => "plotting",
        RunMode::Interactive => "interactive",
    }
}
