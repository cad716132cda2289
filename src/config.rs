//! Run configuration
//!
//! Everything the walkthrough needs to know is carried in one [`Config`] value, loaded from
//! TOML and passed explicitly down the pipeline. Every field has a default, so an empty file
//! (or no file at all) reproduces the standard walkthrough.
//!
//! ```toml
//! knots = [6, 12, 18]
//!
//! [sample]
//! length = 24
//! seed = 42
//! noise_sd = 1.0
//!
//! [sample.mean]
//! amplitude = 5.0
//!
//! [output]
//! mode = "files"
//! directory = "plots"
//! format = "svg"
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    knots::KnotSet,
    sample::{MeanCurve, Sample},
};

/// Top-level configuration for a walkthrough run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Synthetic data parameters
    pub sample: SampleConfig,

    /// Knots shared by every piecewise model
    pub knots: KnotSet,

    /// Where and how figures are rendered
    pub output: OutputConfig,
}
impl Config {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the string is not valid TOML, has unknown keys, or
    /// contains an invalid knot set.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a configuration from a TOML file on disk.
    ///
    /// # Errors
    /// - [`Error::Io`] if the file cannot be read
    /// - [`Error::Config`] if it cannot be parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&content)?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Parameters of the synthetic sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    /// Number of observations
    pub length: usize,

    /// Seed for the noise generator
    pub seed: u64,

    /// Standard deviation of the noise
    pub noise_sd: f64,

    /// The true mean function
    pub mean: MeanCurve,
}
impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            length: 24,
            seed: 42,
            noise_sd: 1.0,
            mean: MeanCurve::default(),
        }
    }
}
impl SampleConfig {
    /// Draws the sample these parameters describe.
    ///
    /// # Errors
    /// See [`Sample::generate`].
    pub fn generate(&self) -> Result<Sample> {
        Sample::generate(self.length, self.seed, &self.mean, self.noise_sd)
    }
}

/// Whether figures are written to disk or shown in the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Write each figure to `<directory>/<artifact>.<ext>`
    #[default]
    Files,

    /// Draw each figure as a terminal chart, waiting for a key press between figures
    Interactive,
}

/// File format for written figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Scalable vector graphics
    #[default]
    Svg,

    /// Raster image, rendered from the same SVG
    Png,
}
impl ImageFormat {
    /// File extension, without the dot
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}
impl std::str::FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(format!("unknown image format `{other}`, expected `svg` or `png`")),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Files or interactive display
    pub mode: RunMode,

    /// Directory figures are written to in [`RunMode::Files`]
    pub directory: PathBuf,

    /// Format of written figures
    pub format: ImageFormat,

    /// Figure width in pixels
    pub width: u32,

    /// Figure height in pixels
    pub height: u32,
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Files,
            directory: PathBuf::from("plots"),
            format: ImageFormat::Svg,
            width: 800,
            height: 600,
        }
    }
}
impl OutputConfig {
    /// Path a figure named `artifact` is written to
    #[must_use]
    pub fn artifact_path(&self, artifact: &str) -> PathBuf {
        self.directory
            .join(artifact)
            .with_extension(self.format.extension())
    }
}
