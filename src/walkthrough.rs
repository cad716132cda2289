//! The end-to-end walkthrough
//!
//! One pass draws a sample, then fits and reports each [`ModelKind`] against that same sample:
//!
//! 1. Overview figure of the observed data and the true mean
//! 2. For each model: regression summary on the console, and a figure overlaying the observed
//!    data, the true mean and the fitted curve
//! 3. A side-by-side comparison of all four models
//!
//! ```rust,no_run
//! # use splinefit::{config::Config, walkthrough::Walkthrough};
//! let report = Walkthrough::new(Config::default()).run(&mut std::io::stdout()).unwrap();
//! println!("{}", report.comparison_table());
//! ```
use std::io::Write;

use crate::{
    basis::{
        Basis, CubicPolynomialBasis, CubicSplineBasis, LinearSplineBasis, NaturalSplineProvider,
        TruncatedPowerNaturalSpline,
    },
    config::Config,
    display::{format_significant, Align, Table, DEFAULT_SIGNIFICANT_DIGITS},
    error::{Error, Result},
    fit::{FitProperties, SplineFit},
    knots::KnotSet,
    plotting::{self, Figure, PlotBackend, SeriesRole},
    sample::Sample,
};

/// Name of the overview figure
pub const OVERVIEW_ARTIFACT: &str = "data_overview";

/// Fits with an R² below this are logged as weak
pub const WEAK_FIT_R_SQUARED: f64 = 0.5;

/// Number of points used to draw smooth curves
const CURVE_POINTS: usize = 200;

/// The four regression models in the walkthrough, in the order they are fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// `x` plus one `(x - k)₊` column per knot
    LinearSpline,

    /// `x`, `x²` and `x³`
    CubicPolynomial,

    /// `x`, `x²`, `x³` plus one `(x - k)₊³` column per knot
    CubicSpline,

    /// `x` plus one natural spline column per knot
    NaturalSpline,
}
impl ModelKind {
    /// Every model, in walkthrough order
    pub const ALL: [Self; 4] = [
        Self::LinearSpline,
        Self::CubicPolynomial,
        Self::CubicSpline,
        Self::NaturalSpline,
    ];

    /// Output file name for this model's figure, without extension
    #[must_use]
    pub fn artifact(self) -> &'static str {
        match self {
            Self::LinearSpline => "linear_spline",
            Self::CubicPolynomial => "cubic_model",
            Self::CubicSpline => "cubic_spline",
            Self::NaturalSpline => "natural_spline",
        }
    }

    /// Human readable name
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::LinearSpline => "Linear spline",
            Self::CubicPolynomial => "Cubic polynomial",
            Self::CubicSpline => "Cubic spline",
            Self::NaturalSpline => "Natural cubic spline",
        }
    }

    /// True if the model's basis depends on the knot set
    #[must_use]
    pub fn uses_knots(self) -> bool {
        !matches!(self, Self::CubicPolynomial)
    }
}
impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Outcome of a walkthrough run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Report {
    /// Seed the sample was drawn with
    pub seed: u64,

    /// Number of observations
    pub length: usize,

    /// Knots used by the piecewise models
    pub knots: KnotSet,

    /// One entry per model, in walkthrough order
    pub models: Vec<FitProperties>,
}
impl Report {
    /// Side-by-side comparison of every model
    #[must_use]
    pub fn comparison_table(&self) -> Table {
        let digits = DEFAULT_SIGNIFICANT_DIGITS;
        let mut table = Table::new(["Model", "Params", "Df", "RSS", "R²", "Adj. R²", "Sigma", "AIC", "BIC"])
            .with_alignment(std::iter::once(Align::Left).chain(std::iter::repeat(Align::Right).take(8)));

        for m in &self.models {
            table.push_row([
                m.model.clone(),
                m.parameters.to_string(),
                m.df.to_string(),
                format_significant(m.rss, digits),
                format_significant(m.r_squared, digits),
                format_significant(m.adjusted_r_squared, digits),
                format_significant(m.sigma, digits),
                format_significant(m.aic, digits),
                format_significant(m.bic, digits),
            ]);
        }

        table
    }

    /// The model with the lowest AIC, if any
    #[must_use]
    pub fn best_by_aic(&self) -> Option<&FitProperties> {
        self.models.iter().min_by(|a, b| a.aic.total_cmp(&b.aic))
    }

    /// The report as pretty-printed JSON
    #[must_use]
    pub fn to_json(&self) -> String {
        // Every field serializes to plain JSON; non-finite floats become null
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Runs the full walkthrough for a configuration.
///
/// Generic over the natural spline basis provider; [`Walkthrough::new`] uses
/// [`TruncatedPowerNaturalSpline`].
#[derive(Debug, Clone)]
pub struct Walkthrough<P: NaturalSplineProvider = TruncatedPowerNaturalSpline> {
    config: Config,
    provider: P,
    json: bool,
}
impl Walkthrough<TruncatedPowerNaturalSpline> {
    /// Creates a walkthrough with the default natural spline provider
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_provider(config, TruncatedPowerNaturalSpline)
    }
}
impl<P: NaturalSplineProvider> Walkthrough<P> {
    /// Creates a walkthrough with a custom natural spline provider
    pub fn with_provider(config: Config, provider: P) -> Self {
        Self {
            config,
            provider,
            json: false,
        }
    }

    /// Print the final comparison as JSON instead of a table
    #[must_use]
    pub fn json_comparison(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// The run configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the walkthrough, rendering figures with the backend for the configured run mode.
    ///
    /// The sample and knots are checked before the backend is opened. Console output is
    /// written to `out` once the backend is closed, so it is not lost to a terminal's
    /// alternate screen.
    ///
    /// # Errors
    /// Fails on the first error from sampling, fitting, rendering or writing to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Report> {
        let sample = self.sample()?;
        let backend = plotting::backend_for(&self.config.output)?;
        self.run_deferred(&sample, backend, out)
    }

    /// Runs the walkthrough against an explicit plot backend, writing to `out` as it goes.
    ///
    /// # Errors
    /// Fails on the first error from sampling, fitting, rendering or writing to `out`.
    pub fn run_with<W: Write>(&self, backend: &mut dyn PlotBackend, out: &mut W) -> Result<Report> {
        let sample = self.sample()?;
        self.execute(&sample, backend, out)
    }

    /// Takes ownership of the backend and closes it before anything reaches `out`.
    ///
    /// Text produced before a failure is still written.
    fn run_deferred<B: PlotBackend, W: Write>(&self, sample: &Sample, mut backend: B, out: &mut W) -> Result<Report> {
        let mut buffer = Vec::new();
        let report = self.execute(sample, &mut backend, &mut buffer);
        drop(backend);

        out.write_all(&buffer).map_err(|e| Error::io("<output>", e))?;
        report
    }

    /// Draws the sample and checks the knots against it
    fn sample(&self) -> Result<Sample> {
        let sample = self.config.sample.generate()?;
        self.config.knots.validate_within(&sample.x_range())?;
        Ok(sample)
    }

    fn execute<W: Write>(&self, sample: &Sample, backend: &mut dyn PlotBackend, out: &mut W) -> Result<Report> {
        let knots = &self.config.knots;
        let x_range = sample.x_range();

        log::info!(
            "Drew {} observations (seed {}), knots {knots}",
            sample.len(),
            self.config.sample.seed
        );

        backend.render(&self.overview(sample))?;

        let mut models = Vec::with_capacity(ModelKind::ALL.len());
        for kind in ModelKind::ALL {
            let properties = match kind {
                ModelKind::LinearSpline => {
                    self.model(kind, LinearSplineBasis::new(knots.clone()), sample, backend, out)?
                }
                ModelKind::CubicPolynomial => {
                    self.model(kind, CubicPolynomialBasis::new(), sample, backend, out)?
                }
                ModelKind::CubicSpline => {
                    self.model(kind, CubicSplineBasis::new(knots.clone()), sample, backend, out)?
                }
                ModelKind::NaturalSpline => {
                    let basis = self.provider.natural_basis(knots, x_range.clone())?;
                    self.model(kind, basis, sample, backend, out)?
                }
            };
            models.push(properties);
        }

        let report = Report {
            seed: self.config.sample.seed,
            length: sample.len(),
            knots: knots.clone(),
            models,
        };

        if self.json {
            emit(out, &format!("{}\n", report.to_json()))?;
        } else {
            emit(out, &format!("Model comparison\n\n{}", report.comparison_table()))?;
        }

        if let Some(best) = report.best_by_aic() {
            log::info!("Lowest AIC: {} ({:.2})", best.model, best.aic);
        }

        Ok(report)
    }

    fn overview(&self, sample: &Sample) -> Figure {
        Figure::new(OVERVIEW_ARTIFACT, "Simulated data and true mean")
            .with_points("Observed", SeriesRole::Observed, sample.points())
            .with_line(
                "True mean",
                SeriesRole::TrueMean,
                self.config.sample.mean.solve_range(sample.x_range(), CURVE_POINTS),
            )
    }

    fn model<B: Basis, W: Write>(
        &self,
        kind: ModelKind,
        basis: B,
        sample: &Sample,
        backend: &mut dyn PlotBackend,
        out: &mut W,
    ) -> Result<FitProperties> {
        let points = sample.points();
        let fit = SplineFit::new(&points, basis)?;

        let r2 = fit.r_squared();
        log::info!("Fitted {kind}: {} parameters, R² = {r2:.4}", fit.coefficients().len());
        if r2 < WEAK_FIT_R_SQUARED {
            log::warn!("{kind} explains only {:.1}% of the variance", r2 * 100.0);
        }

        emit(out, &format!("{}\n{}\n\n", fit.summary(kind.title()), fit.equation()))?;

        let x_range = fit.x_range();
        let step = (x_range.end() - x_range.start()) / (CURVE_POINTS - 1) as f64;
        let mut figure = Figure::new(kind.artifact(), kind.title())
            .with_points("Observed", SeriesRole::Observed, points.clone())
            .with_line(
                "True mean",
                SeriesRole::TrueMean,
                self.config.sample.mean.solve_range(x_range.clone(), CURVE_POINTS),
            )
            .with_line("Fitted", SeriesRole::Fitted, fit.solve_range(x_range, step));
        if kind.uses_knots() {
            figure = figure.with_knots(&self.config.knots);
        }
        backend.render(&figure)?;

        Ok(fit.properties(kind.title()))
    }
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .map_err(|e| Error::io("<output>", e))
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        basis::NaturalSplineBasis,
        config::{ImageFormat, OutputConfig},
    };

    #[derive(Default)]
    struct Recorder(Vec<Figure>);
    impl PlotBackend for Recorder {
        fn render(&mut self, figure: &Figure) -> Result<()> {
            self.0.push(figure.clone());
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn run(config: Config) -> (Result<Report>, Vec<Figure>, String) {
        let mut recorder = Recorder::default();
        let mut out = Vec::new();
        let report = Walkthrough::new(config).run_with(&mut recorder, &mut out);
        (report, recorder.0, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_pipeline() {
        let (report, figures, text) = run(Config::default());
        let report = report.unwrap();

        let artifacts: Vec<_> = figures.iter().map(Figure::artifact).collect();
        assert_eq!(
            artifacts,
            ["data_overview", "linear_spline", "cubic_model", "cubic_spline", "natural_spline"]
        );

        // Overview: observed + mean; models: observed + mean + fitted
        assert_eq!(figures[0].series().len(), 2);
        assert!(figures[1..].iter().all(|f| f.series().len() == 3));
        assert!(figures[2].knots().is_empty());
        assert_eq!(figures[3].knots(), &[6.0, 12.0, 18.0]);

        let parameters: Vec<_> = report.models.iter().map(|m| m.parameters).collect();
        assert_eq!(parameters, [5, 4, 7, 5]);
        assert_eq!(report.length, 24);

        for kind in ModelKind::ALL {
            assert!(text.contains(kind.title()), "missing summary for {kind}");
        }
        assert!(text.contains("Model comparison"));
        assert_eq!(text.matches("Signif. codes:").count(), 4);
    }

    #[test]
    fn test_splines_beat_the_cubic() {
        let (report, _, _) = run(Config::default());
        let report = report.unwrap();
        let rss: Vec<_> = report.models.iter().map(|m| m.rss).collect();

        // The cubic spline nests the cubic polynomial
        assert!(rss[2] <= rss[1]);
        assert!(report.models.iter().all(|m| m.r_squared > 0.0 && m.r_squared <= 1.0));
    }

    #[test]
    fn test_json_comparison() {
        let mut recorder = Recorder::default();
        let mut out = Vec::new();
        Walkthrough::new(Config::default())
            .json_comparison(true)
            .run_with(&mut recorder, &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let start = text.find("{\n").unwrap();
        let json: serde_json::Value = serde_json::from_str(&text[start..]).unwrap();
        assert_eq!(json["models"].as_array().unwrap().len(), 4);
        assert_eq!(json["knots"], serde_json::json!([6.0, 12.0, 18.0]));
        assert!(!text.contains("Model comparison"));
    }

    #[test]
    fn test_out_of_range_knot() {
        let mut config = Config::default();
        config.knots = KnotSet::new([6.0, 30.0]).unwrap();
        let (report, figures, _) = run(config);

        assert!(matches!(report, Err(Error::KnotOutOfRange { knot, .. }) if knot == 30.0));
        assert!(figures.is_empty());
    }

    #[test]
    fn test_bad_knots_open_no_backend() {
        let dir = tempfile::tempdir().unwrap();
        let plots = dir.path().join("plots");
        let mut config = Config::default();
        config.knots = KnotSet::new([6.0, 30.0]).unwrap();
        config.output.directory.clone_from(&plots);

        let err = Walkthrough::new(config).run(&mut std::io::sink()).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(!plots.exists());
    }

    /// Holds the "screen" for as long as it is alive, like the terminal backend
    struct ScreenBackend(Rc<Cell<bool>>);
    impl ScreenBackend {
        fn open(screen: &Rc<Cell<bool>>) -> Self {
            screen.set(true);
            Self(Rc::clone(screen))
        }
    }
    impl PlotBackend for ScreenBackend {
        fn render(&mut self, _: &Figure) -> Result<()> {
            Ok(())
        }

        fn describe(&self) -> String {
            "screen".to_string()
        }
    }
    impl Drop for ScreenBackend {
        fn drop(&mut self) {
            self.0.set(false);
        }
    }

    struct Console {
        screen: Rc<Cell<bool>>,
        text: Vec<u8>,
    }
    impl std::io::Write for Console {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            assert!(!self.screen.get(), "console written while the screen was held");
            self.text.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_written_after_backend_closes() {
        let screen = Rc::new(Cell::new(false));
        let mut console = Console {
            screen: Rc::clone(&screen),
            text: Vec::new(),
        };

        let walkthrough = Walkthrough::new(Config::default());
        let sample = walkthrough.sample().unwrap();
        let backend = Box::new(ScreenBackend::open(&screen)) as Box<dyn PlotBackend>;
        walkthrough.run_deferred(&sample, backend, &mut console).unwrap();

        assert!(!screen.get());
        let text = String::from_utf8(console.text).unwrap();
        assert_eq!(text.matches("Residual standard error").count(), 4);
        assert!(text.contains("Model comparison"));
    }

    #[test]
    fn test_too_few_observations() {
        let mut config = Config::default();
        config.sample.length = 5;
        config.knots = KnotSet::new([2.0, 3.0, 4.0]).unwrap();
        let (report, _, _) = run(config);

        // The linear spline already needs 5 columns; nothing is left for the residuals
        assert!(matches!(report, Err(Error::DegenerateRegression { n: 5, k: 5, .. })));
    }

    #[test]
    fn test_custom_provider() {
        #[derive(Debug, Clone, Copy)]
        struct Shrunk;
        impl NaturalSplineProvider for Shrunk {
            type Basis = NaturalSplineBasis;

            fn natural_basis(&self, knots: &KnotSet, boundary: std::ops::RangeInclusive<f64>) -> Result<Self::Basis> {
                NaturalSplineBasis::new(knots.clone(), (boundary.start() + 2.0)..=(boundary.end() - 2.0))
            }
        }

        let mut recorder = Recorder::default();
        let report = Walkthrough::with_provider(Config::default(), Shrunk)
            .run_with(&mut recorder, &mut std::io::sink())
            .unwrap();
        assert_eq!(report.models[3].parameters, 5);
    }

    #[cfg(feature = "plotting")]
    #[test]
    fn test_writes_five_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output: OutputConfig {
                directory: dir.path().to_path_buf(),
                format: ImageFormat::Svg,
                ..OutputConfig::default()
            },
            ..Config::default()
        };

        Walkthrough::new(config).run(&mut std::io::sink()).unwrap();

        let mut written: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(
            written,
            [
                "cubic_model.svg",
                "cubic_spline.svg",
                "data_overview.svg",
                "linear_spline.svg",
                "natural_spline.svg"
            ]
        );
    }

    #[test]
    fn test_model_kinds() {
        assert_eq!(ModelKind::CubicPolynomial.artifact(), "cubic_model");
        assert!(!ModelKind::CubicPolynomial.uses_knots());
        assert_eq!(ModelKind::NaturalSpline.to_string(), "Natural cubic spline");
    }
}
