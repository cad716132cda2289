//! Swapping in a different natural spline construction.
//!
//! The truncated power basis has columns that grow like `x³`, so on wide predictor ranges the
//! design matrix gets badly scaled. This provider divides every knot column by the squared
//! width of the boundary range. It spans the same space, so the fitted curve is unchanged, but
//! the coefficients are on a comparable scale to the `x` coefficient.
//!
//! Run with `cargo run --example custom_natural_basis`
use std::ops::RangeInclusive;

use splinefit::{
    basis::{Basis, NaturalSplineBasis, NaturalSplineProvider},
    config::{Config, OutputConfig},
    error::Result,
    knots::KnotSet,
    walkthrough::Walkthrough,
};

#[derive(Debug, Clone, PartialEq)]
struct ScaledNaturalSplineBasis {
    inner: NaturalSplineBasis,
    scale: f64,
}
impl Basis for ScaledNaturalSplineBasis {
    fn k(&self) -> usize {
        self.inner.k()
    }

    fn solve_function(&self, j: usize, x: f64) -> f64 {
        match j {
            0 => self.inner.solve_function(j, x),
            _ => self.inner.solve_function(j, x) / self.scale,
        }
    }

    fn column_label(&self, j: usize) -> String {
        match j {
            0 => self.inner.column_label(j),
            _ => format!("{}/{}", self.inner.column_label(j), self.scale),
        }
    }

    fn knots(&self) -> Option<&KnotSet> {
        self.inner.knots()
    }
}

#[derive(Debug, Clone, Copy)]
struct ScaledProvider;
impl NaturalSplineProvider for ScaledProvider {
    type Basis = ScaledNaturalSplineBasis;

    fn natural_basis(&self, knots: &KnotSet, boundary: RangeInclusive<f64>) -> Result<Self::Basis> {
        let width = boundary.end() - boundary.start();
        let inner = NaturalSplineBasis::new(knots.clone(), boundary)?;
        Ok(ScaledNaturalSplineBasis {
            inner,
            scale: width * width,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config {
        output: OutputConfig {
            directory: "plots/custom_natural_basis".into(),
            ..OutputConfig::default()
        },
        ..Config::default()
    };

    let mut stdout = std::io::stdout().lock();
    let scaled = Walkthrough::with_provider(config.clone(), ScaledProvider).run(&mut stdout)?;
    let standard = Walkthrough::new(config).run(&mut std::io::sink())?;

    // Same space, same fit
    let (scaled, standard) = (&scaled.models[3], &standard.models[3]);
    println!(
        "Natural spline RSS: scaled {:.6}, truncated power {:.6}",
        scaled.rss, standard.rss
    );
    Ok(())
}
