use std::ops::Range;

use crate::{knots::KnotSet, value::min_max};

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Unconnected markers
    Points,

    /// A connected line
    Line,
}

/// What a series represents; backends pick colors from this
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesRole {
    /// The noisy sample
    Observed,

    /// The true mean function
    TrueMean,

    /// A fitted model curve
    Fitted,
}

/// One labelled set of points on a figure
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label
    pub label: String,

    /// Marker or line
    pub kind: SeriesKind,

    /// Role, for coloring
    pub role: SeriesRole,

    /// `(x, y)` coordinates
    pub data: Vec<(f64, f64)>,
}

/// A single chart: a title, some series, and optional vertical knot guides.
///
/// Figures are backend-agnostic; see [`crate::plotting::PlotBackend`] for how they are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    artifact: String,
    title: String,
    series: Vec<Series>,
    knots: Vec<f64>,
}
impl Figure {
    /// Creates an empty figure.
    ///
    /// `artifact` names the output file (without extension) when the figure is written to disk.
    pub fn new(artifact: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            title: title.into(),
            series: Vec::new(),
            knots: Vec::new(),
        }
    }

    /// Adds a scatter series
    #[must_use]
    pub fn with_points(mut self, label: impl Into<String>, role: SeriesRole, data: Vec<(f64, f64)>) -> Self {
        self.series.push(Series {
            label: label.into(),
            kind: SeriesKind::Points,
            role,
            data,
        });
        self
    }

    /// Adds a line series
    #[must_use]
    pub fn with_line(mut self, label: impl Into<String>, role: SeriesRole, data: Vec<(f64, f64)>) -> Self {
        self.series.push(Series {
            label: label.into(),
            kind: SeriesKind::Line,
            role,
            data,
        });
        self
    }

    /// Adds a vertical guide at each knot
    #[must_use]
    pub fn with_knots(mut self, knots: &KnotSet) -> Self {
        self.knots.extend(knots.iter());
        self
    }

    /// Output name, without extension
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Chart caption
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Series, in drawing order
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Knot guide locations
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Horizontal extent covering every series and knot
    #[must_use]
    pub fn x_range(&self) -> Range<f64> {
        let xs = self
            .series
            .iter()
            .flat_map(|s| s.data.iter().map(|(x, _)| *x))
            .chain(self.knots.iter().copied());
        padded(min_max(xs), 0.0)
    }

    /// Vertical extent covering every series, with 5% headroom on each side
    #[must_use]
    pub fn y_range(&self) -> Range<f64> {
        let ys = self.series.iter().flat_map(|s| s.data.iter().map(|(_, y)| *y));
        padded(min_max(ys), 0.05)
    }
}

fn padded(range: Option<std::ops::RangeInclusive<f64>>, fraction: f64) -> Range<f64> {
    let Some(range) = range else {
        return 0.0..1.0;
    };

    let (min, max) = (*range.start(), *range.end());
    let pad = if max > min { (max - min) * fraction } else { 0.5 };
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_ranges() {
        let figure = Figure::new("demo", "Demo")
            .with_points("Observed", SeriesRole::Observed, vec![(1.0, 0.0), (3.0, 10.0)])
            .with_line("Mean", SeriesRole::TrueMean, vec![(0.0, 5.0), (2.0, 5.0)])
            .with_knots(&KnotSet::new(vec![4.0]).unwrap());

        assert_eq!(figure.x_range(), 0.0..4.0);
        assert_eq!(figure.y_range(), -0.5..10.5);
        assert_eq!(figure.series().len(), 2);
        assert_eq!(figure.series()[0].kind, SeriesKind::Points);
        assert_eq!(figure.knots(), &[4.0]);
        assert_eq!(figure.artifact(), "demo");
    }

    #[test]
    fn test_degenerate_ranges() {
        let empty = Figure::new("empty", "Empty");
        assert_eq!(empty.x_range(), 0.0..1.0);

        let flat = Figure::new("flat", "Flat").with_line("y", SeriesRole::Fitted, vec![(0.0, 2.0), (1.0, 2.0)]);
        assert_eq!(flat.y_range(), 1.5..2.5);
    }
}
