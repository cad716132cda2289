//! File output using the `plotters` crate
//!
//! Every figure is first drawn to an in-memory SVG document.
//! - [`ImageFormat::Svg`] writes that document as-is
//! - [`ImageFormat::Png`] rasterizes it with `resvg`
//!
//! The artifact is written in a single operation once drawing is complete, so a failed
//! draw never leaves a partial file behind.
use std::path::{Path, PathBuf};

use plotters::{coord::Shift, prelude::*};
use resvg::usvg;

use crate::{
    config::{ImageFormat, OutputConfig},
    error::{Error, Result},
    plotting::{palette::PlotPalette, Figure, PlotBackend, SeriesKind},
};

const POINT_RADIUS: i32 = 3;
const LINE_WIDTH: u32 = 2;

/// Writes each figure to `<directory>/<artifact>.<ext>`
#[derive(Debug)]
pub struct FileBackend {
    directory: PathBuf,
    format: ImageFormat,
    size: (u32, u32),
    palette: PlotPalette,
    written: Vec<PathBuf>,
}
impl FileBackend {
    /// Creates the backend, creating the output directory if needed.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the directory cannot be created.
    pub fn new(output: &OutputConfig) -> Result<Self> {
        std::fs::create_dir_all(&output.directory).map_err(|e| Error::io(&output.directory, e))?;
        Ok(Self {
            directory: output.directory.clone(),
            format: output.format,
            size: (output.width, output.height),
            palette: PlotPalette::default(),
            written: Vec::new(),
        })
    }

    /// Paths written so far, in order
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Draws a figure to an SVG document.
    ///
    /// # Errors
    /// Returns [`Error::Plot`] if the figure cannot be drawn.
    pub fn render_svg(&self, figure: &Figure) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            draw(&root, figure, &self.palette)?;
        }
        Ok(svg)
    }
}
impl PlotBackend for FileBackend {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let svg = self.render_svg(figure)?;
        let path = self
            .directory
            .join(figure.artifact())
            .with_extension(self.format.extension());

        match self.format {
            ImageFormat::Svg => std::fs::write(&path, svg).map_err(|e| Error::io(&path, e))?,
            ImageFormat::Png => build_png(&svg, &path)?,
        }

        log::info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} files in {}", self.format.extension(), self.directory.display())
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    palette: &PlotPalette,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let x_range = figure.x_range();
    let y_range = figure.y_range();

    let mut chart = ChartBuilder::on(root)
        .caption(figure.title(), ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range.clone())
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()
        .map_err(plot_error)?;

    //
    // Knot guides go underneath the data
    let guide = ShapeStyle::from(palette.knot).stroke_width(1);
    for &knot in figure.knots() {
        chart
            .draw_series(DashedLineSeries::new(
                [(knot, y_range.start), (knot, y_range.end)],
                4,
                4,
                guide,
            ))
            .map_err(plot_error)?;
    }

    for series in figure.series() {
        let color = palette.color(series.role);
        match series.kind {
            SeriesKind::Points => {
                let style = color.filled();
                chart
                    .draw_series(
                        series
                            .data
                            .iter()
                            .map(|&point| Circle::new(point, POINT_RADIUS, style)),
                    )
                    .map_err(plot_error)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| Circle::new((x + 10, y), POINT_RADIUS, style));
            }

            SeriesKind::Line => {
                let style = ShapeStyle::from(color).stroke_width(LINE_WIDTH);
                chart
                    .draw_series(LineSeries::new(series.data.iter().copied(), style))
                    .map_err(plot_error)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Rasterizes an SVG document to a PNG file
///
/// # Errors
/// Returns an error if the SVG cannot be parsed, or the PNG cannot be written.
pub fn build_png(svg: &str, target: &Path) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(plot_error)?;
    let size = tree.size().to_int_size();

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| Error::Plot(format!("Cannot allocate a {}x{} image", size.width(), size.height())))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);
    resvg::render(&tree, usvg::Transform::default(), &mut pixmap.as_mut());

    let png = pixmap.encode_png().map_err(plot_error)?;
    std::fs::write(target, png).map_err(|e| Error::io(target, e))
}

fn plot_error(e: impl std::fmt::Display) -> Error {
    Error::Plot(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::SeriesRole;

    fn figure() -> Figure {
        Figure::new("demo", "Demo figure")
            .with_points("Observed", SeriesRole::Observed, vec![(1.0, 1.0), (2.0, 3.0), (3.0, 2.0)])
            .with_line("Fitted", SeriesRole::Fitted, vec![(1.0, 1.5), (3.0, 2.5)])
            .with_knots(&crate::knots::KnotSet::new(vec![2.0]).unwrap())
    }

    fn output(dir: &Path, format: ImageFormat) -> OutputConfig {
        OutputConfig {
            directory: dir.to_path_buf(),
            format,
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_svg_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(&output(dir.path(), ImageFormat::Svg)).unwrap();
        backend.render(&figure()).unwrap();

        let path = dir.path().join("demo.svg");
        assert_eq!(backend.written(), &[path.clone()]);

        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Demo figure"));
        assert!(svg.contains("Observed"));
    }

    #[test]
    fn test_png_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(&output(dir.path(), ImageFormat::Png)).unwrap();
        backend.render(&figure()).unwrap();

        let bytes = std::fs::read(dir.path().join("demo.png")).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let backend = FileBackend::new(&output(&nested, ImageFormat::Svg)).unwrap();
        assert!(nested.is_dir());
        assert!(backend.describe().contains("svg"));
    }
}
