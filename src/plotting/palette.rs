use plotters::prelude::*;

use crate::plotting::SeriesRole;

/// Colors for each kind of series in a figure
#[derive(Debug, Clone, Copy)]
pub struct PlotPalette {
    pub observed: RGBColor,
    pub mean: RGBColor,
    pub fitted: RGBColor,
    pub knot: RGBAColor,
}
impl PlotPalette {
    pub const fn new(observed: RGBColor, mean: RGBColor, fitted: RGBColor) -> Self {
        let knot = RGBAColor(observed.0, observed.1, observed.2, 0.4);
        Self {
            observed,
            mean,
            fitted,
            knot,
        }
    }

    pub fn color(&self, role: SeriesRole) -> RGBColor {
        match role {
            SeriesRole::Observed => self.observed,
            SeriesRole::TrueMean => self.mean,
            SeriesRole::Fitted => self.fitted,
        }
    }
}
impl Default for PlotPalette {
    fn default() -> Self {
        use plotters::prelude::full_palette::{BLUE_700, GREY_700, RED_600};
        Self::new(GREY_700, BLUE_700, RED_600)
    }
}
