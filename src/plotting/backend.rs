use crate::{error::Result, plotting::Figure};

#[cfg(feature = "plotting")]
pub mod plotters;

#[cfg(feature = "interactive")]
pub mod terminal;

/// Trait for plot backends
///
/// A backend receives figures one at a time, in pipeline order.
pub trait PlotBackend {
    /// Draw a single figure
    ///
    /// # Errors
    /// Returns an error if the figure cannot be drawn or written.
    fn render(&mut self, figure: &Figure) -> Result<()>;

    /// Short description of where figures go, for logging
    fn describe(&self) -> String;
}
impl<B: PlotBackend + ?Sized> PlotBackend for Box<B> {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        (**self).render(figure)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
