//! Interactive display using `ratatui`
//!
//! Figures are drawn as braille charts in the terminal's alternate screen. After each figure
//! the backend waits for a key press before moving on.
use std::io::{self, IsTerminal, Stdout};

use ratatui::{
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::{
    error::{Error, Result},
    plotting::{Figure, PlotBackend, SeriesKind, SeriesRole},
};

/// Restores the terminal when dropped
struct TerminalGuard;
impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Draws figures in the terminal, one per key press
pub struct TerminalBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    figures: usize,

    // Declared last so the terminal is released before the screen is restored
    _guard: TerminalGuard,
}
impl TerminalBackend {
    /// Switches the terminal to raw mode and the alternate screen.
    ///
    /// # Errors
    /// Returns [`Error::Plot`] if stdout is not a terminal, or cannot be configured.
    pub fn new() -> Result<Self> {
        if !io::stdout().is_terminal() {
            return Err(Error::Plot("stdout is not a terminal".to_string()));
        }

        enable_raw_mode().map_err(terminal_error)?;
        let guard = TerminalGuard;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)?;

        Ok(Self {
            terminal,
            figures: 0,
            _guard: guard,
        })
    }

    fn wait_for_key() -> Result<()> {
        loop {
            if let Event::Key(key) = event::read().map_err(terminal_error)? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}
impl PlotBackend for TerminalBackend {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let x_range = figure.x_range();
        let y_range = figure.y_range();

        let guides: Vec<[(f64, f64); 2]> = figure
            .knots()
            .iter()
            .map(|&k| [(k, y_range.start), (k, y_range.end)])
            .collect();

        self.terminal
            .draw(|f| {
                let mut datasets: Vec<Dataset> = guides
                    .iter()
                    .map(|guide| {
                        Dataset::default()
                            .marker(symbols::Marker::Dot)
                            .graph_type(GraphType::Line)
                            .style(Style::default().fg(Color::DarkGray))
                            .data(guide)
                    })
                    .collect();

                for series in figure.series() {
                    let (marker, graph_type) = match series.kind {
                        SeriesKind::Points => (symbols::Marker::Dot, GraphType::Scatter),
                        SeriesKind::Line => (symbols::Marker::Braille, GraphType::Line),
                    };

                    datasets.push(
                        Dataset::default()
                            .name(series.label.as_str())
                            .marker(marker)
                            .graph_type(graph_type)
                            .style(Style::default().fg(role_color(series.role)))
                            .data(&series.data),
                    );
                }

                let chart = Chart::new(datasets)
                    .block(
                        Block::default()
                            .title(format!("{} (press any key)", figure.title()))
                            .borders(Borders::ALL),
                    )
                    .x_axis(
                        Axis::default()
                            .title("x")
                            .bounds([x_range.start, x_range.end])
                            .labels(vec![
                                Line::from(format!("{:.0}", x_range.start)),
                                Line::from(format!("{:.0}", x_range.end)),
                            ]),
                    )
                    .y_axis(
                        Axis::default()
                            .title("y")
                            .bounds([y_range.start, y_range.end])
                            .labels(vec![
                                Line::from(format!("{:.1}", y_range.start)),
                                Line::from(format!("{:.1}", y_range.end)),
                            ]),
                    );
                f.render_widget(chart, f.area());
            })
            .map_err(terminal_error)?;

        self.figures += 1;
        Self::wait_for_key()
    }

    fn describe(&self) -> String {
        format!("terminal ({} figures shown)", self.figures)
    }
}

fn role_color(role: SeriesRole) -> Color {
    match role {
        SeriesRole::Observed => Color::Gray,
        SeriesRole::TrueMean => Color::Cyan,
        SeriesRole::Fitted => Color::LightRed,
    }
}

fn terminal_error(e: io::Error) -> Error {
    Error::Plot(format!("Terminal error: {e}"))
}
