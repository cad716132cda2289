//! Utilities for displaying and formatting regression results
//!
//! This module provides tools to render fitted models as human-readable text:
//! number formatting, fitted equations, and aligned text tables.
//!
//! # Key Concepts
//! - **[`Table`]**: A column-aligned plain text table, used for the coefficient and comparison tables.
//! - **[`Term`]**: Represents a single equation term with a sign and body.
//! - **[`Sign`]**: Tracks whether a term is positive or negative.
//!
//! # Helpers
//! - [`format_significant`]: Formats a number to a number of significant digits.
//! - [`format_p_value`]: Formats a p value the way regression tables usually do.
//! - [`format_equation`]: Renders `y(x) = …` from column labels and coefficients.
//! - [`superscript`] / [`subscript`]: Unicode exponents and indices.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

pub mod unicode;
pub use unicode::{subscript, superscript};

/// Default number of significant digits used for estimates in summaries
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 4;

/// p values below this are printed as `< 2e-16`
pub const P_VALUE_FLOOR: f64 = 2.2e-16;

/// Formats a number to `digits` significant digits.
///
/// - Uses fixed notation for magnitudes between `1e-4` and `1e6`
/// - Uses scientific notation otherwise
/// - Non-finite values are printed as `NaN`, `Inf` or `-Inf`
///
/// # Example
/// ```
/// # use splinefit::display::format_significant;
/// assert_eq!(format_significant(3.14159, 4), "3.142");
/// assert_eq!(format_significant(-0.012345, 3), "-0.0123");
/// assert_eq!(format_significant(1234.6, 4), "1235");
/// assert_eq!(format_significant(1.5e9, 3), "1.50e9");
/// ```
#[must_use]
pub fn format_significant(n: f64, digits: usize) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    } else if n.is_infinite() {
        return if n > 0.0 { "Inf" } else { "-Inf" }.to_string();
    } else if n == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    let magnitude = n.abs().log10().floor() as i32;
    if (-4..6).contains(&magnitude) {
        let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
        format!("{n:.decimals$}")
    } else {
        let precision = digits - 1;
        format!("{n:.precision$e}")
    }
}

/// Formats a p value.
///
/// - Tiny values are printed as `< 2e-16`
/// - Values below `1e-4` use scientific notation
/// - Anything else is printed with 4 decimals
/// - NaN is printed as `NA`
///
/// # Example
/// ```
/// # use splinefit::display::format_p_value;
/// assert_eq!(format_p_value(0.04213), "0.0421");
/// assert_eq!(format_p_value(1.149e-11), "1.15e-11");
/// assert_eq!(format_p_value(0.0), "< 2e-16");
/// ```
#[must_use]
pub fn format_p_value(p: f64) -> String {
    if p.is_nan() {
        "NA".to_string()
    } else if p < P_VALUE_FLOOR {
        "< 2e-16".to_string()
    } else if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

/// Represents the sign of an equation term.
///
/// Used when formatting fitted equations to determine how a term
/// should be connected to the rest of the equation (e.g., with `+` or `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    ///
    /// # Example
    /// ```
    /// # use splinefit::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    #[must_use]
    pub fn from_coef(coef: f64) -> Self {
        if coef.is_sign_negative() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Returns the character representation of the sign.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// A single term of a fitted equation, such as `2.5·(x - 6)₊`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term (positive or negative).
    pub sign: Sign,

    /// The body of the term, without its sign.
    pub body: String,
}

impl Term {
    /// Builds a term from a coefficient and the label of the column it multiplies.
    ///
    /// An empty label is the intercept. Returns `None` if the coefficient is exactly zero.
    #[must_use]
    pub fn new(coef: f64, label: &str, digits: usize) -> Option<Self> {
        if coef == 0.0 {
            return None;
        }

        let sign = Sign::from_coef(coef);
        let value = format_significant(coef.abs(), digits);
        let body = if label.is_empty() {
            value
        } else {
            format!("{value}·{label}")
        };

        Some(Self { sign, body })
    }
}

/// Renders a fitted equation such as `y(x) = 10.2 + 0.31·x - 1.7·(x - 6)₊`.
///
/// `labels[i]` is the label of the column multiplied by `coefficients[i]`; use an empty
/// label for the intercept. Zero coefficients are skipped.
///
/// # Errors
/// Returns an error if writing to `buffer` fails.
pub fn format_equation<B: std::fmt::Write>(
    buffer: &mut B,
    labels: &[String],
    coefficients: &[f64],
    digits: usize,
) -> std::fmt::Result {
    let mut terms = labels
        .iter()
        .zip(coefficients)
        .filter_map(|(label, &coef)| Term::new(coef, label, digits));

    write!(buffer, "y(x) = ")?;
    let Some(first) = terms.next() else {
        return write!(buffer, "0");
    };

    // The first term carries its sign without a leading space
    if first.sign == Sign::Negative {
        write!(buffer, "-")?;
    }
    write!(buffer, "{}", first.body)?;

    for term in terms {
        write!(buffer, " {} {}", term.sign.char(), term.body)?;
    }

    Ok(())
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Pad on the right
    Left,

    /// Pad on the left
    Right,
}

/// A column-aligned plain text table.
///
/// Widths are measured in characters, so unicode labels like `(x - 6)₊³` line up.
///
/// ```
/// # use splinefit::display::{Table, Align};
/// let mut table = Table::new(["", "Estimate"]).with_alignment([Align::Left, Align::Right]);
/// table.push_row(["(Intercept)", "10.12"]);
/// table.push_row(["x", "0.3"]);
///
/// let text = table.to_string();
/// assert_eq!(text.lines().nth(1), Some("(Intercept)     10.12"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    alignment: Vec<Align>,
    rows: Vec<Vec<String>>,
    separator: String,
}
impl Table {
    /// Creates a new table with the given headers. All columns are right aligned by default.
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let alignment = vec![Align::Right; headers.len()];
        Self {
            headers,
            alignment,
            rows: Vec::new(),
            separator: "  ".to_string(),
        }
    }

    /// Sets the alignment of each column. Missing entries keep their current alignment.
    #[must_use]
    pub fn with_alignment(mut self, alignment: impl IntoIterator<Item = Align>) -> Self {
        for (slot, align) in self.alignment.iter_mut().zip(alignment) {
            *slot = align;
        }
        self
    }

    /// Sets the string placed between columns.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Adds a row. Short rows are padded with empty cells, extra cells are dropped.
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of rows, excluding the header
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn write_row(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        row: &[String],
        widths: &[usize],
    ) -> std::fmt::Result {
        let mut line = String::new();
        for (i, (cell, &width)) in row.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str(&self.separator);
            }

            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            match self.alignment[i] {
                Align::Left => {
                    line.push_str(cell);
                    line.push_str(&pad);
                }
                Align::Right => {
                    line.push_str(&pad);
                    line.push_str(cell);
                }
            }
        }

        writeln!(f, "{}", line.trim_end())
    }
}
impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let widths = self.widths();
        self.write_row(f, &self.headers, &widths)?;
        for row in &self.rows {
            self.write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_from_coef() {
        assert_eq!(Sign::from_coef(1.0), Sign::Positive);
        assert_eq!(Sign::from_coef(-1.0), Sign::Negative);
        assert_eq!(Sign::from_coef(0.0), Sign::Positive);
        assert_eq!(Sign::Negative.char(), '-');
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(10.0, 4), "10.00");
        assert_eq!(format_significant(0.000_123_4, 3), "0.000123");
        assert_eq!(format_significant(1.234e-7, 3), "1.23e-7");
        assert_eq!(format_significant(f64::NAN, 3), "NaN");
        assert_eq!(format_significant(f64::NEG_INFINITY, 3), "-Inf");
    }

    #[test]
    fn test_format_p_value() {
        assert_eq!(format_p_value(0.5), "0.5000");
        assert_eq!(format_p_value(1e-20), "< 2e-16");
        assert_eq!(format_p_value(f64::NAN), "NA");
    }

    #[test]
    fn test_format_equation() {
        let labels = vec![String::new(), "x".to_string(), "(x - 6)₊".to_string()];

        let mut buf = String::new();
        format_equation(&mut buf, &labels, &[10.0, 0.25, -1.5], 3).unwrap();
        assert_eq!(buf, "y(x) = 10.0 + 0.250·x - 1.50·(x - 6)₊");

        let mut buf = String::new();
        format_equation(&mut buf, &labels, &[0.0, -2.0, 0.0], 3).unwrap();
        assert_eq!(buf, "y(x) = -2.00·x");

        let mut buf = String::new();
        format_equation(&mut buf, &labels, &[0.0, 0.0, 0.0], 3).unwrap();
        assert_eq!(buf, "y(x) = 0");
    }

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(["", "Estimate", ""])
            .with_alignment([Align::Left, Align::Right, Align::Left])
            .with_separator(" ");
        table.push_row(["(Intercept)", "10.1", "***"]);
        table.push_row(["(x - 6)₊³", "-0.25"]);
        assert_eq!(table.len(), 2);

        let text = table.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "            Estimate");
        assert_eq!(lines[1], "(Intercept)     10.1 ***");
        assert_eq!(lines[2], "(x - 6)₊³      -0.25");
    }
}
