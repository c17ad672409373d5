use ecow::EcoString;
use serde::{Deserialize, Serialize};

use super::de::{lenient, or_default, span_or_one};

/// A cell of a table grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Text content.
    #[serde(default, deserialize_with = "or_default")]
    pub content: EcoString,
    /// Whether the cell is a header cell.
    #[serde(default, deserialize_with = "or_default")]
    pub is_header: bool,
    /// Number of columns covered, at least 1.
    #[serde(default = "one", deserialize_with = "span_or_one")]
    pub col_span: usize,
    /// Number of rows covered, at least 1.
    #[serde(default = "one", deserialize_with = "span_or_one")]
    pub row_span: usize,
    /// Placeholder absorbed into another cell's span.
    #[serde(default, deserialize_with = "or_default")]
    pub is_spanned: bool,
    /// Row of the spanning origin, set on placeholders.
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_row: Option<usize>,
    /// Column of the spanning origin, set on placeholders.
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_col: Option<usize>,
}

fn one() -> usize {
    1
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: EcoString::new(),
            is_header: false,
            col_span: 1,
            row_span: 1,
            is_spanned: false,
            origin_row: None,
            origin_col: None,
        }
    }
}

impl Cell {
    /// Creates a data cell.
    pub fn new(content: impl Into<EcoString>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Creates a header cell.
    pub fn header(content: impl Into<EcoString>) -> Self {
        Self {
            content: content.into(),
            is_header: true,
            ..Default::default()
        }
    }

    /// Creates a placeholder absorbed by the origin at `(row, col)`.
    pub fn spanned(row: usize, col: usize) -> Self {
        Self {
            is_spanned: true,
            origin_row: Some(row),
            origin_col: Some(col),
            ..Default::default()
        }
    }

    /// Sets the spans.
    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }

    /// Effective row span, never below 1.
    pub fn rows(&self) -> usize {
        self.row_span.max(1)
    }

    /// Effective column span, never below 1.
    pub fn cols(&self) -> usize {
        self.col_span.max(1)
    }

    /// Whether this origin cell spans more than one position.
    pub fn is_merged(&self) -> bool {
        !self.is_spanned && (self.col_span > 1 || self.row_span > 1)
    }
}

/// A table satellite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Row-major cell matrix.
    #[serde(default, deserialize_with = "lenient")]
    pub grid: Vec<Vec<Cell>>,
    /// Per-column width hints in pixels.
    #[serde(default, deserialize_with = "lenient")]
    pub col_widths: Vec<f64>,
    /// Metrics table with a fixed header.
    #[serde(default, deserialize_with = "or_default")]
    pub is_metrics_table: bool,
    /// Main metrics table with a fixed header.
    #[serde(default, deserialize_with = "or_default")]
    pub is_main_metrics_table: bool,
    /// Regular risk table.
    #[serde(default, deserialize_with = "or_default")]
    pub is_regular_risk_table: bool,
    /// Operational risk table with a fixed header.
    #[serde(default, deserialize_with = "or_default")]
    pub is_operational_risk_table: bool,
}

impl Table {
    /// Creates a table from a grid.
    pub fn new(grid: Vec<Vec<Cell>>) -> Self {
        Self {
            grid,
            ..Default::default()
        }
    }

    /// Creates a table of plain data cells.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<EcoString>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Cell::new).collect())
                .collect(),
        )
    }
}
