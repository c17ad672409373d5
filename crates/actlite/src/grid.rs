//! Table grid model.
//!
//! A grid is a row-major matrix of [`Cell`]s in which an origin cell may
//! span a rectangle of positions; the other positions of the rectangle hold
//! placeholders (`is_spanned`) pointing back at the origin. Targets that can
//! merge cells consume a [`GridLayout`]; targets that cannot fall back to a
//! [`PositionalEntry`] list.

use core::fmt;
use std::collections::HashSet;

use ecow::EcoString;

use crate::model::{Cell, Table};

/// Maximum number of rows of a grid.
pub const MAX_ROWS: usize = 64;
/// Maximum number of columns of a grid row.
pub const MAX_COLS: usize = 16;
/// Number of leading rows a special table replaces with its fixed header.
pub const SPECIAL_HEADER_ROWS: usize = 2;

/// Whether any origin cell spans more than one position.
pub fn has_merged_cells(grid: &[Vec<Cell>]) -> bool {
    grid.iter().flatten().any(Cell::is_merged)
}

/// The width of the widest row.
pub fn column_count(grid: &[Vec<Cell>]) -> usize {
    grid.iter().map(Vec::len).max().unwrap_or(0)
}

/// Expands a grid into a rectangular matrix of cell texts.
///
/// Ragged rows are padded with empty strings up to the widest row.
pub fn to_display_matrix(grid: &[Vec<Cell>]) -> Vec<Vec<EcoString>> {
    let width = column_count(grid);
    grid.iter()
        .map(|row| {
            let mut texts: Vec<EcoString> = row.iter().map(|cell| cell.content.clone()).collect();
            texts.resize(width, EcoString::new());
            texts
        })
        .collect()
}

/// Whether a positional entry describes a header or a data cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// A header cell.
    Header,
    /// A data cell.
    Data,
}

/// An inclusive range of row or column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanRange {
    /// First covered index.
    pub start: usize,
    /// Last covered index.
    pub end: usize,
}

impl SpanRange {
    /// The range covering `span` indices from `start`, clamped to `bound`.
    fn clamped(start: usize, span: usize, bound: usize) -> Self {
        let end = start.saturating_add(span.max(1)).min(bound.max(start + 1)) - 1;
        Self { start, end }
    }
}

impl fmt::Display for SpanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// One cell of a positional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalEntry {
    /// Header or data.
    pub kind: CellKind,
    /// Covered rows.
    pub rows: SpanRange,
    /// Covered columns.
    pub cols: SpanRange,
    /// Cell text.
    pub content: EcoString,
}

impl PositionalEntry {
    /// The `[rows,cols]` prefix.
    pub fn position(&self) -> EcoString {
        ecow::eco_format!("[{},{}]", self.rows, self.cols)
    }
}

impl fmt::Display for PositionalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]: {}", self.rows, self.cols, self.content)
    }
}

/// Lists every non-placeholder cell with the rows and columns it covers.
pub fn to_positional_description(grid: &[Vec<Cell>]) -> Vec<PositionalEntry> {
    let rows = grid.len();
    let cols = column_count(grid);
    grid.iter()
        .enumerate()
        .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, cell)))
        .filter(|(_, _, cell)| !cell.is_spanned)
        .map(|(r, c, cell)| PositionalEntry {
            kind: if cell.is_header {
                CellKind::Header
            } else {
                CellKind::Data
            },
            rows: SpanRange::clamped(r, cell.rows(), rows),
            cols: SpanRange::clamped(c, cell.cols(), cols),
            content: cell.content.clone(),
        })
        .collect()
}

/// A table whose leading rows are replaced by a fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialTable {
    /// Metrics and main metrics tables.
    Metrics,
    /// Operational risk tables.
    OperationalRisk,
}

impl SpecialTable {
    /// Detects the override selected by the table flags.
    pub fn of(table: &Table) -> Option<Self> {
        if table.is_metrics_table || table.is_main_metrics_table {
            Some(Self::Metrics)
        } else if table.is_operational_risk_table {
            Some(Self::OperationalRisk)
        } else {
            None
        }
    }

    /// The fixed header row.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Self::Metrics => &[
                "№ п/п",
                "Показатель",
                "Единица измерения",
                "Значение на начало периода",
                "Значение на конец периода",
                "Изменение",
            ],
            Self::OperationalRisk => &[
                "№ п/п",
                "Риск-событие",
                "Дата выявления",
                "Сумма потерь",
                "Статус",
                "Меры по минимизации",
            ],
        }
    }
}

/// The data rows of a special table: rows after the discarded header rows,
/// without placeholders.
pub fn special_data_rows(grid: &[Vec<Cell>]) -> Vec<Vec<EcoString>> {
    grid.iter()
        .skip(SPECIAL_HEADER_ROWS)
        .map(|row| {
            row.iter()
                .filter(|cell| !cell.is_spanned)
                .map(|cell| cell.content.clone())
                .collect()
        })
        .collect()
}

/// How a table is rendered by targets without native cell merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableShape {
    /// A rectangular matrix whose first row is the header row.
    Simple(Vec<Vec<EcoString>>),
    /// One entry per cell, for grids with spans.
    Positional(Vec<PositionalEntry>),
}

impl TableShape {
    /// Classifies a table.
    pub fn of(table: &Table) -> Self {
        if let Some(special) = SpecialTable::of(table) {
            return Self::Simple(special_matrix(special, &table.grid));
        }
        if has_merged_cells(&table.grid) {
            Self::Positional(to_positional_description(&table.grid))
        } else {
            Self::Simple(to_display_matrix(&table.grid))
        }
    }
}

/// The fixed header followed by the data rows, padded to a rectangle.
pub fn special_matrix(special: SpecialTable, grid: &[Vec<Cell>]) -> Vec<Vec<EcoString>> {
    let header: Vec<EcoString> = special.header().iter().copied().map(EcoString::from).collect();
    let mut rows = vec![header];
    rows.extend(special_data_rows(grid));

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, EcoString::new());
    }
    rows
}

/// A rectangle of grid positions owned by one origin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    /// Row of the origin.
    pub row: usize,
    /// Column of the origin.
    pub col: usize,
    /// Covered rows, at least 1.
    pub row_span: usize,
    /// Covered columns, at least 1.
    pub col_span: usize,
}

impl MergeRegion {
    /// Whether the region covers more than its origin.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Whether `(row, col)` lies inside the region.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row..self.row + self.row_span).contains(&row)
            && (self.col..self.col + self.col_span).contains(&col)
    }
}

/// The owner of a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Nobody; rendered as an empty cell.
    Empty,
    /// The origin of the region with the given index.
    Origin(usize),
    /// Covered by the region with the given index.
    Covered(usize),
}

/// A conflict-free occupancy map of a grid.
///
/// Regions are claimed in row-major order. A span reaching past the grid or
/// into an already claimed position is shrunk to fit; an origin cell lying
/// inside an earlier region is dropped.
#[derive(Debug, Clone)]
pub struct GridLayout {
    rows: usize,
    cols: usize,
    slots: Vec<Slot>,
    regions: Vec<MergeRegion>,
}

impl GridLayout {
    /// Lays out a grid.
    pub fn new(grid: &[Vec<Cell>]) -> Self {
        let rows = grid.len();
        let cols = column_count(grid);
        let mut layout = Self {
            rows,
            cols,
            slots: vec![Slot::Empty; rows * cols],
            regions: Vec::new(),
        };

        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_spanned {
                    continue;
                }
                if layout.slot(r, c) != Slot::Empty {
                    log::debug!("cell ({r},{c}) lies inside another span, ignoring it");
                    continue;
                }
                layout.claim(r, c, cell.rows(), cell.cols());
            }
        }

        layout
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The owner of a position; out-of-range positions are empty.
    pub fn slot(&self, row: usize, col: usize) -> Slot {
        if row < self.rows && col < self.cols {
            self.slots[row * self.cols + col]
        } else {
            Slot::Empty
        }
    }

    /// All regions in claim order.
    pub fn regions(&self) -> &[MergeRegion] {
        &self.regions
    }

    /// The region with the given index, as carried by [`Slot`]s.
    pub fn region(&self, index: usize) -> Option<&MergeRegion> {
        self.regions.get(index)
    }

    /// Regions spanning more than one position.
    pub fn merged_regions(&self) -> impl Iterator<Item = &MergeRegion> + '_ {
        self.regions.iter().filter(|region| region.is_merged())
    }

    fn claim(&mut self, row: usize, col: usize, rows: usize, cols: usize) {
        let mut row_span = rows.min(self.rows - row);
        let mut col_span = cols.min(self.cols - col);

        if let Some(taken) = (col..col + col_span).position(|c| self.slot(row, c) != Slot::Empty) {
            col_span = taken.max(1);
        }
        if let Some(taken) = (row + 1..row + row_span)
            .position(|r| (col..col + col_span).any(|c| self.slot(r, c) != Slot::Empty))
        {
            row_span = taken + 1;
        }
        if (row_span, col_span) != (rows, cols) {
            log::debug!("span at ({row},{col}) clamped from {rows}x{cols} to {row_span}x{col_span}");
        }

        let index = self.regions.len();
        self.regions.push(MergeRegion {
            row,
            col,
            row_span,
            col_span,
        });
        for r in row..row + row_span {
            for c in col..col + col_span {
                self.slots[r * self.cols + c] = if (r, c) == (row, col) {
                    Slot::Origin(index)
                } else {
                    Slot::Covered(index)
                };
            }
        }
    }
}

/// A defect found by [`validate_grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridIssue {
    /// More rows than [`MAX_ROWS`].
    TooManyRows {
        /// Actual row count.
        rows: usize,
    },
    /// A row wider than [`MAX_COLS`].
    TooManyColumns {
        /// The row.
        row: usize,
        /// Actual width.
        cols: usize,
    },
    /// An origin cell with a zero span.
    ZeroSpan {
        /// Origin row.
        row: usize,
        /// Origin column.
        col: usize,
    },
    /// A span rectangle leaving the grid.
    SpanOutOfBounds {
        /// Origin row.
        row: usize,
        /// Origin column.
        col: usize,
    },
    /// A position inside a span that is not a matching placeholder.
    SpanConflict {
        /// The position's row.
        row: usize,
        /// The position's column.
        col: usize,
    },
    /// A placeholder not covered by the origin it points at.
    OrphanPlaceholder {
        /// The placeholder's row.
        row: usize,
        /// The placeholder's column.
        col: usize,
    },
}

impl fmt::Display for GridIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyRows { rows } => {
                write!(f, "grid has {rows} rows, at most {MAX_ROWS} allowed")
            }
            Self::TooManyColumns { row, cols } => {
                write!(f, "row {row} has {cols} cells, at most {MAX_COLS} allowed")
            }
            Self::ZeroSpan { row, col } => write!(f, "cell ({row},{col}) has a zero span"),
            Self::SpanOutOfBounds { row, col } => {
                write!(f, "span of cell ({row},{col}) leaves the grid")
            }
            Self::SpanConflict { row, col } => {
                write!(f, "position ({row},{col}) is covered by a span but is not its placeholder")
            }
            Self::OrphanPlaceholder { row, col } => {
                write!(f, "placeholder ({row},{col}) is not covered by its origin")
            }
        }
    }
}

/// Checks the size limits and the span invariants of a grid.
///
/// Renderers accept invalid grids; this is a check for callers that want to
/// reject them before storing.
pub fn validate_grid(grid: &[Vec<Cell>]) -> Vec<GridIssue> {
    let mut issues = Vec::new();

    if grid.len() > MAX_ROWS {
        issues.push(GridIssue::TooManyRows { rows: grid.len() });
    }
    for (row, cells) in grid.iter().enumerate() {
        if cells.len() > MAX_COLS {
            issues.push(GridIssue::TooManyColumns {
                row,
                cols: cells.len(),
            });
        }
    }

    let mut covered = HashSet::new();
    for (r, cells) in grid.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            if cell.is_spanned {
                continue;
            }
            if cell.row_span == 0 || cell.col_span == 0 {
                issues.push(GridIssue::ZeroSpan { row: r, col: c });
            }

            let row_end = r.saturating_add(cell.rows());
            let col_end = c.saturating_add(cell.cols());
            let mut out_of_bounds = row_end > grid.len();

            for rr in r..row_end.min(grid.len()) {
                out_of_bounds |= col_end > grid[rr].len();
                for cc in c..col_end.min(grid[rr].len()) {
                    if (rr, cc) == (r, c) {
                        continue;
                    }
                    covered.insert((rr, cc));
                    let placeholder = &grid[rr][cc];
                    let matches = placeholder.is_spanned
                        && placeholder.origin_row == Some(r)
                        && placeholder.origin_col == Some(c);
                    if !matches {
                        issues.push(GridIssue::SpanConflict { row: rr, col: cc });
                    }
                }
            }

            if out_of_bounds {
                issues.push(GridIssue::SpanOutOfBounds { row: r, col: c });
            }
        }
    }

    for (r, cells) in grid.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            if cell.is_spanned && !covered.contains(&(r, c)) {
                issues.push(GridIssue::OrphanPlaceholder { row: r, col: c });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> Vec<Vec<Cell>> {
        vec![
            vec![Cell::new("A"), Cell::new("B")],
            vec![Cell::new("C"), Cell::new("D")],
        ]
    }

    fn merged_header() -> Vec<Vec<Cell>> {
        vec![
            vec![Cell::new("A").with_span(1, 2), Cell::spanned(0, 0)],
            vec![Cell::new("C"), Cell::new("D")],
        ]
    }

    #[test]
    fn simple_grid_keeps_dimensions() {
        let grid = simple();
        assert!(!has_merged_cells(&grid));
        let matrix = to_display_matrix(&grid);
        assert_eq!(matrix.len(), 2);
        assert!(matrix.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let grid = vec![
            vec![Cell::new("A")],
            vec![Cell::new("B"), Cell::new("C"), Cell::new("D")],
        ];
        let matrix = to_display_matrix(&grid);
        assert_eq!(matrix[0], ["A", "", ""]);
        assert_eq!(matrix[1], ["B", "C", "D"]);
    }

    #[test]
    fn spanned_grid_is_merged() {
        assert!(has_merged_cells(&merged_header()));
    }

    #[test]
    fn positional_description_lists_origins() {
        let entries: Vec<String> = to_positional_description(&merged_header())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(entries, ["[0,0-1]: A", "[1,0]: C", "[1,1]: D"]);
    }

    #[test]
    fn positional_ranges_are_clamped() {
        let grid = vec![vec![Cell::header("H").with_span(5, 9)]];
        let entries = to_positional_description(&grid);
        assert_eq!(entries[0].kind, CellKind::Header);
        assert_eq!(entries[0].to_string(), "[0,0]: H");
    }

    #[test]
    fn layout_covers_exact_rectangle() {
        let grid = vec![
            vec![Cell::new("A").with_span(2, 2), Cell::spanned(0, 0), Cell::new("B")],
            vec![Cell::spanned(0, 0), Cell::spanned(0, 0), Cell::new("C")],
            vec![Cell::new("D"), Cell::new("E"), Cell::new("F")],
        ];
        let layout = GridLayout::new(&grid);
        let merged: Vec<_> = layout.merged_regions().copied().collect();
        assert_eq!(
            merged,
            [MergeRegion {
                row: 0,
                col: 0,
                row_span: 2,
                col_span: 2
            }]
        );

        for r in 0..3 {
            for c in 0..3 {
                let inside = r < 2 && c < 2;
                let owned_by_a = matches!(layout.slot(r, c), Slot::Origin(0) | Slot::Covered(0));
                assert_eq!(inside, owned_by_a, "position ({r},{c})");
            }
        }

        assert_eq!(layout.region(0), Some(&merged[0]));
        assert_eq!(layout.region(layout.regions().len()), None);
    }

    #[test]
    fn layout_clamps_overrunning_spans() {
        let grid = vec![
            vec![Cell::new("A"), Cell::new("B").with_span(4, 3)],
            vec![Cell::new("C"), Cell::spanned(0, 1)],
        ];
        let layout = GridLayout::new(&grid);
        let region = layout.merged_regions().next().copied().unwrap();
        assert_eq!(
            region,
            MergeRegion {
                row: 0,
                col: 1,
                row_span: 2,
                col_span: 1
            }
        );
        assert_eq!(layout.slot(1, 1), Slot::Covered(1));
        assert_eq!(layout.slot(7, 7), Slot::Empty);
    }

    #[test]
    fn layout_drops_origins_inside_earlier_spans() {
        let grid = vec![vec![Cell::new("A").with_span(1, 2), Cell::new("stray")]];
        let layout = GridLayout::new(&grid);
        assert_eq!(layout.regions().len(), 1);
        assert_eq!(layout.slot(0, 1), Slot::Covered(0));
    }

    #[test]
    fn layout_shrinks_spans_into_claimed_positions() {
        let grid = vec![
            vec![Cell::new("A"), Cell::new("B").with_span(2, 1)],
            vec![Cell::new("C").with_span(1, 2), Cell::spanned(0, 1)],
        ];
        let layout = GridLayout::new(&grid);
        let c = layout.regions()[2];
        assert_eq!((c.row, c.col, c.row_span, c.col_span), (1, 0, 1, 1));
    }

    #[test]
    fn validation_accepts_consistent_grid() {
        assert!(validate_grid(&merged_header()).is_empty());
        assert!(validate_grid(&simple()).is_empty());
    }

    #[test]
    fn validation_reports_defects() {
        let grid = vec![
            vec![Cell::new("A").with_span(1, 3), Cell::new("B")],
            vec![Cell::spanned(5, 5), Cell::new("C").with_span(0, 1)],
        ];
        let issues = validate_grid(&grid);
        assert!(issues.contains(&GridIssue::SpanConflict { row: 0, col: 1 }));
        assert!(issues.contains(&GridIssue::SpanOutOfBounds { row: 0, col: 0 }));
        assert!(issues.contains(&GridIssue::OrphanPlaceholder { row: 1, col: 0 }));
        assert!(issues.contains(&GridIssue::ZeroSpan { row: 1, col: 1 }));
    }

    #[test]
    fn validation_reports_size_limits() {
        let grid = vec![vec![Cell::new("x"); MAX_COLS + 1]; MAX_ROWS + 1];
        let issues = validate_grid(&grid);
        assert_eq!(issues[0], GridIssue::TooManyRows { rows: MAX_ROWS + 1 });
        assert_eq!(issues.len(), MAX_ROWS + 2);
    }

    #[test]
    fn special_table_replaces_header_rows() {
        let mut table = Table::new(vec![
            vec![Cell::header("raw"), Cell::header("raw")],
            vec![Cell::header("raw").with_span(1, 2), Cell::spanned(1, 0)],
            vec![Cell::new("1"), Cell::new("Revenue")],
            vec![Cell::new("2").with_span(1, 2), Cell::spanned(3, 0)],
        ]);
        table.is_operational_risk_table = true;

        let TableShape::Simple(rows) = TableShape::of(&table) else {
            panic!("special tables are simple");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][1], "Риск-событие");
        assert_eq!(rows[1][..2], ["1", "Revenue"]);
        assert_eq!(rows[2][..2], ["2", ""]);
        assert!(rows.iter().all(|row| row.len() == 6));
    }

    #[test]
    fn regular_risk_tables_keep_their_header() {
        let mut table = Table::from_rows([["a", "b"]]);
        table.is_regular_risk_table = true;
        assert_eq!(SpecialTable::of(&table), None);
        assert_eq!(
            TableShape::of(&table),
            TableShape::Simple(vec![vec!["a".into(), "b".into()]])
        );
    }
}
