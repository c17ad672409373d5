use ecow::EcoString;

use crate::grid::{CellKind, PositionalEntry};

use super::escape::{escape_markdown_text, escape_table_cell};

/// Renders a matrix as a GFM pipe table; the first row is the header.
pub(super) fn render_pipe_table(rows: &[Vec<EcoString>], escape: bool) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&render_gfm_row(header, columns, escape));
    out.push('\n');

    out.push('|');
    for _ in 0..columns {
        out.push_str(" --- |");
    }

    for row in body {
        out.push('\n');
        out.push_str(&render_gfm_row(row, columns, escape));
    }
    out
}

fn render_gfm_row(cells: &[EcoString], columns: usize, escape: bool) -> String {
    let mut row = String::new();
    row.push('|');
    for col in 0..columns {
        let text = cells.get(col).map(EcoString::as_str).unwrap_or_default();
        row.push(' ');
        row.push_str(&escape_table_cell(text, escape));
        row.push(' ');
        row.push('|');
    }
    row
}

/// Renders one positional entry; header contents are set in bold.
pub(super) fn render_positional_entry(entry: &PositionalEntry, escape: bool) -> String {
    let content = escape_markdown_text(&entry.content.as_str().replace('\n', " "), escape);
    match entry.kind {
        CellKind::Header if !content.trim().is_empty() => {
            format!("{}: **{}**", entry.position(), content.trim())
        }
        _ => format!("{}: {content}", entry.position()),
    }
}
