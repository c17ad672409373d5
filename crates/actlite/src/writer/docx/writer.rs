//! DOCX document writer implementation

use docx_rs::{
    AlignmentType, BreakType, Docx, IndentLevel, NumberingId, Paragraph, Run, Table as DocxTable,
    TableCell, TableRow, VMergeType,
};
use ecow::EcoString;

use crate::Result;
use crate::common::ActliteFeat;
use crate::grid::{GridLayout, Slot, SpecialTable, special_matrix};
use crate::markup::{Inline, parse_markup};
use crate::model::{Alignment, Cell, Node, Table, TextBlock, Violation};
use crate::violation::{Attachment, Section, sections};
use crate::walk::{ActSink, Scope};
use crate::writer::{FormatWriter, Output, base_style};

use super::numbering::DocxNumbering;
use super::styles::DocxStyles;

/// Twips per pixel of a column width hint.
const TWIPS_PER_PX: f64 = 15.0;
/// Text width of an A4 page with 2 cm margins, in twips.
const DEFAULT_TABLE_WIDTH: usize = 9638;

enum Block {
    Paragraph(Box<Paragraph>),
    Table(Box<DocxTable>),
}

/// DOCX writer that collects the body while walking and assembles the
/// document when finished.
pub struct DocxWriter {
    feat: ActliteFeat,
    styles: DocxStyles,
    numbering: DocxNumbering,
    blocks: Vec<Block>,
}

impl DocxWriter {
    /// Creates a writer with the given options.
    pub fn new(feat: ActliteFeat) -> Self {
        Self {
            feat,
            styles: DocxStyles::new(),
            numbering: DocxNumbering::new(),
            blocks: Vec::new(),
        }
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) {
        if !paragraph.children.is_empty() {
            self.blocks.push(Block::Paragraph(Box::new(paragraph)));
        }
    }

    fn push_caption(&mut self, label: &str, number: Option<&str>) {
        let caption = self.feat.labels.caption(label, number);
        self.push_paragraph(
            Paragraph::new()
                .style("Caption")
                .add_run(Run::new().add_text(caption.as_str())),
        );
    }

    /// Generate the DOCX document
    fn generate_docx(self) -> Docx {
        let docx = self.styles.initialize_styles(Docx::new());
        let docx = self
            .blocks
            .into_iter()
            .fold(docx, |docx, block| match block {
                Block::Paragraph(paragraph) => docx.add_paragraph(*paragraph),
                Block::Table(table) => docx.add_table(*table),
            });
        self.numbering.apply(docx)
    }
}

impl ActSink for DocxWriter {
    fn on_item(&mut self, scope: &Scope, node: &Node) -> Result<()> {
        let heading = node.heading_text();
        if !heading.trim().is_empty() {
            self.push_paragraph(
                Paragraph::new()
                    .style(&DocxStyles::heading(scope.level))
                    .add_run(Run::new().add_text(heading.trim())),
            );
        }

        self.push_paragraph(plain_paragraph(&node.content));
        Ok(())
    }

    fn on_table(&mut self, scope: &Scope, _node: &Node, table: &Table) -> Result<()> {
        let label = self.feat.labels.table.clone();
        self.push_caption(&label, scope.number);

        if let Some(table) = build_table(table) {
            self.blocks.push(Block::Table(Box::new(table)));
        }
        Ok(())
    }

    fn on_text_block(&mut self, scope: &Scope, _node: &Node, block: &TextBlock) -> Result<()> {
        if let Some(label) = self.feat.labels.text_block.clone() {
            self.push_caption(&label, scope.number);
        }

        let formatting = &block.formatting;
        // Run sizes are in half-points.
        let size = formatting.font_size() as usize * 2;
        let alignment = alignment_type(formatting.alignment);

        for markup in parse_markup(&block.content, base_style(formatting)) {
            let mut paragraph = Paragraph::new().align(alignment);
            for inline in &markup.inlines {
                let run = match inline {
                    Inline::LineBreak => Run::new().add_break(BreakType::TextWrapping),
                    Inline::Run(styled) => {
                        let mut run = Run::new().add_text(styled.text.as_str()).size(size);
                        if styled.style.bold {
                            run = run.bold();
                        }
                        if styled.style.italic {
                            run = run.italic();
                        }
                        if styled.style.underline {
                            run = run.underline("single");
                        }
                        run
                    }
                };
                paragraph = paragraph.add_run(run);
            }
            self.push_paragraph(paragraph);
        }
        Ok(())
    }

    fn on_violation(&mut self, scope: &Scope, _node: &Node, violation: &Violation) -> Result<()> {
        let label = self.feat.labels.violation.clone();
        self.push_caption(&label, scope.number);

        let mut paragraphs = Vec::new();
        for section in sections(violation, &self.feat.labels) {
            match section {
                Section::Field { label, content } => {
                    let label = Run::new().add_text(format!("{label} ")).bold();
                    paragraphs.push(add_lines(Paragraph::new().add_run(label), content));
                }
                Section::List(items) => {
                    let id = self.numbering.create_ordered_numbering();
                    paragraphs.extend(items.into_iter().map(|item| {
                        plain_paragraph(item).numbering(NumberingId::new(id), IndentLevel::new(0))
                    }));
                }
                Section::Attachment(Attachment::Case(text)) => {
                    paragraphs.push(plain_paragraph(&format!("«{text}»")).style("Case"));
                }
                Section::Attachment(Attachment::Image {
                    caption, filename, ..
                }) => {
                    let text = Attachment::image_text(&self.feat.labels, caption, &filename);
                    paragraphs.push(plain_paragraph(&text));
                }
                Section::Attachment(Attachment::FreeText(text)) => {
                    paragraphs.push(plain_paragraph(text));
                }
            }
        }

        for paragraph in paragraphs {
            self.push_paragraph(paragraph);
        }
        Ok(())
    }
}

impl FormatWriter for DocxWriter {
    fn finish(self: Box<Self>) -> Result<Output> {
        Ok(Output::Docx(Box::new((*self).generate_docx())))
    }
}

/// A paragraph of plain text whose line breaks become text wrapping breaks.
fn plain_paragraph(text: &str) -> Paragraph {
    add_lines(Paragraph::new(), text)
}

fn add_lines(mut paragraph: Paragraph, text: &str) -> Paragraph {
    let lines = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty());

    for (index, line) in lines.enumerate() {
        let mut run = Run::new();
        if index > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        paragraph = paragraph.add_run(run.add_text(line));
    }
    paragraph
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}

/// Builds a native table; `None` when the table has no cells.
pub(super) fn build_table(table: &Table) -> Option<DocxTable> {
    let (rows, cols) = match SpecialTable::of(table) {
        Some(special) => special_rows(&special_matrix(special, &table.grid))?,
        None => merged_rows(&table.grid)?,
    };
    Some(DocxTable::new(rows).set_grid(column_grid(&table.col_widths, cols)))
}

/// Rows of a special table: the fixed header in bold, then the data rows.
fn special_rows(matrix: &[Vec<EcoString>]) -> Option<(Vec<TableRow>, usize)> {
    let cols = matrix.first()?.len();
    if cols == 0 {
        return None;
    }
    let rows = matrix
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = row
                .iter()
                .map(|content| text_cell(content, index == 0))
                .collect();
            TableRow::new(cells)
        })
        .collect();
    Some((rows, cols))
}

/// Rows of a grid with real cell merging.
///
/// Origins carry `gridSpan` and start a vertical merge; positions covered
/// from a row above continue it. Spans are clamped by [`GridLayout`].
fn merged_rows(grid: &[Vec<Cell>]) -> Option<(Vec<TableRow>, usize)> {
    let layout = GridLayout::new(grid);
    if layout.rows() == 0 || layout.cols() == 0 {
        return None;
    }

    let mut rows = Vec::with_capacity(layout.rows());
    for r in 0..layout.rows() {
        let mut cells = Vec::new();
        let mut c = 0;
        while c < layout.cols() {
            let slot = layout.slot(r, c);
            let region = match slot {
                Slot::Origin(index) | Slot::Covered(index) => layout.region(index).copied(),
                Slot::Empty => None,
            };
            match (slot, region) {
                (Slot::Origin(_), Some(region)) => {
                    let (content, header) = grid
                        .get(r)
                        .and_then(|row| row.get(c))
                        .map_or(("", false), |cell| (cell.content.as_str(), cell.is_header));

                    let mut cell = text_cell(content, header);
                    if region.col_span > 1 {
                        cell = cell.grid_span(region.col_span);
                    }
                    if region.row_span > 1 {
                        cell = cell.vertical_merge(VMergeType::Restart);
                    }
                    cells.push(cell);
                    c += region.col_span.max(1);
                }
                (Slot::Covered(_), Some(region)) => {
                    let span = (region.col + region.col_span).saturating_sub(c).max(1);
                    let mut cell = empty_cell().vertical_merge(VMergeType::Continue);
                    if span > 1 {
                        cell = cell.grid_span(span);
                    }
                    cells.push(cell);
                    c += span;
                }
                _ => {
                    cells.push(empty_cell());
                    c += 1;
                }
            }
        }
        rows.push(TableRow::new(cells));
    }
    Some((rows, layout.cols()))
}

fn text_cell(content: &str, header: bool) -> TableCell {
    let mut paragraph = plain_paragraph(content);
    if header {
        paragraph = paragraph.style("TableHeader");
    }
    TableCell::new().add_paragraph(paragraph)
}

fn empty_cell() -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new())
}

/// Column widths in twips; missing or unusable hints share the default
/// width evenly.
fn column_grid(col_widths: &[f64], cols: usize) -> Vec<usize> {
    let even = DEFAULT_TABLE_WIDTH / cols.max(1);
    (0..cols)
        .map(|col| match col_widths.get(col) {
            Some(&px) if px.is_finite() && px > 0.0 => (px * TWIPS_PER_PX).round() as usize,
            _ => even,
        })
        .collect()
}
