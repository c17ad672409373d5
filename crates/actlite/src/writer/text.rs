//! Text writer implementation - produces plain text output

use ecow::EcoString;
use unicode_width::UnicodeWidthStr;

use crate::Result;
use crate::common::ActliteFeat;
use crate::grid::TableShape;
use crate::markup::parse_markup;
use crate::model::{Alignment, Node, Table, TextBlock, Violation};
use crate::violation::{Attachment, Section, sections};
use crate::walk::{ActSink, Scope};
use crate::writer::{FormatWriter, Output, base_style};

/// Narrowest column budget used for wrapping, however deep the indent.
const MIN_WRAP_WIDTH: usize = 20;

/// Text writer implementation
pub struct TextWriter {
    feat: ActliteFeat,
    blocks: Vec<String>,
}

impl TextWriter {
    /// Creates a writer with the given options.
    pub fn new(feat: ActliteFeat) -> Self {
        Self {
            feat,
            blocks: Vec::new(),
        }
    }

    fn indent(level: usize) -> String {
        " ".repeat(2 * level.saturating_sub(1))
    }

    fn wrap_width(&self, indent: &str) -> usize {
        self.feat
            .text_width
            .saturating_sub(indent.len())
            .max(MIN_WRAP_WIDTH)
    }

    fn push_block<I>(&mut self, indent: &str, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let block = lines
            .into_iter()
            .map(|line| format!("{indent}{}", line.as_ref()).trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        if !block.trim().is_empty() {
            self.blocks.push(block);
        }
    }
}

impl ActSink for TextWriter {
    fn on_item(&mut self, scope: &Scope, node: &Node) -> Result<()> {
        let indent = Self::indent(scope.level);
        self.push_block(&indent, [node.heading_text()]);

        let width = self.wrap_width(&indent);
        let content = layout_paragraph(&node.content, width, Alignment::Left);
        self.push_block(&indent, content);
        Ok(())
    }

    fn on_table(&mut self, scope: &Scope, _node: &Node, table: &Table) -> Result<()> {
        let indent = Self::indent(scope.level);
        let labels = &self.feat.labels;
        let mut lines = vec![labels.caption(&labels.table, scope.number).to_string()];

        match TableShape::of(table) {
            TableShape::Simple(rows) => lines.extend(box_table(&rows)),
            TableShape::Positional(entries) => {
                lines.extend(entries.iter().map(|entry| one_line(&entry.to_string())));
            }
        }

        self.push_block(&indent, lines);
        Ok(())
    }

    fn on_text_block(&mut self, scope: &Scope, _node: &Node, block: &TextBlock) -> Result<()> {
        let indent = Self::indent(scope.level);
        let width = self.wrap_width(&indent);

        if let Some(label) = self.feat.labels.text_block.clone() {
            let caption = self.feat.labels.caption(&label, scope.number);
            self.push_block(&indent, [caption]);
        }

        let alignment = block.formatting.alignment;
        for paragraph in parse_markup(&block.content, base_style(&block.formatting)) {
            let lines = layout_paragraph(&paragraph.plain_text(), width, alignment);
            self.push_block(&indent, lines);
        }
        Ok(())
    }

    fn on_violation(&mut self, scope: &Scope, _node: &Node, violation: &Violation) -> Result<()> {
        let indent = Self::indent(scope.level);
        let width = self.wrap_width(&indent);
        let labels = &self.feat.labels;

        let mut lines = vec![labels.caption(&labels.violation, scope.number).to_string()];
        let mut paragraph =
            |text: &str| lines.extend(layout_paragraph(text, width, Alignment::Left));

        for section in sections(violation, labels) {
            match section {
                Section::Field { label, content } => paragraph(&format!("{label} {content}")),
                Section::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        paragraph(&format!("{}. {item}", index + 1));
                    }
                }
                Section::Attachment(Attachment::Case(text)) => paragraph(&format!("«{text}»")),
                Section::Attachment(Attachment::Image {
                    caption, filename, ..
                }) => paragraph(&Attachment::image_text(labels, caption, &filename)),
                Section::Attachment(Attachment::FreeText(text)) => paragraph(text),
            }
        }

        self.push_block(&indent, lines);
        Ok(())
    }
}

impl FormatWriter for TextWriter {
    fn finish(self: Box<Self>) -> Result<Output> {
        let mut output = EcoString::new();
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                output.push_str("\n\n");
            }
            output.push_str(block);
        }
        if !output.is_empty() {
            output.push('\n');
        }
        Ok(Output::Text(output))
    }
}

/// Wraps text to `width` display columns and aligns each line.
///
/// Every `\n` starts a new line. Words wider than `width` are kept whole.
/// Justified lines are stretched except the last line before a break.
pub fn layout_paragraph(text: &str, width: usize, alignment: Alignment) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        let wrapped = wrap_words(&words, width);
        let last = wrapped.len().saturating_sub(1);
        for (index, words) in wrapped.iter().enumerate() {
            out.push(align_line(words, width, alignment, index == last));
        }
    }
    out
}

fn wrap_words<'a>(words: &[&'a str], width: usize) -> Vec<Vec<&'a str>> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut used = 0;

    for &word in words {
        let word_width = word.width();
        if !current.is_empty() && used + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        if !current.is_empty() {
            used += 1;
        }
        used += word_width;
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn align_line(words: &[&str], width: usize, alignment: Alignment, last: bool) -> String {
    let text = words.join(" ");
    let slack = width.saturating_sub(text.width());
    match alignment {
        Alignment::Left => text,
        Alignment::Center => format!("{}{text}", " ".repeat(slack / 2)),
        Alignment::Right => format!("{}{text}", " ".repeat(slack)),
        Alignment::Justify if last || words.len() < 2 => text,
        Alignment::Justify => {
            let gaps = words.len() - 1;
            let spaces = slack + gaps;
            let (base, extra) = (spaces / gaps, spaces % gaps);

            let mut line = String::with_capacity(width);
            for (index, word) in words.iter().enumerate() {
                if index > 0 {
                    line.push_str(&" ".repeat(base + usize::from(index <= extra)));
                }
                line.push_str(word);
            }
            line
        }
    }
}

/// Draws a matrix as an ASCII grid; the first row is the header.
fn box_table(rows: &[Vec<EcoString>]) -> Vec<String> {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if cols == 0 {
        return Vec::new();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| one_line(cell)).collect())
        .collect();
    let widths: Vec<usize> = (0..cols)
        .map(|col| {
            cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
                .max(1)
        })
        .collect();

    let border = |fill: &str| {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&fill.repeat(width + 2));
            line.push('+');
        }
        line
    };
    let row_line = |row: &[String]| {
        let mut line = String::from("|");
        for (col, width) in widths.iter().enumerate() {
            let cell = row.get(col).map(String::as_str).unwrap_or_default();
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(width - cell.width() + 1));
            line.push('|');
        }
        line
    };

    let mut lines = vec![border("-")];
    let mut rows = cells.iter();
    if let Some(header) = rows.next() {
        lines.push(row_line(header));
        lines.push(border("="));
    }
    let mut has_data = false;
    for row in rows {
        lines.push(row_line(row));
        has_data = true;
    }
    if has_data {
        lines.push(border("-"));
    }
    lines
}

fn one_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            layout_paragraph("one two three four", 9, Alignment::Left),
            ["one two", "three", "four"]
        );
        assert_eq!(
            layout_paragraph("supercalifragilistic x", 5, Alignment::Left),
            ["supercalifragilistic", "x"]
        );
    }

    #[test]
    fn wrap_counts_display_columns() {
        // Each ideograph is two columns wide.
        assert_eq!(
            layout_paragraph("漢字 漢字 漢字", 10, Alignment::Left),
            ["漢字 漢字", "漢字"]
        );
    }

    #[test]
    fn aligns_lines() {
        assert_eq!(layout_paragraph("ab", 6, Alignment::Center), ["  ab"]);
        assert_eq!(layout_paragraph("ab", 6, Alignment::Right), ["    ab"]);
        assert_eq!(
            layout_paragraph("aa bb cc dd", 9, Alignment::Justify),
            ["aa  bb cc", "dd"]
        );
        assert_eq!(
            layout_paragraph("aa bb cc\nlast", 11, Alignment::Justify),
            ["aa bb cc", "last"]
        );
    }

    #[test]
    fn draws_box_table() {
        let rows = vec![
            vec![EcoString::from("A"), EcoString::from("Long")],
            vec![EcoString::from("C"), EcoString::from("D")],
        ];
        assert_eq!(
            box_table(&rows).join("\n"),
            "+---+------+\n\
             | A | Long |\n\
             +===+======+\n\
             | C | D    |\n\
             +---+------+"
        );
    }

    #[test]
    fn header_only_table_has_no_bottom_border() {
        let rows = vec![vec![EcoString::from("A")]];
        assert_eq!(box_table(&rows), ["+---+", "| A |", "+===+"]);
        assert!(box_table(&[]).is_empty());
    }
}
