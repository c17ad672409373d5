//! Markdown writer implementation.

mod escape;
mod inline;
mod tables;

use ecow::EcoString;

use crate::Result;
use crate::common::ActliteFeat;
use crate::grid::TableShape;
use crate::markup::parse_markup;
use crate::model::{Alignment, Node, Table, TextBlock, Violation};
use crate::violation::{Attachment, Section, sections};
use crate::walk::{ActSink, Scope};
use crate::writer::{FormatWriter, Output, base_style};

use self::escape::{escape_lines, escape_markdown_text};
use self::inline::render_paragraph;
use self::tables::{render_pipe_table, render_positional_entry};

/// Deepest heading level Markdown can express.
const MAX_HEADING_LEVEL: usize = 6;

/// Markdown writer implementation.
pub struct MarkdownWriter {
    feat: ActliteFeat,
    parts: Vec<String>,
}

impl MarkdownWriter {
    /// Creates a writer with the given options.
    pub fn new(feat: ActliteFeat) -> Self {
        Self {
            feat,
            parts: Vec::new(),
        }
    }

    fn escape(&self, text: &str) -> String {
        escape_markdown_text(text, self.feat.escape_markdown)
    }

    fn push(&mut self, part: String) {
        if !part.trim().is_empty() {
            self.parts.push(part);
        }
    }

    fn push_caption(&mut self, label: &str, number: Option<&str>) {
        let caption = self.feat.labels.caption(label, number);
        let part = format!("**{}**", self.escape(&caption));
        self.push(part);
    }
}

impl ActSink for MarkdownWriter {
    fn on_item(&mut self, scope: &Scope, node: &Node) -> Result<()> {
        let heading = node.heading_text();
        if !heading.trim().is_empty() {
            let marks = "#".repeat(scope.level.clamp(1, MAX_HEADING_LEVEL));
            let part = format!("{marks} {}", self.escape(heading.trim()));
            self.push(part);
        }

        let content = escape_lines(&node.content, self.feat.escape_markdown);
        self.push(content);
        Ok(())
    }

    fn on_table(&mut self, scope: &Scope, _node: &Node, table: &Table) -> Result<()> {
        let label = self.feat.labels.table.clone();
        self.push_caption(&label, scope.number);

        let escape = self.feat.escape_markdown;
        match TableShape::of(table) {
            TableShape::Simple(rows) => self.push(render_pipe_table(&rows, escape)),
            TableShape::Positional(entries) => {
                for entry in &entries {
                    self.push(render_positional_entry(entry, escape));
                }
            }
        }
        Ok(())
    }

    fn on_text_block(&mut self, scope: &Scope, _node: &Node, block: &TextBlock) -> Result<()> {
        if let Some(label) = self.feat.labels.text_block.clone() {
            self.push_caption(&label, scope.number);
        }

        let paragraphs: Vec<String> =
            parse_markup(&block.content, base_style(&block.formatting))
                .iter()
                .map(|paragraph| render_paragraph(paragraph, self.feat.escape_markdown))
                .filter(|paragraph| !paragraph.is_empty())
                .collect();
        if paragraphs.is_empty() {
            return Ok(());
        }

        let body = paragraphs.join("\n\n");
        let part = match block.formatting.alignment {
            Alignment::Left => body,
            Alignment::Center => wrap_aligned("center", &body),
            Alignment::Right => wrap_aligned("right", &body),
            Alignment::Justify => wrap_aligned("justify", &body),
        };
        self.push(part);
        Ok(())
    }

    fn on_violation(&mut self, scope: &Scope, _node: &Node, violation: &Violation) -> Result<()> {
        let label = self.feat.labels.violation.clone();
        self.push_caption(&label, scope.number);

        let escape = self.feat.escape_markdown;
        let mut parts = Vec::new();
        for section in sections(violation, &self.feat.labels) {
            let part = match section {
                Section::Field { label, content } => {
                    format!("{} {}", self.escape(label), escape_lines(content, escape))
                }
                Section::List(items) => items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        format!("{}. {}", index + 1, escape_lines(item, escape))
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
                Section::Attachment(Attachment::Case(text)) => {
                    format!("«{}»", escape_lines(text, escape))
                }
                Section::Attachment(Attachment::Image {
                    caption, filename, ..
                }) => self.escape(&Attachment::image_text(
                    &self.feat.labels,
                    caption,
                    &filename,
                )),
                Section::Attachment(Attachment::FreeText(text)) => escape_lines(text, escape),
            };
            parts.push(part);
        }

        for part in parts {
            self.push(part);
        }
        Ok(())
    }
}

impl FormatWriter for MarkdownWriter {
    fn finish(self: Box<Self>) -> Result<Output> {
        let mut output = EcoString::new();
        if !self.parts.is_empty() {
            output.push_str(&self.parts.join("\n\n"));
            output.push('\n');
        }
        Ok(Output::Markdown(output))
    }
}

/// Markdown has no alignment syntax; HTML renderers honor a wrapping block.
fn wrap_aligned(align: &str, body: &str) -> String {
    format!("<div align=\"{align}\">\n\n{body}\n\n</div>")
}
