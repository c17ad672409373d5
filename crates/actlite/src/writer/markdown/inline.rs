use crate::markup::{Inline, InlineRun, MarkupParagraph, Style};

use super::escape::{escape_line_start, escape_markdown_text};

/// Renders a paragraph of styled runs.
///
/// Underline has no Markdown syntax; underlined text is kept as plain text.
/// Emphasis markers are only written where bold or italic changes, so runs
/// split by underline alone stay inside one marker pair.
pub(super) fn render_paragraph(paragraph: &MarkupParagraph, escape: bool) -> String {
    let mut emitter = Emitter::new(escape);
    for inline in &paragraph.inlines {
        match inline {
            Inline::Run(run) => emitter.run(run),
            Inline::LineBreak => emitter.line_break(),
        }
    }
    emitter.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Strong,
    Emph,
}

impl Marker {
    const ALL: [Marker; 2] = [Marker::Strong, Marker::Emph];

    fn delimiter(self) -> &'static str {
        match self {
            Marker::Strong => "**",
            Marker::Emph => "*",
        }
    }

    fn wanted(self, style: &Style) -> bool {
        match self {
            Marker::Strong => style.bold,
            Marker::Emph => style.italic,
        }
    }
}

struct Emitter {
    out: String,
    escape: bool,
    /// Markers currently open, innermost last.
    open: Vec<Marker>,
    /// Whether all open markers were opened by one delimiter run and may
    /// therefore close in any order.
    joint: bool,
    /// Whitespace held back until the next text, so markers touch their text.
    space: String,
}

impl Emitter {
    fn new(escape: bool) -> Self {
        Self {
            out: String::new(),
            escape,
            open: Vec::new(),
            joint: false,
            space: String::new(),
        }
    }

    fn run(&mut self, run: &InlineRun) {
        let text = escape_markdown_text(&run.text, self.escape);
        self.close_unwanted(&run.style);

        let core = text.trim();
        if core.is_empty() {
            self.space.push_str(&text);
            return;
        }

        let lead = &text[..text.len() - text.trim_start().len()];
        let trail = &text[text.trim_end().len()..];
        self.out.push_str(&self.space);
        self.space.clear();
        self.out.push_str(lead);
        self.open_missing(&run.style);
        if self.escape && self.open.is_empty() && self.at_line_start() {
            self.out.push_str(&escape_line_start(core));
        } else {
            self.out.push_str(core);
        }
        self.space.push_str(trail);
    }

    fn at_line_start(&self) -> bool {
        self.out
            .rsplit('\n')
            .next()
            .is_some_and(|line| line.trim().is_empty())
    }

    fn line_break(&mut self) {
        self.close_all();
        self.space.clear();
        let kept = self.out.trim_end().len();
        self.out.truncate(kept);
        self.out.push_str("\\\n");
    }

    fn finish(mut self) -> String {
        self.close_all();
        self.out.trim_end().to_string()
    }

    fn close_unwanted(&mut self, style: &Style) {
        let Some(first) = self.open.iter().position(|marker| !marker.wanted(style)) else {
            return;
        };

        if self.joint {
            let mut kept = Vec::new();
            for marker in std::mem::take(&mut self.open).into_iter().rev() {
                if marker.wanted(style) {
                    kept.insert(0, marker);
                } else {
                    self.out.push_str(marker.delimiter());
                }
            }
            self.open = kept;
            self.joint = false;
            return;
        }

        while self.open.len() > first {
            if let Some(marker) = self.open.pop() {
                self.out.push_str(marker.delimiter());
            }
        }
    }

    fn open_missing(&mut self, style: &Style) {
        let before = self.open.len();
        for marker in Marker::ALL {
            if marker.wanted(style) && !self.open.contains(&marker) {
                self.out.push_str(marker.delimiter());
                self.open.push(marker);
            }
        }
        let opened = self.open.len() - before;
        if opened > 0 {
            self.joint = before == 0 && opened > 1;
        }
    }

    fn close_all(&mut self) {
        while let Some(marker) = self.open.pop() {
            self.out.push_str(marker.delimiter());
        }
        self.joint = false;
    }
}
