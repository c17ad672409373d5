//! Inline markup converter.
//!
//! Text blocks carry a constrained HTML subset: bold (`b`, `strong`),
//! italic (`i`, `em`), underline (`u`, `ins`), line breaks (`br`) and
//! paragraph boundaries (`p`, `div`). Any other tag is dropped while its text
//! is kept, and attributes are ignored. The result is a list of paragraphs of
//! styled runs shared by every target.
//!
//! Markup with unbalanced style tags is not guessed at: it degrades to its
//! plain text with the base style only.

use ecow::EcoString;

/// Character styling of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
}

impl Style {
    /// Bold only.
    pub const BOLD: Style = Style {
        bold: true,
        italic: false,
        underline: false,
    };
    /// Italic only.
    pub const ITALIC: Style = Style {
        bold: false,
        italic: true,
        underline: false,
    };
    /// Underline only.
    pub const UNDERLINE: Style = Style {
        bold: false,
        italic: false,
        underline: true,
    };

    /// Whether no styling is applied.
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}

/// A piece of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    /// The text, without line breaks.
    pub text: EcoString,
    /// Its style.
    pub style: Style,
}

/// An element of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Styled text.
    Run(InlineRun),
    /// A line break inside the paragraph.
    LineBreak,
}

/// A paragraph of inline elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupParagraph {
    /// Runs and line breaks in order; never starts or ends with a break.
    pub inlines: Vec<Inline>,
}

impl MarkupParagraph {
    /// The text of each line, with styling dropped.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Run(run) => line.push_str(&run.text),
                Inline::LineBreak => lines.push(std::mem::take(&mut line)),
            }
        }
        lines.push(line);
        lines
    }

    /// The paragraph text with line breaks as `\n`.
    pub fn plain_text(&self) -> String {
        self.lines().join("\n")
    }
}

/// Parses inline markup on top of the `base` style.
pub fn parse_markup(src: &str, base: Style) -> Vec<MarkupParagraph> {
    match accumulate(src, base, true) {
        Some(paragraphs) => paragraphs,
        None => {
            log::debug!("unbalanced inline markup, falling back to plain text");
            accumulate(src, base, false).unwrap_or_default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagName {
    Bold,
    Italic,
    Underline,
    Break,
    Paragraph,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open(TagName),
    Close(TagName),
    Text(&'a str),
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with('<') {
            if let Some((token, len)) = scan_tag(rest) {
                self.pos += len;
                return Some(token);
            }
            self.pos += 1;
            return Some(Token::Text("<"));
        }

        let end = rest.find('<').unwrap_or(rest.len());
        self.pos += end;
        Some(Token::Text(&rest[..end]))
    }
}

/// Scans a tag at the start of `rest`, returning it and its byte length.
fn scan_tag(rest: &str) -> Option<(Token<'static>, usize)> {
    if rest.starts_with("<!--") {
        let len = rest.find("-->").map_or(rest.len(), |end| end + 3);
        return Some((Token::Open(TagName::Other), len));
    }
    if rest.starts_with("<!") || rest.starts_with("<?") {
        let end = rest.find('>')?;
        return Some((Token::Open(TagName::Other), end + 1));
    }

    let end = rest.find('>')?;
    let inner = &rest[1..end];
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(inner) => (true, inner),
        None => (false, inner),
    };
    if !inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let tag = match inner[..name_len].to_ascii_lowercase().as_str() {
        "b" | "strong" => TagName::Bold,
        "i" | "em" => TagName::Italic,
        "u" | "ins" => TagName::Underline,
        "br" => TagName::Break,
        "p" | "div" => TagName::Paragraph,
        _ => TagName::Other,
    };
    let self_closing = inner.trim_end().ends_with('/');

    let token = match (closing, self_closing, tag) {
        (true, _, tag) => Token::Close(tag),
        (false, true, TagName::Break) => Token::Open(TagName::Break),
        (false, true, _) => Token::Open(TagName::Other),
        (false, false, tag) => Token::Open(tag),
    };
    Some((token, end + 1))
}

/// Folds tokens into paragraphs. In strict mode style tags must nest
/// properly, otherwise `None` is returned; in lenient mode they are ignored.
fn accumulate(src: &str, base: Style, strict: bool) -> Option<Vec<MarkupParagraph>> {
    let mut acc = RunAccumulator::new(base);

    for token in Tokenizer::new(src) {
        match token {
            Token::Text(text) => acc.text(text),
            Token::Open(TagName::Break) => acc.line_break(),
            Token::Open(TagName::Paragraph) | Token::Close(TagName::Paragraph) => {
                acc.paragraph_break()
            }
            Token::Open(TagName::Other) | Token::Close(TagName::Other | TagName::Break) => {}
            Token::Open(tag) if strict => acc.open.push(tag),
            Token::Close(tag) if strict => {
                if acc.open.last() != Some(&tag) {
                    return None;
                }
                acc.open.pop();
            }
            Token::Open(_) | Token::Close(_) => {}
        }
    }

    acc.open.is_empty().then(|| acc.finish())
}

struct RunAccumulator {
    base: Style,
    open: Vec<TagName>,
    current: MarkupParagraph,
    paragraphs: Vec<MarkupParagraph>,
}

impl RunAccumulator {
    fn new(base: Style) -> Self {
        Self {
            base,
            open: Vec::new(),
            current: MarkupParagraph::default(),
            paragraphs: Vec::new(),
        }
    }

    fn style(&self) -> Style {
        let has = |tag| self.open.contains(&tag);
        Style {
            bold: self.base.bold || has(TagName::Bold),
            italic: self.base.italic || has(TagName::Italic),
            underline: self.base.underline || has(TagName::Underline),
        }
    }

    fn text(&mut self, raw: &str) {
        let decoded = html_escape::decode_html_entities(raw);
        let style = self.style();
        for (idx, line) in decoded.split('\n').enumerate() {
            if idx > 0 {
                self.line_break();
            }
            let line = line.replace('\r', "").replace('\u{a0}', " ");
            self.push_run(&line, style);
        }
    }

    fn push_run(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Run(last)) = self.current.inlines.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.current.inlines.push(Inline::Run(InlineRun {
            text: text.into(),
            style,
        }));
    }

    fn line_break(&mut self) {
        self.current.inlines.push(Inline::LineBreak);
    }

    fn paragraph_break(&mut self) {
        let paragraph = std::mem::take(&mut self.current);
        if let Some(paragraph) = tidy(paragraph) {
            self.paragraphs.push(paragraph);
        }
    }

    fn finish(mut self) -> Vec<MarkupParagraph> {
        self.paragraph_break();
        self.paragraphs
    }
}

/// Strips leading and trailing breaks; drops paragraphs without visible text.
fn tidy(mut paragraph: MarkupParagraph) -> Option<MarkupParagraph> {
    let visible = paragraph.inlines.iter().any(|inline| match inline {
        Inline::Run(run) => !run.text.trim().is_empty(),
        Inline::LineBreak => false,
    });
    if !visible {
        return None;
    }

    while matches!(paragraph.inlines.last(), Some(Inline::LineBreak)) {
        paragraph.inlines.pop();
    }
    let leading = paragraph
        .inlines
        .iter()
        .take_while(|inline| matches!(inline, Inline::LineBreak))
        .count();
    paragraph.inlines.drain(..leading);
    Some(paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, style: Style) -> Inline {
        Inline::Run(InlineRun {
            text: text.into(),
            style,
        })
    }

    fn single(src: &str) -> Vec<Inline> {
        let mut paragraphs = parse_markup(src, Style::default());
        assert_eq!(paragraphs.len(), 1, "{paragraphs:?}");
        paragraphs.remove(0).inlines
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(single("just text"), [run("just text", Style::default())]);
    }

    #[test]
    fn style_tags_become_runs() {
        assert_eq!(
            single("<b>bold</b> and <em>it</em><u>u</u>"),
            [
                run("bold", Style::BOLD),
                run(" and ", Style::default()),
                run("it", Style::ITALIC),
                run("u", Style::UNDERLINE),
            ]
        );
    }

    #[test]
    fn nested_styles_combine() {
        let both = Style {
            bold: true,
            italic: true,
            underline: false,
        };
        assert_eq!(single("<STRONG><i>x</i></STRONG>"), [run("x", both)]);
    }

    #[test]
    fn paragraphs_and_breaks() {
        let paragraphs = parse_markup("<p>one</p>\n<p>two<br/>three</p>", Style::default());
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].plain_text(), "one");
        assert_eq!(
            paragraphs[1].inlines,
            [
                run("two", Style::default()),
                Inline::LineBreak,
                run("three", Style::default())
            ]
        );
    }

    #[test]
    fn unknown_tags_and_attributes_are_dropped() {
        assert_eq!(
            single(r#"<span style="color:red">x</span><!-- note --><b class="k">y</b>"#),
            [run("x", Style::default()), run("y", Style::BOLD)]
        );
    }

    #[test]
    fn unbalanced_markup_degrades_to_plain_text() {
        assert_eq!(single("<b>open"), [run("open", Style::default())]);
        assert_eq!(single("<b><i>x</b></i>"), [run("x", Style::default())]);
        assert_eq!(single("stray</u> close"), [run("stray close", Style::default())]);
    }

    #[test]
    fn entities_and_literal_brackets() {
        assert_eq!(
            single("a &amp; b&nbsp;c < d"),
            [run("a & b c < d", Style::default())]
        );
    }

    #[test]
    fn base_style_applies_everywhere() {
        let base = Style::UNDERLINE;
        let paragraphs = parse_markup("x<b>y</b>", base);
        assert_eq!(
            paragraphs[0].inlines,
            [
                run("x", base),
                run(
                    "y",
                    Style {
                        bold: true,
                        italic: false,
                        underline: true
                    }
                )
            ]
        );
    }

    #[test]
    fn newlines_are_line_breaks() {
        let paragraphs = parse_markup("first\r\nsecond\n", Style::default());
        assert_eq!(paragraphs[0].lines(), ["first", "second"]);
    }

    #[test]
    fn empty_markup_has_no_paragraphs() {
        assert!(parse_markup("", Style::default()).is_empty());
        assert!(parse_markup("<p> </p><br>", Style::default()).is_empty());
    }
}
