//! Writer implementations for different output formats

#[cfg(feature = "docx")]
pub mod docx;
pub mod markdown;
pub mod text;

#[cfg(feature = "docx")]
pub use self::docx::{DocxWriter, pack_docx};
pub use markdown::MarkdownWriter;
pub use text::TextWriter;

use ecow::EcoString;

use crate::Result;
use crate::common::{ActliteFeat, Format};
use crate::markup::Style;
use crate::model::Formatting;
use crate::walk::ActSink;

/// A sink that turns a walk into one finished document.
pub trait FormatWriter: ActSink {
    /// Consumes the writer and returns the document.
    fn finish(self: Box<Self>) -> Result<Output>;
}

/// A rendered document.
pub enum Output {
    /// Plain text.
    Text(EcoString),
    /// Markdown source.
    Markdown(EcoString),
    /// A structured word-processing document, not yet serialized.
    #[cfg(feature = "docx")]
    Docx(Box<::docx_rs::Docx>),
}

impl Output {
    /// The textual output, if the format is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Output::Text(text) | Output::Markdown(text) => Some(text),
            #[cfg(feature = "docx")]
            Output::Docx(_) => None,
        }
    }

    /// Serializes the output to the bytes of a file.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Output::Text(text) | Output::Markdown(text) => Ok(text.as_bytes().to_vec()),
            #[cfg(feature = "docx")]
            Output::Docx(docx) => pack_docx(*docx),
        }
    }
}

/// Create a writer instance based on the specified format
pub fn create_writer(format: Format, feat: &ActliteFeat) -> Box<dyn FormatWriter> {
    match format {
        Format::Text => Box::new(TextWriter::new(feat.clone())),
        Format::Md => Box::new(MarkdownWriter::new(feat.clone())),
        #[cfg(feature = "docx")]
        Format::Docx => Box::new(DocxWriter::new(feat.clone())),
    }
}

/// The base run style of a text block.
pub(crate) fn base_style(formatting: &Formatting) -> Style {
    Style {
        bold: formatting.bold,
        italic: formatting.italic,
        underline: formatting.underline,
    }
}
