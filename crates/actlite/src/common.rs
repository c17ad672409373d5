//! Common types for the rendering system.

use std::path::Path;
use std::str::FromStr;

use ecow::EcoString;

use crate::Error;

/// Valid formats for rendering.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain text.
    Text,
    /// GitHub flavored Markdown.
    #[default]
    Md,
    /// Office Open XML document.
    #[cfg(feature = "docx")]
    Docx,
}

impl Format {
    /// The file extension of the format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Md => "md",
            #[cfg(feature = "docx")]
            Format::Docx => "docx",
        }
    }

    /// Picks the format from the extension of an output path.
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(std::ffi::OsStr::to_str)
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Format::Text),
            "md" | "markdown" => Ok(Format::Md),
            #[cfg(feature = "docx")]
            "docx" => Ok(Format::Docx),
            _ => Err(Error::unknown_format(s)),
        }
    }
}

/// Fixed strings printed by the renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Header of a table.
    pub table: EcoString,
    /// Header of a text block; text blocks get no header when `None`.
    pub text_block: Option<EcoString>,
    /// Header of a violation.
    pub violation: EcoString,
    /// Abbreviation placed before the item number in headers.
    pub item_ref: EcoString,
    /// Label of the violated norm.
    pub violated: EcoString,
    /// Label of the established facts.
    pub established: EcoString,
    /// Label of the reasons.
    pub reasons: EcoString,
    /// Label of the consequences.
    pub consequences: EcoString,
    /// Label of the responsible persons.
    pub responsible: EcoString,
    /// Label of the recommendations.
    pub recommendations: EcoString,
    /// Prefix of an image reference.
    pub image: EcoString,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            table: "Таблица".into(),
            text_block: None,
            violation: "Нарушение".into(),
            item_ref: "п.".into(),
            violated: "Нарушено:".into(),
            established: "Установлено:".into(),
            reasons: "Причины:".into(),
            consequences: "Последствия:".into(),
            responsible: "Ответственные:".into(),
            recommendations: "Рекомендации:".into(),
            image: "Изображение".into(),
        }
    }
}

impl Labels {
    /// Labels in English.
    pub fn english() -> Self {
        Self {
            table: "Table".into(),
            text_block: None,
            violation: "Violation".into(),
            item_ref: "item".into(),
            violated: "Violated:".into(),
            established: "Established:".into(),
            reasons: "Reasons:".into(),
            consequences: "Consequences:".into(),
            responsible: "Responsible:".into(),
            recommendations: "Recommendations:".into(),
            image: "Image".into(),
        }
    }

    /// A satellite header tagged with the enclosing item number.
    pub fn caption(&self, label: &str, number: Option<&str>) -> EcoString {
        match number {
            Some(number) => ecow::eco_format!("{label} ({} {number})", self.item_ref),
            None => label.into(),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActliteFeat {
    /// Column budget of plain text output.
    pub text_width: usize,
    /// Escape Markdown special characters in text.
    pub escape_markdown: bool,
    /// Fixed strings.
    pub labels: Labels,
}

impl Default for ActliteFeat {
    fn default() -> Self {
        Self {
            text_width: 80,
            escape_markdown: true,
            labels: Labels::default(),
        }
    }
}
