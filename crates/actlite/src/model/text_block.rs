use ecow::EcoString;
use serde::{Deserialize, Serialize};

use super::de::{decode_or, lenient, or_default};

/// Paragraph alignment of a text block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified on both sides.
    Justify,
}

/// Base formatting of a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Formatting {
    /// Font size in points.
    #[serde(deserialize_with = "font_size_or_default")]
    pub font_size: u32,
    /// Paragraph alignment.
    #[serde(deserialize_with = "or_default")]
    pub alignment: Alignment,
    /// Base bold.
    #[serde(deserialize_with = "or_default")]
    pub bold: bool,
    /// Base italic.
    #[serde(deserialize_with = "or_default")]
    pub italic: bool,
    /// Base underline.
    #[serde(deserialize_with = "or_default")]
    pub underline: bool,
}

impl Formatting {
    /// Smallest accepted font size.
    pub const MIN_FONT_SIZE: u32 = 8;
    /// Largest accepted font size.
    pub const MAX_FONT_SIZE: u32 = 72;

    /// The font size clamped to the accepted range.
    pub fn font_size(&self) -> u32 {
        self.font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE)
    }
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            font_size: 14,
            alignment: Alignment::Left,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

fn font_size_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(decode_or(value, || Formatting::default().font_size))
}

/// A rich-text block satellite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    /// Inline markup.
    #[serde(default, deserialize_with = "or_default")]
    pub content: EcoString,
    /// Base formatting.
    #[serde(default, deserialize_with = "lenient")]
    pub formatting: Formatting,
}

impl TextBlock {
    /// Creates a text block with default formatting.
    pub fn new(content: impl Into<EcoString>) -> Self {
        Self {
            content: content.into(),
            formatting: Formatting::default(),
        }
    }

    /// Sets the alignment.
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.formatting.alignment = alignment;
        self
    }
}
