use ecow::EcoString;
use serde::{Deserialize, Serialize};

use super::de::{lenient, or_default};

/// A tri-state optional field: disabled, enabled but empty, or filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalField {
    /// Whether the field is switched on.
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    /// The field text.
    #[serde(deserialize_with = "or_default")]
    pub content: EcoString,
}

impl OptionalField {
    /// Creates an enabled field.
    pub fn filled(content: impl Into<EcoString>) -> Self {
        Self {
            enabled: true,
            content: content.into(),
        }
    }

    /// The text to render, if the field is enabled and non-blank.
    pub fn rendered(&self) -> Option<&str> {
        let content = self.content.trim();
        (self.enabled && !content.is_empty()).then_some(content)
    }
}

/// The itemized description of a violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionList {
    /// Whether the list is switched on.
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    /// Entries in display order.
    #[serde(deserialize_with = "or_default")]
    pub items: Vec<EcoString>,
}

/// The kind of an additional content entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdditionalKind {
    /// A quoted case.
    Case,
    /// An image reference.
    Image,
    /// A free text paragraph.
    FreeText,
    /// Anything else; skipped.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One entry of the additional content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalItem {
    /// The entry kind.
    #[serde(rename = "type", deserialize_with = "or_default")]
    pub kind: AdditionalKind,
    /// Text of a case or free text entry.
    #[serde(deserialize_with = "or_default")]
    pub content: EcoString,
    /// Image location.
    #[serde(deserialize_with = "or_default")]
    pub url: EcoString,
    /// Image caption.
    #[serde(deserialize_with = "or_default")]
    pub caption: EcoString,
    /// Image file name.
    #[serde(deserialize_with = "or_default")]
    pub filename: EcoString,
    /// Sort key; ties keep list order.
    #[serde(deserialize_with = "or_default")]
    pub order: i64,
}

impl AdditionalItem {
    /// Creates a case entry.
    pub fn case(content: impl Into<EcoString>, order: i64) -> Self {
        Self {
            kind: AdditionalKind::Case,
            content: content.into(),
            order,
            ..Default::default()
        }
    }

    /// Creates a free text entry.
    pub fn free_text(content: impl Into<EcoString>, order: i64) -> Self {
        Self {
            kind: AdditionalKind::FreeText,
            content: content.into(),
            order,
            ..Default::default()
        }
    }

    /// Creates an image entry.
    pub fn image(
        url: impl Into<EcoString>,
        caption: impl Into<EcoString>,
        filename: impl Into<EcoString>,
        order: i64,
    ) -> Self {
        Self {
            kind: AdditionalKind::Image,
            url: url.into(),
            caption: caption.into(),
            filename: filename.into(),
            order,
            ..Default::default()
        }
    }
}

/// Supplementary material attached to a violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalContent {
    /// Whether the block is switched on.
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    /// Entries, ordered by their `order` key when rendered.
    #[serde(deserialize_with = "or_default")]
    pub items: Vec<AdditionalItem>,
}

/// A violation satellite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// What was violated.
    #[serde(default, deserialize_with = "or_default")]
    pub violated: EcoString,
    /// What was established.
    #[serde(default, deserialize_with = "or_default")]
    pub established: EcoString,
    /// Itemized description.
    #[serde(default, deserialize_with = "lenient")]
    pub description_list: DescriptionList,
    /// Cases, images and free text.
    #[serde(default, deserialize_with = "lenient")]
    pub additional_content: AdditionalContent,
    /// Reasons.
    #[serde(default, deserialize_with = "lenient")]
    pub reasons: OptionalField,
    /// Consequences.
    #[serde(default, deserialize_with = "lenient")]
    pub consequences: OptionalField,
    /// Responsible persons.
    #[serde(default, deserialize_with = "lenient")]
    pub responsible: OptionalField,
    /// Recommendations.
    #[serde(default, deserialize_with = "lenient")]
    pub recommendations: OptionalField,
}
