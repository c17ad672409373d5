//! Violation formatter.
//!
//! Decides which parts of a violation are shown and in which order; each
//! target only decides how a [`Section`] looks.

use std::borrow::Cow;

use crate::common::Labels;
use crate::model::{AdditionalItem, AdditionalKind, OptionalField, Violation};

/// A visible part of a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<'a> {
    /// A labeled text field.
    Field {
        /// The fixed label, e.g. `Причины:`.
        label: &'a str,
        /// The field text.
        content: &'a str,
    },
    /// The numbered description entries.
    List(Vec<&'a str>),
    /// An entry of the additional content.
    Attachment(Attachment<'a>),
}

/// An entry of the additional content, dispatched by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment<'a> {
    /// A quoted case.
    Case(&'a str),
    /// An image reference.
    Image {
        /// Caption, possibly empty.
        caption: &'a str,
        /// File name, derived from the url when not stored.
        filename: Cow<'a, str>,
        /// Location.
        url: &'a str,
    },
    /// A plain paragraph.
    FreeText(&'a str),
}

/// Lists the sections of a violation in display order.
///
/// Order: violated, established, description list, additional content,
/// reasons, consequences, responsible, recommendations. Empty or disabled
/// parts are omitted.
pub fn sections<'a>(violation: &'a Violation, labels: &'a Labels) -> Vec<Section<'a>> {
    let mut out = Vec::new();

    let mut field = |label: &'a str, content: Option<&'a str>| {
        if let Some(content) = content {
            out.push(Section::Field { label, content });
        }
    };
    field(&labels.violated, non_blank(&violation.violated));
    field(&labels.established, non_blank(&violation.established));

    let list = &violation.description_list;
    let items: Vec<&str> = list
        .items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if list.enabled && !items.is_empty() {
        out.push(Section::List(items));
    }

    if violation.additional_content.enabled {
        out.extend(
            ordered_attachments(&violation.additional_content.items)
                .into_iter()
                .map(Section::Attachment),
        );
    }

    let optional: [(&'a str, &'a OptionalField); 4] = [
        (&labels.reasons, &violation.reasons),
        (&labels.consequences, &violation.consequences),
        (&labels.responsible, &violation.responsible),
        (&labels.recommendations, &violation.recommendations),
    ];
    for (label, field) in optional {
        if let Some(content) = field.rendered() {
            out.push(Section::Field { label, content });
        }
    }

    out
}

/// Sorts additional content by `order`, keeping list order on ties, and
/// drops entries with nothing to show.
pub fn ordered_attachments(items: &[AdditionalItem]) -> Vec<Attachment<'_>> {
    let mut sorted: Vec<&AdditionalItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.order);
    sorted.into_iter().filter_map(attachment).collect()
}

fn attachment(item: &AdditionalItem) -> Option<Attachment<'_>> {
    match item.kind {
        AdditionalKind::Case => non_blank(&item.content).map(Attachment::Case),
        AdditionalKind::FreeText => non_blank(&item.content).map(Attachment::FreeText),
        AdditionalKind::Image => {
            let url = item.url.trim();
            let filename = match non_blank(&item.filename) {
                Some(name) => Cow::Borrowed(name),
                None => Cow::Borrowed(url.rsplit('/').next().unwrap_or(url)),
            };
            if filename.is_empty() && url.is_empty() {
                return None;
            }
            Some(Attachment::Image {
                caption: item.caption.trim(),
                filename,
                url,
            })
        }
        AdditionalKind::Unknown => None,
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

impl Attachment<'_> {
    /// The image reference text, `Изображение: caption (file)`.
    pub fn image_text(labels: &Labels, caption: &str, filename: &str) -> String {
        match (caption.is_empty(), filename.is_empty()) {
            (false, false) => format!("{}: {caption} ({filename})", labels.image),
            (false, true) => format!("{}: {caption}", labels.image),
            (true, _) => format!("{}: {filename}", labels.image),
        }
    }
}
