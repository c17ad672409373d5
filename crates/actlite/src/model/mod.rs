//! The act data model: the outline tree and its satellite entities.
//!
//! Satellite entities (tables, text blocks, violations) are stored in flat
//! id-keyed maps beside the tree; tree nodes only hold the id.

mod de;
mod node;
mod table;
mod text_block;
mod violation;

use std::collections::HashMap;

use ecow::EcoString;
use serde::{Deserialize, Serialize};

pub use node::{Node, NodeKind, SatelliteRef};
pub use table::{Cell, Table};
pub use text_block::{Alignment, Formatting, TextBlock};
pub use violation::{
    AdditionalContent, AdditionalItem, AdditionalKind, DescriptionList, OptionalField, Violation,
};

/// A complete snapshot of one act: the tree plus its satellite maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Act {
    /// The root of the outline, `None` when storage yielded no tree.
    #[serde(default)]
    pub tree: Option<Node>,
    /// Tables keyed by id.
    #[serde(default, deserialize_with = "de::or_default")]
    pub tables: HashMap<EcoString, Table>,
    /// Text blocks keyed by id.
    #[serde(default, deserialize_with = "de::or_default")]
    pub text_blocks: HashMap<EcoString, TextBlock>,
    /// Violations keyed by id.
    #[serde(default, deserialize_with = "de::or_default")]
    pub violations: HashMap<EcoString, Violation>,
}

impl Act {
    /// Creates an act around the given tree with empty satellite maps.
    pub fn new(tree: Node) -> Self {
        Self {
            tree: Some(tree),
            ..Default::default()
        }
    }

    /// Parses an act from its JSON representation.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Registers a table under the given id.
    pub fn with_table(mut self, id: impl Into<EcoString>, table: Table) -> Self {
        self.tables.insert(id.into(), table);
        self
    }

    /// Registers a text block under the given id.
    pub fn with_text_block(mut self, id: impl Into<EcoString>, block: TextBlock) -> Self {
        self.text_blocks.insert(id.into(), block);
        self
    }

    /// Registers a violation under the given id.
    pub fn with_violation(mut self, id: impl Into<EcoString>, violation: Violation) -> Self {
        self.violations.insert(id.into(), violation);
        self
    }
}
