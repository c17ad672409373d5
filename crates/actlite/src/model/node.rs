use ecow::EcoString;
use serde::{Deserialize, Serialize};

use super::de::{flag_or_true, or_default};

/// The type of a tree node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// An outline item with a label, content and hierarchical number.
    Item,
    /// A reference to a table.
    Table,
    /// A reference to a rich-text block.
    #[serde(rename = "textblock")]
    TextBlock,
    /// A reference to a violation record.
    Violation,
    /// Anything else; skipped by renderers while its children are still walked.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A node of the act outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable unique id.
    #[serde(default, deserialize_with = "or_default")]
    pub id: EcoString,
    /// The node type.
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub kind: NodeKind,
    /// Display text of an item.
    #[serde(default, deserialize_with = "or_default")]
    pub label: EcoString,
    /// Free text of an item.
    #[serde(default, deserialize_with = "or_default")]
    pub content: EcoString,
    /// Dotted hierarchical number of an item, e.g. `5.1.2`.
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<EcoString>,
    /// Children in display order.
    #[serde(default, deserialize_with = "or_default")]
    pub children: Vec<Node>,
    /// Table reference, set on table nodes.
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub table_id: Option<EcoString>,
    /// Text block reference, set on text block nodes.
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_block_id: Option<EcoString>,
    /// Violation reference, set on violation nodes.
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub violation_id: Option<EcoString>,
    /// Mutation policy; not used for rendering.
    #[serde(default, deserialize_with = "or_default")]
    pub protected: bool,
    /// Mutation policy; not used for rendering.
    #[serde(default = "default_deletable", deserialize_with = "flag_or_true")]
    pub deletable: bool,
}

fn default_deletable() -> bool {
    true
}

impl Default for Node {
    fn default() -> Self {
        Self {
            id: EcoString::new(),
            kind: NodeKind::default(),
            label: EcoString::new(),
            content: EcoString::new(),
            number: None,
            children: Vec::new(),
            table_id: None,
            text_block_id: None,
            violation_id: None,
            protected: false,
            deletable: default_deletable(),
        }
    }
}

/// The satellite entity a node points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteRef<'a> {
    /// A table id.
    Table(&'a str),
    /// A text block id.
    TextBlock(&'a str),
    /// A violation id.
    Violation(&'a str),
}

impl Node {
    /// Creates an item node.
    pub fn item(
        id: impl Into<EcoString>,
        number: impl Into<EcoString>,
        label: impl Into<EcoString>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Item,
            label: label.into(),
            number: Some(number.into()),
            ..Default::default()
        }
    }

    /// Creates an unnumbered root item.
    pub fn root(id: impl Into<EcoString>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Item,
            protected: true,
            deletable: false,
            ..Default::default()
        }
    }

    /// Creates a table node referencing `table_id`.
    pub fn table(id: impl Into<EcoString>, table_id: impl Into<EcoString>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Table,
            table_id: Some(table_id.into()),
            ..Default::default()
        }
    }

    /// Creates a text block node referencing `text_block_id`.
    pub fn text_block(id: impl Into<EcoString>, text_block_id: impl Into<EcoString>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::TextBlock,
            text_block_id: Some(text_block_id.into()),
            ..Default::default()
        }
    }

    /// Creates a violation node referencing `violation_id`.
    pub fn violation(id: impl Into<EcoString>, violation_id: impl Into<EcoString>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Violation,
            violation_id: Some(violation_id.into()),
            ..Default::default()
        }
    }

    /// Sets the item content.
    pub fn with_content(mut self, content: impl Into<EcoString>) -> Self {
        self.content = content.into();
        self
    }

    /// Appends children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Whether this is an item carrying a number.
    pub fn is_numbered_item(&self) -> bool {
        self.kind == NodeKind::Item && self.number.is_some()
    }

    /// The item number, only for item nodes.
    pub fn item_number(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Item => self.number.as_deref(),
            _ => None,
        }
    }

    /// The heading text of an item: number and label.
    pub fn heading_text(&self) -> EcoString {
        match self.item_number().map(str::trim).filter(|n| !n.is_empty()) {
            Some(number) if self.label.is_empty() => number.into(),
            Some(number) => ecow::eco_format!("{number} {}", self.label),
            None => self.label.clone(),
        }
    }

    /// The satellite reference matching the node type.
    ///
    /// Returns `None` when the node type does not carry a reference or the
    /// matching reference field is empty; references stored in a field that
    /// does not match the type are ignored.
    pub fn satellite_ref(&self) -> Option<SatelliteRef<'_>> {
        fn pick(field: &Option<EcoString>) -> Option<&str> {
            field
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
        }

        match self.kind {
            NodeKind::Table => pick(&self.table_id).map(SatelliteRef::Table),
            NodeKind::TextBlock => pick(&self.text_block_id).map(SatelliteRef::TextBlock),
            NodeKind::Violation => pick(&self.violation_id).map(SatelliteRef::Violation),
            NodeKind::Item | NodeKind::Unknown => None,
        }
    }

    /// Iterates the subtree rooted at this node in pre-order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Pre-order iterator over a subtree.
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_storage_shape() {
        let node: Node = serde_json::from_str(
            r#"{
                "id": "root",
                "type": "item",
                "children": [
                    { "id": "a", "type": "item", "number": "5", "label": "Findings" },
                    { "id": "t", "type": "table", "tableId": "T1" },
                    { "id": "x", "type": "chart" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(node.kind, NodeKind::Item);
        assert_eq!(node.number, None);
        assert_eq!(node.children[0].heading_text(), "5 Findings");
        assert_eq!(node.children[1].satellite_ref(), Some(SatelliteRef::Table("T1")));
        assert_eq!(node.children[2].kind, NodeKind::Unknown);
    }

    #[test]
    fn default_matches_missing_fields() {
        let node: Node = serde_json::from_str("{}").unwrap();
        assert_eq!(node, Node::default());
        assert!(node.deletable);

        let node: Node =
            serde_json::from_str(r#"{ "type": null, "content": null, "deletable": null }"#).unwrap();
        assert_eq!(node, Node::default());
    }

    #[test]
    fn mismatched_reference_is_ignored() {
        let mut node = Node::table("t", "T1");
        node.kind = NodeKind::Violation;
        assert_eq!(node.satellite_ref(), None);
    }

    #[test]
    fn pre_order_visits_parents_first() {
        let tree = Node::root("r").with_children([
            Node::item("a", "1", "A").with_children([Node::item("b", "1.1", "B")]),
            Node::item("c", "2", "C"),
        ]);
        let ids: Vec<_> = tree.pre_order().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["r", "a", "b", "c"]);
    }
}
