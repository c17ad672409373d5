//! Numbering and lookup over the act outline.
//!
//! Item numbers are derived by walking the tree rather than read from any
//! cached copy, so the tree stays the single source of truth.

use std::collections::{BTreeSet, HashMap};

use ecow::EcoString;

use crate::Result;
use crate::model::{Node, NodeKind};

/// Maps the id of every numbered item to its number.
pub fn build_item_number_index(tree: &Node) -> HashMap<EcoString, EcoString> {
    tree.pre_order()
        .filter_map(|node| Some((node.id.clone(), EcoString::from(node.item_number()?))))
        .collect()
}

/// Collects the numbers of all items.
pub fn collect_all_item_numbers(tree: &Node) -> BTreeSet<EcoString> {
    tree.pre_order()
        .filter_map(|node| node.item_number().map(EcoString::from))
        .collect()
}

/// Collects the numbers of items inside the top-level branch `branch`.
///
/// `branch` is given without a trailing separator, e.g. `"5"` selects
/// `5.1`, `5.1.2`, ... but neither `5` itself nor `50.1`.
pub fn collect_branch_item_numbers(tree: &Node, branch: &str) -> BTreeSet<EcoString> {
    let prefix = ecow::eco_format!("{}.", normalize_number(branch));
    collect_all_item_numbers(tree)
        .into_iter()
        .filter(|number| number.starts_with(prefix.as_str()))
        .collect()
}

/// Finds the number of the closest numbered item enclosing `target_id`.
///
/// An item target yields its own number. Returns `None` when the id is not
/// present or no numbered item encloses it.
pub fn find_nearest_ancestor_item_number<'a>(tree: &'a Node, target_id: &str) -> Option<&'a str> {
    fn visit<'a>(
        node: &'a Node,
        target_id: &str,
        acc: Option<&'a str>,
    ) -> Result<(), Option<&'a str>> {
        let acc = node.item_number().or(acc);
        if node.id == target_id {
            return Err(acc);
        }
        node.children
            .iter()
            .try_for_each(|child| visit(child, target_id, acc))
    }

    visit(tree, target_id, None).err().flatten()
}

/// Trims whitespace and trailing separators from a hierarchical number.
pub fn normalize_number(number: &str) -> &str {
    number.trim().trim_end_matches('.').trim_end()
}

/// Finds the first item in pre-order whose number equals `number`.
///
/// Numbers are not guaranteed to be unique; a duplicate resolves to the
/// first match.
pub fn find_item_by_number<'a>(tree: &'a Node, number: &str) -> Option<&'a Node> {
    let number = normalize_number(number);
    if number.is_empty() {
        return None;
    }
    tree.pre_order().find(|node| {
        node.kind == NodeKind::Item && node.number.as_deref().map(normalize_number) == Some(number)
    })
}

/// Options of a subtree extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtreeQuery {
    /// The hierarchical number to look up.
    pub number: EcoString,
    /// Whether descendants are kept.
    pub recursive: bool,
    /// Deepest kept level below the found node; `None` keeps everything.
    pub max_depth: Option<usize>,
}

impl SubtreeQuery {
    /// Selects the node alone.
    pub fn single(number: impl Into<EcoString>) -> Self {
        Self {
            number: number.into(),
            recursive: false,
            max_depth: None,
        }
    }

    /// Selects the node with all descendants.
    pub fn recursive(number: impl Into<EcoString>) -> Self {
        Self {
            number: number.into(),
            recursive: true,
            max_depth: None,
        }
    }

    /// Limits the kept depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Extracts the item numbered `query.number` as a standalone tree.
///
/// The node itself is depth 0. A non-recursive query clears its children; a
/// recursive one keeps descendants down to `max_depth`.
pub fn extract_subtree(tree: &Node, query: &SubtreeQuery) -> Result<Node> {
    let found = find_item_by_number(tree, &query.number)
        .ok_or_else(|| crate::Error::not_found(query.number.clone()))?;

    let max_depth = match (query.recursive, query.max_depth) {
        (false, _) => 0,
        (true, limit) => limit.unwrap_or(usize::MAX),
    };

    Ok(prune(found, max_depth))
}

fn prune(node: &Node, depth_left: usize) -> Node {
    let children = if depth_left == 0 {
        Vec::new()
    } else {
        node.children
            .iter()
            .map(|child| prune(child, depth_left - 1))
            .collect()
    };

    let mut pruned = node.clone_shallow();
    pruned.children = children;
    pruned
}

impl Node {
    fn clone_shallow(&self) -> Node {
        Node {
            id: self.id.clone(),
            kind: self.kind,
            label: self.label.clone(),
            content: self.content.clone(),
            number: self.number.clone(),
            children: Vec::new(),
            table_id: self.table_id.clone(),
            text_block_id: self.text_block_id.clone(),
            violation_id: self.violation_id.clone(),
            protected: self.protected,
            deletable: self.deletable,
        }
    }
}
