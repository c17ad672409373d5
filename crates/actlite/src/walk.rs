//! The traversal shared by every output format.
//!
//! [`walk`] visits the outline depth first in pre-order, resolves satellite
//! references against the act maps and hands each node to an [`ActSink`]
//! together with its [`Scope`]. Numbering and reference resolution live
//! here once; a sink only decides how a node looks.

use crate::Result;
use crate::model::{Act, Node, NodeKind, SatelliteRef, Table, TextBlock, Violation};

/// Position of a node in the rendered outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope<'a> {
    /// Heading level, starting at 1 for the first rendered items.
    pub level: usize,
    /// Number of the nearest enclosing item, including the node itself.
    pub number: Option<&'a str>,
}

/// How the root of a walk is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// The root is a container: it is never rendered and its children start
    /// at level 1.
    Document,
    /// The root is an extracted node and is rendered at level 1.
    Fragment,
}

/// Receives the nodes of a walk in document order.
pub trait ActSink {
    /// An outline item.
    fn on_item(&mut self, scope: &Scope, node: &Node) -> Result<()>;
    /// A table node with its resolved table.
    fn on_table(&mut self, scope: &Scope, node: &Node, table: &Table) -> Result<()>;
    /// A text block node with its resolved block.
    fn on_text_block(&mut self, scope: &Scope, node: &Node, block: &TextBlock) -> Result<()>;
    /// A violation node with its resolved record.
    fn on_violation(&mut self, scope: &Scope, node: &Node, violation: &Violation) -> Result<()>;
}

/// Walks `root` and feeds `sink`.
///
/// Nodes whose reference is missing or does not resolve emit nothing.
/// Nodes of unknown type emit nothing, but their children are still visited.
pub fn walk<S: ActSink + ?Sized>(act: &Act, root: &Node, mode: WalkMode, sink: &mut S) -> Result<()> {
    let mut walker = Walker { act, sink };
    match mode {
        WalkMode::Document => {
            let number = root.item_number();
            walker.children(root, 1, number)
        }
        WalkMode::Fragment => walker.node(root, 1, None),
    }
}

struct Walker<'a, S: ?Sized> {
    act: &'a Act,
    sink: &'a mut S,
}

impl<S: ActSink + ?Sized> Walker<'_, S> {
    fn node<'n>(&mut self, node: &'n Node, level: usize, inherited: Option<&'n str>) -> Result<()> {
        let number = node.item_number().or(inherited);
        let scope = Scope { level, number };

        match node.kind {
            NodeKind::Item => {
                self.sink.on_item(&scope, node)?;
                return self.children(node, level + 1, number);
            }
            NodeKind::Unknown => {
                log::debug!("skipping node {} of unknown type", node.id);
                return self.children(node, level, number);
            }
            NodeKind::Table | NodeKind::TextBlock | NodeKind::Violation => {}
        }

        match node.satellite_ref() {
            Some(SatelliteRef::Table(id)) => match self.act.tables.get(id) {
                Some(table) => self.sink.on_table(&scope, node, table)?,
                None => log::debug!("node {} references missing table {id}", node.id),
            },
            Some(SatelliteRef::TextBlock(id)) => match self.act.text_blocks.get(id) {
                Some(block) => self.sink.on_text_block(&scope, node, block)?,
                None => log::debug!("node {} references missing text block {id}", node.id),
            },
            Some(SatelliteRef::Violation(id)) => match self.act.violations.get(id) {
                Some(violation) => self.sink.on_violation(&scope, node, violation)?,
                None => log::debug!("node {} references missing violation {id}", node.id),
            },
            None => log::debug!("node {} has no usable reference", node.id),
        }

        // Satellite nodes do not open a new heading level.
        self.children(node, level, number)
    }

    fn children<'n>(&mut self, node: &'n Node, level: usize, number: Option<&'n str>) -> Result<()> {
        node.children
            .iter()
            .try_for_each(|child| self.node(child, level, number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Trace {
        fn push(&mut self, kind: &str, scope: &Scope, node: &Node) -> Result<()> {
            self.0.push(format!(
                "{kind} {} level={} number={}",
                node.id,
                scope.level,
                scope.number.unwrap_or("-")
            ));
            Ok(())
        }
    }

    impl ActSink for Trace {
        fn on_item(&mut self, scope: &Scope, node: &Node) -> Result<()> {
            self.push("item", scope, node)
        }

        fn on_table(&mut self, scope: &Scope, node: &Node, _: &Table) -> Result<()> {
            self.push("table", scope, node)
        }

        fn on_text_block(&mut self, scope: &Scope, node: &Node, _: &TextBlock) -> Result<()> {
            self.push("text", scope, node)
        }

        fn on_violation(&mut self, scope: &Scope, node: &Node, _: &Violation) -> Result<()> {
            self.push("violation", scope, node)
        }
    }

    fn act() -> Act {
        let tree = Node::root("root").with_children([
            Node::item("i5", "5", "Findings").with_children([
                Node::item("i51", "5.1", "Access").with_children([
                    Node::table("t1", "T1"),
                    Node::table("t2", "T2"),
                ]),
                Node {
                    id: "wrap".into(),
                    ..Default::default()
                }
                .with_children([Node::violation("v1", "V1")]),
            ]),
            Node::text_block("tb", "TB1"),
        ]);
        Act::new(tree)
            .with_table("T1", Table::from_rows([["A"]]))
            .with_text_block("TB1", TextBlock::new("x"))
            .with_violation("V1", Violation::default())
    }

    #[test]
    fn document_walk_carries_numbers() {
        let act = act();
        let mut trace = Trace::default();
        walk(&act, act.tree.as_ref().unwrap(), WalkMode::Document, &mut trace).unwrap();
        assert_eq!(
            trace.0,
            [
                "item i5 level=1 number=5",
                "item i51 level=2 number=5.1",
                "table t1 level=3 number=5.1",
                "violation v1 level=2 number=5",
                "text tb level=1 number=-",
            ]
        );
    }

    #[test]
    fn fragment_walk_renders_root() {
        let act = act();
        let root = &act.tree.as_ref().unwrap().children[0].children[0];
        let mut trace = Trace::default();
        walk(&act, root, WalkMode::Fragment, &mut trace).unwrap();
        assert_eq!(
            trace.0,
            [
                "item i51 level=1 number=5.1",
                "table t1 level=2 number=5.1",
            ]
        );
    }
}
