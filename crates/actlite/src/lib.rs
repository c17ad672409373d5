//! # Actlite
//!
//! Renders inspection acts, an outline tree with tables, rich-text blocks and
//! violation records stored beside it, into plain text, Markdown and DOCX.

pub mod common;
mod error;
pub mod grid;
pub mod markup;
pub mod model;
pub mod tree;
pub mod violation;
pub mod walk;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::*;

pub use crate::common::{ActliteFeat, Format, Labels};
pub use crate::model::Act;
pub use crate::tree::SubtreeQuery;
#[cfg(feature = "docx")]
pub use crate::writer::pack_docx;
pub use crate::writer::Output;

use crate::walk::{WalkMode, walk};
use crate::writer::create_writer;

/// The result type for actlite.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;

/// Renderer of one act.
#[derive(Clone)]
pub struct Actlite<'a> {
    act: &'a Act,
    feat: ActliteFeat,
    format: Format,
}

impl<'a> Actlite<'a> {
    /// Creates a renderer of `act` with default options and Markdown output.
    pub fn new(act: &'a Act) -> Self {
        Self {
            act,
            feat: ActliteFeat::default(),
            format: Format::default(),
        }
    }

    /// Sets the rendering options.
    pub fn with_feature(mut self, feat: ActliteFeat) -> Self {
        self.feat = feat;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Renders the whole act. The root is a container and is not rendered.
    pub fn render_full(&self) -> Result<Output> {
        let tree = self.act.tree.as_ref().ok_or_else(Error::missing_tree)?;
        self.render(tree, WalkMode::Document)
    }

    /// Renders the item selected by `query` together with the satellites of
    /// the kept nodes.
    pub fn render_subtree(&self, query: &SubtreeQuery) -> Result<Output> {
        let tree = self.act.tree.as_ref().ok_or_else(Error::missing_tree)?;
        let subtree = tree::extract_subtree(tree, query)?;
        self.render(&subtree, WalkMode::Fragment)
    }

    fn render(&self, root: &model::Node, mode: WalkMode) -> Result<Output> {
        log::debug!("rendering {} as {:?}", root.id, self.format);
        let mut writer = create_writer(self.format, &self.feat);
        walk(self.act, root, mode, &mut *writer)?;
        writer.finish()
    }
}

/// Renders a whole act with default options.
pub fn render_full(act: &Act, format: Format) -> Result<Output> {
    Actlite::new(act).with_format(format).render_full()
}

/// Renders the item numbered `number` with default options.
///
/// Without `recursive` only the item itself is rendered; otherwise its
/// descendants are kept down to `max_depth` levels.
pub fn render_subtree(
    act: &Act,
    format: Format,
    number: &str,
    recursive: bool,
    max_depth: Option<usize>,
) -> Result<Output> {
    let query = SubtreeQuery {
        number: number.into(),
        recursive,
        max_depth,
    };
    Actlite::new(act).with_format(format).render_subtree(&query)
}
