//! List numbering management for DOCX conversion

use docx_rs::{
    AbstractNumbering, Docx, Level, LevelJc, LevelText, NumberFormat, Numbering, SpecialIndentType,
    Start,
};

/// List numbering management for DOCX
///
/// Numbering ids are handed out while the body is written; the definitions
/// are attached when the document is assembled.
#[derive(Clone, Debug)]
pub struct DocxNumbering {
    next_id: usize,
    pending: Vec<(AbstractNumbering, Numbering)>,
}

impl Default for DocxNumbering {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxNumbering {
    /// Create a new numbering manager
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Create a list level with the specified parameters
    fn create_list_level(id: usize, format: &str, text: &str) -> Level {
        let indent_size = 720 * (id + 1) as i32;

        Level::new(
            id,
            Start::new(1),
            NumberFormat::new(format),
            LevelText::new(text),
            LevelJc::new("left"),
        )
        .indent(
            Some(indent_size),
            Some(SpecialIndentType::Hanging(420)),
            None,
            None,
        )
    }

    /// Creates a decimal list restarting at 1 and returns its numbering id.
    pub fn create_ordered_numbering(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;

        let levels = (0..9).map(|level| {
            let text = format!("%{}.", level + 1);
            let format = if level % 2 == 0 {
                "decimal"
            } else {
                "lowerLetter"
            };
            let mut level_def = Self::create_list_level(level, format, &text);
            if level > 0 {
                level_def = level_def.level_restart(0_u32);
            }
            level_def
        });
        let abstract_numbering = levels.fold(AbstractNumbering::new(id), |acc, level| {
            acc.add_level(level)
        });

        self.pending
            .push((abstract_numbering, Numbering::new(id, id)));
        id
    }

    /// Attaches every created definition to the document.
    pub fn apply(self, docx: Docx) -> Docx {
        self.pending
            .into_iter()
            .fold(docx, |docx, (abstract_numbering, numbering)| {
                docx.add_abstract_numbering(abstract_numbering)
                    .add_numbering(numbering)
            })
    }
}
