//! Document style management for DOCX conversion

use docx_rs::{AlignmentType, Docx, Style, StyleType};

/// Deepest native heading style.
pub const MAX_HEADING_LEVEL: usize = 9;

/// Document style management
#[derive(Clone, Debug, Default)]
pub struct DocxStyles {}

impl DocxStyles {
    /// Create a new style manager
    pub fn new() -> Self {
        Self {}
    }

    /// The style id of a heading at `level`, clamped to the native range.
    pub fn heading(level: usize) -> String {
        format!("Heading{}", level.clamp(1, MAX_HEADING_LEVEL))
    }

    /// Create a heading style with the specified parameters
    fn create_heading_style(level: usize, size: usize) -> Style {
        Style::new(Self::heading(level), StyleType::Paragraph)
            .name(format!("Heading {level}"))
            .size(size)
            .bold()
    }

    /// Registers all document styles
    pub fn initialize_styles(&self, docx: Docx) -> Docx {
        // Sizes are in half-points.
        let heading_sizes = [32, 28, 26, 24, 22, 20, 20, 20, 20];
        let docx = heading_sizes
            .iter()
            .enumerate()
            .fold(docx, |docx, (index, &size)| {
                docx.add_style(Self::create_heading_style(index + 1, size))
            });

        let caption = Style::new("Caption", StyleType::Paragraph)
            .name("Caption")
            .bold()
            .size(22);

        let table_header = Style::new("TableHeader", StyleType::Paragraph)
            .name("Table Header")
            .bold()
            .align(AlignmentType::Center);

        let case = Style::new("Case", StyleType::Paragraph)
            .name("Case")
            .italic();

        docx.add_style(caption)
            .add_style(table_header)
            .add_style(case)
    }
}
