//! DOCX output using docx-rs
//!
//! - Writer: renders the walk into a structured [`Docx`]
//! - Styles: heading, caption and table styles
//! - Numbering: list numbering definitions

mod numbering;
mod styles;
mod writer;

use std::io::Cursor;

use docx_rs::Docx;

pub use writer::DocxWriter;

use crate::Result;

/// Serializes a structured document into the bytes of a `.docx` file.
pub fn pack_docx(docx: Docx) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|err| format!("failed to pack DOCX: {err}"))?;
    Ok(buffer)
}
