//! DOCX body access: block list, text extraction, and the read-only source
//! document a split run operates on.

mod body;
mod source;
pub mod text;

pub use body::{BlockKind, BodyBlock, DocumentBody};
pub use source::SourceDocument;
