//! # docseg
//!
//! Split structured DOCX documents into per-section files.
//!
//! docseg scans a document's body for textual structure markers
//! (Unit / Chapter / Section headings), groups the blocks between markers
//! into section ranges, and writes one standalone DOCX per section. Outputs
//! preserve all formatting: each one is a clone of the source container with
//! only the body replaced, so styles, numbering, fonts, themes and media
//! carry over byte-for-byte.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docseg::{split_file, SplitOptions};
//!
//! let report = split_file("textbook.docx", "out", &SplitOptions::default())?;
//! for output in &report.created {
//!     println!("created {}", output.file_name);
//! }
//! for warning in &report.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! # Ok::<(), docseg::Error>(())
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use docseg::{split_file, Discipline, SplitOptions, Strictness};
//!
//! // Flat section-chunk grouping with strict marker validation.
//! let options = SplitOptions::new()
//!     .with_discipline(Discipline::FlatChunk)
//!     .with_strictness(Strictness::Strict);
//!
//! let report = split_file("course.docx", "out", &options)?;
//! # Ok::<(), docseg::Error>(())
//! ```

pub mod config;
pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod grammar;
pub mod grouper;
pub mod materialize;
pub mod model;
pub mod resolver;
pub mod scanner;
pub mod split;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use config::{Discipline, SplitOptions, Strictness};
pub use container::OoxmlContainer;
pub use docx::SourceDocument;
pub use error::{Error, Result};
pub use grammar::MarkerGrammar;
pub use model::{Group, Marker, MarkerKind, SectionLetter};
pub use split::{scan_file, split_file, split_source, CreatedOutput, SplitReport};
