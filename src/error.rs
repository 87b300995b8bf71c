//! Error types for the docseg library.

use std::io;
use thiserror::Error;

/// Result type alias for docseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while splitting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a ZIP-based document.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file is a ZIP container but not a Word document.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading or writing a ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A configured marker pattern failed to compile.
    #[error("Invalid marker pattern: {0}")]
    InvalidPattern(String),

    /// Failed to write an output document.
    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        /// Output path that could not be written
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}
