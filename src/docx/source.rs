//! The loaded source document a split run reads from.

use crate::container::OoxmlContainer;
use crate::detect;
use crate::docx::{BodyBlock, DocumentBody};
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A source document: the open container plus its parsed body block list.
///
/// Created once per input file and read-only for the duration of a run;
/// every output is cloned from it.
#[derive(Debug)]
pub struct SourceDocument {
    container: OoxmlContainer,
    body: DocumentBody,
}

impl SourceDocument {
    /// Open and parse a DOCX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Build a source document from raw DOCX bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect::verify_zip_magic(&data)?;
        let container = OoxmlContainer::from_bytes(data)?;
        detect::verify_wordprocessing(&container)?;

        let xml = container.read_xml("word/document.xml")?;
        let body = DocumentBody::parse(&xml)?;
        Ok(Self { container, body })
    }

    /// The underlying container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    /// The parsed body.
    pub fn body(&self) -> &DocumentBody {
        &self.body
    }

    /// The ordered body blocks.
    pub fn blocks(&self) -> &[BodyBlock] {
        &self.body.blocks
    }
}
