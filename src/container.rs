//! ZIP container abstraction for OOXML documents.
//!
//! Exposes the small capability set the splitter needs: open a container,
//! read entries, and persist a clone of the container with a single entry
//! replaced. Cloning copies every other entry raw (still compressed), so
//! shared parts such as styles, numbering, fonts, themes and media reach the
//! output byte-for-byte.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;

/// OOXML container abstraction over a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docseg::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("document.docx")?;
    /// # Ok::<(), docseg::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML entry from the archive as a string.
    ///
    /// Handles UTF-8 (with or without BOM) and UTF-16 LE/BE encodings.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary entry from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if an entry exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all entries in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Persist a clone of this container to `out_path`, replacing the entry
    /// named `replace` with `content`.
    ///
    /// Every other entry is copied raw (without recompression), so all shared
    /// parts of the source container survive unchanged. Any existing file at
    /// `out_path` is overwritten. The archive is assembled entry by entry and
    /// only reaches disk through this single writer, so a failure never
    /// leaves a partially useful document behind a successful return.
    pub fn save_with_replacement(
        &self,
        replace: &str,
        content: &[u8],
        out_path: impl AsRef<Path>,
    ) -> Result<()> {
        let out_path = out_path.as_ref();
        let map_write_err = |e: std::io::Error| Error::OutputWrite {
            path: out_path.display().to_string(),
            source: e,
        };

        let file = File::create(out_path).map_err(map_write_err)?;
        let mut writer = zip::ZipWriter::new(file);

        let mut archive = self.archive.borrow_mut();
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            if entry.name() == replace {
                continue;
            }
            writer.raw_copy_file(entry)?;
        }

        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        writer.start_file(replace, options)?;
        writer.write_all(content).map_err(map_write_err)?;
        writer.finish()?;
        Ok(())
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
///
/// OOXML parts are typically UTF-8, but non-standard producers emit UTF-16.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::Encoding(e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(fix_declared_encoding);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(fix_declared_encoding);
    }
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        // No BOM and not valid UTF-8: check for the null-byte pattern of
        // UTF-16 ASCII before falling back to lossy UTF-8.
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes).map(fix_declared_encoding)
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes).map(fix_declared_encoding)
        }
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(e.to_string()))
}

/// Rewrite `encoding="UTF-16"` in the XML declaration after the content has
/// already been converted to UTF-8, so quick-xml does not re-interpret it.
fn fix_declared_encoding(content: String) -> String {
    if !content.starts_with("<?xml") {
        return content;
    }
    match content.find("?>") {
        Some(end) => {
            let decl = content[..end + 2]
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            format!("{}{}", decl, &content[end + 2..])
        }
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_read_entries() {
        let data = tiny_zip(&[
            ("word/document.xml", b"<doc/>"),
            ("word/styles.xml", b"<styles/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        assert!(container.exists("word/document.xml"));
        assert!(!container.exists("word/numbering.xml"));
        assert_eq!(container.read_xml("word/document.xml").unwrap(), "<doc/>");
        assert_eq!(container.list_files().len(), 2);
    }

    #[test]
    fn test_missing_entry() {
        let data = tiny_zip(&[("a.xml", b"<a/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(matches!(
            container.read_xml("b.xml"),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_save_with_replacement() {
        let data = tiny_zip(&[
            ("word/document.xml", b"<doc>old</doc>"),
            ("word/styles.xml", b"<styles/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clone.docx");
        container
            .save_with_replacement("word/document.xml", b"<doc>new</doc>", &out)
            .unwrap();

        let clone = OoxmlContainer::open(&out).unwrap();
        assert_eq!(
            clone.read_xml("word/document.xml").unwrap(),
            "<doc>new</doc>"
        );
        // Untouched entries survive the clone verbatim.
        assert_eq!(clone.read_xml("word/styles.xml").unwrap(), "<styles/>");
    }

    #[test]
    fn test_decode_utf16_variants() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        let utf8_plain = b"<?xml>";
        assert_eq!(decode_xml_bytes(utf8_plain).unwrap(), "<?xml>");
    }

    #[test]
    fn test_fix_declared_encoding() {
        let fixed = fix_declared_encoding(
            "<?xml version=\"1.0\" encoding=\"UTF-16\"?><w:document/>".to_string(),
        );
        assert_eq!(
            fixed,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><w:document/>"
        );
    }
}
