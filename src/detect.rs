//! Input validation for Office Open XML containers.
//!
//! The splitter only consumes WordprocessingML documents; other OOXML
//! flavors (XLSX, PPTX) open fine as ZIP archives but must be rejected with
//! a useful message instead of failing deep inside body parsing.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the PPTX presentation part.
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Check that raw bytes look like a ZIP archive.
pub fn verify_zip_magic(data: &[u8]) -> Result<()> {
    if data.len() < ZIP_MAGIC.len() || data[..ZIP_MAGIC.len()] != ZIP_MAGIC {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Check that an open container is a WordprocessingML document.
///
/// Inspects `[Content_Types].xml`; a recognized non-Word OOXML format is
/// reported by name, anything else as an unknown Office package.
pub fn verify_wordprocessing(container: &OoxmlContainer) -> Result<()> {
    let content_types = container
        .read_xml("[Content_Types].xml")
        .map_err(|_| Error::UnknownFormat)?;

    if content_types.contains(DOCX_CONTENT_TYPE) {
        return Ok(());
    }
    if content_types.contains(XLSX_CONTENT_TYPE) {
        return Err(Error::UnsupportedFormat("Excel workbook (.xlsx)".into()));
    }
    if content_types.contains(PPTX_CONTENT_TYPE) {
        return Err(Error::UnsupportedFormat(
            "PowerPoint presentation (.pptx)".into(),
        ));
    }
    Err(Error::UnsupportedFormat(
        "not a WordprocessingML package".into(),
    ))
}

/// Check whether a path looks like a DOCX candidate for batch processing.
///
/// Office lock files (`~$name.docx`) are excluded.
pub fn is_docx_path(path: &Path) -> bool {
    let is_docx_ext = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false);
    let is_lock_file = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with("~$"))
        .unwrap_or(false);
    is_docx_ext && !is_lock_file
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn package_with_content_types(xml: &str) -> OoxmlContainer {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        let data = writer.finish().unwrap().into_inner();
        OoxmlContainer::from_bytes(data).unwrap()
    }

    #[test]
    fn test_zip_magic() {
        assert!(verify_zip_magic(b"PK\x03\x04rest").is_ok());
        assert!(matches!(
            verify_zip_magic(b"%PDF-1.7"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(verify_zip_magic(b"PK"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_wordprocessing_accepted() {
        let container = package_with_content_types(&format!(
            "<Types><Override PartName=\"/word/document.xml\" ContentType=\"{}\"/></Types>",
            DOCX_CONTENT_TYPE
        ));
        assert!(verify_wordprocessing(&container).is_ok());
    }

    #[test]
    fn test_spreadsheet_rejected_by_name() {
        let container = package_with_content_types(&format!(
            "<Types><Override PartName=\"/xl/workbook.xml\" ContentType=\"{}\"/></Types>",
            XLSX_CONTENT_TYPE
        ));
        let err = verify_wordprocessing(&container).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn test_docx_path_filter() {
        assert!(is_docx_path(Path::new("input/algebra/Core Math.docx")));
        assert!(is_docx_path(Path::new("UPPER.DOCX")));
        assert!(!is_docx_path(Path::new("notes.txt")));
        assert!(!is_docx_path(Path::new("input/~$Core Math.docx")));
        assert!(!is_docx_path(Path::new("no_extension")));
    }
}
