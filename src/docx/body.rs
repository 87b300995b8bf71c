//! Body block extraction from `word/document.xml`.
//!
//! The body is flattened into an ordered list of top-level block elements
//! (`w:p` and `w:tbl`), each carried as its raw XML slice. Slices are
//! byte-exact copies of the source, which is what lets outputs clone blocks
//! without re-serializing them. The trailing `w:sectPr` (page layout) and
//! the document XML around the body are kept so a new body can be spliced
//! back in.

use crate::docx::text;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Kind of a top-level body block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A `w:p` paragraph; the only kind the scanner examines
    Paragraph,
    /// A `w:tbl` table; opaque content, copied but never scanned
    Table,
}

/// One top-level block element of the document body.
#[derive(Debug, Clone)]
pub struct BodyBlock {
    /// Block kind
    pub kind: BlockKind,
    /// Raw XML of the whole element, byte-exact from the source
    pub xml: String,
    /// Extracted plain text (empty for tables)
    pub text: String,
}

impl BodyBlock {
    /// Whether this is a paragraph block.
    pub fn is_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph
    }
}

/// Parsed `word/document.xml`: ordered blocks plus the XML needed to
/// reassemble a document around a new body.
#[derive(Debug, Clone)]
pub struct DocumentBody {
    /// Document XML before the body content (through `<w:body>`)
    prefix: String,
    /// Document XML from `</w:body>` onward
    suffix: String,
    /// Ordered top-level body blocks
    pub blocks: Vec<BodyBlock>,
    /// Raw XML of the trailing body-level `w:sectPr`, if present
    pub sect_pr: Option<String>,
}

/// What is currently being captured during the body walk.
#[derive(Debug, Clone, Copy)]
enum Capture {
    Block(BlockKind),
    SectPr,
}

impl DocumentBody {
    /// Parse the main document part into its body blocks.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut blocks = Vec::new();
        let mut sect_pr: Option<String> = None;
        let mut in_body = false;
        let mut body_start: Option<usize> = None;
        let mut body_end: Option<usize> = None;
        // Active capture: target, start offset, element depth within it.
        let mut capture: Option<(Capture, usize, u32)> = None;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .map_err(|e| Error::XmlParse(e.to_string()))?;
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"w:body" if capture.is_none() && body_start.is_none() => {
                        in_body = true;
                        body_start = Some(end);
                    }
                    b"w:p" if in_body && capture.is_none() => {
                        capture = Some((Capture::Block(BlockKind::Paragraph), start, 1));
                    }
                    b"w:tbl" if in_body && capture.is_none() => {
                        capture = Some((Capture::Block(BlockKind::Table), start, 1));
                    }
                    b"w:sectPr" if in_body && capture.is_none() => {
                        capture = Some((Capture::SectPr, start, 1));
                    }
                    _ => {
                        if let Some(c) = capture.as_mut() {
                            c.2 += 1;
                        }
                    }
                },
                Event::End(ref e) => {
                    if let Some(c) = capture.as_mut() {
                        c.2 -= 1;
                        if c.2 == 0 {
                            let slice = &xml[c.1..end];
                            match c.0 {
                                Capture::Block(kind) => blocks.push(make_block(kind, slice)),
                                Capture::SectPr => sect_pr = Some(slice.to_string()),
                            }
                            capture = None;
                        }
                    } else if e.name().as_ref() == b"w:body" && in_body {
                        in_body = false;
                        body_end = Some(start);
                    }
                }
                Event::Empty(ref e) if in_body && capture.is_none() => {
                    match e.name().as_ref() {
                        b"w:p" => blocks.push(make_block(BlockKind::Paragraph, &xml[start..end])),
                        b"w:tbl" => blocks.push(make_block(BlockKind::Table, &xml[start..end])),
                        b"w:sectPr" => sect_pr = Some(xml[start..end].to_string()),
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let (body_start, body_end) = match (body_start, body_end) {
            (Some(s), Some(e)) => (s, e),
            _ => return Err(Error::MissingComponent("w:body".to_string())),
        };

        Ok(Self {
            prefix: xml[..body_start].to_string(),
            suffix: xml[body_end..].to_string(),
            blocks,
            sect_pr,
        })
    }

    /// Number of body blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the body has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Assemble a new main document part from the given block XML slices.
    ///
    /// The body holds exactly the supplied content followed by the trailing
    /// layout-properties element; everything outside the body is carried
    /// over from the source.
    pub fn compose<'a>(&self, content: impl IntoIterator<Item = &'a str>) -> String {
        let mut out = String::with_capacity(self.prefix.len() + self.suffix.len() + 1024);
        out.push_str(&self.prefix);
        for block in content {
            out.push_str(block);
        }
        if let Some(ref sect_pr) = self.sect_pr {
            out.push_str(sect_pr);
        }
        out.push_str(&self.suffix);
        out
    }
}

fn make_block(kind: BlockKind, slice: &str) -> BodyBlock {
    let text = match kind {
        BlockKind::Paragraph => text::paragraph_text(slice),
        BlockKind::Table => String::new(),
    };
    BodyBlock {
        kind,
        xml: slice.to_string(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        )
    }

    #[test]
    fn test_parse_blocks_in_order() {
        let xml = document(
            "<w:p><w:r><w:t>first</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>last</w:t></w:r></w:p>\
             <w:sectPr><w:pgSz w:w=\"12240\"/></w:sectPr>",
        );
        let body = DocumentBody::parse(&xml).unwrap();

        assert_eq!(body.len(), 3);
        assert_eq!(body.blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(body.blocks[0].text, "first");
        // Table paragraphs stay inside the table block.
        assert_eq!(body.blocks[1].kind, BlockKind::Table);
        assert_eq!(body.blocks[1].text, "");
        assert_eq!(body.blocks[2].text, "last");
        assert!(body.sect_pr.as_deref().unwrap().contains("w:pgSz"));
    }

    #[test]
    fn test_block_slices_are_byte_exact() {
        let para = "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr>\
                    <w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">Unit I: Algebra</w:t></w:r></w:p>";
        let xml = document(para);
        let body = DocumentBody::parse(&xml).unwrap();
        assert_eq!(body.blocks[0].xml, para);
    }

    #[test]
    fn test_self_closing_paragraph() {
        let xml = document("<w:p/><w:p><w:r><w:t>x</w:t></w:r></w:p>");
        let body = DocumentBody::parse(&xml).unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body.blocks[0].xml, "<w:p/>");
        assert_eq!(body.blocks[0].text, "");
    }

    #[test]
    fn test_compose_round_trip() {
        let xml = document(
            "<w:p><w:r><w:t>a</w:t></w:r></w:p>\
             <w:p><w:r><w:t>b</w:t></w:r></w:p>\
             <w:sectPr/>",
        );
        let body = DocumentBody::parse(&xml).unwrap();

        let rebuilt = body.compose(body.blocks.iter().map(|b| b.xml.as_str()));
        assert_eq!(rebuilt, xml);

        let only_first = body.compose([body.blocks[0].xml.as_str()]);
        assert!(only_first.contains(">a<"));
        assert!(!only_first.contains(">b<"));
        assert!(only_first.contains("<w:sectPr/>"));
    }

    #[test]
    fn test_missing_body() {
        let err = DocumentBody::parse("<w:document/>").unwrap_err();
        assert!(matches!(err, Error::MissingComponent(_)));
    }
}
