//! Document materializer: turns a resolved group into a standalone DOCX.
//!
//! Each output is a clone of the source container whose body holds only the
//! group's heading blocks and content range, inserted before the preserved
//! layout-properties element. Shared parts (styles, numbering, fonts,
//! themes, media) reach the output through the container's raw entry copy.

use crate::config::Discipline;
use crate::docx::SourceDocument;
use crate::error::Result;
use crate::model::Group;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// How far to look backwards from a section marker for its chapter heading.
const CHAPTER_LOOKBACK: usize = 10;

/// Materializes groups of one source document.
pub struct Materializer<'a> {
    source: &'a SourceDocument,
}

impl<'a> Materializer<'a> {
    /// Create a materializer over a source document.
    pub fn new(source: &'a SourceDocument) -> Self {
        Self { source }
    }

    /// Build the group's output and persist it at `out_path`, overwriting
    /// any existing file.
    pub fn write(&self, group: &Group, discipline: Discipline, out_path: &Path) -> Result<()> {
        let xml = self.build_document_xml(group, discipline);
        self.source
            .container()
            .save_with_replacement("word/document.xml", xml.as_bytes(), out_path)
    }

    /// Assemble the output's main document part.
    pub fn build_document_xml(&self, group: &Group, discipline: Discipline) -> String {
        let blocks = self.source.blocks();

        let headings = match discipline {
            Discipline::Hierarchical => {
                vec![self.unit_heading(group), self.chapter_section_heading(group)]
            }
            // Flat mode copies the raw range verbatim, marker block included.
            Discipline::FlatChunk => Vec::new(),
        };

        let mut parts: Vec<&str> = headings.iter().map(String::as_str).collect();
        parts.extend(group.content.clone().map(|i| blocks[i].xml.as_str()));
        self.source.body().compose(parts)
    }

    /// Heading for the group's unit: the source unit block cloned by exact
    /// text match, or a synthesized bold paragraph as fallback.
    fn unit_heading(&self, group: &Group) -> String {
        self.source
            .blocks()
            .iter()
            .find(|b| b.is_paragraph() && b.text == group.unit_label)
            .map(|b| b.xml.clone())
            .unwrap_or_else(|| bold_paragraph(&[group.unit_label.as_str()]))
    }

    /// Combined chapter + section heading.
    ///
    /// Inline markers already share one block with their chapter, which is
    /// cloned as-is. Otherwise the original chapter block contributes its
    /// paragraph properties and first-run formatting, and the runs are
    /// rebuilt as chapter title, line break, section title.
    fn chapter_section_heading(&self, group: &Group) -> String {
        let blocks = self.source.blocks();
        let chapter_label = group.chapter_label.as_deref().unwrap_or("");
        let title = self
            .section_title(group)
            .unwrap_or_else(|| format!("{}.", group.letter));

        let chapter_block = if group.inline {
            Some(group.marker_block)
        } else {
            self.find_chapter_block(group.marker_block)
        };

        match chapter_block {
            Some(idx) if group.inline => blocks[idx].xml.clone(),
            Some(idx) => {
                let chapter_xml = &blocks[idx].xml;
                let rpr = first_run_properties(chapter_xml).unwrap_or_default();
                format!(
                    "{open}{ppr}{chapter}{br}{section}</w:p>",
                    open = open_tag(chapter_xml),
                    ppr = child_element(chapter_xml, "w:pPr").unwrap_or_default(),
                    chapter = text_run(chapter_label, &rpr),
                    br = break_run(&rpr),
                    section = text_run(&title, &rpr),
                )
            }
            None => bold_paragraph(&[chapter_label, &title]),
        }
    }

    /// The section's own title text, from the marker block.
    fn section_title(&self, group: &Group) -> Option<String> {
        let text = &self.source.blocks()[group.marker_block].text;
        let title = if group.inline {
            text.split_once('\n').map(|(_, rest)| rest.trim().to_string())?
        } else {
            text.strip_prefix(group.letter.as_char())?
                .strip_prefix('.')?
                .trim()
                .to_string()
        };
        (!title.is_empty()).then_some(title)
    }

    /// Find the chapter heading block for a section marker by scanning a
    /// bounded distance backwards.
    fn find_chapter_block(&self, marker_block: usize) -> Option<usize> {
        let blocks = self.source.blocks();
        let lower = marker_block.saturating_sub(CHAPTER_LOOKBACK);
        (lower..marker_block)
            .rev()
            .find(|&i| blocks[i].text.starts_with("Chapter"))
    }
}

/// The opening tag of an element, attributes included.
fn open_tag(xml: &str) -> String {
    match xml.find('>') {
        Some(end) if xml[..=end].ends_with("/>") => format!("{}>", &xml[..end - 1]),
        Some(end) => xml[..=end].to_string(),
        None => String::new(),
    }
}

/// Raw slice of the first direct child element with the given name.
fn child_element(xml: &str, name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0u32;
    let mut capture: Option<(usize, u32)> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().ok()?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) => {
                depth += 1;
                if capture.is_none() && depth == 2 && e.name().as_ref() == name.as_bytes() {
                    capture = Some((start, depth));
                }
            }
            Event::End(_) => {
                if let Some((s, d)) = capture {
                    if depth == d {
                        return Some(xml[s..end].to_string());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Empty(ref e) => {
                if depth == 1 && e.name().as_ref() == name.as_bytes() {
                    return Some(xml[start..end].to_string());
                }
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

/// Run properties of a paragraph's first direct run, if any.
fn first_run_properties(paragraph_xml: &str) -> Option<String> {
    let run = child_element(paragraph_xml, "w:r")?;
    child_element(&run, "w:rPr")
}

/// A synthesized text run carrying the given run properties.
fn text_run(text: &str, rpr: &str) -> String {
    format!(
        "<w:r>{rpr}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape_xml(text)
    )
}

/// A synthesized line-break run carrying the given run properties.
fn break_run(rpr: &str) -> String {
    format!("<w:r>{rpr}<w:br/></w:r>")
}

/// Fallback heading: a bold paragraph with one line per entry, separated by
/// explicit breaks.
fn bold_paragraph(lines: &[&str]) -> String {
    const BOLD: &str = "<w:rPr><w:b/></w:rPr>";
    let mut out = String::from("<w:p>");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push_str(&break_run(BOLD));
        }
        out.push_str(&text_run(line, BOLD));
    }
    out.push_str("</w:p>");
    out
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
