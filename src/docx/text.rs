//! Plain-text extraction for paragraph blocks.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Flatten a paragraph element into plain text.
///
/// Run text fragments are concatenated in document order; explicit line
/// breaks (`w:br`, `w:cr`) become `'\n'` and tabs `'\t'`. Field instruction
/// text is skipped. The final result is trimmed, interior lines are not.
pub fn paragraph_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_run = false;
    let mut in_text = false;
    let mut in_instr_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                b"w:instrText" => in_instr_text = true,
                _ => {}
            },
            // w:tab also appears under w:pPr as a tab-stop definition;
            // only run-level occurrences are content.
            Ok(Event::Empty(ref e)) if in_run => match e.name().as_ref() {
                b"w:br" | b"w:cr" => out.push('\n'),
                b"w:tab" => out.push('\t'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text && !in_instr_text {
                    out.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::CData(ref e)) => {
                if in_text && !in_instr_text {
                    out.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:instrText" => in_instr_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_concatenated_in_order() {
        let xml = "<w:p><w:r><w:t>Chapter 1: </w:t></w:r><w:r><w:t>Basics</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "Chapter 1: Basics");
    }

    #[test]
    fn test_breaks_become_line_separators() {
        let xml = "<w:p><w:r><w:t>Chapter 2: Sets</w:t></w:r>\
                   <w:r><w:br/></w:r>\
                   <w:r><w:t>A. Summary &amp; Concept Map</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "Chapter 2: Sets\nA. Summary & Concept Map");
    }

    #[test]
    fn test_tab_stop_definitions_are_not_content() {
        let xml = "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
                   <w:r><w:t>a</w:t></w:r><w:r><w:tab/></w:r><w:r><w:t>b</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "a\tb");
    }

    #[test]
    fn test_field_instructions_skipped() {
        let xml = "<w:p><w:r><w:instrText>PAGEREF _Toc1</w:instrText></w:r>\
                   <w:r><w:t>visible</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "visible");
    }

    #[test]
    fn test_result_is_trimmed() {
        let xml = "<w:p><w:r><w:t xml:space=\"preserve\">  Unit I: Algebra  </w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "Unit I: Algebra");
    }

    #[test]
    fn test_empty_paragraph() {
        assert_eq!(paragraph_text("<w:p/>"), "");
        assert_eq!(paragraph_text("<w:p><w:pPr/></w:p>"), "");
    }
}
