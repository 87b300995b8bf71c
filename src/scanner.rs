//! Boundary scanner: walks the ordered block list and produces the flat,
//! position-ordered marker timeline.

use crate::docx::BodyBlock;
use crate::grammar::MarkerGrammar;
use crate::model::{Marker, MarkerKind};

/// Scan all paragraph blocks for structural markers.
///
/// Classification is first-match per block: Unit, then Chapter, then bare
/// Section. A Chapter block may additionally carry one inline Section marker
/// at the same position when text after its first line break validates as a
/// section heading; only the first validated inline line is kept.
pub fn scan(blocks: &[BodyBlock], grammar: &MarkerGrammar) -> Vec<Marker> {
    let mut markers = Vec::new();

    for (position, block) in blocks.iter().enumerate() {
        if !block.is_paragraph() || block.text.is_empty() {
            continue;
        }
        let text = block.text.as_str();

        if let Some(unit) = grammar.match_unit(text) {
            markers.push(Marker {
                position,
                kind: MarkerKind::Unit,
                value: unit.label,
                inline: false,
            });
            continue;
        }

        if let Some(chapter) = grammar.match_chapter(text) {
            markers.push(Marker {
                position,
                kind: MarkerKind::Chapter,
                value: chapter.title,
                inline: false,
            });
            if let Some(ref remainder) = chapter.remainder {
                if let Some(letter) = remainder
                    .lines()
                    .find_map(|line| grammar.match_section_line(line))
                {
                    markers.push(Marker {
                        position,
                        kind: MarkerKind::Section,
                        value: letter.to_string(),
                        inline: true,
                    });
                }
            }
            continue;
        }

        if let Some(letter) = text
            .lines()
            .next()
            .and_then(|line| grammar.match_section_line(line))
        {
            markers.push(Marker {
                position,
                kind: MarkerKind::Section,
                value: letter.to_string(),
                inline: false,
            });
        }
    }

    markers
}
