//! Hierarchy grouper: turns the flat marker timeline into section entries
//! under one of the two grouping disciplines.

use crate::config::{Discipline, SplitOptions};
use crate::model::{unit_number_from_roman, Group, Marker, MarkerKind, SectionLetter};
use std::collections::HashMap;

/// Result of grouping: section entries (content ranges still unresolved)
/// plus warnings for sections that could not be parented.
#[derive(Debug, Default)]
pub struct Grouping {
    /// Section entries in timeline order
    pub entries: Vec<Group>,
    /// Data-quality conditions: dropped sections and why
    pub warnings: Vec<String>,
}

/// Group markers according to the configured discipline.
///
/// Skip-set letters are not filtered here: a skipped section still occupies
/// its timeline position, so filtering happens after range resolution.
pub fn group(markers: &[Marker], options: &SplitOptions) -> Grouping {
    match options.discipline {
        Discipline::Hierarchical => group_hierarchical(markers),
        Discipline::FlatChunk => group_flat_chunks(markers),
    }
}

/// Three-level Unit / Chapter / Section grouping with running context.
fn group_hierarchical(markers: &[Marker]) -> Grouping {
    let mut grouping = Grouping::default();

    let mut current_unit: Option<(String, u32)> = None;
    let mut current_chapter: Option<String> = None;
    let mut current_chapter_number: u32 = 0;
    // Chapter counters are kept per unit number, so a unit resumed later in
    // the document continues its own numbering.
    let mut chapter_counters: HashMap<u32, u32> = HashMap::new();

    for marker in markers {
        match marker.kind {
            MarkerKind::Unit => {
                let number = unit_number_from_label(&marker.value);
                chapter_counters.entry(number).or_insert(0);
                current_unit = Some((marker.value.clone(), number));
            }
            MarkerKind::Chapter => {
                if let Some((_, number)) = current_unit {
                    if number > 0 {
                        let counter = chapter_counters.entry(number).or_insert(0);
                        *counter += 1;
                        current_chapter_number = *counter;
                    }
                }
                current_chapter = Some(marker.value.clone());
            }
            MarkerKind::Section => {
                let Some(letter) = section_letter(marker) else {
                    continue;
                };
                let (Some((unit_label, unit_number)), Some(chapter_label)) =
                    (current_unit.as_ref(), current_chapter.as_ref())
                else {
                    grouping.warnings.push(format!(
                        "section {} at block {} has no unit/chapter context; dropped",
                        letter, marker.position
                    ));
                    continue;
                };
                if *unit_number == 0 {
                    grouping.warnings.push(format!(
                        "section {} at block {} falls under a unit with an unrecognized \
                         numeral ({}); dropped",
                        letter, marker.position, unit_label
                    ));
                    continue;
                }
                grouping.entries.push(Group {
                    unit_label: unit_label.clone(),
                    unit_number: *unit_number,
                    chapter_label: Some(chapter_label.clone()),
                    chapter_number: Some(current_chapter_number),
                    letter,
                    inline: marker.inline,
                    marker_block: marker.position,
                    content: 0..0,
                });
            }
        }
    }

    grouping
}

/// Section-only grouping into sequentially numbered unit chunks.
///
/// Letter `A` with a non-empty current chunk closes it and starts the next;
/// every section joins the current chunk regardless of letter. Unit and
/// chapter markers in the timeline are ignored entirely here (they still
/// bound ranges during resolution).
fn group_flat_chunks(markers: &[Marker]) -> Grouping {
    let mut grouping = Grouping::default();
    let mut chunk: u32 = 1;
    let mut chunk_len = 0usize;

    for marker in markers {
        if marker.kind != MarkerKind::Section {
            continue;
        }
        let Some(letter) = section_letter(marker) else {
            continue;
        };
        if letter.is_group_start() && chunk_len > 0 {
            chunk += 1;
            chunk_len = 0;
        }
        grouping.entries.push(Group {
            unit_label: format!("Unit {chunk}"),
            unit_number: chunk,
            chapter_label: None,
            chapter_number: None,
            letter,
            inline: marker.inline,
            marker_block: marker.position,
            content: 0..0,
        });
        chunk_len += 1;
    }

    grouping
}

fn section_letter(marker: &Marker) -> Option<SectionLetter> {
    marker.value.chars().next().and_then(SectionLetter::new)
}

/// Extract the unit number from a unit heading label ("Unit III: ...").
fn unit_number_from_label(label: &str) -> u32 {
    label
        .strip_prefix("Unit")
        .and_then(|rest| rest.split(':').next())
        .map(|roman| unit_number_from_roman(roman.trim()))
        .unwrap_or(0)
}
