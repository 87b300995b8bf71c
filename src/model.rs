//! Data model for boundary markers and resolved section groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Fixed table of the unit numerals a structured document may carry.
const ROMAN_NUMERALS: [(u32, &str); 6] = [
    (1, "I"),
    (2, "II"),
    (3, "III"),
    (4, "IV"),
    (5, "V"),
    (6, "VI"),
];

/// Map a roman numeral to its unit number.
///
/// Unmapped numerals yield 0, the "unparented" unit number: sections found
/// under such a unit are not materialized.
pub fn unit_number_from_roman(roman: &str) -> u32 {
    ROMAN_NUMERALS
        .iter()
        .find(|(_, r)| *r == roman)
        .map(|(n, _)| *n)
        .unwrap_or(0)
}

/// Format a unit number as a roman numeral, falling back to the integer
/// itself outside the mapped range.
pub fn unit_display(number: u32) -> String {
    ROMAN_NUMERALS
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, r)| (*r).to_string())
        .unwrap_or_else(|| number.to_string())
}

/// Kind of structural boundary a marker denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Top-level unit heading ("Unit I: ...")
    Unit,
    /// Chapter heading ("Chapter 1: ...")
    Chapter,
    /// Section heading ("A. ...")
    Section,
}

/// A detected structural boundary attributed to one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Block index where the marker text appears
    pub position: usize,
    /// Marker kind
    pub kind: MarkerKind,
    /// Marker payload: the heading text for units/chapters, the letter for
    /// sections
    pub value: String,
    /// True for a Section marker embedded after a line break in a block
    /// whose primary content is a Chapter marker
    pub inline: bool,
}

/// A section letter, `A` through `G`.
///
/// `A` is the distinguished "group start" letter: in flat-chunk grouping it
/// opens a new unit chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct SectionLetter(char);

impl SectionLetter {
    /// Create a section letter; only `A..=G` are valid.
    pub fn new(c: char) -> Option<Self> {
        ('A'..='G').contains(&c).then_some(Self(c))
    }

    /// The underlying character.
    pub fn as_char(&self) -> char {
        self.0
    }

    /// Whether this letter opens a new top-level grouping.
    pub fn is_group_start(&self) -> bool {
        self.0 == 'A'
    }
}

impl TryFrom<char> for SectionLetter {
    type Error = String;

    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        SectionLetter::new(c).ok_or_else(|| format!("section letter out of range A-G: {c:?}"))
    }
}

impl From<SectionLetter> for char {
    fn from(letter: SectionLetter) -> char {
        letter.0
    }
}

impl fmt::Display for SectionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved, materializable unit of output: one Section marker and the
/// block range it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unit heading text ("Unit I: Algebra"), or a synthesized "Unit n"
    /// label in flat-chunk mode
    pub unit_label: String,
    /// Unit number (roman-derived, or the chunk index in flat mode)
    pub unit_number: u32,
    /// Chapter heading text; absent in flat-chunk mode
    pub chapter_label: Option<String>,
    /// Chapter number within the unit; absent in flat-chunk mode
    pub chapter_number: Option<u32>,
    /// Section letter
    pub letter: SectionLetter,
    /// Whether the section marker shares its block with a chapter marker
    pub inline: bool,
    /// Block index of the section marker itself
    pub marker_block: usize,
    /// Half-open range of content blocks owned by this group. May be empty
    /// when the marker is immediately followed by another marker.
    pub content: Range<usize>,
}

impl Group {
    /// Deterministic output file name for this group.
    ///
    /// `Unit <roman> Ch <n> Sec <letter>.<ext>` in hierarchical mode,
    /// `Unit <n> Sec <letter>.<ext>` for flat chunks.
    pub fn file_name(&self, extension: &str) -> String {
        match self.chapter_number {
            Some(chapter) => format!(
                "Unit {} Ch {} Sec {}.{}",
                unit_display(self.unit_number),
                chapter,
                self.letter,
                extension
            ),
            None => format!("Unit {} Sec {}.{}", self.unit_number, self.letter, extension),
        }
    }
}
