//! Marker grammar: regex patterns and validation heuristics that decide
//! whether block text denotes a structural marker.
//!
//! The pattern table and the strict-mode title fragments are data on the
//! grammar, not hard-coded branches, so a new document convention only needs
//! different configuration.

use crate::config::{SplitOptions, Strictness};
use crate::error::Result;
use crate::model::{unit_number_from_roman, SectionLetter};
use once_cell::sync::Lazy;
use regex::Regex;

/// Whole-block unit heading: "Unit <roman>: <title>".
pub const UNIT_PATTERN: &str = r"^Unit\s+([IVXLC]+):\s+.+$";

/// Block-initial chapter heading, optionally followed by a line break and
/// trailing text (which may hold an inline section marker).
pub const CHAPTER_PATTERN: &str = r"(?s)^(Chapter\s*[\d:].+?)(?:\n(.+))?$";

/// Line-initial section heading: "A. " through "G. ".
pub const SECTION_PATTERN: &str = r"^([A-G])\.\s";

static UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(UNIT_PATTERN).unwrap());
static CHAPTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(CHAPTER_PATTERN).unwrap());
static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(SECTION_PATTERN).unwrap());

/// A successful unit classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMatch {
    /// Full heading text, used verbatim as the unit label
    pub label: String,
    /// Unit number from the roman numeral; 0 when the numeral is unmapped
    pub number: u32,
}

/// A successful chapter classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMatch {
    /// Chapter heading text (first line)
    pub title: String,
    /// Text after the first line break, if any; candidate for an inline
    /// section marker
    pub remainder: Option<String>,
}

/// Compiled marker grammar for one split run.
#[derive(Debug, Clone)]
pub struct MarkerGrammar {
    unit: Regex,
    chapter: Regex,
    section: Regex,
    strictness: Strictness,
    /// Lowercased fragments for strict-mode title validation
    fragments: Vec<String>,
}

impl MarkerGrammar {
    /// Build the grammar for a set of split options, using the default
    /// pattern table.
    pub fn from_options(options: &SplitOptions) -> Self {
        Self {
            unit: UNIT_RE.clone(),
            chapter: CHAPTER_RE.clone(),
            section: SECTION_RE.clone(),
            strictness: options.strictness,
            fragments: options
                .title_fragments
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
        }
    }

    /// Build a grammar from custom patterns.
    ///
    /// The unit pattern must capture the roman numeral, the chapter pattern
    /// the title and optional remainder, the section pattern the letter.
    pub fn with_patterns(
        unit: &str,
        chapter: &str,
        section: &str,
        strictness: Strictness,
        fragments: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        Ok(Self {
            unit: Regex::new(unit)?,
            chapter: Regex::new(chapter)?,
            section: Regex::new(section)?,
            strictness,
            fragments: fragments.into_iter().map(|f| f.to_lowercase()).collect(),
        })
    }

    /// Classify text as a unit heading.
    pub fn match_unit(&self, text: &str) -> Option<UnitMatch> {
        let caps = self.unit.captures(text)?;
        let roman = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        Some(UnitMatch {
            label: caps.get(0).map(|m| m.as_str().to_string())?,
            number: unit_number_from_roman(roman),
        })
    }

    /// Classify text as a chapter heading, splitting off any trailing text
    /// after the first line break.
    pub fn match_chapter(&self, text: &str) -> Option<ChapterMatch> {
        let caps = self.chapter.captures(text)?;
        let title = caps.get(1)?.as_str().trim().to_string();
        let remainder = caps.get(2).map(|m| m.as_str().trim().to_string());
        Some(ChapterMatch { title, remainder })
    }

    /// Classify a single line as a section heading, applying strict-mode
    /// title validation when configured.
    pub fn match_section_line(&self, line: &str) -> Option<SectionLetter> {
        let caps = self.section.captures(line)?;
        let letter = SectionLetter::new(caps.get(1)?.as_str().chars().next()?)?;

        if self.strictness == Strictness::Strict {
            let title = line[caps.get(0)?.end()..].trim().to_lowercase();
            if !self.fragments.iter().any(|f| title.contains(f.as_str())) {
                return None;
            }
        }
        Some(letter)
    }
}
