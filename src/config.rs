//! Splitting options configuration.

use crate::model::SectionLetter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Grouping discipline: how the flat marker timeline becomes output groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    /// Three-level Unit / Chapter / Section grouping with synthesized
    /// headings per output
    #[default]
    Hierarchical,
    /// Section-only grouping into unit chunks numbered by each occurrence
    /// of letter `A`; content is copied verbatim including marker blocks
    FlatChunk,
}

/// Grammar strictness for bare Section markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Accept any block-initial "Letter. " match
    #[default]
    Loose,
    /// Additionally require a known title fragment after the letter, to
    /// reject content paragraphs that happen to start like a marker
    Strict,
}

/// Title fragments recognized by strict-mode section validation.
///
/// Case-insensitive substring match against the text following the
/// "Letter. " prefix. The "unit i".."unit vi" entries cover the inline
/// unit-reference heading convention.
pub const DEFAULT_TITLE_FRAGMENTS: &[&str] = &[
    "summary",
    "concept map",
    "key terms",
    "exam strategy",
    "practice",
    "question bank",
    "unit i",
    "unit ii",
    "unit iii",
    "unit iv",
    "unit v",
    "unit vi",
];

/// Options controlling a split run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOptions {
    /// Grouping discipline
    pub discipline: Discipline,

    /// Section-marker grammar strictness
    pub strictness: Strictness,

    /// Section letters excluded from output generation. Skipped letters
    /// still occupy timeline positions when neighboring ranges resolve.
    pub skip_letters: BTreeSet<SectionLetter>,

    /// Title fragments used by strict-mode validation
    pub title_fragments: Vec<String>,

    /// Extension for output file names
    pub extension: String,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            discipline: Discipline::Hierarchical,
            strictness: Strictness::Loose,
            skip_letters: SectionLetter::new('E').into_iter().collect(),
            title_fragments: DEFAULT_TITLE_FRAGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extension: "docx".to_string(),
        }
    }
}

impl SplitOptions {
    /// Create default options: hierarchical grouping, loose grammar,
    /// skip-set `{E}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grouping discipline.
    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Set the grammar strictness.
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Replace the skip-set of section letters.
    pub fn with_skip_letters(mut self, letters: impl IntoIterator<Item = SectionLetter>) -> Self {
        self.skip_letters = letters.into_iter().collect();
        self
    }

    /// Replace the strict-mode title fragment list.
    pub fn with_title_fragments(
        mut self,
        fragments: impl IntoIterator<Item = String>,
    ) -> Self {
        self.title_fragments = fragments.into_iter().collect();
        self
    }

    /// Set the output file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SplitOptions::default();
        assert_eq!(opts.discipline, Discipline::Hierarchical);
        assert_eq!(opts.strictness, Strictness::Loose);
        assert_eq!(opts.skip_letters.len(), 1);
        assert!(opts.skip_letters.contains(&SectionLetter::new('E').unwrap()));
        assert_eq!(opts.extension, "docx");
    }

    #[test]
    fn test_builder_pattern() {
        let opts = SplitOptions::new()
            .with_discipline(Discipline::FlatChunk)
            .with_strictness(Strictness::Strict)
            .with_skip_letters([])
            .with_extension("docx");

        assert_eq!(opts.discipline, Discipline::FlatChunk);
        assert_eq!(opts.strictness, Strictness::Strict);
        assert!(opts.skip_letters.is_empty());
    }
}
