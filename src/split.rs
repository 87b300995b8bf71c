//! Split pipeline: scan, group, resolve, materialize.

use crate::config::SplitOptions;
use crate::docx::SourceDocument;
use crate::error::Result;
use crate::grammar::MarkerGrammar;
use crate::grouper;
use crate::materialize::Materializer;
use crate::model::{Marker, SectionLetter};
use crate::resolver::{self, MarkerIndex};
use crate::scanner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One output document created by a split run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOutput {
    /// Deterministic output file name
    pub file_name: String,
    /// Full path the document was written to
    pub path: PathBuf,
    /// Unit number (or chunk index in flat mode)
    pub unit_number: u32,
    /// Chapter number; absent in flat mode
    pub chapter_number: Option<u32>,
    /// Section letter
    pub letter: SectionLetter,
}

/// Outcome of splitting one input file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SplitReport {
    /// Markers detected in the source timeline
    pub markers_found: usize,
    /// Outputs created, in timeline order
    pub created: Vec<CreatedOutput>,
    /// Non-fatal conditions: dropped sections, heading fallbacks that could
    /// not resolve, per-group write failures
    pub warnings: Vec<String>,
}

impl SplitReport {
    /// Whether the run produced no outputs.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// Split a DOCX file into per-section documents under `out_dir`.
///
/// A file with no boundary markers yields an `Ok` report with zero outputs
/// and a warning; an unreadable or corrupt input is an error. Individual
/// outputs that fail to write are recorded as warnings and do not stop the
/// remaining groups.
pub fn split_file(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    options: &SplitOptions,
) -> Result<SplitReport> {
    let source = SourceDocument::open(input)?;
    split_source(&source, out_dir, options)
}

/// Scan a DOCX file and return its marker timeline without writing outputs.
pub fn scan_file(input: impl AsRef<Path>, options: &SplitOptions) -> Result<Vec<Marker>> {
    let source = SourceDocument::open(input)?;
    let grammar = MarkerGrammar::from_options(options);
    Ok(scanner::scan(source.blocks(), &grammar))
}

/// Split an already-opened source document.
pub fn split_source(
    source: &SourceDocument,
    out_dir: impl AsRef<Path>,
    options: &SplitOptions,
) -> Result<SplitReport> {
    let grammar = MarkerGrammar::from_options(options);
    let markers = scanner::scan(source.blocks(), &grammar);

    let mut report = SplitReport {
        markers_found: markers.len(),
        ..Default::default()
    };
    if markers.is_empty() {
        report
            .warnings
            .push("no boundary markers found; nothing to split".to_string());
        return Ok(report);
    }

    let mut grouping = grouper::group(&markers, options);
    let index = MarkerIndex::new(&markers);
    resolver::resolve(
        &mut grouping.entries,
        &index,
        source.body().len(),
        options.discipline,
    );
    report.warnings.append(&mut grouping.warnings);

    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let materializer = Materializer::new(source);
    for entry in &grouping.entries {
        if options.skip_letters.contains(&entry.letter) {
            continue;
        }
        let file_name = entry.file_name(&options.extension);
        let path = out_dir.join(&file_name);
        match materializer.write(entry, options.discipline, &path) {
            Ok(()) => report.created.push(CreatedOutput {
                file_name,
                path,
                unit_number: entry.unit_number,
                chapter_number: entry.chapter_number,
                letter: entry.letter,
            }),
            Err(e) => report
                .warnings
                .push(format!("failed to create {file_name}: {e}")),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Discipline;
    use crate::test_support::docx_bytes;

    fn source(paragraphs: &[&str]) -> SourceDocument {
        SourceDocument::from_bytes(docx_bytes(paragraphs)).unwrap()
    }

    #[test]
    fn test_hierarchical_split_creates_expected_files() {
        let source = source(&[
            "Unit I: Algebra",
            "Chapter 1: Basics",
            "A. Summary text",
            "content-1",
            "B. Key terms",
            "content-2",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let report = split_source(&source, dir.path(), &SplitOptions::default()).unwrap();

        assert_eq!(report.markers_found, 4);
        assert!(report.warnings.is_empty());
        let names: Vec<_> = report.created.iter().map(|c| c.file_name.as_str()).collect();
        assert_eq!(names, vec!["Unit I Ch 1 Sec A.docx", "Unit I Ch 1 Sec B.docx"]);
        assert!(dir.path().join("Unit I Ch 1 Sec A.docx").exists());
    }

    #[test]
    fn test_skip_set_suppresses_outputs() {
        let source = source(&[
            "Unit I: Algebra",
            "Chapter 1: Basics",
            "E. Question bank",
            "bank content",
            "F. Review",
            "review content",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let report = split_source(&source, dir.path(), &SplitOptions::default()).unwrap();

        let letters: Vec<char> = report.created.iter().map(|c| c.letter.as_char()).collect();
        assert_eq!(letters, vec!['F']);
        assert!(!dir.path().join("Unit I Ch 1 Sec E.docx").exists());
        // The skipped E still bounded F's range: F owns only its own content.
        let f = SourceDocument::open(dir.path().join("Unit I Ch 1 Sec F.docx")).unwrap();
        let texts: Vec<_> = f.blocks().iter().map(|b| b.text.as_str()).collect();
        assert!(texts.contains(&"review content"));
        assert!(!texts.contains(&"bank content"));
    }

    #[test]
    fn test_no_markers_is_skipped_with_warning() {
        let source = source(&["just prose", "more prose"]);
        let dir = tempfile::tempdir().unwrap();
        let report = split_source(&source, dir.path(), &SplitOptions::default()).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.markers_found, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("no boundary markers"));
    }

    #[test]
    fn test_flat_chunk_split() {
        let source = source(&[
            "A. Summary",
            "alpha",
            "B. Key terms",
            "beta",
            "A. Summary",
            "gamma",
        ]);
        let options = SplitOptions::default().with_discipline(Discipline::FlatChunk);
        let dir = tempfile::tempdir().unwrap();
        let report = split_source(&source, dir.path(), &options).unwrap();

        let names: Vec<_> = report.created.iter().map(|c| c.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Unit 1 Sec A.docx", "Unit 1 Sec B.docx", "Unit 2 Sec A.docx"]
        );

        // Flat outputs carry the marker block itself.
        let first = SourceDocument::open(&report.created[0].path).unwrap();
        let texts: Vec<_> = first.blocks().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["A. Summary", "alpha"]);
    }
}
