//! docseg CLI - split structured DOCX documents into per-section files.
//!
//! Scans Word documents for Unit / Chapter / Section boundary markers and
//! writes one formatted DOCX per section.

use clap::{Args, Parser, Subcommand};
use colored::*;
use docseg::{CreatedOutput, Discipline, MarkerKind, SectionLetter, SplitOptions, Strictness};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

/// Split structured DOCX documents into per-section files
#[derive(Parser)]
#[command(
    name = "docseg",
    version,
    about = "Split structured DOCX documents into per-section files",
    long_about = "docseg - boundary-aware DOCX splitter.\n\n\
                  Detects Unit / Chapter / Section markers in a Word document and\n\
                  writes one standalone, fully formatted DOCX per section."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a single document
    Split {
        /// Input DOCX file
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        #[command(flatten)]
        options: SplitArgs,

        /// Print the split report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split every document in per-subject subdirectories of a root
    Batch {
        /// Input root; each subdirectory is one subject
        input_root: PathBuf,

        /// Output root; subject subdirectories are mirrored here
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        #[command(flatten)]
        options: SplitArgs,
    },

    /// Print the detected marker timeline without writing outputs
    Scan {
        /// Input DOCX file
        input: PathBuf,

        #[command(flatten)]
        options: SplitArgs,
    },
}

/// Shared splitting options.
#[derive(Args)]
struct SplitArgs {
    /// Use flat section-chunk grouping instead of Unit/Chapter/Section
    #[arg(long)]
    flat: bool,

    /// Validate section markers against known title fragments
    #[arg(long)]
    strict: bool,

    /// Section letters to skip, e.g. "E" or "EG" (use "" to keep all)
    #[arg(long, default_value = "E")]
    skip: String,
}

impl SplitArgs {
    fn to_options(&self) -> Result<SplitOptions, String> {
        let mut letters = Vec::new();
        for c in self.skip.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            match SectionLetter::new(c.to_ascii_uppercase()) {
                Some(letter) => letters.push(letter),
                None => return Err(format!("invalid section letter in --skip: {c:?}")),
            }
        }
        let discipline = if self.flat {
            Discipline::FlatChunk
        } else {
            Discipline::Hierarchical
        };
        let strictness = if self.strict {
            Strictness::Strict
        } else {
            Strictness::Loose
        };
        Ok(SplitOptions::new()
            .with_discipline(discipline)
            .with_strictness(strictness)
            .with_skip_letters(letters))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Split {
            input,
            output,
            options,
            json,
        } => {
            let options = options.to_options()?;
            let pb = create_spinner("Splitting document...");

            let report = docseg::split_file(&input, &output, &options)?;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            print_report(&input.display().to_string(), &report);
            print_summary(&report.created);
        }

        Commands::Batch {
            input_root,
            output,
            options,
        } => {
            let options = options.to_options()?;
            let files = collect_batch_inputs(&input_root)?;
            if files.is_empty() {
                println!(
                    "{} No .docx files found under {}",
                    "!".yellow().bold(),
                    input_root.display()
                );
                return Ok(());
            }

            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:30.cyan/blue} {pos}/{len} {msg}")?,
            );

            let mut all_created = Vec::new();
            for (subject, path) in &files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                pb.set_message(format!("{subject}/{name}"));

                match docseg::split_file(path, output.join(subject), &options) {
                    Ok(report) => {
                        pb.println(format!(
                            "{} {}/{}: {} sections",
                            "✓".green().bold(),
                            subject,
                            name,
                            report.created.len()
                        ));
                        for warning in &report.warnings {
                            pb.println(format!("  {} {}", "!".yellow().bold(), warning));
                        }
                        all_created.extend(report.created);
                    }
                    // One bad input must not stop the batch.
                    Err(e) => {
                        pb.println(format!(
                            "{} {}/{}: {}",
                            "✗".red().bold(),
                            subject,
                            name,
                            e
                        ));
                    }
                }
                pb.inc(1);
            }
            pb.finish_and_clear();

            println!(
                "{} Created {} files under {}",
                "✓".green().bold(),
                all_created.len(),
                output.display()
            );
            print_summary(&all_created);
        }

        Commands::Scan { input, options } => {
            let options = options.to_options()?;
            let pb = create_spinner("Scanning document...");
            let markers = docseg::scan_file(&input, &options)?;
            pb.finish_and_clear();

            println!("{}", "Marker timeline".cyan().bold());
            println!("{}", "─".repeat(40));
            for marker in &markers {
                let kind = match marker.kind {
                    MarkerKind::Unit => "unit",
                    MarkerKind::Chapter => "chapter",
                    MarkerKind::Section => "section",
                };
                let inline = if marker.inline { " (inline)" } else { "" };
                println!("{:>6}  {:<8} {}{}", marker.position, kind, marker.value, inline);
            }
            println!("{}: {}", "Markers".bold(), markers.len());
        }
    }

    Ok(())
}

/// Collect `(subject, file)` pairs from the per-subject subdirectories of
/// the input root, in stable order.
fn collect_batch_inputs(
    root: &PathBuf,
) -> Result<Vec<(String, PathBuf)>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let subject = entry.file_name().to_string_lossy().to_string();
        for file in fs::read_dir(entry.path())? {
            let file = file?;
            let path = file.path();
            if file.file_type()?.is_file() && docseg::detect::is_docx_path(&path) {
                files.push((subject.clone(), path));
            }
        }
    }
    files.sort();
    Ok(files)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn print_report(input: &str, report: &docseg::SplitReport) {
    println!(
        "{}: {} markers, {} sections",
        input.bold(),
        report.markers_found,
        report.created.len()
    );
    for output in &report.created {
        println!("  {} {}", "✓".green().bold(), output.file_name);
    }
    for warning in &report.warnings {
        println!("  {} {}", "!".yellow().bold(), warning);
    }
}

/// Final summary grouping created outputs by top-level unit.
fn print_summary(created: &[CreatedOutput]) {
    if created.is_empty() {
        return;
    }

    let mut units: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    let mut sections: BTreeMap<u32, usize> = BTreeMap::new();
    for output in created {
        *sections.entry(output.unit_number).or_default() += 1;
        if let Some(chapter) = output.chapter_number {
            units.entry(output.unit_number).or_default().insert(chapter);
        }
    }

    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40));
    for (unit, count) in &sections {
        match units.get(unit) {
            Some(chapters) => {
                let list = chapters
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "  Unit {}: {} chapters (Ch {})",
                    docseg::model::unit_display(*unit),
                    chapters.len(),
                    list
                );
            }
            None => println!("  Unit {}: {} sections", unit, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_skip_letters_parsing() {
        let args = SplitArgs {
            flat: false,
            strict: false,
            skip: "e,g".to_string(),
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.skip_letters.len(), 2);

        let args = SplitArgs {
            flat: false,
            strict: false,
            skip: "Z".to_string(),
        };
        assert!(args.to_options().is_err());

        let args = SplitArgs {
            flat: true,
            strict: true,
            skip: String::new(),
        };
        let options = args.to_options().unwrap();
        assert!(options.skip_letters.is_empty());
        assert_eq!(options.discipline, Discipline::FlatChunk);
    }
}
