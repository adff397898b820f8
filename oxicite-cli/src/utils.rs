//! Utility functions for the CLI.

use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use oxicite_citation::{AuthorText, WorkOutline};
use std::path::{Path, PathBuf};

/// Text file extension on the discs.
pub const TEXT_EXTENSION: &str = "txt";

/// Index file extension on the discs.
pub const INDEX_EXTENSION: &str = "idt";

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Check if a file name matches the filter patterns.
/// - If include patterns are specified, the name must match at least one
/// - If exclude patterns are specified, the name must not match any
pub fn matches_filters(name: &str, include: &[String], exclude: &[String]) -> bool {
    let matches = |pattern: &String| Pattern::new(pattern).is_ok_and(|p| p.matches(name));

    if exclude.iter().any(matches) {
        return false;
    }
    include.is_empty() || include.iter().any(matches)
}

/// Index file belonging to a text file, if one exists next to it.
///
/// Both `tlg0012.idt` and `TLG0012.IDT` are tried.
pub fn index_for(text: &Path) -> Option<PathBuf> {
    [INDEX_EXTENSION.to_string(), INDEX_EXTENSION.to_ascii_uppercase()]
        .into_iter()
        .map(|ext| text.with_extension(ext))
        .find(|path| path.is_file())
}

/// Author text files in a directory, sorted by name.
pub fn author_files(
    dir: &Path,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TEXT_EXTENSION));
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_text && path.is_file() && matches_filters(name, include, exclude) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Print decoded lines with their citations, one work at a time.
pub fn print_lines(text: &AuthorText) {
    if let Some(name) = &text.author_name {
        println!("Author: {}", name);
    }

    let mut current = None;
    let mut outline: Option<&WorkOutline> = None;
    for line in &text.lines {
        if current != Some(line.work) {
            current = Some(line.work);
            outline = text.works.iter().find(|w| w.number == line.work);
            println!();
            match outline.and_then(|w| w.name.as_deref()) {
                Some(name) => println!("Work {:03}: {}", line.work, name),
                None => println!("Work {:03}", line.work),
            }
            println!("{}", "-".repeat(60));
        }
        let depth = outline.map(WorkOutline::depth).unwrap_or(1);
        println!("{:>12}  {}", line.snapshot.citation(depth), line.text);
    }
}
