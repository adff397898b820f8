//! Batch command implementation.
//!
//! Authors are decoded independently on a rayon pool. A failed author is
//! reported and its siblings carry on.

use super::AuthorOutput;
use crate::settings::Settings;
use crate::utils::{author_files, create_progress_bar, index_for};
use oxicite_citation::{WorkCatalog, decode_author};
use oxicite_core::{Corpus, read_source};
use oxicite_index::IndexReader;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

type BatchError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of one author.
struct AuthorReport {
    name: String,
    corpus: Corpus,
    result: Result<AuthorSummary, BatchError>,
}

struct AuthorSummary {
    works: usize,
    lines: usize,
    anomalies: usize,
}

pub fn cmd_batch(
    settings: &Settings,
    input: &Path,
    output: &Path,
    jobs: Option<usize>,
    include: &[String],
    exclude: &[String],
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = author_files(input, include, exclude)?;
    if files.is_empty() {
        println!("No author files in {}", input.display());
        return Ok(());
    }
    std::fs::create_dir_all(output)?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build()?;
    tracing::info!(
        authors = files.len(),
        threads = pool.current_num_threads(),
        "starting batch"
    );

    let pb = create_progress_bar(files.len() as u64, progress);
    let reports: Vec<AuthorReport> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let config = settings.resolve(path);
                let report = AuthorReport {
                    name: display_name(path),
                    corpus: config.corpus,
                    result: decode_one(settings, path, output),
                };
                pb.inc(1);
                report
            })
            .collect()
    });
    pb.finish_and_clear();

    let failed = print_reports(&reports);
    if failed > 0 {
        return Err(format!("{} of {} author(s) failed", failed, reports.len()).into());
    }
    Ok(())
}

fn decode_one(settings: &Settings, path: &Path, output: &Path) -> Result<AuthorSummary, BatchError> {
    let config = settings.resolve(path);
    let bytes = read_source(path)?;
    let skeleton = match index_for(path) {
        Some(index) => Some(IndexReader::with_config(config).read(&read_source(index)?)),
        None => None,
    };

    let catalog = skeleton.as_ref().map(|s| s as &dyn WorkCatalog);
    let text = decode_author(&bytes, &config, catalog);
    let anomalies = text.diagnostics.len() + skeleton.as_ref().map_or(0, |s| s.anomalies.len());

    let target = output_path(path, output);
    let mut writer = BufWriter::new(File::create(&target)?);
    let document = AuthorOutput {
        source: display_name(path),
        corpus: config.corpus,
        index: skeleton.as_ref(),
        text: &text,
    };
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;

    tracing::debug!(
        author = %display_name(path),
        lines = text.lines.len(),
        anomalies,
        "decoded"
    );
    Ok(AuthorSummary {
        works: text.works.len(),
        lines: text.lines.len(),
        anomalies,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<output>/<stem>.json`, lower-cased so re-runs overwrite the same file.
fn output_path(source: &Path, output: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_else(|| "author".to_string());
    output.join(format!("{}.json", stem))
}

/// Print the status table, returning the number of failed authors.
fn print_reports(reports: &[AuthorReport]) -> usize {
    println!(
        "{:<16} {:>6} {:>6} {:>9} {:>9}  Status",
        "Author", "Corpus", "Works", "Lines", "Anomalies"
    );
    println!("{}", "-".repeat(64));

    let mut failed = 0;
    let mut total_lines = 0;
    let mut total_anomalies = 0;
    for report in reports {
        match &report.result {
            Ok(summary) => {
                println!(
                    "{:<16} {:>6} {:>6} {:>9} {:>9}  ok",
                    report.name, report.corpus, summary.works, summary.lines, summary.anomalies
                );
                total_lines += summary.lines;
                total_anomalies += summary.anomalies;
            }
            Err(e) => {
                tracing::error!(author = %report.name, "{}", e);
                println!(
                    "{:<16} {:>6} {:>6} {:>9} {:>9}  FAILED: {}",
                    report.name, report.corpus, "-", "-", "-", e
                );
                failed += 1;
            }
        }
    }

    println!("{}", "-".repeat(64));
    println!(
        "{} author(s), {} failed, {} line(s), {} anomalies",
        reports.len(),
        failed,
        total_lines,
        total_anomalies
    );
    failed
}
