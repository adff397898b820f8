//! Decode command implementation.

use super::AuthorOutput;
use crate::settings::Settings;
use crate::utils::{index_for, print_lines};
use oxicite_citation::{WorkCatalog, decode_author};
use oxicite_core::read_source;
use oxicite_index::IndexReader;
use std::path::Path;

pub fn cmd_decode(
    settings: &Settings,
    text: &Path,
    index: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = settings.resolve(text);
    let bytes = read_source(text)?;

    let index_path = index.map(Path::to_path_buf).or_else(|| index_for(text));
    let skeleton = match &index_path {
        Some(path) => {
            tracing::debug!(index = %path.display(), "reading index");
            Some(IndexReader::with_config(config).read(&read_source(path)?))
        }
        None => None,
    };

    let catalog = skeleton.as_ref().map(|s| s as &dyn WorkCatalog);
    let decoded = decode_author(&bytes, &config, catalog);

    if json {
        let output = AuthorOutput {
            source: text.display().to_string(),
            corpus: config.corpus,
            index: skeleton.as_ref(),
            text: &decoded,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("File: {} ({})", text.display(), config.corpus);
    print_lines(&decoded);

    println!();
    println!(
        "{} line(s), {} work(s), {} diagnostic(s)",
        decoded.lines.len(),
        decoded.works.len(),
        decoded.diagnostics.len()
    );
    for anomaly in &decoded.diagnostics {
        println!("  {:<22} {}", anomaly.kind(), anomaly);
    }
    if let Some(skeleton) = &skeleton {
        for anomaly in &skeleton.anomalies {
            println!("  {:<22} {} (index)", anomaly.kind(), anomaly);
        }
    }

    Ok(())
}
