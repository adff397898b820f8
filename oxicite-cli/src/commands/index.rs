//! Index command implementation.

use crate::settings::Settings;
use oxicite_core::read_source;
use oxicite_index::{AuthorSkeleton, IndexReader};
use std::path::Path;

pub fn cmd_index(
    settings: &Settings,
    index: &Path,
    all: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = IndexReader::with_config(settings.resolve(index));
    let bytes = read_source(index)?;

    let authors = if all {
        reader.read_corpus(&bytes)
    } else {
        vec![reader.read(&bytes)]
    };

    if json {
        let output = if all {
            serde_json::to_string_pretty(&authors)?
        } else {
            serde_json::to_string_pretty(&authors[0])?
        };
        println!("{}", output);
        return Ok(());
    }

    println!("Index: {}", index.display());
    for author in &authors {
        print_author(author);
    }
    Ok(())
}

fn print_author(author: &AuthorSkeleton) {
    println!();
    println!(
        "Author {}: {} ({} works)",
        author.number,
        author.name,
        author.works.len()
    );
    println!("{:>6}  {:<40} Levels", "Work", "Name");
    println!("{}", "-".repeat(72));

    for work in &author.works {
        let levels: Vec<String> = work
            .levels
            .iter()
            .rev()
            .map(|(depth, label)| format!("{}={}", depth, label))
            .collect();
        println!(
            "{:>6}  {:<40} {}",
            work.work_number,
            work.name,
            levels.join(" ")
        );
    }

    if !author.anomalies.is_empty() {
        println!();
        println!("Anomalies:");
        for anomaly in &author.anomalies {
            println!("  {:<22} {}", anomaly.kind(), anomaly);
        }
    }
}
