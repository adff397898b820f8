//! Tokens command implementation.

use oxicite_citation::ControlByteDecoder;
use oxicite_core::read_source;
use std::path::Path;

pub fn cmd_tokens(text: &Path, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_source(text)?;

    let mut count = 0usize;
    let mut diagnostics = 0usize;
    for (offset, token) in ControlByteDecoder::new()
        .tokens(&bytes)
        .take(limit.unwrap_or(usize::MAX))
    {
        let marker = if token.anomaly().is_some() {
            diagnostics += 1;
            '!'
        } else {
            ' '
        };
        println!("{:>8} {} {}", offset, marker, token);
        count += 1;
    }

    println!("{}", "-".repeat(40));
    println!("{} token(s), {} diagnostic(s)", count, diagnostics);
    Ok(())
}
