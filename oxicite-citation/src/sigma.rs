//! Sigma rendering for Beta-code line text.
//!
//! Beta code writes sigma as `S` (context dependent), `S1` (medial),
//! `S2` (final) or `S3` (lunate). With [`SigmaStyle::Lunate`] every Greek
//! sigma becomes `S3`. Latin passages are left alone; the `&` escape
//! switches to Latin and `$` back to Greek.

use oxicite_core::{Corpus, SigmaStyle};

/// Render the sigmas of one line of Beta code.
pub fn render_sigmas(text: &str, style: SigmaStyle, corpus: Corpus) -> String {
    match style {
        SigmaStyle::Contextual => text.to_string(),
        SigmaStyle::Lunate => lunate(text, corpus.is_latin_base()),
    }
}

fn lunate(text: &str, latin_base: bool) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut latin = latin_base;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '&' => latin = true,
            '$' => latin = false,
            's' | 'S' if !latin => {
                out.push(c);
                if let Some('1' | '2' | '3') = chars.peek() {
                    chars.next();
                }
                out.push('3');
                continue;
            }
            _ => {}
        }
        out.push(c);
    }
    out
}
