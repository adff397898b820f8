//! Command implementations for OxiCite CLI.

pub mod batch;
pub mod decode;
pub mod index;
pub mod tokens;

pub use batch::cmd_batch;
pub use decode::cmd_decode;
pub use index::cmd_index;
pub use tokens::cmd_tokens;

use oxicite_citation::AuthorText;
use oxicite_core::Corpus;
use oxicite_index::AuthorSkeleton;
use serde::Serialize;

/// JSON document written for one decoded author.
#[derive(Serialize)]
pub struct AuthorOutput<'a> {
    /// Source file name.
    pub source: String,
    /// Corpus the file was decoded as.
    pub corpus: Corpus,
    /// Index skeleton, if an index file was read.
    pub index: Option<&'a AuthorSkeleton>,
    /// Decoded text.
    pub text: &'a AuthorText,
}
