//! # OxiCite Citation
//!
//! Decoder for the ID bytes interleaved with Beta-code text in TLG and PHI
//! author files.
//!
//! ## Features
//!
//! - **Control bytes**: level/action split, eight payload recipes
//! - **Metadata channel**: level 6 author/work names, document numbers,
//!   descriptive fields
//! - **Hierarchy**: six-level citation state with the reset cascade
//! - **Recovery**: truncated or unknown input yields diagnostics, never errors
//!
//! ## Pipeline
//!
//! ```text
//!  bytes ──► ControlByteDecoder ──► CitationToken ──► HierarchyStateMachine
//!   │                                                         │
//!   └──────── literal text ──► AuthorTextDecoder ◄── snapshot ┘
//!                                     │
//!                                     ▼
//!                          LineRecord / MetadataEvent
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxicite_citation::decode_author;
//! use oxicite_core::DecoderConfig;
//!
//! let text = decode_author(&[0x81, 0x90, b'a', b'b', b'c'], &DecoderConfig::TLG, None);
//!
//! assert_eq!(text.lines.len(), 1);
//! assert_eq!(text.lines[0].text, "abc");
//! assert_eq!(text.lines[0].snapshot.citation(2), "2.1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod anomaly;
pub mod author;
pub mod decoder;
pub mod hierarchy;
pub mod metadata;
pub mod recipe;
pub mod sigma;
pub mod token;

pub use anomaly::DecodeAnomaly;
pub use author::{
    AuthorText, AuthorTextDecoder, LineRecord, MetadataEvent, WorkCatalog, WorkOutline,
    decode_author,
};
pub use decoder::{ControlByteDecoder, Tokens, is_control_byte, split_control_byte};
pub use hierarchy::{CitationSnapshot, HierarchyStateMachine, LevelLabels};
pub use metadata::{MetadataCategory, MetadataChannelDecoder};
pub use recipe::{Recipe, RecipeOutput};
pub use sigma::render_sigmas;
pub use token::{CitationToken, MetadataField, MetadataKey};

/// Decode every control run of a byte stream, skipping literal text.
pub fn decode_tokens(data: &[u8]) -> Vec<(usize, CitationToken)> {
    ControlByteDecoder::new().tokens(data).collect()
}
