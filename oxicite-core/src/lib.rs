//! # OxiCite Core
//!
//! Core components for the OxiCite citation decoder.
//!
//! This crate provides the building blocks shared by the decoding crates:
//!
//! - [`cursor`]: Forward byte cursor with 7-bit/14-bit/string recipes
//! - [`value`]: Citation level values (number or text)
//! - [`config`]: Corpus and rendering configuration
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! OxiCite is layered like a codec stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Driver                                              │
//! │     Batch CLI, JSON line records                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Decoders                                            │
//! │     ID-byte tokens, hierarchy state, IDT index reader   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Bytes (this crate)                                  │
//! │     ByteCursor, CitationValue, DecoderConfig            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxicite_core::{ByteCursor, CitationValue};
//!
//! let mut cursor = ByteCursor::new(&[0x85, b'a' | 0x80, b'b', 0xff]);
//! assert_eq!(cursor.pop(), Some(0x85));
//! assert_eq!(cursor.pop_terminated(0xff).as_deref(), Some("ab"));
//!
//! let value = CitationValue::from("a");
//! assert_eq!(value.incremented(), Ok(CitationValue::from("b")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod cursor;
pub mod error;
pub mod value;

// Re-exports for convenience
pub use config::{Corpus, DecoderConfig, SigmaStyle};
pub use cursor::{ByteCursor, PAYLOAD_MASK, TERMINATOR};
pub use error::{CiteError, Result, read_source};
pub use value::{CitationValue, INITIAL_LEVEL_VALUE, NoSuccessor};

/// Number of citation hierarchy levels (0 = innermost).
pub const HIERARCHY_DEPTH: usize = 6;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{Corpus, DecoderConfig, SigmaStyle};
    pub use crate::cursor::ByteCursor;
    pub use crate::error::{CiteError, Result};
    pub use crate::value::CitationValue;
}
