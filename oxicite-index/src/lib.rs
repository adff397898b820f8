//! # OxiCite Index
//!
//! Reader for the binary index files (`.idt`) that list an author's works,
//! their identifiers and the labels of their citation levels.
//!
//! ## Features
//!
//! - **Byte walk**: sentinel-delimited author, work, section and label records
//! - **Tolerance**: stray bytes after a work name are skipped with a warning
//! - **Documentary corpora**: inscriptions and papyri are forced to
//!   `line`/`document` labels
//! - **Catalog**: [`AuthorSkeleton`] implements
//!   [`WorkCatalog`](oxicite_citation::WorkCatalog) so the text decoder can
//!   use its labels
//!
//! ## Example
//!
//! ```rust
//! use oxicite_index::read_index;
//!
//! let mut idt = vec![0x01, 0x00, 0x10, 0x00, 0x00, 0xef, 0x80];
//! idt.extend_from_slice(b"0006\xff");
//! idt.extend_from_slice(&[0x02, 0x00, 0x08, 0x00, 0x00, 0xef, 0x81]);
//! idt.extend_from_slice(b"001\xff");
//! idt.extend_from_slice(b"\x10\x01\x05Alpha");
//! idt.extend_from_slice(b"\x11\x00\x04line\x00");
//!
//! let author = read_index(&idt);
//! assert_eq!(author.number, "0006");
//! assert_eq!(author.works.len(), 1);
//! assert_eq!(author.works[0].name, "Alpha");
//! assert_eq!(author.works[0].label(0), Some("line"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod anomaly;
pub mod reader;
pub mod skeleton;

pub use anomaly::IndexAnomaly;
pub use reader::{IndexReader, read_corpus_index, read_index};
pub use skeleton::{AuthorSkeleton, WorkSkeleton};
