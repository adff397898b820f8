//! Whole-author text decoding.
//!
//! Walks one author file from start to end. Control runs are decoded into
//! tokens and folded into the [`HierarchyStateMachine`]; the literal bytes
//! between them become [`LineRecord`]s carrying the citation snapshot in
//! force when the line ends.
//!
//! ```text
//!  0x81 0x90 'a' 'b' 'c' 0x80 'd' 'e' 'f' 0xfe 0x00 0x00 ...
//!  └─ tokens ┘└─ line ──┘└tok┘└─ line ──┘└EOB┘└─ padding ─┘
//! ```

use crate::anomaly::DecodeAnomaly;
use crate::decoder::{ControlByteDecoder, is_control_byte};
use crate::hierarchy::{CitationSnapshot, HierarchyStateMachine, LevelLabels};
use crate::sigma::render_sigmas;
use crate::token::{CitationToken, MetadataField, MetadataKey};
use oxicite_core::{ByteCursor, DecoderConfig, HIERARCHY_DEPTH};
use std::collections::{BTreeMap, BTreeSet};

/// Block padding byte.
const PADDING: u8 = 0x00;

/// Source of per-work information recovered outside the text file.
///
/// Implemented by the index reader's author skeleton.
pub trait WorkCatalog {
    /// Level labels of a work.
    fn labels(&self, work: u16) -> Option<&LevelLabels>;

    /// Name of a work.
    fn work_name(&self, work: u16) -> Option<&str>;

    /// All works with labels, for seeding the state machine.
    fn all_labels(&self) -> BTreeMap<u16, LevelLabels>;
}

/// One literal text line with its citation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRecord {
    /// Work number.
    pub work: u16,
    /// Citation in force for the line.
    pub snapshot: CitationSnapshot,
    /// Literal line text.
    pub text: String,
}

/// One metadata assertion and the work it was made in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataEvent {
    /// Work number.
    pub work: u16,
    /// The assertion.
    pub field: MetadataField,
}

/// Summary of one work as seen in the text file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkOutline {
    /// Work number.
    pub number: u16,
    /// Work name, from the text or the catalog.
    pub name: Option<String>,
    /// Work abbreviation.
    pub abbreviation: Option<String>,
    /// Level labels from the catalog.
    pub labels: LevelLabels,
    /// Number of lines.
    pub line_count: usize,
    /// Running free-text annotation.
    pub annotation: String,
}

impl WorkOutline {
    /// Number of citation levels to render for this work.
    pub fn depth(&self) -> usize {
        self.labels
            .keys()
            .next_back()
            .map(|&deepest| deepest as usize + 1)
            .unwrap_or(1)
            .min(HIERARCHY_DEPTH)
    }
}

/// Decoded output of one author file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorText {
    /// Author name, if asserted in the text.
    pub author_name: Option<String>,
    /// Author abbreviation, if asserted in the text.
    pub author_abbreviation: Option<String>,
    /// Lines in document order.
    pub lines: Vec<LineRecord>,
    /// Metadata assertions in document order.
    pub metadata: Vec<MetadataEvent>,
    /// Works in number order.
    pub works: Vec<WorkOutline>,
    /// Recovered anomalies in document order.
    pub diagnostics: Vec<DecodeAnomaly>,
}

/// Decoder for a whole author file.
pub struct AuthorTextDecoder<'c> {
    config: DecoderConfig,
    decoder: ControlByteDecoder,
    catalog: Option<&'c dyn WorkCatalog>,
}

impl<'c> AuthorTextDecoder<'c> {
    /// Create a decoder with the given configuration.
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            decoder: ControlByteDecoder::new(),
            catalog: None,
        }
    }

    /// Consult a work catalog for level labels and work names.
    pub fn with_catalog(mut self, catalog: &'c dyn WorkCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Decode a whole author file.
    pub fn decode(&self, bytes: &[u8]) -> AuthorText {
        let labels = self.catalog.map(|c| c.all_labels()).unwrap_or_default();
        let mut walk = Walk {
            config: self.config,
            catalog: self.catalog,
            machine: HierarchyStateMachine::new().with_labels(labels),
            works: BTreeMap::new(),
            unlabelled: BTreeSet::new(),
            out: AuthorText::default(),
        };

        let mut cursor = ByteCursor::new(bytes);
        let mut line = String::new();

        while let Some(byte) = cursor.peek() {
            if byte == PADDING {
                cursor.pop();
                continue;
            }
            if !is_control_byte(byte) {
                cursor.pop();
                line.push(char::from(byte));
                continue;
            }

            walk.flush_line(&mut line);
            let token = self.decoder.decode_one(&mut cursor);
            let end = token == CitationToken::EndOfFile;
            walk.token(token);
            if end {
                break;
            }
        }
        walk.flush_line(&mut line);

        let out = walk.finish();
        tracing::debug!(
            lines = out.lines.len(),
            works = out.works.len(),
            diagnostics = out.diagnostics.len(),
            "decoded author text"
        );
        out
    }
}

/// Decode a whole author file (convenience function).
pub fn decode_author(
    bytes: &[u8],
    config: &DecoderConfig,
    catalog: Option<&dyn WorkCatalog>,
) -> AuthorText {
    let decoder = AuthorTextDecoder::new(*config);
    match catalog {
        Some(catalog) => decoder.with_catalog(catalog).decode(bytes),
        None => decoder.decode(bytes),
    }
}

struct Walk<'c> {
    config: DecoderConfig,
    catalog: Option<&'c dyn WorkCatalog>,
    machine: HierarchyStateMachine,
    works: BTreeMap<u16, WorkOutline>,
    unlabelled: BTreeSet<(u16, u8)>,
    out: AuthorText,
}

impl Walk<'_> {
    fn outline(&mut self, work: u16) -> &mut WorkOutline {
        let catalog = self.catalog;
        self.works.entry(work).or_insert_with(|| WorkOutline {
            number: work,
            name: catalog
                .and_then(|c| c.work_name(work))
                .map(str::to_string),
            labels: catalog
                .and_then(|c| c.labels(work))
                .cloned()
                .unwrap_or_default(),
            ..WorkOutline::default()
        })
    }

    fn token(&mut self, token: CitationToken) {
        if let CitationToken::Metadata(field) = &token {
            self.metadata(field.clone());
        }
        if token == CitationToken::NewWork {
            let next = self.machine.work().saturating_add(1);
            self.outline(next);
        }
        self.machine.apply(token);
        self.out.diagnostics.extend(self.machine.take_diagnostics());
    }

    fn metadata(&mut self, field: MetadataField) {
        let work = self.machine.work();
        let text = field.value.to_string();
        match field.key {
            MetadataKey::AuthorName => self.out.author_name = Some(text),
            MetadataKey::AuthorAbbreviation => self.out.author_abbreviation = Some(text),
            MetadataKey::WorkName => self.outline(work).name = Some(text),
            MetadataKey::WorkAbbreviation => self.outline(work).abbreviation = Some(text),
            MetadataKey::Annotation => {
                let outline = self.outline(work);
                if !outline.annotation.is_empty() {
                    outline.annotation.push_str("; ");
                }
                outline.annotation.push_str(&text);
            }
            _ => {}
        }
        self.out.metadata.push(MetadataEvent { work, field });
    }

    fn flush_line(&mut self, line: &mut String) {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            line.clear();
            return;
        }

        let text = render_sigmas(trimmed, self.config.sigma, self.config.corpus);
        line.clear();

        let snapshot = self.machine.capture_line(&text);
        let work = snapshot.work;
        self.check_labels(&snapshot);
        self.outline(work).line_count += 1;
        self.out.lines.push(LineRecord {
            work,
            snapshot,
            text,
        });
    }

    fn check_labels(&mut self, snapshot: &CitationSnapshot) {
        if self.machine.labels().is_none() {
            return;
        }
        let missing: Vec<u8> = (0u8..)
            .zip(&snapshot.levels)
            .filter(|(depth, value)| {
                !value.is_initial() && self.machine.level_label(*depth).is_none()
            })
            .map(|(depth, _)| depth)
            .collect();
        for level in missing {
            if self.unlabelled.insert((snapshot.work, level)) {
                self.out.diagnostics.push(DecodeAnomaly::UnlabelledLevel {
                    work: snapshot.work,
                    level,
                });
            }
        }
    }

    fn finish(mut self) -> AuthorText {
        self.out.works = self.works.into_values().collect();
        self.out
    }
}
