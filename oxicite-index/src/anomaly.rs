//! Structural anomalies found while walking an index file.

use thiserror::Error;

/// A recovered anomaly in an index file.
///
/// Only [`SkippedBytes`](Self::SkippedBytes), [`UnknownDescription`](Self::UnknownDescription),
/// [`NoCurrentWork`](Self::NoCurrentWork) and [`LabelOutOfRange`](Self::LabelOutOfRange)
/// let the walk continue; the others end it with a partial skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexAnomaly {
    /// Stray bytes after a work name were skipped.
    #[error("Skipped {count} stray byte(s) at offset {offset}")]
    SkippedBytes {
        /// Offset of the first skipped byte.
        offset: usize,
        /// Number of bytes skipped.
        count: usize,
    },

    /// A record sentinel outside the known set.
    #[error("Unknown record type {byte:#04x} at offset {offset}")]
    UnknownRecord {
        /// The sentinel byte.
        byte: u8,
        /// Offset of the sentinel.
        offset: usize,
    },

    /// Input ended inside a record.
    #[error("Truncated record {record:#04x} at offset {offset}")]
    Truncated {
        /// Record sentinel.
        record: u8,
        /// Offset of the record.
        offset: usize,
    },

    /// A description record with an unknown subtype.
    #[error("Unknown description subtype {subtype} at offset {offset}")]
    UnknownDescription {
        /// Subtype byte.
        subtype: u8,
        /// Offset of the record.
        offset: usize,
    },

    /// A second author record in a single-author index.
    #[error("Unexpected second author at offset {offset}")]
    UnexpectedAuthor {
        /// Offset of the record.
        offset: usize,
    },

    /// A work-level record before any work record.
    #[error("Record {record:#04x} at offset {offset} has no current work")]
    NoCurrentWork {
        /// Record sentinel.
        record: u8,
        /// Offset of the record.
        offset: usize,
    },

    /// A level label deeper than the citation hierarchy.
    #[error("Level label depth {depth} at offset {offset} is out of range")]
    LabelOutOfRange {
        /// Depth byte.
        depth: u8,
        /// Offset of the record.
        offset: usize,
    },

    /// An author or work record without its `0xef` identifier.
    #[error("Record {record:#04x} at offset {offset} has no identifier")]
    MissingIdentifier {
        /// Record sentinel.
        record: u8,
        /// Offset of the record.
        offset: usize,
    },
}

impl IndexAnomaly {
    /// Check whether the walk stops after this anomaly.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownRecord { .. }
                | Self::Truncated { .. }
                | Self::UnexpectedAuthor { .. }
                | Self::MissingIdentifier { .. }
        )
    }

    /// Short machine-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SkippedBytes { .. } => "skipped-bytes",
            Self::UnknownRecord { .. } => "unknown-record",
            Self::Truncated { .. } => "truncated",
            Self::UnknownDescription { .. } => "unknown-description",
            Self::UnexpectedAuthor { .. } => "unexpected-author",
            Self::NoCurrentWork { .. } => "no-current-work",
            Self::LabelOutOfRange { .. } => "label-out-of-range",
            Self::MissingIdentifier { .. } => "missing-identifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_split() {
        assert!(!IndexAnomaly::SkippedBytes { offset: 3, count: 1 }.is_fatal());
        assert!(IndexAnomaly::UnknownRecord { byte: 0x42, offset: 0 }.is_fatal());
        assert!(!IndexAnomaly::NoCurrentWork { record: 0x11, offset: 0 }.is_fatal());
    }

    #[test]
    fn test_display() {
        let anomaly = IndexAnomaly::UnknownRecord { byte: 0x42, offset: 17 };
        assert_eq!(anomaly.to_string(), "Unknown record type 0x42 at offset 17");
        assert_eq!(anomaly.kind(), "unknown-record");
    }
}
