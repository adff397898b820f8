//! Citation tokens produced by the ID-byte decoders.

use crate::anomaly::DecodeAnomaly;
use oxicite_core::CitationValue;
use std::fmt;

/// Key of a metadata assertion carried on the level-6 channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetadataKey {
    /// New author name (`0`).
    AuthorName,
    /// New work name (`1`).
    WorkName,
    /// Work abbreviation (`2`).
    WorkAbbreviation,
    /// Author abbreviation (`3`).
    AuthorAbbreviation,
    /// Region (`a`).
    Region,
    /// City (`b`).
    City,
    /// Notes, including text direction (`c`).
    Notes,
    /// Date (`d`).
    Date,
    /// Publication info (`e`).
    PublicationInfo,
    /// Additional publication info (`f`, `g`).
    AdditionalPublicationInfo,
    /// Provenance (`l`).
    Provenance,
    /// Reprints (`r`).
    Reprints,
    /// Unclassified (`t`).
    Unclassified,
    /// Document number (`z`).
    DocumentNumber,
    /// Document-number assertion from actions 1-7.
    DocumentNumberAssertion(u8),
    /// Lettered document-number variant from actions 8 and 11.
    DocumentNumberVariant(char),
    /// Free text with an unrecognized category.
    Annotation,
}

impl MetadataKey {
    /// Column-style name of the key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthorName => "author_name",
            Self::WorkName => "work_name",
            Self::WorkAbbreviation => "work_abbreviation",
            Self::AuthorAbbreviation => "author_abbreviation",
            Self::Region => "region",
            Self::City => "city",
            Self::Notes => "notes",
            Self::Date => "date",
            Self::PublicationInfo => "publication_info",
            Self::AdditionalPublicationInfo => "additional_publication_info",
            Self::Provenance => "provenance",
            Self::Reprints => "reprints",
            Self::Unclassified => "unclassified",
            Self::DocumentNumber => "document_number",
            Self::DocumentNumberAssertion(_) => "document_number_assertion",
            Self::DocumentNumberVariant(_) => "document_number_variant",
            Self::Annotation => "annotation",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentNumberAssertion(n) => write!(f, "{}_{}", self.name(), n),
            Self::DocumentNumberVariant(c) => write!(f, "{}_{}", self.name(), c),
            _ => f.write_str(self.name()),
        }
    }
}

/// One metadata assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataField {
    /// What is asserted.
    pub key: MetadataKey,
    /// Asserted value.
    pub value: CitationValue,
}

impl MetadataField {
    /// Create a metadata field.
    pub fn new(key: MetadataKey, value: impl Into<CitationValue>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// A decoded ID-byte event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CitationToken {
    /// Set a level to a value.
    SetLevel {
        /// Level (0 = innermost).
        level: u8,
        /// New value.
        value: CitationValue,
    },
    /// Advance a level by one.
    IncrementLevel {
        /// Level (0 = innermost).
        level: u8,
    },
    /// Append a character to the current value of a level.
    AppendToLevel {
        /// Level (0 = innermost).
        level: u8,
        /// Appended character.
        suffix: char,
    },
    /// Start of the next work.
    NewWork,
    /// A metadata assertion.
    Metadata(MetadataField),
    /// End of an 8 KiB block; the rest of the block is padding.
    EndOfBlock,
    /// End of the author file.
    EndOfFile,
    /// Placeholder for a recovered anomaly.
    Diagnostic(DecodeAnomaly),
}

impl CitationToken {
    /// Check whether this token mutates the citation hierarchy.
    pub fn is_hierarchy(&self) -> bool {
        matches!(
            self,
            Self::SetLevel { .. }
                | Self::IncrementLevel { .. }
                | Self::AppendToLevel { .. }
                | Self::NewWork
        )
    }

    /// The anomaly carried by a diagnostic placeholder.
    pub fn anomaly(&self) -> Option<&DecodeAnomaly> {
        match self {
            Self::Diagnostic(anomaly) => Some(anomaly),
            _ => None,
        }
    }
}

impl fmt::Display for CitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetLevel { level, value } => write!(f, "set {} = {}", level, value),
            Self::IncrementLevel { level } => write!(f, "increment {}", level),
            Self::AppendToLevel { level, suffix } => write!(f, "append {} += {}", level, suffix),
            Self::NewWork => f.write_str("new work"),
            Self::Metadata(field) => write!(f, "{} = {}", field.key, field.value),
            Self::EndOfBlock => f.write_str("end of block"),
            Self::EndOfFile => f.write_str("end of file"),
            Self::Diagnostic(anomaly) => write!(f, "diagnostic: {}", anomaly),
        }
    }
}
