//! Recovered decoding anomalies.
//!
//! None of these abort a decode. They are carried in the token stream as
//! [`CitationToken::Diagnostic`](crate::CitationToken::Diagnostic)
//! placeholders and collected by the hierarchy state machine.

use oxicite_core::CitationValue;
use thiserror::Error;

/// A recovered anomaly in an ID-byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeAnomaly {
    /// Input ended before the recipe of a control byte was complete.
    #[error("Truncated input: level {level} action {action} at offset {offset}")]
    Truncated {
        /// Level of the control byte.
        level: u8,
        /// Action code of the control byte.
        action: u8,
        /// Offset of the control byte.
        offset: usize,
    },

    /// Action code with no meaning on its level.
    #[error("Unrecognized action {action} on level {level} at offset {offset}")]
    UnrecognizedAction {
        /// Level of the control byte.
        level: u8,
        /// Action code of the control byte.
        action: u8,
        /// Offset of the control byte.
        offset: usize,
        /// Payload decoded with the generic recipe, if any.
        payload: Option<CitationValue>,
    },

    /// A literal byte was handed to the control byte decoder.
    #[error("Byte {byte:#04x} at offset {offset} is not a control byte")]
    NotAControlByte {
        /// The byte.
        byte: u8,
        /// Offset of the byte.
        offset: usize,
    },

    /// A string terminator outside any recipe.
    #[error("Stray terminator at offset {offset}")]
    StrayTerminator {
        /// Offset of the terminator.
        offset: usize,
    },

    /// Increment of a level value that has no successor (`z`, `Prol`).
    #[error("Cannot increment level {level} past '{value}'")]
    UnsupportedIncrement {
        /// Level being incremented.
        level: u8,
        /// Value that was kept.
        value: CitationValue,
    },

    /// A hierarchy token named a level outside the six citation levels.
    #[error("Level {level} is outside the citation hierarchy")]
    LevelOutOfRange {
        /// The level.
        level: u8,
    },

    /// A level was cited in a work whose catalog labels do not name it.
    #[error("Work {work} cites level {level}, which has no label")]
    UnlabelledLevel {
        /// Work number.
        work: u16,
        /// Unlabelled level.
        level: u8,
    },
}

impl DecodeAnomaly {
    /// Create a truncated-input anomaly.
    pub fn truncated(level: u8, action: u8, offset: usize) -> Self {
        Self::Truncated {
            level,
            action,
            offset,
        }
    }

    /// Create an unrecognized-action anomaly.
    pub fn unrecognized(
        level: u8,
        action: u8,
        offset: usize,
        payload: Option<CitationValue>,
    ) -> Self {
        Self::UnrecognizedAction {
            level,
            action,
            offset,
            payload,
        }
    }

    /// Short machine-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "truncated",
            Self::UnrecognizedAction { .. } => "unrecognized-action",
            Self::NotAControlByte { .. } => "not-a-control-byte",
            Self::StrayTerminator { .. } => "stray-terminator",
            Self::UnsupportedIncrement { .. } => "unsupported-increment",
            Self::LevelOutOfRange { .. } => "level-out-of-range",
            Self::UnlabelledLevel { .. } => "unlabelled-level",
        }
    }
}
