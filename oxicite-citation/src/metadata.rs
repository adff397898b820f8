//! Level-6 metadata channel.
//!
//! Level 6 is not a hierarchy slot. It multiplexes author/work bookkeeping
//! and descriptive metadata over the same action nibble:
//!
//! | Action   | Payload                       | Token                              |
//! |----------|-------------------------------|------------------------------------|
//! | 0        | one byte, must be 1           | `NewWork`                          |
//! | 1-7      | terminated text               | `DocumentNumberAssertion(action)`  |
//! | 8        | tag letter, 7-bit number      | `DocumentNumberVariant(tag)`       |
//! | 11       | tag letter, 14-bit number     | `DocumentNumberVariant(tag)`       |
//! | 15       | tag character + text          | category of the tag                |
//!
//! Unrecognized categories are kept as [`MetadataKey::Annotation`] text.

use crate::anomaly::DecodeAnomaly;
use crate::recipe::{Recipe, RecipeOutput};
use crate::token::{CitationToken, MetadataField, MetadataKey};
use oxicite_core::{ByteCursor, CitationValue, TERMINATOR};

/// Level number of the metadata channel.
pub const METADATA_LEVEL: u8 = 6;

/// Category selected by the leading tag of an action-15 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataCategory {
    /// `0`
    AuthorName,
    /// `1`
    WorkName,
    /// `2`
    WorkAbbreviation,
    /// `3`
    AuthorAbbreviation,
    /// `a`
    Region,
    /// `b`
    City,
    /// `c`
    Notes,
    /// `d`
    Date,
    /// `e`
    PublicationInfo,
    /// `f` or `g`
    AdditionalPublicationInfo,
    /// `l`
    Provenance,
    /// `r`
    Reprints,
    /// `t`
    Unclassified,
    /// `z`
    DocumentNumber,
}

impl MetadataCategory {
    /// Resolve a tag character.
    ///
    /// The small integers 0-3 are accepted as well as the digits `'0'`-`'3'`:
    /// the discs write the author/work tags as masked `0x80`-`0x83`.
    pub fn from_tag(tag: char) -> Option<Self> {
        let tag = match tag {
            '\u{0}'..='\u{3}' => char::from(b'0' + tag as u8),
            other => other,
        };
        Some(match tag {
            '0' => Self::AuthorName,
            '1' => Self::WorkName,
            '2' => Self::WorkAbbreviation,
            '3' => Self::AuthorAbbreviation,
            'a' => Self::Region,
            'b' => Self::City,
            'c' => Self::Notes,
            'd' => Self::Date,
            'e' => Self::PublicationInfo,
            'f' | 'g' => Self::AdditionalPublicationInfo,
            'l' => Self::Provenance,
            'r' => Self::Reprints,
            't' => Self::Unclassified,
            'z' => Self::DocumentNumber,
            _ => return None,
        })
    }

    /// Metadata key reported for this category.
    pub fn key(&self) -> MetadataKey {
        match self {
            Self::AuthorName => MetadataKey::AuthorName,
            Self::WorkName => MetadataKey::WorkName,
            Self::WorkAbbreviation => MetadataKey::WorkAbbreviation,
            Self::AuthorAbbreviation => MetadataKey::AuthorAbbreviation,
            Self::Region => MetadataKey::Region,
            Self::City => MetadataKey::City,
            Self::Notes => MetadataKey::Notes,
            Self::Date => MetadataKey::Date,
            Self::PublicationInfo => MetadataKey::PublicationInfo,
            Self::AdditionalPublicationInfo => MetadataKey::AdditionalPublicationInfo,
            Self::Provenance => MetadataKey::Provenance,
            Self::Reprints => MetadataKey::Reprints,
            Self::Unclassified => MetadataKey::Unclassified,
            Self::DocumentNumber => MetadataKey::DocumentNumber,
        }
    }
}

/// Decoder for control bytes on level 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataChannelDecoder;

impl MetadataChannelDecoder {
    /// Create a metadata channel decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode the payload of a level-6 control byte that was just popped.
    pub fn decode_metadata(&self, cursor: &mut ByteCursor, action: u8) -> CitationToken {
        let offset = cursor.position().saturating_sub(1);
        let truncated =
            || CitationToken::Diagnostic(DecodeAnomaly::truncated(METADATA_LEVEL, action, offset));

        match action {
            0 => match cursor.pop_masked() {
                None => truncated(),
                Some(1) => CitationToken::NewWork,
                Some(other) => CitationToken::Diagnostic(DecodeAnomaly::unrecognized(
                    METADATA_LEVEL,
                    action,
                    offset,
                    Some(CitationValue::Number(other as u32)),
                )),
            },
            1..=7 => match cursor.pop_terminated(TERMINATOR) {
                None => truncated(),
                Some(text) => field(MetadataKey::DocumentNumberAssertion(action), text),
            },
            8 => {
                let Some(tag) = cursor.pop_char() else {
                    return truncated();
                };
                match cursor.pop_masked() {
                    None => truncated(),
                    Some(number) => variant(tag, number as u32),
                }
            }
            11 => {
                let Some(tag) = cursor.pop_char() else {
                    return truncated();
                };
                match cursor.pop_u14() {
                    None => truncated(),
                    Some(number) => variant(tag, number as u32),
                }
            }
            15 => match cursor.pop_terminated(TERMINATOR) {
                None => truncated(),
                Some(text) => categorized(text),
            },
            _ => {
                // Payload is consumed with the generic recipe so the stream stays aligned.
                let Some(recipe) = Recipe::from_action(action) else {
                    return CitationToken::Diagnostic(DecodeAnomaly::unrecognized(
                        METADATA_LEVEL,
                        action,
                        offset,
                        None,
                    ));
                };
                match recipe.run(cursor) {
                    None => truncated(),
                    Some(output) => {
                        let payload = match output {
                            RecipeOutput::Value(value) => value,
                            RecipeOutput::Append(c) => CitationValue::Text(c.to_string()),
                        };
                        CitationToken::Diagnostic(DecodeAnomaly::unrecognized(
                            METADATA_LEVEL,
                            action,
                            offset,
                            Some(payload),
                        ))
                    }
                }
            }
        }
    }
}

fn field(key: MetadataKey, value: impl Into<CitationValue>) -> CitationToken {
    CitationToken::Metadata(MetadataField::new(key, value))
}

fn variant(tag: char, number: u32) -> CitationToken {
    if tag.is_ascii_lowercase() {
        field(MetadataKey::DocumentNumberVariant(tag), number)
    } else {
        field(MetadataKey::Annotation, format!("{}{}", tag, number))
    }
}

fn categorized(text: String) -> CitationToken {
    let mut chars = text.chars();
    let category = chars.next().and_then(MetadataCategory::from_tag);
    match category {
        Some(category) => field(category.key(), chars.as_str().to_string()),
        None => field(MetadataKey::Annotation, text),
    }
}
