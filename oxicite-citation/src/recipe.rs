//! Payload recipes for action codes 8-15.
//!
//! Every recipe byte carries a 7-bit payload (`byte & 0x7f`). Text fields
//! run until the terminator byte `0xff`.
//!
//! | Action | Payload                                   |
//! |--------|-------------------------------------------|
//! | 8      | 7-bit number                              |
//! | 9      | 7-bit number, optional character          |
//! | 10     | 7-bit number, terminated text             |
//! | 11     | 14-bit number                             |
//! | 12     | 14-bit number, character                  |
//! | 13     | 14-bit number, terminated text            |
//! | 14     | character appended to the current value   |
//! | 15     | terminated text                           |

use oxicite_core::{ByteCursor, CitationValue, TERMINATOR};

/// Decode recipe selected by an action code of 8 or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    /// Action 8.
    Number7,
    /// Action 9.
    Number7Char,
    /// Action 10.
    Number7Text,
    /// Action 11.
    Number14,
    /// Action 12.
    Number14Char,
    /// Action 13.
    Number14Text,
    /// Action 14.
    AppendChar,
    /// Action 15.
    Text,
}

/// Result of running a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeOutput {
    /// A complete level value.
    Value(CitationValue),
    /// A character to append to the current value.
    Append(char),
}

impl Recipe {
    /// Select the recipe for an action code, `None` below 8.
    pub fn from_action(action: u8) -> Option<Self> {
        match action {
            8 => Some(Self::Number7),
            9 => Some(Self::Number7Char),
            10 => Some(Self::Number7Text),
            11 => Some(Self::Number14),
            12 => Some(Self::Number14Char),
            13 => Some(Self::Number14Text),
            14 => Some(Self::AppendChar),
            15 => Some(Self::Text),
            _ => None,
        }
    }

    /// Action code of this recipe.
    pub fn action(&self) -> u8 {
        match self {
            Self::Number7 => 8,
            Self::Number7Char => 9,
            Self::Number7Text => 10,
            Self::Number14 => 11,
            Self::Number14Char => 12,
            Self::Number14Text => 13,
            Self::AppendChar => 14,
            Self::Text => 15,
        }
    }

    /// Consume the recipe's payload from `cursor`.
    ///
    /// Returns `None` if the input ends first; the cursor is then empty.
    pub fn run(self, cursor: &mut ByteCursor) -> Option<RecipeOutput> {
        let value = match self {
            Self::Number7 => CitationValue::Number(cursor.pop_masked()? as u32),
            Self::Number7Char => {
                let number = cursor.pop_masked()? as u32;
                match cursor.pop()? {
                    TERMINATOR => CitationValue::Number(number),
                    byte => with_suffix(number, char::from(byte & 0x7f)),
                }
            }
            Self::Number7Text => {
                let number = cursor.pop_masked()? as u32;
                with_text(number, cursor.pop_terminated(TERMINATOR)?)
            }
            Self::Number14 => CitationValue::Number(cursor.pop_u14()? as u32),
            Self::Number14Char => {
                let number = cursor.pop_u14()? as u32;
                with_suffix(number, cursor.pop_char()?)
            }
            Self::Number14Text => {
                let number = cursor.pop_u14()? as u32;
                with_text(number, cursor.pop_terminated(TERMINATOR)?)
            }
            Self::AppendChar => return cursor.pop_char().map(RecipeOutput::Append),
            Self::Text => CitationValue::Text(cursor.pop_terminated(TERMINATOR)?),
        };
        Some(RecipeOutput::Value(value))
    }
}

fn with_suffix(number: u32, suffix: char) -> CitationValue {
    CitationValue::Text(format!("{}{}", number, suffix))
}

fn with_text(number: u32, text: String) -> CitationValue {
    if text.is_empty() {
        CitationValue::Number(number)
    } else {
        CitationValue::Text(format!("{}{}", number, text))
    }
}
