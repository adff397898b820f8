//! Control byte decoder.
//!
//! A control byte is any byte with the high bit set. Its bits are read as
//!
//! ```text
//!   7   6 5 4   3 2 1 0
//! ┌───┬───────┬─────────┐
//! │ 1 │ level │ action  │
//! └───┴───────┴─────────┘
//! ```
//!
//! Levels 0-5 address the citation hierarchy, level 6 is the metadata
//! channel, and level 7 carries stream control (`0xf0` end of file, `0xfe`
//! end of block, `0xff` string terminator).

use crate::anomaly::DecodeAnomaly;
use crate::metadata::{METADATA_LEVEL, MetadataChannelDecoder};
use crate::recipe::{Recipe, RecipeOutput};
use crate::token::CitationToken;
use oxicite_core::{ByteCursor, CitationValue, TERMINATOR};

/// Level number of the stream-control codes.
pub const CONTROL_LEVEL: u8 = 7;

/// End of file marker.
pub const END_OF_FILE: u8 = 0xf0;

/// End of block marker.
pub const END_OF_BLOCK: u8 = 0xfe;

/// Check whether a byte is a control byte.
#[inline]
pub fn is_control_byte(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// Split a control byte into `(level, action)`.
#[inline]
pub fn split_control_byte(byte: u8) -> (u8, u8) {
    ((byte & 0x70) >> 4, byte & 0x0f)
}

/// Decoder turning one control byte (plus its payload) into a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlByteDecoder {
    metadata: MetadataChannelDecoder,
}

impl ControlByteDecoder {
    /// Create a new control byte decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next control byte and its payload.
    ///
    /// Never fails: truncated or unknown input yields a
    /// [`CitationToken::Diagnostic`] placeholder, and the cursor is left
    /// wherever decoding stopped.
    pub fn decode_one(&self, cursor: &mut ByteCursor) -> CitationToken {
        let offset = cursor.position();
        let Some(byte) = cursor.pop() else {
            return CitationToken::Diagnostic(DecodeAnomaly::truncated(0, 0, offset));
        };
        if !is_control_byte(byte) {
            return CitationToken::Diagnostic(DecodeAnomaly::NotAControlByte { byte, offset });
        }

        let (level, action) = split_control_byte(byte);
        match level {
            METADATA_LEVEL => self.metadata.decode_metadata(cursor, action),
            CONTROL_LEVEL => match byte {
                END_OF_FILE => CitationToken::EndOfFile,
                END_OF_BLOCK => CitationToken::EndOfBlock,
                TERMINATOR => CitationToken::Diagnostic(DecodeAnomaly::StrayTerminator { offset }),
                _ => CitationToken::Diagnostic(DecodeAnomaly::unrecognized(
                    level, action, offset, None,
                )),
            },
            _ => Self::decode_hierarchy(cursor, level, action, offset),
        }
    }

    fn decode_hierarchy(
        cursor: &mut ByteCursor,
        level: u8,
        action: u8,
        offset: usize,
    ) -> CitationToken {
        let recipe = match action {
            0 => return CitationToken::IncrementLevel { level },
            1..=7 => {
                return CitationToken::SetLevel {
                    level,
                    value: CitationValue::Number(action as u32),
                };
            }
            _ => Recipe::from_action(action),
        };

        match recipe.and_then(|recipe| recipe.run(cursor)) {
            Some(RecipeOutput::Value(value)) => CitationToken::SetLevel { level, value },
            Some(RecipeOutput::Append(suffix)) => CitationToken::AppendToLevel { level, suffix },
            None => CitationToken::Diagnostic(DecodeAnomaly::truncated(level, action, offset)),
        }
    }

    /// Iterate over the control runs of a byte stream.
    ///
    /// Literal bytes are skipped. Each item carries the offset of the
    /// control byte it was decoded from.
    pub fn tokens(&self, data: &[u8]) -> Tokens {
        Tokens {
            decoder: *self,
            cursor: ByteCursor::new(data),
            done: false,
        }
    }
}

/// Iterator over `(offset, token)` pairs, see [`ControlByteDecoder::tokens`].
#[derive(Debug, Clone)]
pub struct Tokens {
    decoder: ControlByteDecoder,
    cursor: ByteCursor,
    done: bool,
}

impl Iterator for Tokens {
    type Item = (usize, CitationToken);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while !is_control_byte(self.cursor.peek()?) {
            self.cursor.pop();
        }
        let offset = self.cursor.position();
        let token = self.decoder.decode_one(&mut self.cursor);
        self.done = token == CitationToken::EndOfFile;
        Some((offset, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{MetadataField, MetadataKey};

    fn decode(bytes: &[u8]) -> (CitationToken, ByteCursor) {
        let mut cursor = ByteCursor::new(bytes);
        let token = ControlByteDecoder::new().decode_one(&mut cursor);
        (token, cursor)
    }

    #[test]
    fn test_split() {
        assert_eq!(split_control_byte(0x81), (0, 1));
        assert_eq!(split_control_byte(0x90), (1, 0));
        assert_eq!(split_control_byte(0xef), (6, 15));
        assert_eq!(split_control_byte(0xff), (7, 15));
    }

    #[test]
    fn test_set_level_small_actions() {
        for level in 0u8..6 {
            for action in 1u8..8 {
                let byte = 0x80 | (level << 4) | action;
                let (token, cursor) = decode(&[byte, 0x41, 0x42]);
                assert_eq!(
                    token,
                    CitationToken::SetLevel {
                        level,
                        value: CitationValue::Number(action as u32)
                    }
                );
                assert_eq!(cursor.position(), 1, "byte {:#04x}", byte);
            }
        }
    }

    #[test]
    fn test_increment_action() {
        for level in 0u8..6 {
            let byte = 0x80 | (level << 4);
            let (token, cursor) = decode(&[byte, 0x41]);
            assert_eq!(token, CitationToken::IncrementLevel { level });
            assert_eq!(cursor.position(), 1);
        }
    }

    #[test]
    fn test_recipe_11_all_values() {
        for n in 0u32..=16383 {
            let bytes = [0x9b, 0x80 | (n >> 7) as u8, 0x80 | (n & 0x7f) as u8];
            let (token, cursor) = decode(&bytes);
            assert_eq!(
                token,
                CitationToken::SetLevel {
                    level: 1,
                    value: CitationValue::Number(n)
                }
            );
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn test_append_recipe() {
        let (token, _) = decode(&[0x8e, b'b' | 0x80]);
        assert_eq!(token, CitationToken::AppendToLevel { level: 0, suffix: 'b' });
    }

    #[test]
    fn test_truncation_placeholders() {
        for byte in 0x80u8..=0xff {
            let (level, action) = split_control_byte(byte);
            let (token, cursor) = decode(&[byte]);
            assert!(cursor.is_empty());
            if level < 6 && action >= 8 {
                assert_eq!(
                    token,
                    CitationToken::Diagnostic(DecodeAnomaly::truncated(level, action, 0))
                );
            }
        }
    }

    #[test]
    fn test_stream_control() {
        assert_eq!(decode(&[END_OF_FILE]).0, CitationToken::EndOfFile);
        assert_eq!(decode(&[END_OF_BLOCK]).0, CitationToken::EndOfBlock);
        assert_eq!(
            decode(&[0xff]).0,
            CitationToken::Diagnostic(DecodeAnomaly::StrayTerminator { offset: 0 })
        );
        assert!(matches!(
            decode(&[0xf3]).0,
            CitationToken::Diagnostic(DecodeAnomaly::UnrecognizedAction { level: 7, action: 3, .. })
        ));
    }

    #[test]
    fn test_literal_byte() {
        assert_eq!(
            decode(b"a").0,
            CitationToken::Diagnostic(DecodeAnomaly::NotAControlByte { byte: b'a', offset: 0 })
        );
    }

    #[test]
    fn test_empty_cursor() {
        assert!(matches!(
            decode(&[]).0,
            CitationToken::Diagnostic(DecodeAnomaly::Truncated { .. })
        ));
    }

    #[test]
    fn test_tokens_skip_literals() {
        let data = b"\x81abc\x90de\xf0\x81";
        let tokens: Vec<_> = ControlByteDecoder::new().tokens(data).collect();
        assert_eq!(
            tokens,
            [
                (
                    0,
                    CitationToken::SetLevel {
                        level: 0,
                        value: CitationValue::Number(1)
                    }
                ),
                (4, CitationToken::IncrementLevel { level: 1 }),
                (7, CitationToken::EndOfFile),
            ]
        );
    }

    #[test]
    fn test_metadata_routing() {
        let mut bytes = vec![0xef];
        bytes.extend_from_slice(b"eJohn Doe, Works");
        bytes.push(TERMINATOR);
        let (token, cursor) = decode(&bytes);
        assert_eq!(
            token,
            CitationToken::Metadata(MetadataField::new(
                MetadataKey::PublicationInfo,
                "John Doe, Works"
            ))
        );
        assert!(cursor.is_empty());
    }
}
