//! Index file byte walk.
//!
//! ## Record layout
//!
//! ```text
//! 0x00                                 end of index
//! 0x01 u16 u16 0xef 0x80 <id> 0xff     author (length, start block, id)
//! 0x02 u16 u16 0xef 0x81 <id> 0xff     work
//! 0x03 u16 <control bytes>             section (block, citation run)
//! 0x08..=0x0b <control bytes>          citation range
//! 0x10 <subtype> <len> <chars>         description (0 author, 1 work name)
//! 0x11 <depth> <len> <chars>           level label of the current work
//! ```
//!
//! Citation runs use the same ID-byte encoding as the text files and are
//! consumed with [`ControlByteDecoder`] so multi-byte payloads stay aligned.

use crate::anomaly::IndexAnomaly;
use crate::skeleton::{AuthorSkeleton, WorkSkeleton};
use oxicite_citation::{CitationToken, ControlByteDecoder, LevelLabels, is_control_byte};
use oxicite_core::{ByteCursor, Corpus, DecoderConfig, HIERARCHY_DEPTH};

/// Record sentinels.
pub mod record {
    /// End of index.
    pub const END: u8 = 0x00;
    /// New author.
    pub const AUTHOR: u8 = 0x01;
    /// New work.
    pub const WORK: u8 = 0x02;
    /// Section start.
    pub const SECTION: u8 = 0x03;
    /// First citation range record.
    pub const RANGE_FIRST: u8 = 0x08;
    /// Last citation range record.
    pub const RANGE_LAST: u8 = 0x0b;
    /// Author or work description.
    pub const DESCRIPTION: u8 = 0x10;
    /// Level label.
    pub const LEVEL_LABEL: u8 = 0x11;

    /// Check whether a byte starts a known record.
    pub fn is_known(byte: u8) -> bool {
        matches!(
            byte,
            END | AUTHOR | WORK | SECTION | RANGE_FIRST..=RANGE_LAST | DESCRIPTION | LEVEL_LABEL
        )
    }
}

/// Identifier sentinel in author and work records.
pub const ID_SENTINEL: u8 = 0xef;

/// Description subtypes.
const AUTHOR_NAME: u8 = 0;
const WORK_NAME: u8 = 1;

/// Most stray bytes tolerated after a work name.
const MAX_STRAY_BYTES: usize = 2;

/// Labels forced on documentary corpora.
const DOCUMENTARY_LABELS: [(u8, &str); 2] = [(0, "line"), (1, "document")];

/// Reader for index files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexReader {
    config: DecoderConfig,
    decoder: ControlByteDecoder,
}

impl IndexReader {
    /// Create a reader for a corpus.
    pub fn new(corpus: Corpus) -> Self {
        Self::with_config(DecoderConfig::for_corpus(corpus))
    }

    /// Create a reader with a full decoder configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            decoder: ControlByteDecoder::new(),
        }
    }

    /// Read a single-author index.
    ///
    /// A second author record ends the walk with
    /// [`IndexAnomaly::UnexpectedAuthor`].
    pub fn read(&self, data: &[u8]) -> AuthorSkeleton {
        self.walk(data, true).into_iter().next().unwrap_or_default()
    }

    /// Read an index listing any number of authors.
    pub fn read_corpus(&self, data: &[u8]) -> Vec<AuthorSkeleton> {
        self.walk(data, false)
    }

    fn walk(&self, data: &[u8], single: bool) -> Vec<AuthorSkeleton> {
        let mut walk = Walk {
            decoder: self.decoder,
            cursor: ByteCursor::new(data),
            single,
            authors: Vec::new(),
        };
        walk.run();

        let mut authors = walk.authors;
        if self.config.corpus.is_documentary() {
            for work in authors.iter_mut().flat_map(|a| a.works.iter_mut()) {
                work.levels = documentary_labels();
            }
        }
        for author in &authors {
            tracing::debug!(
                author = %author.number,
                works = author.works.len(),
                anomalies = author.anomalies.len(),
                "read index"
            );
        }
        authors
    }
}

/// Read a single-author TLG index (convenience function).
pub fn read_index(data: &[u8]) -> AuthorSkeleton {
    IndexReader::default().read(data)
}

/// Read a multi-author TLG index (convenience function).
pub fn read_corpus_index(data: &[u8]) -> Vec<AuthorSkeleton> {
    IndexReader::default().read_corpus(data)
}

fn documentary_labels() -> LevelLabels {
    DOCUMENTARY_LABELS
        .iter()
        .map(|&(depth, label)| (depth, label.to_string()))
        .collect()
}

struct Walk {
    decoder: ControlByteDecoder,
    cursor: ByteCursor,
    single: bool,
    authors: Vec<AuthorSkeleton>,
}

impl Walk {
    fn run(&mut self) {
        while let Some(byte) = self.cursor.pop() {
            let offset = self.cursor.position() - 1;
            let step = match byte {
                record::END => break,
                record::AUTHOR => self.author(offset),
                record::WORK => self.work(offset),
                record::SECTION => self.section(offset),
                record::RANGE_FIRST..=record::RANGE_LAST => {
                    self.skip_citation_run();
                    Ok(())
                }
                record::DESCRIPTION => self.description(offset),
                record::LEVEL_LABEL => self.level_label(offset),
                _ => Err(IndexAnomaly::UnknownRecord { byte, offset }),
            };
            if let Err(anomaly) = step {
                self.note(anomaly);
                break;
            }
        }
    }

    fn current_author(&mut self) -> &mut AuthorSkeleton {
        if self.authors.is_empty() {
            self.authors.push(AuthorSkeleton::default());
        }
        let last = self.authors.len() - 1;
        &mut self.authors[last]
    }

    fn current_work(&mut self) -> Option<&mut WorkSkeleton> {
        self.authors.last_mut()?.works.last_mut()
    }

    fn note(&mut self, anomaly: IndexAnomaly) {
        tracing::warn!(kind = anomaly.kind(), "{}", anomaly);
        self.current_author().anomalies.push(anomaly);
    }

    fn author(&mut self, offset: usize) -> Result<(), IndexAnomaly> {
        let start_block = self.fixed_fields(record::AUTHOR, offset)?;
        let number = self.identifier(record::AUTHOR, offset)?;
        tracing::trace!(%number, offset, "author record");

        // Works listed before the author record belong to it
        if let Some(last) = self.authors.last_mut()
            && last.number.is_empty()
        {
            for work in &mut last.works {
                work.author_number.clone_from(&number);
            }
            last.number = number;
            last.start_block = start_block;
            return Ok(());
        }
        if self.single && !self.authors.is_empty() {
            return Err(IndexAnomaly::UnexpectedAuthor { offset });
        }

        self.authors.push(AuthorSkeleton {
            number,
            start_block,
            ..AuthorSkeleton::default()
        });
        Ok(())
    }

    fn work(&mut self, offset: usize) -> Result<(), IndexAnomaly> {
        let start_block = self.fixed_fields(record::WORK, offset)?;
        let work_number = self.identifier(record::WORK, offset)?;
        tracing::trace!(%work_number, offset, "work record");

        let author = self.current_author();
        let work = WorkSkeleton {
            author_number: author.number.clone(),
            work_number,
            start_block,
            ..WorkSkeleton::default()
        };
        author.works.push(work);
        Ok(())
    }

    fn section(&mut self, offset: usize) -> Result<(), IndexAnomaly> {
        self.cursor
            .pop_u16_be()
            .ok_or(IndexAnomaly::Truncated {
                record: record::SECTION,
                offset,
            })?;
        self.skip_citation_run();
        if let Some(work) = self.current_work() {
            work.sections += 1;
        }
        Ok(())
    }

    fn description(&mut self, offset: usize) -> Result<(), IndexAnomaly> {
        let truncated = IndexAnomaly::Truncated {
            record: record::DESCRIPTION,
            offset,
        };
        let subtype = self.cursor.pop().ok_or(truncated.clone())?;
        let name = self.cursor.pop_pascal().ok_or(truncated)?;

        match subtype {
            AUTHOR_NAME => self.current_author().name = name,
            WORK_NAME => {
                match self.current_work() {
                    Some(work) => work.name = name,
                    None => self.note(IndexAnomaly::NoCurrentWork {
                        record: record::DESCRIPTION,
                        offset,
                    }),
                }
                self.skip_stray_bytes();
            }
            _ => self.note(IndexAnomaly::UnknownDescription { subtype, offset }),
        }
        Ok(())
    }

    fn level_label(&mut self, offset: usize) -> Result<(), IndexAnomaly> {
        let truncated = IndexAnomaly::Truncated {
            record: record::LEVEL_LABEL,
            offset,
        };
        let depth = self.cursor.pop().ok_or(truncated.clone())?;
        let label = self.cursor.pop_pascal().ok_or(truncated)?;

        if depth as usize >= HIERARCHY_DEPTH {
            self.note(IndexAnomaly::LabelOutOfRange { depth, offset });
            return Ok(());
        }
        match self.current_work() {
            Some(work) => {
                work.levels.insert(depth, label);
            }
            None => self.note(IndexAnomaly::NoCurrentWork {
                record: record::LEVEL_LABEL,
                offset,
            }),
        }
        Ok(())
    }

    /// Read `u16 length, u16 start block`, returning the start block.
    fn fixed_fields(&mut self, record: u8, offset: usize) -> Result<u16, IndexAnomaly> {
        let truncated = IndexAnomaly::Truncated { record, offset };
        self.cursor.pop_u16_be().ok_or(truncated.clone())?;
        self.cursor.pop_u16_be().ok_or(truncated)
    }

    fn identifier(&mut self, record: u8, offset: usize) -> Result<String, IndexAnomaly> {
        if self.cursor.peek() != Some(ID_SENTINEL) {
            return Err(IndexAnomaly::MissingIdentifier { record, offset });
        }
        match self.decoder.decode_one(&mut self.cursor) {
            CitationToken::Metadata(field) => Ok(field.value.to_string()),
            CitationToken::Diagnostic(_) => Err(IndexAnomaly::Truncated { record, offset }),
            _ => Err(IndexAnomaly::MissingIdentifier { record, offset }),
        }
    }

    fn skip_citation_run(&mut self) {
        while self.cursor.peek().is_some_and(is_control_byte) {
            let token = self.decoder.decode_one(&mut self.cursor);
            tracing::trace!(%token, "skipped citation");
        }
    }

    /// Tolerate one or two stray bytes before the next record sentinel.
    ///
    /// A stray byte is only recognised when it is not itself a record
    /// sentinel. A stray `0x03` or `0x08` is read as a section or range
    /// record, with no `SkippedBytes` anomaly.
    fn skip_stray_bytes(&mut self) {
        match self.cursor.peek() {
            None => return,
            Some(byte) if record::is_known(byte) => return,
            Some(_) => {}
        }
        for count in 1..=MAX_STRAY_BYTES {
            if self.cursor.peek_at(count).is_some_and(record::is_known) {
                let offset = self.cursor.position();
                self.cursor.skip(count);
                self.note(IndexAnomaly::SkippedBytes { offset, count });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(record: u8, tag: u8, id: &str) -> Vec<u8> {
        let mut bytes = vec![record, 0x00, 0x20, 0x00, 0x01, ID_SENTINEL, tag];
        bytes.extend_from_slice(id.as_bytes());
        bytes.push(0xff);
        bytes
    }

    fn pascal(record: u8, selector: u8, text: &str) -> Vec<u8> {
        let mut bytes = vec![record, selector, text.len() as u8];
        bytes.extend_from_slice(text.as_bytes());
        bytes
    }

    #[test]
    fn test_is_known() {
        let known: Vec<u8> = (0u8..=0xff).filter(|&b| record::is_known(b)).collect();
        assert_eq!(known, [0x00, 0x01, 0x02, 0x03, 0x08, 0x09, 0x0a, 0x0b, 0x10, 0x11]);
    }

    #[test]
    fn test_author_record() {
        let mut bytes = header(record::AUTHOR, 0x80, "0012");
        bytes.extend(pascal(record::DESCRIPTION, 0, "Homerus"));
        let author = read_index(&bytes);
        assert_eq!(author.number, "0012");
        assert_eq!(author.name, "Homerus");
        assert_eq!(author.start_block, 1);
        assert!(author.anomalies.is_empty());
    }

    #[test]
    fn test_sections_are_counted() {
        let mut bytes = header(record::AUTHOR, 0x80, "0012");
        bytes.extend(header(record::WORK, 0x81, "001"));
        bytes.extend_from_slice(&[record::SECTION, 0x00, 0x01, 0x81, 0x91, 0x9f, b'a', 0xff]);
        bytes.extend_from_slice(&[record::SECTION, 0x00, 0x02, 0x92]);
        bytes.extend_from_slice(&[0x08, 0x9b, 0x81, 0x80, 0x0a, 0x83]);
        bytes.extend(pascal(record::LEVEL_LABEL, 0, "line"));
        bytes.push(record::END);

        let author = read_index(&bytes);
        assert!(author.anomalies.is_empty(), "{:?}", author.anomalies);
        assert_eq!(author.works[0].sections, 2);
        assert_eq!(author.works[0].label(0), Some("line"));
    }

    #[test]
    fn test_stray_sentinel_byte_is_read_as_record() {
        let mut bytes = header(record::AUTHOR, 0x80, "0012");
        bytes.extend(header(record::WORK, 0x81, "001"));
        bytes.extend(pascal(record::DESCRIPTION, WORK_NAME, "Ilias"));
        bytes.push(record::RANGE_FIRST);
        bytes.extend(pascal(record::LEVEL_LABEL, 0, "line"));
        bytes.push(record::END);

        let author = read_index(&bytes);
        assert!(author.anomalies.is_empty(), "{:?}", author.anomalies);
        assert_eq!(author.works[0].label(0), Some("line"));

        let mut bytes = header(record::AUTHOR, 0x80, "0012");
        bytes.extend(header(record::WORK, 0x81, "001"));
        bytes.extend(pascal(record::DESCRIPTION, WORK_NAME, "Ilias"));
        bytes.push(0x20);
        bytes.extend(pascal(record::LEVEL_LABEL, 0, "line"));
        bytes.push(record::END);

        let author = read_index(&bytes);
        assert!(matches!(
            author.anomalies[..],
            [IndexAnomaly::SkippedBytes { count: 1, .. }]
        ));
    }

    #[test]
    fn test_missing_identifier() {
        let bytes = [record::AUTHOR, 0x00, 0x20, 0x00, 0x01, b'0', b'0'];
        let author = read_index(&bytes);
        assert_eq!(
            author.anomalies,
            [IndexAnomaly::MissingIdentifier {
                record: record::AUTHOR,
                offset: 0
            }]
        );
    }

    #[test]
    fn test_truncated_records() {
        let full = {
            let mut bytes = header(record::AUTHOR, 0x80, "0012");
            bytes.extend(pascal(record::LEVEL_LABEL, 0, "line"));
            bytes
        };
        // Every proper prefix ending inside a record yields exactly one fatal anomaly
        for len in 1..full.len() {
            let author = read_index(&full[..len]);
            assert!(author.anomalies.len() <= 1, "prefix {}", len);
            if let Some(anomaly) = author.anomalies.first() {
                assert!(anomaly.is_fatal() || len == full.len());
            }
        }
    }

    #[test]
    fn test_label_out_of_range() {
        let mut bytes = header(record::WORK, 0x81, "001");
        bytes.extend(pascal(record::LEVEL_LABEL, 6, "volume"));
        let author = read_index(&bytes);
        assert_eq!(
            author.anomalies,
            [IndexAnomaly::LabelOutOfRange { depth: 6, offset: 11 }]
        );
        assert!(author.works[0].levels.is_empty());
    }

    #[test]
    fn test_work_before_author() {
        let mut bytes = header(record::WORK, 0x81, "001");
        bytes.extend(header(record::AUTHOR, 0x80, "0012"));
        let author = read_index(&bytes);
        assert_eq!(author.number, "0012");
        assert_eq!(author.works[0].author_number, "0012");
    }
}
