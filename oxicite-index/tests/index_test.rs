//! Index reader integration tests.

use oxicite_citation::{DecodeAnomaly, decode_author};
use oxicite_core::{Corpus, DecoderConfig};
use oxicite_index::{IndexAnomaly, IndexReader, read_corpus_index, read_index};

/// Minimal index builder.
#[derive(Default)]
struct Idt {
    bytes: Vec<u8>,
}

impl Idt {
    fn record(mut self, sentinel: u8, tag: u8, id: &str) -> Self {
        self.bytes
            .extend_from_slice(&[sentinel, 0x00, 0x40, 0x00, 0x02, 0xef, tag]);
        self.bytes.extend_from_slice(id.as_bytes());
        self.bytes.push(0xff);
        self
    }

    fn author(self, id: &str) -> Self {
        self.record(0x01, 0x80, id)
    }

    fn work(self, id: &str) -> Self {
        self.record(0x02, 0x81, id)
    }

    fn pascal(mut self, sentinel: u8, selector: u8, text: &str) -> Self {
        self.bytes
            .extend_from_slice(&[sentinel, selector, text.len() as u8]);
        self.bytes.extend_from_slice(text.as_bytes());
        self
    }

    fn author_name(self, name: &str) -> Self {
        self.pascal(0x10, 0, name)
    }

    fn work_name(self, name: &str) -> Self {
        self.pascal(0x10, 1, name)
    }

    fn label(self, depth: u8, label: &str) -> Self {
        self.pascal(0x11, depth, label)
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    fn end(self) -> Vec<u8> {
        self.raw(&[0x00]).bytes
    }
}

#[test]
fn test_minimal_author() {
    let idt = Idt::default()
        .author("0006")
        .work("001")
        .work_name("Alpha")
        .label(0, "line")
        .end();

    let author = read_index(&idt);
    assert_eq!(author.number, "0006");
    assert_eq!(author.works.len(), 1);

    let work = &author.works[0];
    assert_eq!(work.author_number, "0006");
    assert_eq!(work.work_number, "001");
    assert_eq!(work.name, "Alpha");
    assert_eq!(
        work.levels.iter().collect::<Vec<_>>(),
        [(&0, &"line".to_string())]
    );
    assert!(author.anomalies.is_empty());
}

#[test]
fn test_multiple_works_and_labels() {
    let idt = Idt::default()
        .author("0012")
        .author_name("Homerus")
        .work("001")
        .work_name("Ilias")
        .label(0, "line")
        .label(1, "book")
        .work("002")
        .work_name("Odyssea")
        .label(0, "line")
        .label(1, "book")
        .end();

    let author = read_index(&idt);
    assert_eq!(author.name, "Homerus");
    let names: Vec<_> = author.works.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Ilias", "Odyssea"]);
    assert!(author.works.iter().all(|w| w.levels.len() == 2));
}

#[test]
fn test_stray_bytes_after_work_name() {
    for stray in [&[0x20][..], &[0x20, 0x7e][..]] {
        let idt = Idt::default()
            .author("0006")
            .work("001")
            .work_name("Alpha")
            .raw(stray)
            .label(0, "line")
            .end();

        let author = read_index(&idt);
        assert_eq!(author.works[0].label(0), Some("line"));
        assert!(matches!(
            author.anomalies[..],
            [IndexAnomaly::SkippedBytes { count, .. }] if count == stray.len()
        ));
    }
}

#[test]
fn test_three_stray_bytes_stop_the_walk() {
    let idt = Idt::default()
        .author("0006")
        .work("001")
        .work_name("Alpha")
        .raw(&[0x20, 0x21, 0x22])
        .label(0, "line")
        .end();

    let author = read_index(&idt);
    assert_eq!(author.works.len(), 1);
    assert!(author.works[0].levels.is_empty());
    assert!(author.is_partial());
    assert!(matches!(
        author.anomalies[..],
        [IndexAnomaly::UnknownRecord { byte: 0x20, .. }]
    ));
}

#[test]
fn test_documentary_override() {
    let idt = Idt::default()
        .author("0001")
        .work("001")
        .work_name("Attica")
        .label(0, "line")
        .label(1, "face")
        .label(2, "fragment")
        .end();

    for corpus in [Corpus::Inscriptions, Corpus::Papyri, Corpus::Christian] {
        let author = IndexReader::new(corpus).read(&idt);
        let labels: Vec<_> = author.works[0]
            .levels
            .iter()
            .map(|(depth, label)| (*depth, label.as_str()))
            .collect();
        assert_eq!(labels, [(0, "line"), (1, "document")], "{}", corpus);
    }

    let author = IndexReader::new(Corpus::Tlg).read(&idt);
    assert_eq!(author.works[0].levels.len(), 3);
}

#[test]
fn test_single_author_rejects_second() {
    let idt = Idt::default()
        .author("0006")
        .work("001")
        .author("0007")
        .work("001")
        .end();

    let author = read_index(&idt);
    assert_eq!(author.number, "0006");
    assert_eq!(author.works.len(), 1);
    assert!(matches!(
        author.anomalies[..],
        [IndexAnomaly::UnexpectedAuthor { .. }]
    ));

    let authors = read_corpus_index(&idt);
    let numbers: Vec<_> = authors.iter().map(|a| a.number.as_str()).collect();
    assert_eq!(numbers, ["0006", "0007"]);
    assert!(authors.iter().all(|a| a.anomalies.is_empty()));
}

#[test]
fn test_unknown_record_keeps_partial_skeleton() {
    let idt = Idt::default()
        .author("0006")
        .work("001")
        .work_name("Alpha")
        .raw(&[0x42, 0x42, 0x42, 0x42])
        .work("002")
        .end();

    let author = read_index(&idt);
    assert_eq!(author.works.len(), 1);
    assert!(author.is_partial());
}

#[test]
fn test_labels_feed_text_decoder() {
    let idt = Idt::default()
        .author("0012")
        .work("001")
        .work_name("Ilias")
        .label(0, "line")
        .label(1, "book")
        .end();
    let author = read_index(&idt);

    // New work, book 1 line 1, then a chapter level the index does not name
    let text = [0xe0, 0x81, 0x91, 0x81, b'a', 0xa2, b'b'];
    let decoded = decode_author(&text, &DecoderConfig::TLG, Some(&author));

    assert_eq!(decoded.works[0].name.as_deref(), Some("Ilias"));
    assert_eq!(decoded.works[0].labels.len(), 2);
    assert_eq!(decoded.works[0].depth(), 2);
    assert_eq!(
        decoded.diagnostics,
        [DecodeAnomaly::UnlabelledLevel { work: 1, level: 2 }]
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_skeleton_json() {
    let idt = Idt::default()
        .author("0006")
        .work("001")
        .work_name("Alpha")
        .label(0, "line")
        .end();
    let json = serde_json::to_string(&read_index(&idt)).expect("serialize");
    assert!(json.contains("\"work_number\":\"001\""));
    assert!(json.contains("\"0\":\"line\""));
}
