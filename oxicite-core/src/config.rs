//! Decoder configuration for the different disc corpora.

use crate::error::{CiteError, Result};
use std::fmt;
use std::str::FromStr;

/// The corpus an author file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Corpus {
    /// Thesaurus Linguae Graecae literary texts (`tlg`).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "tlg"))]
    Tlg,
    /// PHI Latin literary texts (`lat`).
    #[cfg_attr(feature = "serde", serde(rename = "lat"))]
    Latin,
    /// Greek inscriptions (`ins`).
    #[cfg_attr(feature = "serde", serde(rename = "ins"))]
    Inscriptions,
    /// Documentary papyri (`ddp`).
    #[cfg_attr(feature = "serde", serde(rename = "ddp"))]
    Papyri,
    /// Christian inscriptions (`chr`).
    #[cfg_attr(feature = "serde", serde(rename = "chr"))]
    Christian,
}

impl Corpus {
    /// All corpora, in file-prefix order.
    pub const ALL: [Corpus; 5] = [
        Corpus::Tlg,
        Corpus::Latin,
        Corpus::Inscriptions,
        Corpus::Papyri,
        Corpus::Christian,
    ];

    /// File name prefix used on the discs.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Tlg => "tlg",
            Self::Latin => "lat",
            Self::Inscriptions => "ins",
            Self::Papyri => "ddp",
            Self::Christian => "chr",
        }
    }

    /// Infer the corpus from a file stem such as `TLG0006` or `lat0474`.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        let lower = stem.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|corpus| lower.starts_with(corpus.prefix()))
    }

    /// Documentary corpora cite every text as `document` / `line`.
    pub fn is_documentary(&self) -> bool {
        matches!(self, Self::Inscriptions | Self::Papyri | Self::Christian)
    }

    /// Whether the running text starts in Latin rather than Greek.
    pub fn is_latin_base(&self) -> bool {
        matches!(self, Self::Latin)
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.prefix())
    }
}

impl FromStr for Corpus {
    type Err = CiteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|corpus| corpus.prefix().eq_ignore_ascii_case(s))
            .ok_or_else(|| CiteError::invalid_config(format!("unknown corpus '{}'", s)))
    }
}

/// How Greek sigmas are rendered in line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SigmaStyle {
    /// Keep medial/final sigma as encoded.
    #[default]
    Contextual,
    /// Render every sigma as a lunate sigma (`S3`).
    Lunate,
}

/// Configuration threaded into the decoders of one author pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Corpus of the author being decoded.
    pub corpus: Corpus,
    /// Sigma rendering for line text.
    pub sigma: SigmaStyle,
}

impl DecoderConfig {
    /// TLG literary texts.
    pub const TLG: Self = Self::for_corpus(Corpus::Tlg);

    /// PHI Latin texts.
    pub const LATIN: Self = Self::for_corpus(Corpus::Latin);

    /// Documentary papyri.
    pub const PAPYRI: Self = Self::for_corpus(Corpus::Papyri);

    /// Greek inscriptions.
    pub const INSCRIPTIONS: Self = Self::for_corpus(Corpus::Inscriptions);

    /// Default configuration for a corpus.
    pub const fn for_corpus(corpus: Corpus) -> Self {
        Self {
            corpus,
            sigma: SigmaStyle::Contextual,
        }
    }

    /// Same configuration with a different sigma style.
    pub const fn with_sigma(mut self, sigma: SigmaStyle) -> Self {
        self.sigma = sigma;
        self
    }
}
