//! Decoder settings from the config file and command-line flags.

use oxicite_core::{Corpus, DecoderConfig, SigmaStyle};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Fields set in the JSON config file. Absent keys stay `None`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    corpus: Option<Corpus>,
    sigma: Option<SigmaStyle>,
}

/// Configuration sources, resolved per author file.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    file: FileConfig,
    corpus: Option<Corpus>,
    lunate: bool,
}

impl Settings {
    /// Load the optional JSON config file and keep the flag overrides.
    pub fn load(
        path: Option<&Path>,
        corpus: Option<Corpus>,
        lunate: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let file = match path {
            Some(path) => {
                let reader = BufReader::new(File::open(path)?);
                let config: FileConfig = serde_json::from_reader(reader)?;
                tracing::debug!(path = %path.display(), ?config, "loaded config file");
                config
            }
            None => FileConfig::default(),
        };
        Ok(Self {
            file,
            corpus,
            lunate,
        })
    }

    /// Configuration for one source file.
    ///
    /// Flags win over keys present in the config file, which win over
    /// the corpus named by the file.
    pub fn resolve(&self, source: &Path) -> DecoderConfig {
        let mut config = DecoderConfig::for_corpus(corpus_of(source).unwrap_or_default());
        if let Some(corpus) = self.file.corpus {
            config.corpus = corpus;
        }
        if let Some(sigma) = self.file.sigma {
            config.sigma = sigma;
        }
        if let Some(corpus) = self.corpus {
            config.corpus = corpus;
        }
        if self.lunate {
            config.sigma = SigmaStyle::Lunate;
        }
        config
    }
}

/// Corpus named by a file's stem (`tlg0012.txt` → TLG).
pub fn corpus_of(path: &Path) -> Option<Corpus> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(Corpus::from_file_stem)
}
