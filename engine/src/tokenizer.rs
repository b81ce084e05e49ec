use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD_BREAK: Regex = Regex::new(r"[^0-9A-Za-z_]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Stop words loaded from a one-word-per-line file. Matching is
/// case-sensitive against already lower-cased tokens, so the file is
/// expected to hold lower-case entries.
#[derive(Debug, Clone, Default)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    /// Load from `path`. An unreadable file is logged and treated as an
    /// empty set; indexing proceeds without stop-word filtering.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_lines(&text),
            Err(error) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    %error,
                    "could not read stop word file, continuing without stop words"
                );
                Self::default()
            }
        }
    }

    pub fn from_lines(text: &str) -> Self {
        Self(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stem one isolated word.
pub fn stem(word: &str) -> String {
    STEMMER.stem(&word.to_lowercase()).to_string()
}

/// Lower-case `text` (after NFKC folding) and split it into words. A word
/// is a run of ASCII letters, digits or underscores.
pub(crate) fn words(text: &str) -> Vec<String> {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    WORD_BREAK
        .split(&folded)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize body text into `(stem, position)` pairs.
///
/// Positions index the pre-filter token stream: stop words, empty splits
/// and tokens that stem to nothing all advance the counter without
/// producing output, so stored positions stay aligned with the source
/// text. The phrase matcher relies on the same discipline.
pub fn tokenize(text: &str, stopwords: &StopWords) -> Vec<(String, usize)> {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for (position, token) in WORD_BREAK.split(&folded).enumerate() {
        if token.is_empty() || stopwords.contains(token) {
            continue;
        }
        let stem = STEMMER.stem(token);
        if stem.is_empty() {
            continue;
        }
        tokens.push((stem.to_string(), position));
    }
    tokens
}
