use crate::tokenizer::{self, StopWords};

/// A parsed query phrase: an ordered list of stems. Bare words come out
/// as single-stem phrases; quoted spans keep their stems in source order.
pub type Phrase = Vec<String>;

/// Word-token budget for a whole query. Every word counts, quoted or not.
pub const MAX_QUERY_WORDS: usize = 10;

/// A phrase never keeps more than this many stems.
pub const MAX_PHRASE_STEMS: usize = 3;

/// Split a raw query into phrases.
///
/// Units are bare words and `"`-delimited spans; an unbalanced quote is
/// closed at the end of the string. Each unit is tokenized with the same
/// rules as body text (lower-case, non-word split, stop-word drop, stem),
/// then capped at [`MAX_PHRASE_STEMS`]; the query as a whole is capped at
/// [`MAX_QUERY_WORDS`] word-tokens. Units left empty by filtering are
/// discarded.
pub fn parse_query(raw: &str, stopwords: &StopWords) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut budget = MAX_QUERY_WORDS;

    for unit in units(raw) {
        if budget == 0 {
            break;
        }
        let mut stems = Vec::new();
        for word in tokenizer::words(&unit) {
            if budget == 0 {
                break;
            }
            budget -= 1;
            if stopwords.contains(&word) {
                continue;
            }
            let stem = tokenizer::stem(&word);
            if stem.is_empty() {
                continue;
            }
            if stems.len() < MAX_PHRASE_STEMS {
                stems.push(stem);
            }
        }
        if !stems.is_empty() {
            phrases.push(stems);
        }
    }
    phrases
}

/// Chop the raw query into bare words and quoted spans.
fn units(raw: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in raw.chars() {
        if c == '"' {
            if !current.is_empty() {
                units.push(std::mem::take(&mut current));
            }
            in_quotes = !in_quotes;
        } else if !in_quotes && c.is_whitespace() {
            if !current.is_empty() {
                units.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        units.push(current);
    }
    units
}
