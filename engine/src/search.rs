use crate::fetch::{Fetcher, UNKNOWN};
use crate::index::{DocId, Posting, PostingList};
use crate::query::{self, Phrase};
use crate::store::Store;
use crate::tokenizer::StopWords;
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;

/// Ranked results are cut to this many documents.
pub const MAX_RESULTS: usize = 50;

/// Keywords shown per result.
pub const RESULT_KEYWORDS: usize = 5;

/// Parent and child links shown per result.
pub const MAX_NEIGHBOR_LINKS: usize = 10;

/// Displayed title for documents that had none.
pub const UNTITLED: &str = "Untitled";

const TITLE_BOOST: f64 = 1.5;

/// One assembled result row.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub url: String,
    pub title: String,
    pub last_modified: String,
    pub size: u64,
    /// Top keywords of the document as `(term, frequency)`, highest
    /// frequency first, ties by term order.
    pub keywords: Vec<(String, u32)>,
    pub parent_links: Vec<String>,
    pub child_links: Vec<String>,
    pub score: f64,
    /// `round(score * 100)` clamped to 0..=100.
    pub normalized_score: u32,
}

/// Read-side snapshot of the last committed index state, built once per
/// query session.
///
/// Everything scoring needs lives in memory: posting lists, idf per term,
/// max term frequency per document, per-document keyword lists, the
/// docID to URL reverse map and both link-neighborhood directions.
/// Scanning the stored maps per result row instead would degrade
/// quadratically with index size.
pub struct Searcher {
    num_docs: usize,
    postings: HashMap<String, PostingList>,
    idf: HashMap<String, f64>,
    max_tf: HashMap<DocId, u32>,
    /// Sorted by descending frequency, then term.
    doc_terms: HashMap<DocId, Vec<(String, u32)>>,
    urls: HashMap<DocId, String>,
    titles: HashMap<DocId, String>,
    titles_lower: HashMap<DocId, String>,
    children: HashMap<DocId, Vec<String>>,
    parents: HashMap<DocId, Vec<String>>,
    stopwords: StopWords,
}

impl Searcher {
    pub fn open(store: &Store, stopwords: StopWords) -> Result<Self> {
        let mut urls = HashMap::new();
        let mut page_ids = HashMap::new();
        for entry in store.pages.iter() {
            let (url, doc_id) = entry?;
            urls.insert(doc_id, url.clone());
            page_ids.insert(url, doc_id);
        }
        let num_docs = urls.len();

        let mut titles = HashMap::new();
        let mut titles_lower = HashMap::new();
        for entry in store.titles.iter() {
            let (doc_id, title) = entry?;
            titles_lower.insert(doc_id, title.to_lowercase());
            titles.insert(doc_id, title);
        }

        let mut postings = HashMap::new();
        let mut idf = HashMap::new();
        let mut max_tf: HashMap<DocId, u32> = HashMap::new();
        let mut doc_terms: HashMap<DocId, Vec<(String, u32)>> = HashMap::new();
        for entry in store.postings.iter() {
            let (term, list) = entry?;
            let df = list.len();
            if df > 0 {
                idf.insert(term.clone(), (num_docs as f64 / df as f64).ln());
            }
            for (&doc_id, posting) in &list {
                doc_terms
                    .entry(doc_id)
                    .or_default()
                    .push((term.clone(), posting.frequency));
                let max = max_tf.entry(doc_id).or_insert(0);
                if posting.frequency > *max {
                    *max = posting.frequency;
                }
            }
            postings.insert(term, list);
        }
        for terms in doc_terms.values_mut() {
            terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        }

        let mut children: HashMap<DocId, Vec<String>> = HashMap::new();
        let mut parents: HashMap<DocId, Vec<String>> = HashMap::new();
        for entry in store.links.iter() {
            let ((parent, child_url), ()) = entry?;
            if let Some(&child_id) = page_ids.get(&child_url) {
                if let Some(parent_url) = urls.get(&parent) {
                    parents.entry(child_id).or_default().push(parent_url.clone());
                }
            }
            children.entry(parent).or_default().push(child_url);
        }

        Ok(Self {
            num_docs,
            postings,
            idf,
            max_tf,
            doc_terms,
            urls,
            titles,
            titles_lower,
            children,
            parents,
            stopwords,
        })
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// Parse, gate, score, rank and assemble. Live metadata resolution
    /// goes through `fetcher`, best effort.
    pub fn search(&self, raw_query: &str, fetcher: &dyn Fetcher) -> Vec<SearchResult> {
        self.ranked(raw_query)
            .into_iter()
            .map(|(doc_id, score)| self.assemble(doc_id, score, fetcher))
            .collect()
    }

    /// The scoring half of `search`: gated documents with their combined
    /// scores, best first, ties by ascending docID, cut to
    /// [`MAX_RESULTS`].
    pub fn ranked(&self, raw_query: &str) -> Vec<(DocId, f64)> {
        let phrases = query::parse_query(raw_query, &self.stopwords);
        if phrases.is_empty() {
            return Vec::new();
        }

        let mut scored = Vec::new();
        'docs: for &doc_id in self.urls.keys() {
            for phrase in &phrases {
                if !self.matches_phrase(doc_id, phrase) {
                    continue 'docs;
                }
            }
            let doc_vector = self.document_vector(doc_id);
            let score = phrases
                .iter()
                .map(|phrase| self.phrase_score(phrase, &doc_vector))
                .sum();
            scored.push((doc_id, score));
        }

        scored.sort_by(|a: &(DocId, f64), b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(MAX_RESULTS);
        scored
    }

    /// Phrase gate: a single stem needs any posting in the document; a
    /// longer phrase needs a starting position from which every stem
    /// occurs at the next consecutive position.
    fn matches_phrase(&self, doc_id: DocId, phrase: &Phrase) -> bool {
        let Some(first) = phrase.first() else {
            return false;
        };
        let Some(first_posting) = self.posting(first, doc_id) else {
            return false;
        };
        if phrase.len() == 1 {
            return true;
        }
        let rest: Option<Vec<&Posting>> = phrase[1..]
            .iter()
            .map(|stem| self.posting(stem, doc_id))
            .collect();
        let Some(rest) = rest else {
            return false;
        };
        first_posting.positions.iter().any(|&start| {
            rest.iter()
                .enumerate()
                .all(|(offset, posting)| posting.contains(start + offset as u32 + 1))
        })
    }

    fn posting(&self, stem: &str, doc_id: DocId) -> Option<&Posting> {
        self.postings.get(stem)?.get(&doc_id)
    }

    /// Document vector over the terms of `doc_id`:
    /// `(tf / max_tf) * idf`, boosted 1.5x when the lower-cased title
    /// contains the term as a substring.
    fn document_vector(&self, doc_id: DocId) -> HashMap<&str, f64> {
        let mut vector = HashMap::new();
        let Some(terms) = self.doc_terms.get(&doc_id) else {
            return vector;
        };
        let max_tf = self.max_tf.get(&doc_id).copied().unwrap_or(1).max(1) as f64;
        let title = self
            .titles_lower
            .get(&doc_id)
            .map(String::as_str)
            .unwrap_or("");
        for (term, tf) in terms {
            let Some(&idf) = self.idf.get(term) else {
                continue;
            };
            let mut weight = (*tf as f64 / max_tf) * idf;
            if title.contains(term.as_str()) {
                weight *= TITLE_BOOST;
            }
            vector.insert(term.as_str(), weight);
        }
        vector
    }

    /// Cosine similarity between one phrase's query vector and a document
    /// vector. Query weights are `(tf_q / max_tf_q) * idf` over the terms
    /// seen at index time; unseen terms contribute nothing.
    fn phrase_score(&self, phrase: &Phrase, doc_vector: &HashMap<&str, f64>) -> f64 {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for stem in phrase {
            *counts.entry(stem.as_str()).or_insert(0) += 1;
        }
        let max_tf = counts.values().copied().max().unwrap_or(0).max(1) as f64;
        let mut query_vector: HashMap<&str, f64> = HashMap::new();
        for (stem, tf) in counts {
            if let Some(&idf) = self.idf.get(stem) {
                query_vector.insert(stem, (tf as f64 / max_tf) * idf);
            }
        }
        cosine(&query_vector, doc_vector)
    }

    fn assemble(&self, doc_id: DocId, score: f64, fetcher: &dyn Fetcher) -> SearchResult {
        let url = self.urls.get(&doc_id).cloned().unwrap_or_default();
        let title = self
            .titles
            .get(&doc_id)
            .cloned()
            .unwrap_or_else(|| UNTITLED.to_string());
        let meta = fetcher.metadata(&url);
        let keywords = self
            .doc_terms
            .get(&doc_id)
            .map(|terms| terms.iter().take(RESULT_KEYWORDS).cloned().collect())
            .unwrap_or_default();
        let child_links = self
            .children
            .get(&doc_id)
            .map(|links| links.iter().take(MAX_NEIGHBOR_LINKS).cloned().collect())
            .unwrap_or_default();
        let parent_links = self
            .parents
            .get(&doc_id)
            .map(|links| links.iter().take(MAX_NEIGHBOR_LINKS).cloned().collect())
            .unwrap_or_default();
        SearchResult {
            doc_id,
            url,
            title,
            last_modified: meta.last_modified.unwrap_or_else(|| UNKNOWN.to_string()),
            size: meta.size.unwrap_or(0),
            keywords,
            parent_links,
            child_links,
            score,
            normalized_score: normalized(score),
        }
    }
}

fn cosine<'a>(query: &HashMap<&'a str, f64>, doc: &HashMap<&'a str, f64>) -> f64 {
    let mut dot = 0.0;
    let mut query_norm = 0.0;
    for (term, q) in query {
        if let Some(d) = doc.get(term) {
            dot += q * d;
        }
        query_norm += q * q;
    }
    let doc_norm: f64 = doc.values().map(|d| d * d).sum();
    if query_norm == 0.0 || doc_norm == 0.0 {
        return 0.0;
    }
    dot / (query_norm.sqrt() * doc_norm.sqrt())
}

fn normalized(score: f64) -> u32 {
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}
