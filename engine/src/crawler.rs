use crate::fetch::Fetcher;
use crate::html::HtmlExtractor;
use crate::store::Store;
use crate::tokenizer::{self, StopWords};
use crate::writer::IndexWriter;
use crate::Result;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// What one crawl session did.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlSummary {
    /// Pages fetched and indexed this session.
    pub indexed: usize,
    /// Pages skipped: fetch failures and already-indexed URLs.
    pub skipped: usize,
    /// URLs still queued when the session ended.
    pub frontier_left: usize,
}

/// Bounded breadth-first crawl over a `Fetcher`/`HtmlExtractor` pair,
/// writing into the persistent index. Runs serially; the only suspension
/// points are the fetch and the store.
pub struct Crawler<'a> {
    fetcher: &'a dyn Fetcher,
    extractor: &'a dyn HtmlExtractor,
    store: &'a Store,
    stopwords: &'a StopWords,
}

impl<'a> Crawler<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        extractor: &'a dyn HtmlExtractor,
        store: &'a Store,
        stopwords: &'a StopWords,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            stopwords,
        }
    }

    /// Expand a FIFO frontier from `seed` until it drains or `max_pages`
    /// documents have been indexed this session, then commit once.
    ///
    /// URLs already present in the index are skipped without fetching, so
    /// re-running a finished crawl is a no-op. A page that fails to fetch
    /// or parse consumes no docID; a page with an empty body still
    /// consumes one and records its edges.
    pub fn crawl(&self, seed: &str, max_pages: usize) -> Result<CrawlSummary> {
        let mut writer = IndexWriter::begin(self.store)?;
        let mut frontier = VecDeque::new();
        let mut visited = HashSet::new();
        frontier.push_back(seed.to_string());
        visited.insert(seed.to_string());

        let mut summary = CrawlSummary::default();
        while summary.indexed < max_pages {
            let Some(url) = frontier.pop_front() else { break };
            if writer.knows_url(&url)? {
                summary.skipped += 1;
                continue;
            }
            let page = match self.fetcher.fetch(&url) {
                Ok(page) => page,
                Err(error) => {
                    tracing::warn!(%url, %error, "skipping page");
                    summary.skipped += 1;
                    continue;
                }
            };

            let extracted = match self.extractor.extract(&page.body) {
                Ok(extracted) => extracted,
                Err(error) => {
                    tracing::warn!(%url, %error, "skipping page");
                    summary.skipped += 1;
                    continue;
                }
            };

            let doc_id = writer.add_page(&url);
            for href in &extracted.links {
                let Some(child) = resolve_link(&url, href) else {
                    continue;
                };
                if visited.insert(child.clone()) {
                    frontier.push_back(child.clone());
                }
                writer.add_link(doc_id, child);
            }
            if !extracted.title.is_empty() {
                writer.set_title(doc_id, extracted.title);
            }
            if !extracted.text.is_empty() {
                for (stem, position) in tokenizer::tokenize(&extracted.text, self.stopwords) {
                    writer.add_posting(&stem, doc_id, position);
                }
            }
            summary.indexed += 1;
            tracing::debug!(%url, doc_id, "indexed");
        }

        summary.frontier_left = frontier.len();
        writer.commit()?;
        tracing::info!(
            indexed = summary.indexed,
            skipped = summary.skipped,
            frontier_left = summary.frontier_left,
            "crawl finished"
        );
        Ok(summary)
    }
}

/// Resolve `href` against the page it appeared on. `None` for anything
/// that is not absolute http/https after resolution.
fn resolve_link(base: &str, href: &str) -> Option<String> {
    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => Url::parse(base).ok()?.join(href).ok()?,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
