use crate::index::{DocId, LinkEdge, PostingList};
use crate::store::Store;
use crate::Result;
use std::collections::{BTreeSet, HashMap};

/// Accumulates one crawl session in memory and writes it through the
/// store in a single commit.
///
/// Until `commit` runs, the on-disk state is whatever the previous
/// session left; the durable docID counter advances only on commit, so a
/// crash mid-crawl reverts the whole session.
pub struct IndexWriter<'a> {
    store: &'a Store,
    next_doc_id: DocId,
    pages: HashMap<String, DocId>,
    titles: HashMap<DocId, String>,
    postings: HashMap<String, PostingList>,
    edges: BTreeSet<LinkEdge>,
}

impl<'a> IndexWriter<'a> {
    pub fn begin(store: &'a Store) -> Result<Self> {
        Ok(Self {
            store,
            next_doc_id: store.last_page_id()?,
            pages: HashMap::new(),
            titles: HashMap::new(),
            postings: HashMap::new(),
            edges: BTreeSet::new(),
        })
    }

    /// True when `url` was indexed by this session or a committed one.
    pub fn knows_url(&self, url: &str) -> Result<bool> {
        if self.pages.contains_key(url) {
            return Ok(true);
        }
        self.store.pages.contains(&url.to_string())
    }

    /// Allocate the next docID for `url` and record the mapping.
    pub fn add_page(&mut self, url: &str) -> DocId {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;
        self.pages.insert(url.to_string(), doc_id);
        doc_id
    }

    /// Record a non-empty title. Untitled documents stay out of the title
    /// map and default to `Untitled` at display time.
    pub fn set_title(&mut self, doc_id: DocId, title: String) {
        self.titles.insert(doc_id, title);
    }

    pub fn add_link(&mut self, parent: DocId, child_url: String) {
        self.edges.insert((parent, child_url));
    }

    /// Append one occurrence of `stem` at `position` within `doc_id`.
    /// Positions arrive in ascending order from the tokenizer.
    pub fn add_posting(&mut self, stem: &str, doc_id: DocId, position: usize) {
        self.postings
            .entry(stem.to_string())
            .or_default()
            .entry(doc_id)
            .or_default()
            .record(position as u32);
    }

    /// Write the session through the store, advance the durable counter
    /// and flush. Posting lists merge with earlier sessions by extension:
    /// docIDs never repeat across sessions.
    pub fn commit(self) -> Result<()> {
        let session_pages = self.pages.len();
        for (url, doc_id) in &self.pages {
            self.store.pages.insert(url, doc_id)?;
        }
        for (doc_id, title) in &self.titles {
            self.store.titles.insert(doc_id, title)?;
        }
        for (stem, session_list) in self.postings {
            let mut list = self.store.postings.get(&stem)?.unwrap_or_default();
            list.extend(session_list);
            self.store.postings.insert(&stem, &list)?;
        }
        for edge in &self.edges {
            self.store.links.insert(edge, &())?;
        }
        self.store.set_last_page_id(self.next_doc_id)?;
        self.store.commit()?;
        tracing::debug!(pages = session_pages, "crawl session committed");
        Ok(())
    }
}
