use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense identifier of a crawled page, assigned in order of successful
/// fetch. The next value to hand out survives restarts in the store's
/// `last-page-id` root.
pub type DocId = u32;

/// A directed link from an indexed page to a URL it references. The child
/// need not be indexed itself.
pub type LinkEdge = (DocId, String);

/// Per-(term, document) record: occurrence count plus the pre-filter token
/// positions of every occurrence, in increasing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub frequency: u32,
    pub positions: Vec<u32>,
}

impl Posting {
    /// Record one occurrence. The tokenizer hands out positions in
    /// strictly increasing order, so appending keeps the list sorted.
    pub fn record(&mut self, position: u32) {
        debug_assert!(self.positions.last().map_or(true, |&last| position > last));
        self.positions.push(position);
        self.frequency += 1;
    }

    pub fn contains(&self, position: u32) -> bool {
        self.positions.binary_search(&position).is_ok()
    }
}

/// One term's slice of the positional inverted index.
pub type PostingList = HashMap<DocId, Posting>;
