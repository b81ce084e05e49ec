use crate::index::{DocId, LinkEdge, PostingList};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::Path;

const LAST_PAGE_ID: &str = "last-page-id";

/// Typed view over one sled tree. Keys and values are bincode on both
/// sides of the boundary, so a `Table` behaves like a persistent map with
/// ordinary Rust types at the edges.
pub struct Table<K, V> {
    tree: sled::Tree,
    key: PhantomData<K>,
    value: PhantomData<V>,
}

impl<K, V> Table<K, V>
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    fn open(db: &sled::Db, name: &str) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree(name)?,
            key: PhantomData,
            value: PhantomData,
        })
    }

    pub fn get(&self, key: &K) -> Result<Option<V>> {
        match self.tree.get(bincode::serialize(key)?)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn insert(&self, key: &K, value: &V) -> Result<()> {
        self.tree
            .insert(bincode::serialize(key)?, bincode::serialize(value)?)?;
        Ok(())
    }

    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.tree.contains_key(bincode::serialize(key)?)?)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Every entry, in serialized-key order.
    pub fn iter(&self) -> impl Iterator<Item = Result<(K, V)>> + '_ {
        self.tree.iter().map(decode_pair::<K, V>)
    }

    /// Entries whose serialized key starts with `prefix`.
    pub fn scan_prefix(&self, prefix: &[u8]) -> impl Iterator<Item = Result<(K, V)>> + '_ {
        self.tree.scan_prefix(prefix).map(decode_pair::<K, V>)
    }

    fn flush(&self) -> Result<()> {
        self.tree.flush()?;
        Ok(())
    }
}

fn decode_pair<K, V>(entry: sled::Result<(sled::IVec, sled::IVec)>) -> Result<(K, V)>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    let (key, value) = entry?;
    Ok((bincode::deserialize(&key)?, bincode::deserialize(&value)?))
}

/// The persistent index: four named roots plus the durable page counter.
///
/// Roots absent on open are created and registered under their names;
/// present ones are loaded, so an index survives process restarts.
/// `commit` is the only durability boundary.
pub struct Store {
    db: sled::Db,
    meta: sled::Tree,
    /// Canonical URL -> docID.
    pub pages: Table<String, DocId>,
    /// docID -> title; only documents with a non-empty title appear.
    pub titles: Table<DocId, String>,
    /// Stem -> positional posting list. Stop words never appear as keys.
    pub postings: Table<String, PostingList>,
    /// Link graph, edges only. Keys are bincode `(DocId, String)` tuples,
    /// so a prefix scan over the serialized docID yields one page's
    /// out-edges.
    pub links: Table<LinkEdge, ()>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// Backed by a temp directory that disappears on drop. For tests.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        Ok(Self {
            meta: db.open_tree("meta")?,
            pages: Table::open(&db, "page-index")?,
            titles: Table::open(&db, "title-index")?,
            postings: Table::open(&db, "body-index")?,
            links: Table::open(&db, "link-graph")?,
            db,
        })
    }

    /// The durable docID counter: the next id to hand out, which is also
    /// the number of pages indexed by committed crawls.
    pub fn last_page_id(&self) -> Result<DocId> {
        match self.meta.get(LAST_PAGE_ID)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Ok(0),
        }
    }

    /// Written by the index writer during commit only, so a crash
    /// mid-crawl reverts the counter along with everything else.
    pub(crate) fn set_last_page_id(&self, id: DocId) -> Result<()> {
        self.meta.insert(LAST_PAGE_ID, bincode::serialize(&id)?)?;
        Ok(())
    }

    /// Child URLs recorded for `parent`, in stored order.
    pub fn child_links(&self, parent: DocId) -> Result<Vec<String>> {
        let prefix = bincode::serialize(&parent)?;
        let mut children = Vec::new();
        for entry in self.links.scan_prefix(&prefix) {
            let ((_, child), ()) = entry?;
            children.push(child);
        }
        Ok(children)
    }

    /// Flush every named root.
    pub fn commit(&self) -> Result<()> {
        self.pages.flush()?;
        self.titles.flush()?;
        self.postings.flush()?;
        self.links.flush()?;
        self.meta.flush()?;
        self.db.flush()?;
        Ok(())
    }
}
