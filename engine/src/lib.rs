use thiserror::Error;

pub mod crawler;
pub mod fetch;
pub mod html;
pub mod index;
pub mod query;
pub mod report;
pub mod search;
pub mod store;
pub mod tokenizer;
pub mod writer;

pub use index::{DocId, LinkEdge, Posting, PostingList};
pub use search::{SearchResult, Searcher};
pub use store::Store;
pub use tokenizer::StopWords;

#[derive(Debug, Error)]
pub enum Error {
    #[error("page unavailable: {0}")]
    PageUnavailable(String),

    #[error("page could not be parsed: {0}")]
    Parse(String),

    #[error("store error: {0}")]
    Store(#[from] sled::Error),

    #[error("stored record could not be encoded or decoded: {0}")]
    Codec(#[from] bincode::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
