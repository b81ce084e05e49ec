use anyhow::Result;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use engine::fetch::HttpFetcher;
use engine::search::SearchResult;
use engine::store::Store;
use engine::tokenizer::StopWords;
use engine::Searcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

/// One result row with keywords and links flattened to the strings the
/// presentation layer shows.
#[derive(Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub last_modified: String,
    pub size: u64,
    pub keywords: String,
    pub parent_links: String,
    pub child_links: String,
    pub score: f64,
    pub normalized_score: u32,
}

impl From<SearchResult> for SearchHit {
    fn from(result: SearchResult) -> Self {
        Self {
            url: result.url,
            title: result.title,
            last_modified: result.last_modified,
            size: result.size,
            keywords: result
                .keywords
                .iter()
                .map(|(term, frequency)| format!("{term}({frequency})"))
                .collect::<Vec<_>>()
                .join(", "),
            parent_links: result.parent_links.join(", "),
            child_links: result.child_links.join(", "),
            score: result.score,
            normalized_score: result.normalized_score,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    searcher: Arc<Searcher>,
    fetcher: Arc<HttpFetcher>,
}

/// Open the committed index snapshot and build the router.
pub fn build_app(db_path: &str, stopwords_path: &str) -> Result<Router> {
    let store = Store::open(db_path)?;
    let stopwords = StopWords::load(stopwords_path);
    let searcher = Searcher::open(&store, stopwords)?;
    tracing::info!(docs = searcher.num_docs(), "index snapshot loaded");

    let state = AppState {
        searcher: Arc::new(searcher),
        fetcher: Arc::new(HttpFetcher::new()?),
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(state)
        .layer(cors))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let query = params.q.clone();

    // The engine is synchronous and the metadata probe uses the blocking
    // client, so both stay off the runtime threads.
    let task = tokio::task::spawn_blocking(move || {
        state.searcher.search(&params.q, state.fetcher.as_ref())
    });
    let results = match task.await {
        Ok(results) => results,
        Err(error) => {
            tracing::error!(%error, "search task failed");
            Vec::new()
        }
    };

    Json(SearchResponse {
        query,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results: results.into_iter().map(SearchHit::from).collect(),
    })
}
