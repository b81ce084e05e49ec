#![allow(dead_code)]

use engine::fetch::{FetchedPage, Fetcher, PageMeta};
use engine::Error;
use std::collections::HashMap;

/// Canned site: URL -> HTML. Unknown URLs fail the way an unreachable
/// origin would.
pub struct SiteFetcher {
    pages: HashMap<String, String>,
}

impl SiteFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
        }
    }
}

impl Fetcher for SiteFetcher {
    fn fetch(&self, url: &str) -> engine::Result<FetchedPage> {
        match self.pages.get(url) {
            Some(html) => Ok(FetchedPage {
                body: html.clone(),
                last_modified: None,
                size: Some(html.len() as u64),
            }),
            None => Err(Error::PageUnavailable(url.to_string())),
        }
    }

    fn metadata(&self, url: &str) -> PageMeta {
        PageMeta {
            last_modified: None,
            size: self.pages.get(url).map(|html| html.len() as u64),
        }
    }
}

/// Minimal page with a title, a body paragraph and empty-text anchors, so
/// only `body` contributes tokens.
pub fn page(title: &str, body: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{href}\"></a>"))
        .collect();
    format!(
        "<html><head><title>{title}</title></head><body><p>{body}</p>{anchors}</body></html>"
    )
}
