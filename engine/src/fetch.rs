use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, LAST_MODIFIED};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REDIRECTS: usize = 5;
const USER_AGENT: &str = "spinneret/0.1 (+https://example.com/bot)";

/// Placeholder shown when the origin reports no last-modified value.
pub const UNKNOWN: &str = "Unknown";

/// A successfully fetched page body plus what the origin said about it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub last_modified: Option<String>,
    pub size: Option<u64>,
}

/// Best-effort metadata for a URL, used when assembling results and
/// reports. Fields the origin does not report stay `None`.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub last_modified: Option<String>,
    pub size: Option<u64>,
}

/// Capability for talking to origins. The crawl, report and result
/// assembly paths only see this trait, so tests substitute canned sites.
pub trait Fetcher {
    /// Fetch a page body. Timeouts, non-2xx statuses and transport
    /// failures all surface as [`Error::PageUnavailable`].
    fn fetch(&self, url: &str) -> Result<FetchedPage>;

    /// Probe a URL without needing its body. Never fails.
    fn metadata(&self, url: &str) -> PageMeta;
}

/// Production fetcher: blocking reqwest client with connect and read
/// timeouts and a bounded redirect chase, per the crawl resource policy.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| Error::PageUnavailable(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::PageUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::PageUnavailable(format!(
                "{url}: {}",
                response.status()
            )));
        }
        let last_modified = header_string(response.headers(), LAST_MODIFIED);
        let reported_size = response.content_length();
        let body = response
            .text()
            .map_err(|e| Error::PageUnavailable(e.to_string()))?;
        Ok(FetchedPage {
            size: reported_size.or(Some(body.len() as u64)),
            body,
            last_modified,
        })
    }

    fn metadata(&self, url: &str) -> PageMeta {
        match self.client.head(url).send() {
            Ok(response) if response.status().is_success() => PageMeta {
                last_modified: header_string(response.headers(), LAST_MODIFIED),
                size: response.content_length(),
            },
            _ => PageMeta::default(),
        }
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
