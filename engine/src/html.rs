use crate::Result;
use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref BODY: Selector = Selector::parse("body").expect("valid selector");
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("valid selector");
}

/// What extraction recovers from one HTML document. `links` are raw href
/// values; resolving them against the page URL is the crawler's job.
#[derive(Debug, Default)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
    pub links: Vec<String>,
}

pub trait HtmlExtractor {
    /// Extract title, visible text and links. Documents broken beyond
    /// recovery surface as [`crate::Error::Parse`] and are skipped by the
    /// crawler.
    fn extract(&self, html: &str) -> Result<ExtractedPage>;
}

/// `scraper`-backed extractor used by the binaries. html5ever recovers
/// from arbitrary input, so this implementation never raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperExtractor;

impl HtmlExtractor for ScraperExtractor {
    fn extract(&self, html: &str) -> Result<ExtractedPage> {
        let document = Html::parse_document(html);
        let title = document
            .select(&TITLE)
            .next()
            .map(|node| node.text().collect::<String>())
            .unwrap_or_default();
        let text = document
            .select(&BODY)
            .next()
            .map(|node| node.text().collect::<String>())
            .unwrap_or_default();
        let links = document
            .select(&ANCHOR)
            .filter_map(|node| node.value().attr("href"))
            .map(str::to_string)
            .collect();
        Ok(ExtractedPage {
            title: title.trim().to_string(),
            text: text.trim().to_string(),
            links,
        })
    }
}
