use crate::fetch::{Fetcher, UNKNOWN};
use crate::index::DocId;
use crate::search::UNTITLED;
use crate::store::Store;
use crate::Result;
use std::collections::HashMap;
use std::io::Write;

/// Keywords listed per page in the report.
pub const REPORT_KEYWORDS: usize = 20;

/// Child links listed per page in the report.
pub const REPORT_CHILD_LINKS: usize = 10;

const SEPARATOR: &str = "-----------------------------------------";

/// Write the crawl report: one block per indexed page, in `page-index`
/// iteration order.
///
/// ```text
/// <title>
/// <url>
/// <lastModDate>, <size> bytes
/// Keywords: term1 freq1; term2 freq2; ...
/// Child Links:
/// <childURL1>
/// ...
/// -----------------------------------------
/// ```
pub fn write_crawl_report<W: Write>(store: &Store, fetcher: &dyn Fetcher, mut out: W) -> Result<()> {
    // One pass over the inverted index instead of one scan per page.
    let mut doc_terms: HashMap<DocId, Vec<(String, u32)>> = HashMap::new();
    for entry in store.postings.iter() {
        let (term, list) = entry?;
        for (doc_id, posting) in list {
            doc_terms
                .entry(doc_id)
                .or_default()
                .push((term.clone(), posting.frequency));
        }
    }
    for terms in doc_terms.values_mut() {
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    }

    for entry in store.pages.iter() {
        let (url, doc_id) = entry?;
        let title = store
            .titles
            .get(&doc_id)?
            .unwrap_or_else(|| UNTITLED.to_string());
        let meta = fetcher.metadata(&url);

        writeln!(out, "{title}")?;
        writeln!(out, "{url}")?;
        writeln!(
            out,
            "{}, {} bytes",
            meta.last_modified.unwrap_or_else(|| UNKNOWN.to_string()),
            meta.size.unwrap_or(0)
        )?;
        let keywords = doc_terms
            .get(&doc_id)
            .map(|terms| {
                terms
                    .iter()
                    .take(REPORT_KEYWORDS)
                    .map(|(term, frequency)| format!("{term} {frequency}"))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default();
        writeln!(out, "Keywords: {keywords}")?;
        writeln!(out, "Child Links:")?;
        for child in store.child_links(doc_id)?.into_iter().take(REPORT_CHILD_LINKS) {
            writeln!(out, "{child}")?;
        }
        writeln!(out, "{SEPARATOR}")?;
    }
    Ok(())
}
