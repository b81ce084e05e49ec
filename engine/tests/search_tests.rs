mod common;

use common::{page, SiteFetcher};
use engine::crawler::Crawler;
use engine::html::ScraperExtractor;
use engine::search::{Searcher, MAX_RESULTS, UNTITLED};
use engine::store::Store;
use engine::tokenizer::{stem, StopWords};

fn stops() -> StopWords {
    StopWords::from_lines("the\na\nan\nand\n")
}

/// Crawl `pages` (the first entry is the seed) into a fresh temporary
/// store and open a searcher over it.
fn build_searcher(pages: &[(&str, &str)]) -> (Store, Searcher, SiteFetcher) {
    let store = Store::temporary().unwrap();
    let fetcher = SiteFetcher::new(pages);
    let extractor = ScraperExtractor;
    let stopwords = stops();
    Crawler::new(&fetcher, &extractor, &store, &stopwords)
        .crawl(pages[0].0, 50)
        .unwrap();
    let searcher = Searcher::open(&store, stops()).unwrap();
    (store, searcher, fetcher)
}

#[test]
fn phrase_gate_requires_consecutive_positions() {
    let d0 = page("D0", "the quick brown fox", &["http://phrase.test/1"]);
    let d1 = page("D1", "brown quick the fox", &[]);
    let (_store, searcher, _fetcher) =
        build_searcher(&[("http://phrase.test/0", &d0), ("http://phrase.test/1", &d1)]);

    let ranked = searcher.ranked("\"quick brown\"");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].0, 0);

    // Both documents contain both words, so bare terms admit both.
    assert_eq!(searcher.ranked("quick brown").len(), 2);
}

#[test]
fn title_boost_outranks_equal_bodies() {
    // Identical bodies; only the later docID carries the matching title.
    // A rust-free distractor keeps idf(rust) above zero.
    let seed = page(
        "Distractor",
        "cats purr softly",
        &["http://boost.test/plain", "http://boost.test/titled"],
    );
    let plain = page("Intro", "rust rust memory", &[]);
    let titled = page("Rust guide", "rust rust memory", &[]);
    let (_store, searcher, _fetcher) = build_searcher(&[
        ("http://boost.test/", &seed),
        ("http://boost.test/plain", &plain),
        ("http://boost.test/titled", &titled),
    ]);

    let ranked = searcher.ranked("rust");
    assert_eq!(ranked.len(), 2);
    // Without the boost the scores would tie and docID 1 would win.
    assert_eq!(ranked[0].0, 2);
    assert!(ranked[0].1 > ranked[1].1);
}

#[test]
fn query_is_capped_at_ten_words() {
    let ten_words = "apple banana cherry mango grape lemon peach plum kiwi melon";
    let d0 = page("Fruit", ten_words, &["http://cap.test/1"]);
    let d1 = page("Zebra", "zebra zebra", &[]);
    let (_store, searcher, _fetcher) =
        build_searcher(&[("http://cap.test/0", &d0), ("http://cap.test/1", &d1)]);

    // An eleventh word would gate out every document; the cap drops it.
    let eleven = format!("{ten_words} zebra");
    let ranked = searcher.ranked(&eleven);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].0, 0);
}

#[test]
fn every_indexed_term_matches_as_single_phrase() {
    let d0 = page("D0", "apple apple orange", &["http://single.test/1"]);
    let d1 = page("D1", "orange banana", &[]);
    let (store, searcher, _fetcher) =
        build_searcher(&[("http://single.test/0", &d0), ("http://single.test/1", &d1)]);

    for entry in store.postings.iter() {
        let (term, list) = entry.unwrap();
        for doc_id in list.keys() {
            let hit = searcher
                .ranked(&term)
                .iter()
                .any(|(ranked_id, _)| ranked_id == doc_id);
            assert!(hit, "term {term:?} did not match doc {doc_id}");
        }
    }
}

#[test]
fn all_phrases_must_match() {
    let d0 = page("D0", "apple apple orange", &["http://gate.test/1"]);
    let d1 = page("D1", "orange banana", &[]);
    let (_store, searcher, _fetcher) =
        build_searcher(&[("http://gate.test/0", &d0), ("http://gate.test/1", &d1)]);

    // Each phrase matches one document, but no document matches both.
    assert!(searcher.ranked("apple \"orange banana\"").is_empty());
    // Dropping the bare term admits the phrase's document.
    let ranked = searcher.ranked("\"orange banana\"");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].0, 1);
}

#[test]
fn results_carry_metadata_keywords_and_neighborhoods() {
    let d0 = page("Fruit bowl", "apple apple orange", &["http://meta.test/1"]);
    // No <title>, so the result falls back to the placeholder.
    let d1 = "<html><body><p>dog dog cat cat bee</p><a href=\"http://meta.test/0\"></a></body></html>"
        .to_string();
    let (_store, searcher, fetcher) =
        build_searcher(&[("http://meta.test/0", &d0), ("http://meta.test/1", &d1)]);

    let results = searcher.search("\"dog\"", &fetcher);
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.url, "http://meta.test/1");
    assert_eq!(result.title, UNTITLED);
    assert_eq!(result.last_modified, "Unknown");
    assert!(result.size > 0);

    // Frequency descending, lexicographic among ties.
    let keywords: Vec<(&str, u32)> = result
        .keywords
        .iter()
        .map(|(term, frequency)| (term.as_str(), *frequency))
        .collect();
    assert_eq!(keywords, vec![("cat", 2), ("dog", 2), ("bee", 1)]);

    assert_eq!(result.parent_links, vec!["http://meta.test/0"]);
    assert_eq!(result.child_links, vec!["http://meta.test/0"]);
    assert!(result.normalized_score <= 100);

    let apple_results = searcher.search("apple", &fetcher);
    assert_eq!(apple_results[0].title, "Fruit bowl");
    assert_eq!(apple_results[0].child_links, vec!["http://meta.test/1"]);
}

#[test]
fn empty_and_stop_word_queries_return_nothing() {
    let d0 = page("D0", "apple orange", &[]);
    let (_store, searcher, fetcher) = build_searcher(&[("http://empty.test/0", &d0)]);

    assert!(searcher.search("", &fetcher).is_empty());
    assert!(searcher.search("the and", &fetcher).is_empty());
    assert!(searcher.search("\"\"", &fetcher).is_empty());
}

#[test]
fn ranking_is_bounded_and_tie_broken_by_doc_id() {
    // Sixty pages all containing the same word; ranking keeps the top 50
    // and orders equal scores by ascending docID.
    let urls: Vec<String> = (0..60).map(|i| format!("http://many.test/{i}")).collect();
    let htmls: Vec<String> = urls
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let next: Vec<&str> = urls.get(i + 1).map(String::as_str).into_iter().collect();
            page("", "common word", &next)
        })
        .collect();
    let site: Vec<(&str, &str)> = urls
        .iter()
        .zip(htmls.iter())
        .map(|(u, h)| (u.as_str(), h.as_str()))
        .collect();

    let store = Store::temporary().unwrap();
    let fetcher = SiteFetcher::new(&site);
    let extractor = ScraperExtractor;
    let stopwords = stops();
    Crawler::new(&fetcher, &extractor, &store, &stopwords)
        .crawl(&urls[0], 100)
        .unwrap();
    let searcher = Searcher::open(&store, stops()).unwrap();

    let ranked = searcher.ranked("common");
    assert_eq!(ranked.len(), MAX_RESULTS);
    let ids: Vec<u32> = ranked.iter().map(|(doc_id, _)| *doc_id).collect();
    assert_eq!(ids, (0..MAX_RESULTS as u32).collect::<Vec<u32>>());
}

#[test]
fn searcher_reflects_only_committed_state() {
    let d0 = page("D0", "apple orange", &[]);
    let (store, searcher, _fetcher) = build_searcher(&[("http://snap.test/0", &d0)]);
    assert_eq!(searcher.num_docs(), 1);

    // A later crawl session is invisible to the open snapshot.
    let d1 = page("D1", "apple pie", &[]);
    let fetcher = SiteFetcher::new(&[("http://snap.test/1", &d1)]);
    let extractor = ScraperExtractor;
    let stopwords = stops();
    Crawler::new(&fetcher, &extractor, &store, &stopwords)
        .crawl("http://snap.test/1", 10)
        .unwrap();

    assert_eq!(searcher.num_docs(), 1);
    assert_eq!(searcher.ranked("apple").len(), 1);

    // Reopening sees the new commit.
    let reopened = Searcher::open(&store, stops()).unwrap();
    assert_eq!(reopened.num_docs(), 2);
    assert_eq!(reopened.ranked("apple").len(), 2);
}

#[test]
fn stemmed_queries_match_stemmed_index() {
    let d0 = page("D0", "running oranges", &[]);
    let (_store, searcher, _fetcher) = build_searcher(&[("http://stem.test/0", &d0)]);

    // Inflected query forms stem to the same keys the indexer wrote.
    assert_eq!(searcher.ranked("runs").len(), 1);
    assert_eq!(searcher.ranked("orange").len(), 1);
    assert_eq!(stem("running"), stem("runs"));
}
