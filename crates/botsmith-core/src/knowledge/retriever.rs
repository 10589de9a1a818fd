//! Query-time document ranking.
//!
//! [`Retriever`] is the seam for swapping in embedding similarity later;
//! [`LexicalRetriever`] is the current case-insensitive substring matcher.

use botsmith_types::knowledge::{Document, RetrievalResult};

/// Separator placed between documents when they are joined into one context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Ranks documents for a query.
///
/// Results are ordered by descending score and hold at most `top_k` entries.
/// An empty result is a normal outcome, never an error.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, top_k: usize, docs: &[Document]) -> Vec<RetrievalResult>;
}

/// Substring-containment retriever.
///
/// A document scores 1 when its lowercased text contains the lowercased
/// query, 0 otherwise. Zero-score documents are dropped; survivors keep
/// their original order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalRetriever;

impl LexicalRetriever {
    pub fn new() -> Self {
        Self
    }
}

impl Retriever for LexicalRetriever {
    fn search(&self, query: &str, top_k: usize, docs: &[Document]) -> Vec<RetrievalResult> {
        if query.is_empty() || docs.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        docs.iter()
            .filter(|doc| doc.text.to_lowercase().contains(&needle))
            .take(top_k.max(1))
            .map(|doc| RetrievalResult {
                document: doc.clone(),
                score: 1.0,
            })
            .collect()
    }
}

/// Join retrieved document texts into one context block for the resolver.
pub fn join_context(results: &[RetrievalResult]) -> String {
    results
        .iter()
        .map(|r| r.document.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Document {
                id: format!("doc-{i}"),
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_matches_are_case_insensitive_and_ordered() {
        let docs = docs(&[
            "Shipping takes 3 days",
            "Returns are free",
            "Express SHIPPING costs extra",
            "We are closed on Sunday",
        ]);
        let results = LexicalRetriever.search("shipping", 5, &docs);

        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["doc-0", "doc-2"]);
        assert!(results.iter().all(|r| r.score == 1.0));
    }

    #[test]
    fn test_truncates_to_top_k() {
        let docs = docs(&["a cat", "the cat", "cat food", "catalog"]);
        let results = LexicalRetriever.search("cat", 2, &docs);
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["doc-0", "doc-1"]);
    }

    #[test]
    fn test_zero_top_k_is_clamped_to_one() {
        let docs = docs(&["cat", "cat"]);
        assert_eq!(LexicalRetriever.search("cat", 0, &docs).len(), 1);
    }

    #[test]
    fn test_no_match_and_empty_inputs_return_empty() {
        let docs = docs(&["alpha", "beta"]);
        assert!(LexicalRetriever.search("gamma", 3, &docs).is_empty());
        assert!(LexicalRetriever.search("alpha", 3, &[]).is_empty());
        assert!(LexicalRetriever.search("", 3, &docs).is_empty());
    }

    #[test]
    fn test_whole_query_must_be_contained() {
        // The full question is the needle, not individual words.
        let docs = docs(&["Opening hours are 9 to 5"]);
        assert!(LexicalRetriever.search("what are your opening hours?", 3, &docs).is_empty());
        assert_eq!(LexicalRetriever.search("OPENING hours", 3, &docs).len(), 1);
    }

    #[test]
    fn test_every_result_contains_query() {
        let docs = docs(&["Rust is fast", "rusty nail", "Trust me", "nothing here"]);
        let results = LexicalRetriever.search("RUST", 10, &docs);
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(r.document.text.to_lowercase().contains("rust"));
        }
    }

    #[test]
    fn test_join_context() {
        let docs = docs(&["one", "two"]);
        let results = LexicalRetriever.search("o", 3, &docs);
        assert_eq!(join_context(&results), "one\n\n---\n\ntwo");
        assert_eq!(join_context(&[]), "");
    }
}
