use std::collections::HashSet;

use tracing::{debug, info};

use crate::models::AnalysisReport;

use super::KnowledgeStore;

/// One retrieved document, tagged with its source filename for traceability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedChunk {
    pub filename: String,
    pub content: String,
}

/// Default keyword-to-filename mapping.
///
/// Insertion order is the documented scan order: when a search string
/// matches several keywords mapping to different files, the first entry in
/// this list wins.
pub fn default_keyword_map() -> Vec<(String, String)> {
    [
        ("introduction", "sop_introduction.txt"),
        ("introduce", "sop_introduction.txt"),
        ("verify", "sop_verification.txt"),
        ("verification", "sop_verification.txt"),
        ("spelling", "sop_verification.txt"),
        ("phone number", "sop_verification.txt"),
        ("empathy", "examples_empathy.txt"),
        ("empathetic", "examples_empathy.txt"),
        ("relatable", "examples_empathy.txt"),
        ("mva", "checklist_mva.txt"),
        ("accident", "checklist_mva.txt"),
        ("out-of-network", "info_out_of_network.txt"),
        ("disclosure", "info_out_of_network.txt"),
    ]
    .into_iter()
    .map(|(k, f)| (k.to_string(), f.to_string()))
    .collect()
}

/// Keyword-matching retriever over the knowledge store.
///
/// Maps free-text evaluation findings to a bounded, deduplicated set of
/// knowledge documents. No relevance ranking; result order is first-match
/// scan order and is stable for identical inputs.
pub struct KeywordRetriever {
    store: KnowledgeStore,
    keyword_map: Vec<(String, String)>,
}

impl KeywordRetriever {
    pub fn new(store: KnowledgeStore) -> Self {
        Self {
            store,
            keyword_map: default_keyword_map(),
        }
    }

    pub fn with_map(store: KnowledgeStore, keyword_map: Vec<(String, String)>) -> Self {
        Self { store, keyword_map }
    }

    /// Retrieve up to `max_chunks` distinct documents relevant to the
    /// report's findings.
    ///
    /// The search corpus is the listed improvement areas followed by the
    /// "Not Met" KPI texts. Keywords are matched case-insensitively by
    /// containment; a filename is marked seen only once its document
    /// actually loads, so a missing file is skipped with a diagnostic and
    /// costs nothing.
    pub fn retrieve(&self, report: &AnalysisReport, max_chunks: usize) -> Vec<RetrievedChunk> {
        let mut retrieved: Vec<RetrievedChunk> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        let mut search_texts: Vec<&str> = report
            .improvement_areas()
            .iter()
            .map(String::as_str)
            .collect();
        search_texts.extend(report.missed_kpis());

        for text in search_texts {
            let text_lower = text.to_lowercase();
            for (keyword, filename) in &self.keyword_map {
                if retrieved.len() >= max_chunks {
                    break;
                }
                if text_lower.contains(keyword.as_str()) && !seen.contains(filename.as_str()) {
                    debug!("Keyword '{}' maps to '{}'", keyword, filename);
                    if let Some(doc) = self.store.load(filename) {
                        seen.insert(filename.as_str());
                        retrieved.push(RetrievedChunk {
                            filename: doc.filename,
                            content: doc.content,
                        });
                    }
                }
            }
            if retrieved.len() >= max_chunks {
                break;
            }
        }

        if retrieved.is_empty() {
            info!("No knowledge chunks retrieved for this report");
        } else {
            info!("Retrieved {} knowledge chunk(s)", retrieved.len());
        }

        retrieved
    }
}
