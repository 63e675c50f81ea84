//! Web search backend and the orchestrator that summarizes its results.

use anyhow::Result;
use async_trait::async_trait;
use llm_client::GenerationFacade;
use std::sync::Arc;
use storage::MAX_SEARCH_LINKS;
use tracing::{info, instrument};

pub const SUMMARY_FALLBACK: &str = "No summary available";

/// Returns result links for a query, best first.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Placeholder backend: five `https://example.com/search?q=<query><n>` links.
#[derive(Debug, Clone, Default)]
pub struct StubWebSearch;

#[async_trait]
impl WebSearch for StubWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        Ok((1..=5)
            .map(|n| format!("https://example.com/search?q={}{}", query, n))
            .collect())
    }
}

#[derive(Clone)]
pub struct SearchOrchestrator {
    backend: Arc<dyn WebSearch>,
    generation: GenerationFacade,
}

impl SearchOrchestrator {
    pub fn new(backend: Arc<dyn WebSearch>, generation: GenerationFacade) -> Self {
        Self {
            backend,
            generation,
        }
    }

    /// Top results of the backend, cut to [`MAX_SEARCH_LINKS`]. Backend errors propagate.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let mut links = self.backend.search(query).await?;
        links.truncate(MAX_SEARCH_LINKS);
        info!(links = links.len(), "Web search finished");
        Ok(links)
    }

    /// Summary of the links for the query; [`SUMMARY_FALLBACK`] when generation fails.
    pub async fn summarize(&self, query: &str, links: &[String]) -> String {
        self.generation
            .complete_text_or(&summary_prompt(query, links), SUMMARY_FALLBACK)
            .await
    }
}

fn summary_prompt(query: &str, links: &[String]) -> String {
    let listed: String = links.iter().map(|link| format!("- {}\n", link)).collect();
    format!(
        "I searched the web for \"{}\" and found the following links:\n{}\n\
         Please provide a concise summary of the information relevant to this query.",
        query, listed
    )
}
