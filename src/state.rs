use std::sync::Arc;

use crate::{
    db::{Cache, Store},
    services::{enrichment::Enricher, llm::LlmClient},
};

/// Process-scoped resources shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub enricher: Enricher,
    /// Uploader summaries are cached only when Redis is configured
    pub cache: Option<Cache>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            store,
            enricher: Enricher::new(llm),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }
}
