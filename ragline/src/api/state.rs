use std::sync::Arc;

use crate::config::Config;
use crate::db::VectorStore;
use crate::error::Result;
use crate::llm::AnswerGenerator;
use crate::processing::FileExtractor;
use crate::services::{IngestService, QueryService, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn VectorStore>,
    pub ingest: IngestService,
    pub query: QueryService,
    pub extractor: FileExtractor,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn VectorStore>) -> Result<Self> {
        let config = Arc::new(config);

        let generator = AnswerGenerator::new(&config.llm)?;
        let search = SearchService::new(store.clone());
        let query = QueryService::new(search, generator, config.retrieval.limit);
        let ingest = IngestService::new(store.clone(), &config.processing);

        Ok(Self {
            config,
            store,
            ingest,
            query,
            extractor: FileExtractor::new(),
        })
    }
}
