mod ingest;
mod query;
mod search;

pub use ingest::IngestService;
pub use query::QueryService;
pub use search::SearchService;
