pub mod health;
pub mod ingest;
pub mod query;
pub mod upload;

pub use health::health_check;
pub use ingest::ingest_document;
pub use query::query;
pub use upload::upload_document;
