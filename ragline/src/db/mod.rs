pub mod backends;
pub(crate) mod schema;
pub mod traits;

pub use backends::weaviate::WeaviateClient;
pub use traits::*;
