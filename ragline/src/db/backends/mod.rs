pub mod weaviate;
