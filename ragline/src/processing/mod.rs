mod chunker;
mod extractor;

pub mod extractors;

pub use chunker::{TextChunk, TextChunker};
pub use extractor::{ExtractedFile, FileExtractor, FileType};
