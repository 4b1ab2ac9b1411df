pub mod csv;
pub mod docx;
pub mod xlsx;

pub use self::csv::CsvExtractor;
pub use self::docx::DocxExtractor;
pub use self::xlsx::XlsxExtractor;
