use crate::error::{RagError, Result};

/// Extracts raw text from a DOCX document: one block per paragraph, tables
/// flattened to one line per row.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| RagError::Extraction(format!("DOCX parse error: {e}")))?;

        let mut blocks: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    let text = Self::paragraph_text(paragraph);
                    if !text.trim().is_empty() {
                        blocks.push(text);
                    }
                }
                docx_rs::DocumentChild::Table(table) => {
                    let text = Self::table_text(table);
                    if !text.is_empty() {
                        blocks.push(text);
                    }
                }
                _ => {}
            }
        }

        Ok(blocks.join("\n\n"))
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        for para_child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = para_child {
                for run_child in &run.children {
                    match run_child {
                        docx_rs::RunChild::Text(text) => content.push_str(&text.text),
                        docx_rs::RunChild::Tab(_) => content.push('\t'),
                        docx_rs::RunChild::Break(_) => content.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        content
    }

    fn table_text(table: &docx_rs::Table) -> String {
        let mut rows: Vec<String> = Vec::new();

        for table_child in &table.rows {
            let docx_rs::TableChild::TableRow(row) = table_child;
            let mut cells: Vec<String> = Vec::new();
            for row_child in &row.cells {
                let docx_rs::TableRowChild::TableCell(cell) = row_child;
                let cell_text = cell
                    .children
                    .iter()
                    .filter_map(|content| match content {
                        docx_rs::TableCellContent::Paragraph(para) => {
                            Some(Self::paragraph_text(para))
                        }
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                cells.push(cell_text.trim().to_string());
            }
            if cells.iter().any(|cell| !cell.is_empty()) {
                rows.push(cells.join("\t"));
            }
        }

        rows.join("\n")
    }
}
