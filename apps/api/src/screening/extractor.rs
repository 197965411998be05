//! Resume text extraction from uploaded PDFs.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Extracts plain text from a PDF, one page per line-joined segment.
///
/// Page texts are joined with a newline in page order; a page that yields no
/// text contributes an empty segment.
/// Runs on the blocking pool: parsing is CPU-bound and `pdf-extract` can
/// panic on malformed input.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, AppError> {
    if pdf.is_empty() {
        return Err(AppError::PdfExtraction(
            "Failed to extract text from PDF: uploaded file is empty".to_string(),
        ));
    }

    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&pdf).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| {
        warn!("PDF extraction task aborted: {e}");
        AppError::PdfExtraction(
            "Failed to extract text from PDF: document could not be parsed".to_string(),
        )
    })?
    .map_err(|e| AppError::PdfExtraction(format!("Failed to extract text from PDF: {e}")))?;

    debug!("Extracted {} page(s) from resume", pages.len());
    Ok(join_pages(pages))
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .map(|page| page.trim_end_matches(['\n', '\r', '\u{c}']).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
