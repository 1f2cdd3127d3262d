//! Document text extraction for uploaded files

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Generic message for any unreadable PDF
pub const PDF_READ_ERROR: &str = "Error reading the PDF file";

/// How long pdf-extract may run before falling back to lopdf
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Document formats accepted for MCQ generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Txt,
}

impl DocumentFormat {
    /// Detect the format from the declared file name.
    ///
    /// Matching is on the exact `.pdf` / `.txt` suffix.
    pub fn from_filename(filename: &str) -> Result<Self> {
        if filename.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if filename.ends_with(".txt") {
            Ok(Self::Txt)
        } else {
            let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
            Err(Error::UnsupportedFormat(extension.to_string()))
        }
    }
}

/// Extracts plain text from uploaded documents
pub struct TextExtractor;

impl TextExtractor {
    /// Extract the full text of a document
    pub fn extract(filename: &str, data: &[u8]) -> Result<String> {
        match DocumentFormat::from_filename(filename)? {
            DocumentFormat::Pdf => Self::extract_pdf(filename, data),
            DocumentFormat::Txt => Self::extract_txt(filename, data),
        }
    }

    /// Decode a text file verbatim
    fn extract_txt(filename: &str, data: &[u8]) -> Result<String> {
        String::from_utf8(data.to_vec()).map_err(|e| {
            Error::unsupported_document(filename, format!("File is not valid UTF-8: {}", e))
        })
    }

    /// Concatenate the text of every page, in page order
    fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
        let text = match Self::extract_pdf_with_timeout(data) {
            Some(text) if !text.trim().is_empty() => text,
            _ => Self::extract_pdf_by_pages(data).map_err(|e| {
                tracing::warn!("PDF extraction failed for {}: {}", filename, e);
                Error::unsupported_document(filename, PDF_READ_ERROR)
            })?,
        };

        let text = text.replace('\0', "");
        if text.trim().is_empty() {
            tracing::warn!("{} has no extractable text layer", filename);
            return Err(Error::unsupported_document(filename, PDF_READ_ERROR));
        }

        Ok(text)
    }

    /// Run pdf-extract on a worker thread; it can hang or panic on odd fonts
    fn extract_pdf_with_timeout(data: &[u8]) -> Option<String> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                Some(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed: {}, trying lopdf", e);
                None
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("pdf-extract timed out after {:?}", PDF_EXTRACT_TIMEOUT);
                None
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("pdf-extract thread crashed");
                None
            }
        }
    }

    /// Page-by-page extraction with lopdf
    fn extract_pdf_by_pages(data: &[u8]) -> std::result::Result<String, lopdf::Error> {
        let doc = lopdf::Document::load_mem(data)?;

        // get_pages is a BTreeMap keyed by page number
        let mut text = String::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => tracing::debug!("No text on page {}: {}", page_number, e),
            }
        }

        Ok(text)
    }
}
