//! Document text extraction for uploaded resumes.
//!
//! PDFs go through `pdf-extract`. Everything else (and any PDF that fails to parse) is
//! decoded leniently: UTF-8 when valid, Latin-1 otherwise. DOCX is not unpacked.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// A single uploaded file, as read from a multipart field.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn is_pdf(&self) -> bool {
        self.bytes.starts_with(PDF_MAGIC)
            || self.content_type.as_deref() == Some("application/pdf")
            || self
                .filename
                .as_deref()
                .is_some_and(|name| name.to_lowercase().ends_with(".pdf"))
    }

    pub fn is_docx(&self) -> bool {
        self.content_type.as_deref() == Some(DOCX_CONTENT_TYPE)
            || self
                .filename
                .as_deref()
                .is_some_and(|name| name.to_lowercase().ends_with(".docx"))
    }

    fn label(&self) -> &str {
        self.filename.as_deref().unwrap_or("<unnamed>")
    }
}

/// Converts one document to text. Never fails: unreadable PDFs fall back to lenient decoding.
pub fn extract_text(document: &UploadedDocument) -> String {
    if document.is_pdf() {
        match extract_pdf_text(&document.bytes) {
            Ok(text) => {
                debug!(
                    "Extracted {} chars from PDF {}",
                    text.len(),
                    document.label()
                );
                return text;
            }
            Err(e) => warn!("{e} for {}; decoding raw bytes instead", document.label()),
        }
    } else if document.is_docx() {
        warn!(
            "DOCX text extraction is unsupported; decoding {} as raw bytes",
            document.label()
        );
    }
    decode_lenient(&document.bytes)
}

/// pdf-extract panics on some well-formed documents (e.g. text drawn with an
/// undeclared font); a panic is reported like any other extraction error.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractError::Pdf("extractor panicked".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// UTF-8 when valid, otherwise Latin-1 (each byte becomes the code point of the same value).
pub fn decode_lenient(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Concatenates document texts, each preceded by a newline.
pub fn combine_documents<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts.into_iter().fold(String::new(), |mut combined, text| {
        combined.push('\n');
        combined.push_str(text.as_ref());
        combined
    })
}

/// Extracts and concatenates every document. CPU-bound; call from a blocking task.
pub fn extract_documents(documents: &[UploadedDocument]) -> String {
    combine_documents(documents.iter().map(extract_text))
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Builds a one-page PDF drawing `text` with font `/F1`. When `with_font` is false the
    /// page declares no resources, so `/F1` is undefined.
    pub(crate) fn one_page_pdf(text: &str, with_font: bool) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let resources = if with_font {
            " /Resources << /Font << /F1 5 0 R >> >>"
        } else {
            ""
        };

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R{resources} >>"
            ),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
        ];
        if with_font {
            objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
        }

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }

        let xref_offset = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::one_page_pdf;
    use super::*;
    use crate::analysis::scorer::compute_keyword_match;

    fn doc(filename: Option<&str>, content_type: Option<&str>, bytes: &'static [u8]) -> UploadedDocument {
        UploadedDocument {
            filename: filename.map(String::from),
            content_type: content_type.map(String::from),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_valid_utf8_is_kept() {
        assert_eq!(decode_lenient("Résumé: Python".as_bytes()), "Résumé: Python");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        // 0xE9 alone is invalid UTF-8 and is 'é' in Latin-1.
        assert_eq!(decode_lenient(b"caf\xe9 python"), "café python");
    }

    #[test]
    fn test_latin1_maps_every_byte() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode_lenient(&bytes);
        assert_eq!(text.chars().count(), 256);
    }

    #[test]
    fn test_combine_prefixes_each_document_with_newline() {
        assert_eq!(combine_documents(["a", "b"]), "\na\nb");
        assert_eq!(combine_documents(Vec::<String>::new()), "");
    }

    #[test]
    fn test_pdf_detection() {
        assert!(doc(None, None, b"%PDF-1.7 ...").is_pdf());
        assert!(doc(Some("CV.PDF"), None, b"").is_pdf());
        assert!(doc(None, Some("application/pdf"), b"").is_pdf());
        assert!(!doc(Some("resume.txt"), Some("text/plain"), b"python").is_pdf());
    }

    #[test]
    fn test_text_documents_are_concatenated() {
        let docs = vec![
            doc(Some("a.txt"), Some("text/plain"), b"Python, Pandas"),
            doc(Some("b.txt"), None, b"Docker"),
        ];
        assert_eq!(extract_documents(&docs), "\nPython, Pandas\nDocker");
    }

    #[test]
    fn test_pdf_text_is_extracted_and_scored() {
        let document = UploadedDocument {
            filename: Some("cv.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from(one_page_pdf("python pandas", true)),
        };

        let text = extract_pdf_text(&document.bytes).unwrap();
        assert!(text.contains("python pandas"), "extracted {text:?}");
        assert!(!text.contains("Tj"));

        let report = compute_keyword_match(&extract_text(&document), "python, pandas, numpy");
        assert_eq!(report.matched, vec!["python", "pandas"]);
        assert_eq!(report.score, 66);
    }

    #[test]
    fn test_pdf_without_font_falls_back_to_raw_bytes() {
        let document = UploadedDocument {
            filename: Some("cv.pdf".to_string()),
            content_type: None,
            bytes: Bytes::from(one_page_pdf("python pandas", false)),
        };

        // Extraction panics on the undefined font; the uncompressed content stream
        // still carries the text once the raw bytes are decoded.
        let text = extract_text(&document);
        assert!(text.contains("python pandas"), "got {text:?}");
    }

    #[test]
    fn test_docx_detection_and_raw_decode() {
        let document = doc(Some("Resume.DOCX"), None, b"PK\x03\x04 docker");
        assert!(document.is_docx());
        assert!(!document.is_pdf());
        assert_eq!(extract_text(&document), "PK\u{3}\u{4} docker");

        let by_type = doc(None, Some(DOCX_CONTENT_TYPE), b"");
        assert!(by_type.is_docx());
    }
}
