//! Document text extraction
//!
//! Converts the bytes of an uploaded document into plain text. The handler only
//! sees the [`TextExtractor`] trait; [`DocumentTextExtractor`] is the default
//! implementation and dispatches on the detected [`DocumentFormat`]:
//! - PDF via lopdf
//! - DOCX via docx-rust
//! - XLSX / XLS / ODS via calamine
//! - text-like formats (plain text, CSV, JSON, XML, Markdown) as UTF-8

pub mod docx;
pub mod pdf;
pub mod plain;
pub mod spreadsheet;

use std::fmt;

use mime::Mime;
use tracing::debug;

use crate::models::UploadedFile;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const SPREADSHEET_MIMES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/vnd.ms-excel.sheet.macroenabled.12",
    "application/vnd.ms-excel.sheet.binary.macroenabled.12",
    "application/vnd.oasis.opendocument.spreadsheet",
];
const TEXT_LIKE_MIMES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/csv",
    "application/x-yaml",
    "application/yaml",
];

const MARKUP_MIMES: &[&str] = &["text/html", "application/xhtml+xml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Spreadsheet,
    PlainText,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Docx => write!(f, "docx"),
            DocumentFormat::Spreadsheet => write!(f, "spreadsheet"),
            DocumentFormat::PlainText => write!(f, "text"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read {format} document: {reason}")]
    Corrupt { format: DocumentFormat, reason: String },

    #[error("extraction task failed: {0}")]
    Task(String),
}

impl ExtractionError {
    pub(crate) fn corrupt(format: DocumentFormat, reason: impl fmt::Display) -> Self {
        ExtractionError::Corrupt {
            format,
            reason: reason.to_string(),
        }
    }
}

/// Turns raw document bytes into plain text.
///
/// Implementations are synchronous; callers on the async runtime are expected
/// to run them on the blocking pool.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError>;
}

/// Format-sniffing extractor backed by lopdf, docx-rust and calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        let format = detect_format(file)?;
        debug!(%format, size = file.data.len(), "Extracting document text");

        match format {
            DocumentFormat::Pdf => pdf::extract_text(&file.data),
            DocumentFormat::Docx => docx::extract_text(&file.data),
            DocumentFormat::Spreadsheet => spreadsheet::extract_text(&file.data),
            DocumentFormat::PlainText => plain::extract_text(&file.data),
        }
    }
}

/// Decide how to read an upload.
///
/// Magic bytes win over the declared content type, which wins over the file
/// name extension. Images, audio, video and HTML are refused unless their bytes
/// say otherwise. Content that carries no hint at all is read as text when it
/// is valid UTF-8.
pub fn detect_format(file: &UploadedFile) -> Result<DocumentFormat, ExtractionError> {
    let data = &file.data[..];
    let hints = declared_mimes(file);

    let hinted = hints.iter().find_map(format_for_mime);

    if data.starts_with(PDF_MAGIC) {
        return Ok(DocumentFormat::Pdf);
    }

    if data.starts_with(ZIP_MAGIC) {
        return match hinted {
            Some(format @ (DocumentFormat::Docx | DocumentFormat::Spreadsheet)) => Ok(format),
            _ => sniff_zip_container(data),
        };
    }

    if data.starts_with(OLE_MAGIC) {
        // Legacy .xls is readable by calamine; legacy .doc is not.
        return match hinted {
            Some(DocumentFormat::Spreadsheet) => Ok(DocumentFormat::Spreadsheet),
            _ => Err(ExtractionError::UnsupportedFormat(
                "legacy compound office document".to_string(),
            )),
        };
    }

    if let Some(media) = hints.iter().find(|m| is_unreadable_media(m)) {
        return Err(ExtractionError::UnsupportedFormat(media.essence_str().to_string()));
    }

    match hinted {
        Some(format) => Ok(format),
        None if plain::looks_like_text(data) => Ok(DocumentFormat::PlainText),
        None => Err(ExtractionError::UnsupportedFormat(
            hints
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "unrecognised binary content".to_string()),
        )),
    }
}

fn declared_mimes(file: &UploadedFile) -> Vec<Mime> {
    let mut mimes = Vec::new();

    if let Some(declared) = file
        .content_type
        .as_deref()
        .and_then(|ct| ct.parse::<Mime>().ok())
    {
        if declared.essence_str() != mime::APPLICATION_OCTET_STREAM.essence_str() {
            mimes.push(declared);
        }
    }

    if let Some(guessed) = file
        .file_name
        .as_deref()
        .and_then(|name| mime_guess::from_path(name).first())
    {
        mimes.push(guessed);
    }

    mimes
}

// Media we cannot turn into text: no OCR, and markup would reach the prompt
// with its tags intact.
fn is_unreadable_media(media: &Mime) -> bool {
    matches!(media.type_().as_str(), "image" | "audio" | "video")
        || MARKUP_MIMES.contains(&media.essence_str())
}

fn format_for_mime(media: &Mime) -> Option<DocumentFormat> {
    let essence = media.essence_str();

    if essence == mime::APPLICATION_PDF.essence_str() {
        Some(DocumentFormat::Pdf)
    } else if essence == DOCX_MIME {
        Some(DocumentFormat::Docx)
    } else if SPREADSHEET_MIMES.contains(&essence) {
        Some(DocumentFormat::Spreadsheet)
    } else if MARKUP_MIMES.contains(&essence) {
        None
    } else if media.type_() == mime::TEXT
        || TEXT_LIKE_MIMES.contains(&essence)
        || media.suffix().is_some_and(|s| s == mime::JSON || s == mime::XML)
    {
        Some(DocumentFormat::PlainText)
    } else {
        None
    }
}

// Entry names of a ZIP archive are stored uncompressed in its local headers.
fn sniff_zip_container(data: &[u8]) -> Result<DocumentFormat, ExtractionError> {
    if contains(data, b"word/document.xml") {
        Ok(DocumentFormat::Docx)
    } else if contains(data, b"xl/workbook")
        || contains(data, b"application/vnd.oasis.opendocument.spreadsheet")
    {
        Ok(DocumentFormat::Spreadsheet)
    } else {
        Err(ExtractionError::UnsupportedFormat("zip archive".to_string()))
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
