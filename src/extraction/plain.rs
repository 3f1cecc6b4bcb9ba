// Text-like uploads: plain text, CSV, JSON, XML, Markdown

use super::{DocumentFormat, ExtractionError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    std::str::from_utf8(data)
        .map(str::to_string)
        .map_err(|e| ExtractionError::corrupt(DocumentFormat::PlainText, e))
}

/// Heuristic used when nothing else identifies the upload.
pub fn looks_like_text(data: &[u8]) -> bool {
    !data.contains(&0) && std::str::from_utf8(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice("Income: $52,000".as_bytes());
        assert_eq!(extract_text(&data).unwrap(), "Income: $52,000");
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let err = extract_text(&[0x66, 0x6f, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ExtractionError::Corrupt { format: DocumentFormat::PlainText, .. }));
    }

    #[test]
    fn test_looks_like_text() {
        assert!(looks_like_text("Dependents: 2".as_bytes()));
        assert!(!looks_like_text(b"abc\0def"));
        assert!(!looks_like_text(&[0xc3, 0x28]));
    }
}
