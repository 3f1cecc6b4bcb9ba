// Word (OOXML) extraction via docx-rust

use std::io::Cursor;

use docx_rust::DocxFile;

use super::{DocumentFormat, ExtractionError};

pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let file = DocxFile::from_reader(Cursor::new(data.to_vec()))
        .map_err(|e| ExtractionError::corrupt(DocumentFormat::Docx, e))?;
    let docx = file
        .parse()
        .map_err(|e| ExtractionError::corrupt(DocumentFormat::Docx, e))?;

    Ok(docx.document.body.text())
}
