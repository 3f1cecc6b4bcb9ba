// Spreadsheet extraction via calamine (xlsx, xlsm, xlsb, xls, ods)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::{DocumentFormat, ExtractionError};

/// Render every sheet as a `Sheet: <name>` header followed by tab-separated rows.
/// Sheets are separated by a blank line.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
        .map_err(|e| ExtractionError::corrupt(DocumentFormat::Spreadsheet, e))?;

    let mut sections = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ExtractionError::corrupt(DocumentFormat::Spreadsheet, e))?;

        let rows: Vec<String> = range.rows().map(render_row).collect();
        sections.push(format!("Sheet: {}\n{}", name, rows.join("\n")));
    }

    Ok(sections.join("\n\n"))
}

fn render_row(row: &[Data]) -> String {
    row.iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_row() {
        let row = vec![
            Data::String("Jane".to_string()),
            Data::Empty,
            Data::Int(52000),
        ];
        assert_eq!(render_row(&row), "Jane\t\t52000");
    }

    #[test]
    fn test_two_sheet_workbook_layout() {
        let data = include_bytes!("../../tests/fixtures/two_sheets.xlsx");
        assert_eq!(
            extract_text(data).unwrap(),
            "Sheet: Taxpayer\n\
             First Name\tLast Name\tSSN\n\
             Jane\tDoe\t123-45-6789\n\
             \n\
             Sheet: Dependents\n\
             Name\tRelationship\n\
             Sam Doe\tSon"
        );
    }

    #[test]
    fn test_non_workbook_is_corrupt() {
        let err = extract_text(b"PK\x03\x04 not really a workbook").unwrap_err();
        assert!(matches!(err, ExtractionError::Corrupt { format: DocumentFormat::Spreadsheet, .. }));
    }
}
