use std::path::Path;

use resit_ocr::OcrResult;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::BatchError;
use crate::submissions::{Submission, SubmissionSheet};

/// Extracted columns, prepended to the original sheet's columns.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "Amount spent",
    "Validity",
    "Reason for invalid",
    "Product purchased 1",
    "Amount purchased 1",
    "Product purchased 2",
    "Amount purchased 2",
    "Product purchased 3",
    "Amount purchased 3",
    "Store",
    "Store Location",
];

const PRODUCT_COLUMNS: usize = 3;

pub const SHEET_NAME: &str = "Processed";

/// The processed sheet, fully rendered to text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    /// `results[i]` belongs to `sheet.rows[i]`.
    pub fn build(sheet: &SubmissionSheet, results: &[OcrResult]) -> Self {
        let headers = OUTPUT_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(sheet.headers.iter().cloned())
            .collect();

        let rows = sheet
            .rows
            .iter()
            .zip(results)
            .map(|(submission, result)| {
                let mut row = extracted_cells(submission, result);
                row.extend(submission.fields.iter().cloned());
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), BatchError> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_xlsx(&self, path: &Path) -> Result<(), BatchError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string((row_idx + 1) as u32, col as u16, value)?;
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn extracted_cells(submission: &Submission, result: &OcrResult) -> Vec<String> {
    let fields = &result.extracted;
    let mut cells = vec![
        fields.amount_text(),
        fields.verdict().to_string(),
        fields.reason().to_string(),
    ];

    for slot in 0..PRODUCT_COLUMNS {
        match fields.products.get(slot) {
            Some(p) => cells.extend([p.name.clone(), p.quantity.to_string()]),
            None => cells.extend([String::new(), String::new()]),
        }
    }

    cells.push(fields.store.clone().unwrap_or_default());
    // Nothing recognized: show what the submitter typed instead.
    let location = if result.lines.is_empty() {
        submission.fallback_location()
    } else {
        fields.location.clone().unwrap_or_default()
    };
    cells.push(location);
    cells
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use resit_ocr::{Extractor, MockRecognizer, ReceiptPipeline};

    fn sheet() -> SubmissionSheet {
        SubmissionSheet::from_reader(
            "Submission No,City,State\nS-1,Ipoh,Perak\nS-2,Kuantan,Pahang\n".as_bytes(),
        )
        .unwrap()
    }

    fn results() -> Vec<OcrResult> {
        let ok = ReceiptPipeline::new(
            MockRecognizer::new("Senheng Electric\nKHIND Stand Fan 2x\nTotal 179.80\n43000 Kajang, Selangor"),
            Extractor::default(),
        );
        let failing = ReceiptPipeline::new(MockRecognizer::failing("blur"), Extractor::default());
        vec![ok.process_bytes(b"img"), failing.process_bytes(b"img")]
    }

    #[test]
    fn rows_prepend_extracted_columns() {
        let report = Report::build(&sheet(), &results());
        assert_eq!(report.headers.len(), OUTPUT_COLUMNS.len() + 3);
        assert_eq!(report.headers[0], "Amount spent");
        assert_eq!(report.headers[11], "Submission No");

        let row = &report.rows[0];
        assert_eq!(row[0], "RM179.80");
        assert_eq!(row[1], "VALID");
        assert_eq!(row[2], "");
        assert_eq!((row[3].as_str(), row[4].as_str()), ("KHIND Stand Fan 2x", "2"));
        assert_eq!(row[5], "");
        assert_eq!(row[9], "Senheng Electric");
        assert_eq!(row[10], "Kajang, Selangor");
        assert_eq!(&row[11..], ["S-1", "Ipoh", "Perak"]);
    }

    #[test]
    fn unrecognized_rows_fall_back_to_submitter_location() {
        let report = Report::build(&sheet(), &results());
        let row = &report.rows[1];
        assert_eq!(row[1], "INVALID");
        assert_eq!(row[2], "OCR failed");
        assert_eq!(row[10], "Kuantan, Pahang");
    }

    #[test]
    fn writes_csv_and_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::build(&sheet(), &results());

        let csv_path = dir.path().join("processed.csv");
        report.write_csv(&csv_path).unwrap();
        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 14);
        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][2], "OCR failed");

        let xlsx_path = dir.path().join("processed.xlsx");
        report.write_xlsx(&xlsx_path).unwrap();
        assert!(std::fs::metadata(&xlsx_path).unwrap().len() > 0);
    }
}
