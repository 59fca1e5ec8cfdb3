use std::io::Read;
use std::path::Path;

use crate::error::BatchError;

pub const SUBMISSION_COLUMN: &str = "Submission No";

/// One row of the submissions sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub number: String,
    /// Submitter-entered city, if the sheet has a City column and it is filled.
    pub city: Option<String>,
    pub state: Option<String>,
    /// Every original cell, padded to the header width.
    pub fields: Vec<String>,
}

impl Submission {
    /// What the submitter typed: "City, State" when both are present,
    /// otherwise the state alone, otherwise empty.
    pub fn fallback_location(&self) -> String {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (_, Some(state)) => state.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Submission>,
}

impl SubmissionSheet {
    pub fn load(path: &Path) -> Result<Self, BatchError> {
        let file = std::fs::File::open(path)?;
        let sheet = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), rows = sheet.rows.len(), "Loaded submissions");
        Ok(sheet)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BatchError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let submission_col = headers
            .iter()
            .position(|h| h.trim() == SUBMISSION_COLUMN)
            .ok_or_else(|| BatchError::MissingColumn(SUBMISSION_COLUMN.to_string()))?;
        let city_col = find_column(&headers, "city");
        let state_col = find_column(&headers, "state");

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            fields.resize(headers.len().max(fields.len()), String::new());

            rows.push(Submission {
                number: fields[submission_col].trim().to_string(),
                city: city_col.and_then(|c| filled(&fields[c])),
                state: state_col.and_then(|c| filled(&fields[c])),
                fields,
            });
        }

        Ok(Self { headers, rows })
    }
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn filled(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
