use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Failed to parse settings TOML: {0}")]
    Settings(#[from] toml::de::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Worker pool closed: {0}")]
    Pool(#[from] tokio::sync::AcquireError),
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
