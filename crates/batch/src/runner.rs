use std::path::{Path, PathBuf};
use std::sync::Arc;

use resit_ocr::{InvalidReason, OcrBackend, OcrResult, ReceiptPipeline, Validity};
use tokio::sync::Semaphore;

use crate::error::BatchError;
use crate::images::resolve_images;
use crate::report::Report;
use crate::submissions::SubmissionSheet;

/// One batch run: a submissions sheet paired row-by-row with receipt images.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub submissions: PathBuf,
    /// Directory of images or a `.zip` archive.
    pub images: PathBuf,
    pub out_dir: PathBuf,
    pub workers: usize,
    /// Write each receipt's OCR lines to `debug_txt/<submission>.txt`.
    pub dump_lines: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub valid: usize,
    pub run_dir: PathBuf,
    pub csv_path: PathBuf,
    pub xlsx_path: PathBuf,
}

/// Load → OCR every row → write `processed_<ts>.csv` and `.xlsx`.
pub async fn run_batch<R>(pipeline: ReceiptPipeline<R>, job: &BatchJob) -> Result<BatchSummary, BatchError>
where
    R: OcrBackend + 'static,
{
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let run_dir = job.out_dir.join(format!("run_{ts}"));
    tokio::fs::create_dir_all(&run_dir).await?;

    let sheet = SubmissionSheet::load(&job.submissions)?;
    let images = resolve_images(&job.images, &run_dir)?;
    if images.len() < sheet.rows.len() {
        tracing::warn!(
            rows = sheet.rows.len(),
            images = images.len(),
            "Fewer images than submissions; trailing rows will be marked missing"
        );
    }

    let results = process_rows(Arc::new(pipeline), &sheet, &images, job.workers).await?;

    if job.dump_lines {
        dump_lines(&run_dir.join("debug_txt"), &sheet, &results)?;
    }

    let report = Report::build(&sheet, &results);
    let csv_path = job.out_dir.join(format!("processed_{ts}.csv"));
    let xlsx_path = job.out_dir.join(format!("processed_{ts}.xlsx"));
    report.write_csv(&csv_path)?;
    report.write_xlsx(&xlsx_path)?;

    let valid = results
        .iter()
        .filter(|r| r.extracted.validity == Validity::Valid)
        .count();
    tracing::info!(rows = results.len(), valid, csv = %csv_path.display(), "Batch complete");

    Ok(BatchSummary {
        rows: results.len(),
        valid,
        run_dir,
        csv_path,
        xlsx_path,
    })
}

/// Run every row through the pipeline on blocking threads, at most `workers`
/// at a time. Row N uses image N; rows without an image are marked missing.
/// Results come back in row order.
pub async fn process_rows<R>(
    pipeline: Arc<ReceiptPipeline<R>>,
    sheet: &SubmissionSheet,
    images: &[PathBuf],
    workers: usize,
) -> Result<Vec<OcrResult>, BatchError>
where
    R: OcrBackend + 'static,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(sheet.rows.len());

    for (idx, submission) in sheet.rows.iter().enumerate() {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let pipeline = Arc::clone(&pipeline);
        let image = images.get(idx).cloned();
        let number = submission.number.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            match image {
                Some(path) => {
                    tracing::info!(row = idx + 2, submission = %number, image = %path.display(), "Processing receipt");
                    pipeline.process_file(&path)
                }
                None => {
                    tracing::info!(row = idx + 2, submission = %number, "No image for submission");
                    pipeline.missing_image()
                }
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}

/// Raw OCR lines per submission, for tuning the extraction rules. Rows whose
/// image was missing or unreadable have nothing to dump.
pub fn dump_lines(dir: &Path, sheet: &SubmissionSheet, results: &[OcrResult]) -> Result<(), BatchError> {
    std::fs::create_dir_all(dir)?;
    for (idx, (submission, result)) in sheet.rows.iter().zip(results).enumerate() {
        if matches!(
            result.extracted.validity,
            Validity::Invalid(InvalidReason::ImageMissing | InvalidReason::OcrFailed)
        ) {
            continue;
        }
        let name = dump_name(&submission.number, idx);
        std::fs::write(dir.join(format!("{name}.txt")), result.lines.join("\n"))?;
    }
    Ok(())
}

fn dump_name(submission: &str, idx: usize) -> String {
    let name: String = submission
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if name.trim().is_empty() {
        format!("row_{}", idx + 2)
    } else {
        name
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
