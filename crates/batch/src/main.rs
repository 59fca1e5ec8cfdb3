use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use resit_batch::{run_batch, BatchJob, Settings};
use resit_ocr::{split_lines, OcrBackend, ReceiptPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resit", version, about = "Extract purchase fields from receipt images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// OCR a batch of submissions and write the processed CSV and XLSX.
    Process {
        /// Submissions CSV with a "Submission No" column.
        #[arg(long)]
        submissions: PathBuf,
        /// Directory of receipt images, or a .zip of them.
        #[arg(long)]
        images: PathBuf,
        /// Settings/catalog TOML.
        #[arg(long, env = "RESIT_CATALOG")]
        catalog: Option<PathBuf>,
        #[arg(long, default_value = "outputs")]
        out: PathBuf,
        /// Concurrent OCR workers (default: one per core).
        #[arg(long)]
        workers: Option<usize>,
        /// Keep each receipt's OCR lines under debug_txt/.
        #[arg(long)]
        dump_lines: bool,
        /// Tesseract data directory.
        #[arg(long, env = "TESSDATA_PREFIX")]
        tessdata: Option<String>,
        #[arg(long, default_value = "eng")]
        lang: String,
    },
    /// Run extraction on a text file of OCR lines and print the fields as JSON.
    Extract {
        file: PathBuf,
        #[arg(long, env = "RESIT_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(p) => Settings::load(p).with_context(|| format!("loading settings from {}", p.display())),
        None => Ok(Settings::default()),
    }
}

#[cfg(feature = "tesseract")]
fn recognizer(tessdata: Option<String>, lang: &str) -> impl OcrBackend + 'static {
    resit_ocr::recognizer::tesseract_backend::TesseractRecognizer::new(tessdata, lang)
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_tessdata: Option<String>, _lang: &str) -> impl OcrBackend + 'static {
    tracing::warn!("Built without the `tesseract` feature; every image will be reported as OCR failed");
    resit_ocr::NoBackend
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Process {
            submissions,
            images,
            catalog,
            out,
            workers,
            dump_lines,
            tessdata,
            lang,
        } => {
            let mut settings = load_settings(catalog.as_ref())?;
            if workers.is_some() {
                settings.workers = workers;
            }

            let job = BatchJob {
                submissions,
                images,
                out_dir: out,
                workers: settings.worker_count(),
                dump_lines,
            };
            let pipeline = ReceiptPipeline::new(recognizer(tessdata, &lang), settings.extractor());
            let summary = run_batch(pipeline, &job).await.context("batch run failed")?;

            println!("Processed {} rows ({} valid)", summary.rows, summary.valid);
            println!("CSV:  {}", summary.csv_path.display());
            println!("XLSX: {}", summary.xlsx_path.display());
        }
        Command::Extract { file, catalog } => {
            let settings = load_settings(catalog.as_ref())?;
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let fields = settings.extractor().extract(&split_lines(&text));
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
    }

    Ok(())
}
