use std::fs::File;
use std::path::{Path, PathBuf};

use zip::read::ZipArchive;

use crate::error::BatchError;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Resolve the `--images` argument to an ordered image list. A `.zip` archive
/// is unpacked under `run_dir/images` first; a directory is scanned in place.
pub fn resolve_images(input: &Path, run_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let is_zip = input.is_file()
        && input
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

    let images = if is_zip {
        let dest = run_dir.join("images");
        extract_zip(input, &dest)?;
        collect_images(&dest)?
    } else {
        collect_images(input)?
    };

    tracing::info!(
        count = images.len(),
        first = ?images.iter().take(5).filter_map(|p| p.file_name()).collect::<Vec<_>>(),
        "Found images"
    );
    Ok(images)
}

pub fn extract_zip(archive: &Path, dest: &Path) -> Result<(), BatchError> {
    std::fs::create_dir_all(dest)?;
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    zip.extract(dest)?;
    Ok(())
}

/// Every supported image under `dir`, recursively, ordered by lower-cased file
/// name so row N of the sheet pairs with image N.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut images = Vec::new();
    walk(dir, &mut images)?;
    images.sort_by_cached_key(|p| (sort_key(p), p.clone()));
    Ok(images)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BatchError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if is_supported(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
