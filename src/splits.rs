//! Split membership lists.
//!
//! Splits live under `sets/` as plain text files (`train.txt`,
//! `val.txt`, `test.txt`, plus the derived `all.txt` and
//! `train_val.txt`), one image basename per line with no extension.
//! A missing split file is not an error: the converter falls back to
//! every image found under `images/`, sorted by stem, which matches the
//! behavior of datasets shipped without explicit splits.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::WheatsetError;

/// Image extensions the dataset convention allows, in resolution order.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "bmp"];

/// Reads the basenames listed in a split file, skipping blank lines.
pub fn read_split_list(path: &Path) -> Result<Vec<String>, WheatsetError> {
    let contents = fs::read_to_string(path).map_err(WheatsetError::Io)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Returns the basenames for a split, in deterministic order.
///
/// Uses `sets/<split>.txt` when it exists (preserving the file's own
/// ordering, which fixes ID assignment); otherwise scans `images_dir`
/// for known image extensions and returns the sorted, deduplicated
/// stems.
pub fn split_members(
    sets_dir: &Path,
    split: &str,
    images_dir: &Path,
) -> Result<Vec<String>, WheatsetError> {
    let split_file = sets_dir.join(format!("{split}.txt"));
    if split_file.is_file() {
        return read_split_list(&split_file);
    }

    log::warn!(
        "split file {} not found, falling back to all images",
        split_file.display()
    );
    discover_stems(images_dir)
}

/// Scans an image directory and returns the sorted stems of all files
/// with a known image extension.
pub fn discover_stems(images_dir: &Path) -> Result<Vec<String>, WheatsetError> {
    let mut stems = Vec::new();

    for entry in WalkDir::new(images_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| WheatsetError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let has_image_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });

        if has_image_ext {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }

    stems.sort();
    stems.dedup();
    Ok(stems)
}
