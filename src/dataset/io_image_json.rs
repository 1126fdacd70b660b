//! Per-image JSON annotation reader.
//!
//! Alongside the CSV files, the raw dataset carries one COCO-like JSON
//! document per image under `json/<stem>.json` (a single entry in
//! `images` plus that image's boxes in `annotations`). The converter
//! can use these as its annotation source instead of the CSVs; the
//! embedded IDs are ignored because the aggregate output re-assigns
//! them sequentially.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::bbox::{BBox, LabeledBox};
use crate::error::WheatsetError;

#[derive(Debug, Deserialize)]
struct ImageDocument {
    #[serde(default)]
    images: Vec<ImageEntry>,

    #[serde(default)]
    annotations: Vec<BoxEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    #[allow(dead_code)]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct BoxEntry {
    category_id: u64,
    bbox: BBox,
}

/// Reads the boxes of one per-image JSON document.
///
/// # Errors
/// Returns `JsonParse` for malformed JSON and `InvalidDocument` when
/// the document does not describe exactly one image.
pub fn read_image_json(path: &Path) -> Result<Vec<LabeledBox>, WheatsetError> {
    let file = File::open(path).map_err(WheatsetError::Io)?;
    let reader = BufReader::new(file);

    let doc: ImageDocument =
        serde_json::from_reader(reader).map_err(|source| WheatsetError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    document_boxes(doc, path)
}

/// Reads boxes from a per-image JSON string. Useful for testing without
/// file I/O.
pub fn from_image_json_str(json: &str, path: &Path) -> Result<Vec<LabeledBox>, WheatsetError> {
    let doc: ImageDocument =
        serde_json::from_str(json).map_err(|source| WheatsetError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    document_boxes(doc, path)
}

fn document_boxes(doc: ImageDocument, path: &Path) -> Result<Vec<LabeledBox>, WheatsetError> {
    if doc.images.len() != 1 {
        return Err(WheatsetError::InvalidDocument {
            path: path.to_path_buf(),
            message: format!(
                "expected exactly one image entry, found {}",
                doc.images.len()
            ),
        });
    }

    Ok(doc
        .annotations
        .into_iter()
        .map(|entry| LabeledBox {
            bbox: entry.bbox,
            label: entry.category_id,
        })
        .collect())
}
