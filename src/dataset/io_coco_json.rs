//! COCO JSON document writer and reader.
//!
//! The writer produces the aggregated per-split annotation file
//! (`<category>_instances_<split>.json`). Output is pretty-printed and
//! deterministic: the same inputs in the same split order produce
//! byte-identical files, so regenerating unchanged splits is a no-op
//! in version control.
//!
//! Writes go through a temporary file in the destination directory
//! followed by a rename, so a failed run never leaves a truncated
//! document behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::model::Dataset;
use crate::error::WheatsetError;

/// Writes a COCO document to `path`, replacing any existing file.
pub fn write_coco_json(path: &Path, dataset: &Dataset) -> Result<(), WheatsetError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(WheatsetError::Io)?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, dataset).map_err(|source| {
            WheatsetError::JsonWrite {
                path: path.to_path_buf(),
                source,
            }
        })?;
        writer.flush().map_err(WheatsetError::Io)?;
    }

    tmp.persist(path)
        .map_err(|e| WheatsetError::Io(e.error))?;
    Ok(())
}

/// Reads a COCO document from a JSON file.
pub fn read_coco_json(path: &Path) -> Result<Dataset, WheatsetError> {
    let file = File::open(path).map_err(WheatsetError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| WheatsetError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes a COCO document to a string. Useful for testing without
/// file I/O.
pub fn to_coco_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dataset)
}

/// Parses a COCO document from a string. Useful for testing without
/// file I/O.
pub fn from_coco_str(json: &str) -> Result<Dataset, serde_json::Error> {
    serde_json::from_str(json)
}
