//! Label map (`labelmap.json`) reader.
//!
//! The standard layout places a `labelmap.json` next to the category
//! directory describing the labels used by the annotation tool:
//!
//! ```json
//! [{"object_id": 1, "label_id": 1, "keyboard_shortcut": "1", "object_name": "wheat_head"}]
//! ```
//!
//! The converter uses it, when present, to resolve the category name
//! for a numeric label instead of relying on the built-in default.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WheatsetError;

/// One entry of `labelmap.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMapEntry {
    pub object_id: u64,
    pub label_id: u64,
    pub keyboard_shortcut: String,
    pub object_name: String,
}

/// The parsed label map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMap {
    pub entries: Vec<LabelMapEntry>,
}

impl LabelMap {
    /// Returns the object name registered for a numeric label, if any.
    pub fn name_for(&self, label_id: u64) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.label_id == label_id)
            .map(|entry| entry.object_name.as_str())
    }
}

/// Reads `labelmap.json` from `path`.
pub fn read_labelmap(path: &Path) -> Result<LabelMap, WheatsetError> {
    let file = File::open(path).map_err(WheatsetError::Io)?;
    let reader = BufReader::new(file);

    let entries: Vec<LabelMapEntry> =
        serde_json::from_reader(reader).map_err(|source| WheatsetError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(LabelMap { entries })
}
