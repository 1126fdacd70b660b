//! Per-image box CSV reader and writer.
//!
//! Each image in the standard layout has a companion file
//! `csv/<stem>.csv` holding its boxes, one per row:
//!
//! ```text
//! #item,x,y,width,height,label
//! 0,99,692,61,72,1
//! ```
//!
//! All coordinates are pixels with (x, y) the top-left corner, i.e.
//! already in COCO bbox order. Rows with missing or non-numeric fields
//! are a hard error naming the file and row; an offline batch tool is
//! better off failing loudly than silently dropping boxes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::bbox::{BBox, LabeledBox};
use crate::error::WheatsetError;

/// One row of a per-image box CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    /// Zero-based index of the box within its image.
    #[serde(rename = "#item")]
    pub item: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: u64,
}

impl From<&BoxRecord> for LabeledBox {
    fn from(row: &BoxRecord) -> Self {
        LabeledBox {
            bbox: BBox::new(row.x, row.y, row.width, row.height),
            label: row.label,
        }
    }
}

/// Reads all box rows from a per-image CSV file.
///
/// # Errors
/// Returns `MalformedAnnotation` (naming the file and 1-based row) if a
/// row fails to parse as five numeric fields plus label, or `CsvRead`
/// if the file itself cannot be read.
pub fn read_box_csv(path: &Path) -> Result<Vec<BoxRecord>, WheatsetError> {
    let file = File::open(path).map_err(WheatsetError::Io)?;
    let reader = BufReader::new(file);
    parse_box_csv(reader, path)
}

/// Reads box rows from a CSV string. Useful for testing without file I/O.
pub fn from_box_csv_str(csv_str: &str) -> Result<Vec<BoxRecord>, WheatsetError> {
    parse_box_csv(csv_str.as_bytes(), Path::new("<string>"))
}

fn parse_box_csv<R: std::io::Read>(reader: R, path: &Path) -> Result<Vec<BoxRecord>, WheatsetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        // Row 1 is the header, so data rows start at 2.
        let row: BoxRecord = result.map_err(|source| WheatsetError::MalformedAnnotation {
            path: path.to_path_buf(),
            row: index + 2,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Writes box rows to a per-image CSV file, header included.
///
/// Used by the reorganize step when materializing per-image annotation
/// files from the competition CSVs.
pub fn write_box_csv(path: &Path, rows: &[BoxRecord]) -> Result<(), WheatsetError> {
    let file = File::create(path).map_err(WheatsetError::Io)?;
    let writer = BufWriter::new(file);

    let mut csv_writer = csv::Writer::from_writer(writer);

    // serde only emits the header alongside the first record, but an
    // image with no boxes still gets a header-only file.
    if rows.is_empty() {
        csv_writer
            .write_record(["#item", "x", "y", "width", "height", "label"])
            .map_err(|source| WheatsetError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|source| WheatsetError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| WheatsetError::Io(e.into_error()))?
        .flush()
        .map_err(WheatsetError::Io)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let rows = from_box_csv_str(
            "#item,x,y,width,height,label\n\
             0,99,692,61,72,1\n\
             1,10.5,20.5,30,40,1\n",
        )
        .expect("parse failed");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item, 0);
        assert_eq!(rows[0].x, 99.0);
        assert_eq!(rows[0].y, 692.0);
        assert_eq!(rows[0].width, 61.0);
        assert_eq!(rows[0].height, 72.0);
        assert_eq!(rows[0].label, 1);
        assert_eq!(rows[1].x, 10.5);
    }

    #[test]
    fn test_empty_file_has_no_rows() {
        let rows = from_box_csv_str("#item,x,y,width,height,label\n").expect("parse failed");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let result = from_box_csv_str(
            "#item,x,y,width,height,label\n\
             0,99,692,61,72,1\n\
             1,oops,0,10,10,1\n",
        );

        match result {
            Err(WheatsetError::MalformedAnnotation { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected MalformedAnnotation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = from_box_csv_str(
            "#item,x,y,width,height,label\n\
             0,99,692,61\n",
        );
        assert!(matches!(
            result,
            Err(WheatsetError::MalformedAnnotation { row: 2, .. })
        ));
    }

    #[test]
    fn test_write_empty_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_box_csv(&path, &[]).expect("write failed");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "#item,x,y,width,height,label\n");
        assert!(read_box_csv(&path).expect("read failed").is_empty());
    }

    #[test]
    fn test_write_then_read_preserves_rows() {
        let rows = vec![
            BoxRecord {
                item: 0,
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
                label: 1,
            },
            BoxRecord {
                item: 1,
                x: 50.25,
                y: 60.75,
                width: 7.0,
                height: 8.0,
                label: 1,
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.csv");
        write_box_csv(&path, &rows).expect("write failed");

        let restored = read_box_csv(&path).expect("read failed");
        assert_eq!(restored, rows);
    }
}
