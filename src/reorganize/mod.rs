//! Raw-to-standard layout reorganization.
//!
//! The dataset is distributed as a flat `images/` pool plus three
//! competition CSVs (`competition_{train,val,test}.csv`) whose
//! `BoxesString` column packs corner boxes as `x1 y1 x2 y2;...`.
//! This step rebuilds the standard layout from those files:
//!
//! ```text
//! <category>/
//!   images/   copied image files
//!   csv/      one box CSV per image (#item,x,y,width,height,label)
//!   json/     per-image JSON copied over when present
//!   sets/     train/val/test/all/train_val membership lists
//! ```
//!
//! Box groups that fail to parse are skipped with a warning rather than
//! aborting the run; the raw CSVs are known to contain a handful of
//! `no_box` placeholder entries.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dataset::io_box_csv::{write_box_csv, BoxRecord};
use crate::error::WheatsetError;

/// Numeric label written into every generated box row.
const BOX_LABEL: u64 = 1;

/// Options for a reorganization run.
#[derive(Clone, Debug)]
pub struct ReorganizeOptions {
    /// Raw root holding `competition_*.csv` and the `images/` pool.
    pub raw_root: PathBuf,

    /// Category directory to build the standard layout under.
    pub category_root: PathBuf,
}

/// Counts reported after a reorganization run.
#[derive(Clone, Debug, Default)]
pub struct ReorganizeSummary {
    pub processed: usize,
    pub skipped: usize,
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

#[derive(Debug, Deserialize)]
struct CompetitionRow {
    image_name: String,

    #[serde(rename = "BoxesString")]
    boxes: String,
}

/// Rebuilds the standard dataset layout from the competition CSVs.
pub fn reorganize(opts: &ReorganizeOptions) -> Result<ReorganizeSummary, WheatsetError> {
    let images_pool = opts.raw_root.join("images");

    let train = read_competition_csv(&opts.raw_root.join("competition_train.csv"))?;
    let val = read_competition_csv(&opts.raw_root.join("competition_val.csv"))?;
    let test = read_competition_csv(&opts.raw_root.join("competition_test.csv"))?;

    let csv_dir = opts.category_root.join("csv");
    let json_dir = opts.category_root.join("json");
    let images_dir = opts.category_root.join("images");
    let sets_dir = opts.category_root.join("sets");
    for dir in [&csv_dir, &json_dir, &images_dir, &sets_dir] {
        fs::create_dir_all(dir).map_err(WheatsetError::Io)?;
    }

    write_set_files(&sets_dir, &train, &val, &test)?;

    // Later splits win on duplicate names, matching the raw data where
    // each image appears in exactly one competition CSV anyway.
    let mut combined: BTreeMap<String, String> = BTreeMap::new();
    for row in train.iter().chain(val.iter()).chain(test.iter()) {
        combined.insert(row.image_name.clone(), row.boxes.clone());
    }

    let mut summary = ReorganizeSummary {
        train: train.len(),
        val: val.len(),
        test: test.len(),
        ..Default::default()
    };

    for (image_name, boxes_string) in &combined {
        let stem = match Path::new(image_name).file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => {
                log::warn!("cannot derive basename from '{image_name}', skipping");
                summary.skipped += 1;
                continue;
            }
        };

        let source_image = images_pool.join(image_name);
        if !source_image.is_file() {
            log::warn!("image not found: {}, skipping", source_image.display());
            summary.skipped += 1;
            continue;
        }

        copy_if_absent(&source_image, &images_dir.join(image_name))?;

        let source_json = images_pool.join(format!("{stem}.json"));
        if source_json.is_file() {
            copy_if_absent(&source_json, &json_dir.join(format!("{stem}.json")))?;
        }

        let rows = parse_boxes_string(boxes_string);
        write_box_csv(&csv_dir.join(format!("{stem}.csv")), &rows)?;

        summary.processed += 1;
        if summary.processed % 100 == 0 {
            log::info!("processed {} images...", summary.processed);
        }
    }

    Ok(summary)
}

/// Parses a competition `BoxesString` (`x1 y1 x2 y2;...`) into box CSV
/// rows, converting corner boxes to x/y/width/height.
///
/// Malformed groups are skipped with a warning; their item index is
/// still consumed so surviving rows keep their position.
pub fn parse_boxes_string(boxes_string: &str) -> Vec<BoxRecord> {
    let mut rows = Vec::new();

    for (item, group) in boxes_string.split(';').enumerate() {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }

        let coords: Vec<f64> = group
            .split_whitespace()
            .map_while(|token| token.parse::<f64>().ok())
            .collect();

        if coords.len() != 4 || group.split_whitespace().count() != 4 {
            log::warn!("failed to parse box group '{group}', skipping");
            continue;
        }

        let (x1, y1, x2, y2) = (coords[0], coords[1], coords[2], coords[3]);
        rows.push(BoxRecord {
            item: item as u32,
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            label: BOX_LABEL,
        });
    }

    rows
}

fn read_competition_csv(path: &Path) -> Result<Vec<CompetitionRow>, WheatsetError> {
    if !path.is_file() {
        log::warn!("competition CSV {} not found, treating as empty", path.display());
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(WheatsetError::Io)?;
    let mut csv_reader = csv::Reader::from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CompetitionRow = result.map_err(|source| WheatsetError::CsvRead {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Writes the five membership lists under `sets/`: one per competition
/// split plus the derived `all` and `train_val` unions. Stems are
/// sorted and deduplicated.
fn write_set_files(
    sets_dir: &Path,
    train: &[CompetitionRow],
    val: &[CompetitionRow],
    test: &[CompetitionRow],
) -> Result<(), WheatsetError> {
    let train_stems = stems_of(train);
    let val_stems = stems_of(val);
    let test_stems = stems_of(test);

    let train_val: BTreeSet<String> = train_stems.union(&val_stems).cloned().collect();
    let all: BTreeSet<String> = train_val.union(&test_stems).cloned().collect();

    write_split_file(&sets_dir.join("train.txt"), &train_stems)?;
    write_split_file(&sets_dir.join("val.txt"), &val_stems)?;
    write_split_file(&sets_dir.join("test.txt"), &test_stems)?;
    write_split_file(&sets_dir.join("train_val.txt"), &train_val)?;
    write_split_file(&sets_dir.join("all.txt"), &all)?;

    Ok(())
}

fn stems_of(rows: &[CompetitionRow]) -> BTreeSet<String> {
    rows.iter()
        .filter_map(|row| {
            Path::new(&row.image_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .collect()
}

fn write_split_file(path: &Path, stems: &BTreeSet<String>) -> Result<(), WheatsetError> {
    let file = File::create(path).map_err(WheatsetError::Io)?;
    let mut writer = BufWriter::new(file);
    for stem in stems {
        writeln!(writer, "{stem}").map_err(WheatsetError::Io)?;
    }
    writer.flush().map_err(WheatsetError::Io)
}

fn copy_if_absent(source: &Path, dest: &Path) -> Result<(), WheatsetError> {
    if !dest.exists() {
        fs::copy(source, dest).map_err(WheatsetError::Io)?;
    }
    Ok(())
}
