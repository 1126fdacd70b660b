//! Per-split COCO aggregation.
//!
//! This is the dataset's core transform: read the per-image annotation
//! files for every basename in a split, assign sequential IDs, and
//! serialize one aggregated COCO document per split.
//!
//! # ID Assignment Policy (for determinism)
//!
//! - **Images**: IDs are assigned in split-list order (1, 2, 3, ...)
//! - **Annotations**: a single global counter across the whole split,
//!   monotonically increasing across images, also starting at 1
//! - **Categories**: the fixed singleton, ID 1
//!
//! Given a fixed split ordering the output is fully deterministic, and
//! re-running the converter on unchanged inputs rewrites byte-identical
//! files.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::dataset::io_box_csv::read_box_csv;
use crate::dataset::io_coco_json::write_coco_json;
use crate::dataset::io_image_json::read_image_json;
use crate::dataset::labelmap::read_labelmap;
use crate::dataset::{
    Annotation, Category, Dataset, DatasetInfo, IdSequence, Image, ImageId, LabeledBox,
};
use crate::error::WheatsetError;
use crate::splits::{self, IMAGE_EXTENSIONS};

/// Category name used when no `labelmap.json` is present.
const DEFAULT_CATEGORY_NAME: &str = "wheat_head";

/// The numeric label the dataset's annotation rows carry.
const WHEAT_HEAD_LABEL: u64 = 1;

/// Where a split's boxes are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnnotationSource {
    /// Per-image `csv/<stem>.csv` files (the canonical source).
    #[default]
    Csv,
    /// Per-image `json/<stem>.json` documents.
    Json,
}

impl AnnotationSource {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationSource::Csv => "csv",
            AnnotationSource::Json => "json",
        }
    }
}

impl FromStr for AnnotationSource {
    type Err = WheatsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(AnnotationSource::Csv),
            "json" => Ok(AnnotationSource::Json),
            other => Err(WheatsetError::UnsupportedSource(other.to_string())),
        }
    }
}

/// Options for a conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Dataset root containing the category directory.
    pub root: PathBuf,

    /// Output directory for the generated COCO files.
    pub out_dir: PathBuf,

    /// Category directory name under the root (e.g. `wheat_heads`).
    pub category: String,

    /// Splits to generate, one output file each.
    pub splits: Vec<String>,

    /// Annotation source to read boxes from.
    pub source: AnnotationSource,
}

/// What one split produced.
#[derive(Clone, Debug)]
pub struct SplitSummary {
    pub split: String,
    pub images: usize,
    pub annotations: usize,
    pub output: PathBuf,
}

/// Converts the requested splits and writes one COCO file per split.
///
/// Splits are processed independently; a failure in one split aborts
/// the run without having written that split's output file (writes are
/// temp-then-rename).
pub fn convert(opts: &ConvertOptions) -> Result<Vec<SplitSummary>, WheatsetError> {
    fs::create_dir_all(&opts.out_dir).map_err(WheatsetError::Io)?;

    let category_root = opts.root.join(&opts.category);
    let category = resolve_category(&category_root)?;
    log::debug!(
        "converting {} split(s) of {} from the {} source",
        opts.splits.len(),
        category_root.display(),
        opts.source.name()
    );

    let mut summaries = Vec::with_capacity(opts.splits.len());
    for split in &opts.splits {
        let document = convert_split(&category_root, &opts.category, split, category.clone(), opts.source)?;

        let output = opts
            .out_dir
            .join(format!("{}_instances_{}.json", opts.category, split));
        write_coco_json(&output, &document)?;

        log::info!(
            "generated {} with {} images and {} annotations",
            output.display(),
            document.images.len(),
            document.annotations.len()
        );

        summaries.push(SplitSummary {
            split: split.clone(),
            images: document.images.len(),
            annotations: document.annotations.len(),
            output,
        });
    }

    Ok(summaries)
}

/// Builds the aggregated document for one split.
pub fn convert_split(
    category_root: &Path,
    category_dir: &str,
    split: &str,
    category: Category,
    source: AnnotationSource,
) -> Result<Dataset, WheatsetError> {
    let images_dir = category_root.join("images");
    let sets_dir = category_root.join("sets");

    let stems = splits::split_members(&sets_dir, split, &images_dir)?;

    let mut document = Dataset::for_category(DatasetInfo::for_split(category_dir, split), category);
    let mut image_ids = IdSequence::new();
    let mut annotation_ids = IdSequence::new();

    for stem in &stems {
        let image_path = resolve_image(&images_dir, stem)?;
        let (width, height) = image_dimensions(&image_path)?;

        let image_id = ImageId::new(image_ids.next_id());
        let image_file = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(stem);
        document.images.push(Image::new(
            image_id,
            format!("{category_dir}/images/{image_file}"),
            width,
            height,
        ));

        for labeled in load_boxes(category_root, stem, source)? {
            document.annotations.push(Annotation::new(
                annotation_ids.next_id(),
                image_id,
                labeled.label,
                labeled.bbox,
            ));
        }
    }

    Ok(document)
}

/// Resolves the on-disk image file for a basename, trying the known
/// extensions in order (png, jpg, bmp).
fn resolve_image(images_dir: &Path, stem: &str) -> Result<PathBuf, WheatsetError> {
    for ext in IMAGE_EXTENSIONS {
        let candidate = images_dir.join(format!("{stem}.{ext}"));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(WheatsetError::MissingResource {
        kind: "image",
        basename: stem.to_string(),
        dir: images_dir.to_path_buf(),
    })
}

/// Reads pixel dimensions from the image header.
///
/// The dataset convention is 1024x1024 throughout, but the dimensions
/// are read from the file rather than assumed.
fn image_dimensions(path: &Path) -> Result<(u32, u32), WheatsetError> {
    let size = imagesize::size(path).map_err(|source| WheatsetError::ImageProbe {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((size.width as u32, size.height as u32))
}

/// Loads the boxes for one basename from the selected source.
fn load_boxes(
    category_root: &Path,
    stem: &str,
    source: AnnotationSource,
) -> Result<Vec<LabeledBox>, WheatsetError> {
    match source {
        AnnotationSource::Csv => {
            let csv_dir = category_root.join("csv");
            let csv_path = csv_dir.join(format!("{stem}.csv"));
            if !csv_path.is_file() {
                return Err(WheatsetError::MissingResource {
                    kind: "annotation CSV",
                    basename: stem.to_string(),
                    dir: csv_dir,
                });
            }
            let rows = read_box_csv(&csv_path)?;
            Ok(rows.iter().map(LabeledBox::from).collect())
        }
        AnnotationSource::Json => {
            let json_dir = category_root.join("json");
            let json_path = json_dir.join(format!("{stem}.json"));
            if !json_path.is_file() {
                return Err(WheatsetError::MissingResource {
                    kind: "annotation JSON",
                    basename: stem.to_string(),
                    dir: json_dir,
                });
            }
            read_image_json(&json_path)
        }
    }
}

/// Resolves the category record, preferring `labelmap.json` when the
/// category directory carries one.
fn resolve_category(category_root: &Path) -> Result<Category, WheatsetError> {
    let labelmap_path = category_root.join("labelmap.json");
    if labelmap_path.is_file() {
        let map = read_labelmap(&labelmap_path)?;
        if let Some(name) = map.name_for(WHEAT_HEAD_LABEL) {
            return Ok(Category::wheat_head(name));
        }
        log::warn!(
            "{} has no entry for label {}, using default category name",
            labelmap_path.display(),
            WHEAT_HEAD_LABEL
        );
    }

    Ok(Category::wheat_head(DEFAULT_CATEGORY_NAME))
}
