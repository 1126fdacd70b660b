//! Core dataset model, mirroring the COCO object-detection schema.
//!
//! Unlike a general-purpose converter there is no intermediate
//! representation here: the converter's job is to aggregate per-image
//! annotations into exactly this shape, so the model IS the output
//! schema. Field declaration order matches the document layout of the
//! shipped annotation files ({info, images, annotations, categories,
//! licenses}).

use serde::{Deserialize, Serialize};

use super::bbox::BBox;
use super::ids::{AnnotationId, CategoryId, ImageId};

/// Zenodo archive the dataset images were originally distributed in.
pub const DATASET_URL: &str = "https://zenodo.org/records/5092309/files/gwhd_2021.zip?download=1";

/// A complete COCO document for one dataset split.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub info: DatasetInfo,

    pub images: Vec<Image>,

    pub annotations: Vec<Annotation>,

    pub categories: Vec<Category>,

    /// Always present in the output, always empty for this dataset.
    #[serde(default)]
    pub licenses: Vec<License>,
}

impl Dataset {
    /// Creates an empty document carrying the fixed category record.
    ///
    /// An empty split list yields exactly this (plus info), which is a
    /// valid output rather than an error.
    pub fn for_category(info: DatasetInfo, category: Category) -> Self {
        Self {
            info,
            images: Vec::new(),
            annotations: Vec::new(),
            categories: vec![category],
            licenses: Vec::new(),
        }
    }
}

/// The COCO `info` block.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatasetInfo {
    #[serde(default)]
    pub year: u32,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub url: String,
}

impl DatasetInfo {
    /// The info block stamped on every generated split file.
    pub fn for_split(category_dir: &str, split: &str) -> Self {
        Self {
            year: 2025,
            version: "1.0.0".to_string(),
            description: format!("wheat_head_counting {category_dir} {split} split"),
            url: DATASET_URL.to_string(),
        }
    }
}

/// A COCO license entry. The dataset ships none, but the field is part
/// of the schema and other tools expect to be able to parse it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct License {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An image entry in the output document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,

    /// Relative path namespaced under the category directory,
    /// e.g. `wheat_heads/images/abc123.png`.
    pub file_name: String,

    pub width: u32,

    pub height: u32,
}

impl Image {
    pub fn new(id: impl Into<ImageId>, file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// A category (class label) entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: None,
        }
    }

    pub fn with_supercategory(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        supercategory: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: Some(supercategory.into()),
        }
    }

    /// The dataset's fixed singleton category.
    ///
    /// Some of the per-image JSON files carry `supercategory:
    /// "broccoli"`, a known defect in the upstream labeling export; the
    /// aggregate output uses the corrected value.
    pub fn wheat_head(name: impl Into<String>) -> Self {
        Self::with_supercategory(1u64, name, "cereal")
    }
}

/// A single bounding-box annotation in the output document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,

    pub image_id: ImageId,

    pub category_id: CategoryId,

    /// [x, y, width, height] with (x, y) the top-left corner, pixels.
    pub bbox: BBox,

    /// Always width * height for this dataset (no segmentation masks).
    pub area: f64,

    /// Always 0: the dataset has no grouped/crowd instances.
    pub iscrowd: u8,
}

impl Annotation {
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        bbox: BBox,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            category_id: category_id.into(),
            area: bbox.area(),
            bbox,
            iscrowd: 0,
        }
    }
}
