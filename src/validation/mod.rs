//! Structural validation of generated COCO documents.
//!
//! Checks the invariants the converter guarantees, so a generated (or
//! hand-edited) annotation file can be verified independently:
//! - IDs are unique within the document
//! - every annotation's image and category references resolve
//! - image dimensions are positive, names non-empty
//! - boxes are finite, have positive size, lie within their image, and
//!   carry `area == width * height`
//! - `iscrowd` is 0 (the dataset has no crowd instances)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{HashMap, HashSet};

use crate::dataset::{CategoryId, Dataset, ImageId};

/// Tolerance for the `area == width * height` check, covering float
/// rounding in files produced by other tools.
const AREA_EPSILON: f64 = 1e-6;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a COCO document and returns a report of all issues found.
pub fn validate_dataset(dataset: &Dataset, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_images(dataset, &mut report);
    validate_categories(dataset, &mut report);
    validate_annotations(dataset, &mut report);

    report
}

fn validate_images(dataset: &Dataset, report: &mut ValidationReport) {
    let mut seen: HashMap<ImageId, usize> = HashMap::new();

    for (idx, image) in dataset.images.iter().enumerate() {
        let id = image.id.as_u64();

        if let Some(first) = seen.get(&image.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateImageId,
                format!("duplicate image ID {} (first seen at index {})", id, first),
                IssueContext::Image { id },
            ));
        } else {
            seen.insert(image.id, idx);
        }

        if image.width == 0 || image.height == 0 {
            report.add(ValidationIssue::error(
                IssueCode::InvalidImageDimensions,
                format!(
                    "invalid dimensions {}x{} (must be positive)",
                    image.width, image.height
                ),
                IssueContext::Image { id },
            ));
        }

        if image.file_name.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyFileName,
                "empty file name",
                IssueContext::Image { id },
            ));
        }
    }
}

fn validate_categories(dataset: &Dataset, report: &mut ValidationReport) {
    let mut seen: HashSet<CategoryId> = HashSet::new();

    for category in &dataset.categories {
        let id = category.id.as_u64();

        if !seen.insert(category.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateCategoryId,
                format!("duplicate category ID {}", id),
                IssueContext::Category { id },
            ));
        }

        if category.name.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyCategoryName,
                "empty category name",
                IssueContext::Category { id },
            ));
        }
    }
}

fn validate_annotations(dataset: &Dataset, report: &mut ValidationReport) {
    let images: HashMap<ImageId, &crate::dataset::Image> =
        dataset.images.iter().map(|img| (img.id, img)).collect();
    let category_ids: HashSet<CategoryId> = dataset.categories.iter().map(|c| c.id).collect();

    let mut seen = HashSet::new();

    for ann in &dataset.annotations {
        let id = ann.id.as_u64();
        let context = IssueContext::Annotation { id };

        if !seen.insert(ann.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateAnnotationId,
                format!("duplicate annotation ID {}", id),
                context,
            ));
        }

        let image = images.get(&ann.image_id).copied();
        if image.is_none() {
            report.add(ValidationIssue::error(
                IssueCode::MissingImageRef,
                format!("references non-existent image {}", ann.image_id),
                context,
            ));
        }

        if !category_ids.contains(&ann.category_id) {
            report.add(ValidationIssue::error(
                IssueCode::MissingCategoryRef,
                format!("references non-existent category {}", ann.category_id),
                context,
            ));
        }

        if !ann.bbox.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::NonFiniteBBox,
                "bbox contains non-finite values",
                context,
            ));
            continue;
        }

        if !ann.bbox.has_positive_size() {
            report.add(ValidationIssue::error(
                IssueCode::DegenerateBBox,
                format!(
                    "bbox has non-positive size {}x{}",
                    ann.bbox.width, ann.bbox.height
                ),
                context,
            ));
        }

        if let Some(image) = image {
            if !ann.bbox.fits_within(image.width as f64, image.height as f64) {
                report.add(ValidationIssue::error(
                    IssueCode::BBoxOutOfBounds,
                    format!(
                        "bbox [{}, {}, {}, {}] exceeds image bounds {}x{}",
                        ann.bbox.x,
                        ann.bbox.y,
                        ann.bbox.width,
                        ann.bbox.height,
                        image.width,
                        image.height
                    ),
                    context,
                ));
            }
        }

        if (ann.area - ann.bbox.area()).abs() > AREA_EPSILON {
            report.add(ValidationIssue::error(
                IssueCode::AreaMismatch,
                format!(
                    "area {} does not equal bbox width * height ({})",
                    ann.area,
                    ann.bbox.area()
                ),
                context,
            ));
        }

        if ann.iscrowd != 0 {
            report.add(ValidationIssue::warning(
                IssueCode::UnexpectedCrowdFlag,
                format!("iscrowd is {} (this dataset has no crowd instances)", ann.iscrowd),
                context,
            ));
        }
    }
}
