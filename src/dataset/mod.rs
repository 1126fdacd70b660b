//! Dataset model and file-format I/O.
//!
//! The model mirrors the COCO object-detection schema the converter
//! emits; the `io_*` submodules each own one of the on-disk formats the
//! standard layout is built from.

mod bbox;
mod ids;
pub mod io_box_csv;
pub mod io_coco_json;
pub mod io_image_json;
pub mod labelmap;
mod model;

pub use bbox::{BBox, LabeledBox};
pub use ids::{AnnotationId, CategoryId, IdSequence, ImageId};
pub use model::{Annotation, Category, Dataset, DatasetInfo, Image, License, DATASET_URL};
