//! Bounding box type in COCO XYWH format.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box as (x, y, width, height) in pixels,
/// with (x, y) the top-left corner.
///
/// This is the format the dataset's per-image CSV files and the COCO
/// output both use, so no coordinate conversion happens between input
/// and output. Degenerate boxes (zero or negative size) are
/// representable; validation reports them instead of the parser
/// rejecting them.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from two corners (x1, y1) and (x2, y2), as found in
    /// the competition `BoxesString` encoding.
    #[inline]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// The COCO `area` field, defined as width * height.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Right edge (x + width).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (y + height).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// True if both dimensions are strictly positive.
    #[inline]
    pub fn has_positive_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// True if the box lies fully within an image of the given size.
    #[inline]
    pub fn fits_within(&self, image_width: f64, image_height: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= image_width && self.bottom() <= image_height
    }
}

// COCO serializes bboxes as a bare [x, y, w, h] array.
impl Serialize for BBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y, self.width, self.height].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = <Vec<f64>>::deserialize(deserializer)?;
        match values.as_slice() {
            &[x, y, w, h] => Ok(BBox::new(x, y, w, h)),
            other => Err(D::Error::invalid_length(
                other.len(),
                &"a bbox array of exactly four numbers",
            )),
        }
    }
}

/// A bounding box together with the raw numeric label from the
/// annotation source. Labels resolve to category IDs at conversion time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabeledBox {
    pub bbox: BBox,
    pub label: u64,
}
