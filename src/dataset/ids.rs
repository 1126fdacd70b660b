//! Newtype IDs for dataset elements.
//!
//! COCO files index annotations into images and categories by bare
//! integers; the newtypes keep the three ID spaces from being mixed up
//! in Rust code.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A unique identifier for an image within one generated file.
    ImageId
);

id_type!(
    /// A unique identifier for an annotation within one generated file.
    AnnotationId
);

id_type!(
    /// A unique identifier for a category.
    CategoryId
);

/// A counter handing out sequential IDs starting from 1.
///
/// The converter uses one sequence per ID space so that image and
/// annotation numbering is deterministic given a fixed split ordering.
#[derive(Clone, Debug, Default)]
pub struct IdSequence(u64);

impl IdSequence {
    pub fn new() -> Self {
        Self(0)
    }

    /// Returns the next ID in the sequence (1, 2, 3, ...).
    pub fn next_id(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality_and_ordering() {
        assert_eq!(ImageId(1), ImageId(1));
        assert_ne!(ImageId(1), ImageId(2));
        assert!(AnnotationId(1) < AnnotationId(2));
    }

    #[test]
    fn test_sequence_starts_at_one() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.next_id(), 3);
    }
}
