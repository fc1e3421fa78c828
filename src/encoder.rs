//! The encoder generates a map-independent location reference for a
//! (map-dependent) location.
//!
//! 1. Check validity of the location: connectivity, traversability, offsets.
//! 2. Adjust the location endpoints to topologically valid LRP anchors.
//! 3. Verify that every stretch between subsequent LRPs is a shortest path,
//!    inserting intermediate LRPs at divergence points until it is.
//! 4. Split stretches longer than the representable maximum.
//! 5. Emit the ordered LRP list with per-point attributes and offsets.

pub(crate) mod anchors;
pub(crate) mod coverage;
pub(crate) mod limits;
mod line;
pub(crate) mod lrp;
pub(crate) mod validate;

pub use anchors::is_vertex_valid;
pub use line::{encode_line, encode_point_along_line};

use crate::Length;

#[derive(Debug, Clone, Copy)]
pub struct EncoderConfig {
    /// The maximum length of the path between two subsequent LRPs. Stretches
    /// longer than this are split by intermediate LRPs; the ceiling is what
    /// the physical format can represent.
    pub max_segment_length: Length,
    /// The length of the path section used to measure an LRP bearing.
    pub bearing_distance: Length,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_segment_length: Length::MAX_SEGMENT_LENGTH,
            bearing_distance: Length::from_meters(20.0),
        }
    }
}
