//! The decoder resolves a (map-dependent) location from a location reference
//! using its own map, which may differ from the map used during encoding.
//!
//! 1. Check validity of the location reference.
//! 2. For each location reference point find candidate locations on the network.
//! 3. Expand candidate locations into rated directed candidate lines.
//! 4. For each pair of subsequent LRPs select the best candidate pair and route
//!    between them, best-first with pruning.
//! 5. Concatenate the per-pair routes into the location path and attach the
//!    declared offsets.

pub(crate) mod candidates;
mod line;
mod point;
pub(crate) mod search;

pub use line::decode_line;
pub use point::decode_point_along_line;

use crate::Length;

#[derive(Debug, Clone, Copy)]
pub struct DecoderConfig {
    /// Maximum distance from an LRP coordinate to the snap points of the
    /// network that will be considered as candidates.
    pub max_candidate_distance: Length,
    /// The length of the path section used to measure a candidate line
    /// bearing, from the candidate point along the line.
    pub bearing_distance: Length,
    /// Minimum `value / reference` ratio for a candidate to be accepted.
    /// Half of this threshold is the relaxed bar a vertex candidate must pass
    /// before projected (edge) candidates are considered instead.
    pub score_threshold: f64,
    /// Multiple of the declared distance between two LRPs that bounds the
    /// route search between their candidates.
    pub route_distance_factor: f64,
    /// Distance grain of the physical format: routed distances within this
    /// tolerance of the declared distance count as a perfect match.
    pub distance_grain: Length,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_candidate_distance: Length::from_meters(40.0),
            bearing_distance: Length::from_meters(20.0),
            score_threshold: 0.3,
            route_distance_factor: 4.0,
            distance_grain: Length::from_meters(200.0),
        }
    }
}
