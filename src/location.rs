use crate::{Coordinate, Length, Orientation, Path, Percentage};

/// A location (in the consumer map) resolved by the decoder, or handed to the
/// encoder to be turned into a location reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Location<V, E> {
    Line(ReferencedLine<V, E>),
    PointAlongLine(ReferencedPointAlongLine<V, E>),
}

/// A line location bound to the road network: the resolved path plus the
/// offsets that trim it down to the referenced location. The offsets are
/// percentages of the path length measured from its start (positive) and its
/// end (negative).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedLine<V, E> {
    pub path: Path<V, E>,
    pub positive_offset: Percentage,
    pub negative_offset: Percentage,
}

impl<V, E> ReferencedLine<V, E> {
    /// Offsets must each stay within the path and leave a non-empty location.
    pub fn offsets_are_valid(&self) -> bool {
        self.positive_offset.is_valid()
            && self.negative_offset.is_valid()
            && self.positive_offset.percent() + self.negative_offset.percent() < 100.0
    }
}

/// A point location bound to the road network: the path of exactly the edges
/// needed to reach the point, the resolved point coordinate, and where along
/// the path the point sits.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedPointAlongLine<V, E> {
    pub path: Path<V, E>,
    pub coordinate: Coordinate,
    pub orientation: Orientation,
    /// Index (in `path.edges`) of the edge the point lies on.
    pub edge_index: usize,
    /// Distance of the point from the directional start of that edge.
    pub offset: Length,
    /// Total length of that edge.
    pub edge_length: Length,
}
