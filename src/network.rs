use std::fmt::Debug;
use std::hash::Hash;

use crate::{Coordinate, Fow, Frc, Length, Path};

/// Direction of travel along an edge, relative to its canonical geometry
/// (the coordinate order returned by [`RoadNetwork::edge_shape`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// An edge together with the direction it is being travelled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectedEdge<E> {
    pub edge: E,
    pub direction: Direction,
}

impl<E> DirectedEdge<E> {
    pub const fn new(edge: E, direction: Direction) -> Self {
        Self { edge, direction }
    }
}

/// A location on the network: either one of its vertices or a point somewhere
/// along an edge geometry ("virtual" candidate). Virtual candidates never
/// mutate the network; the offset is measured in meters along the canonical
/// edge geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapPoint<V, E> {
    Vertex(V),
    Edge { edge: E, offset: Length },
}

/// An edge incident to a vertex, as enumerated by [`RoadNetwork::edges_at`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentEdge<E, V> {
    pub edge: E,
    /// Direction of travel when leaving the vertex through this edge.
    pub direction: Direction,
    /// The vertex at the other end of the edge.
    pub neighbor: V,
}

/// Directed endpoint of a path: the point `offset` meters along `edge` when
/// travelling in `direction` (the offset is measured from the directional
/// start of the edge).
///
/// Used as a route start, the remainder of the edge is traversed first. Used
/// as a route end with a positive offset, the route must arrive by traversing
/// the edge up to the offset; an offset of zero means the route stops where
/// the edge begins and the edge itself is not part of the route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathToken<E> {
    pub edge: E,
    pub direction: Direction,
    pub offset: Length,
}

impl<E> PathToken<E> {
    pub const fn new(edge: E, direction: Direction, offset: Length) -> Self {
        Self { edge, direction, offset }
    }
}

/// Road network and routing capability the matching engine runs against.
///
/// The engine never enumerates or mutates the network as a whole: it only
/// snaps coordinates, walks vertex neighborhoods, reads edge attributes and
/// asks for bounded shortest paths. Implementations may be backed by an
/// in-memory graph, a disk-backed store or an out-of-process service; every
/// call is fallible and any error aborts the whole decode/encode operation,
/// which doubles as the cancellation point.
pub trait RoadNetwork {
    /// Uniquely identifies a vertex of the network.
    type VertexId: Debug + Copy + Eq + Ord + Hash;
    /// Uniquely identifies an (undirected) edge of the network.
    type EdgeId: Debug + Copy + Eq + Ord + Hash;
    /// Raw edge attributes, interpreted by a [`Interpreter`] implementation.
    type Attributes;
    type Error: std::error::Error;

    /// Gets the vertex coordinate.
    fn vertex_coordinate(&self, vertex: Self::VertexId) -> Result<Coordinate, Self::Error>;

    /// Gets all the snap points within `max_distance` of the coordinate,
    /// together with their linear distance to it, sorted closest first.
    /// Vertex and edge snap points are both returned; an empty vector means
    /// nothing of the network lies within the radius.
    fn snap_near(
        &self,
        coordinate: Coordinate,
        max_distance: Length,
    ) -> Result<Vec<(SnapPoint<Self::VertexId, Self::EdgeId>, Length)>, Self::Error>;

    /// Gets every edge incident to the vertex, in a deterministic order.
    fn edges_at(
        &self,
        vertex: Self::VertexId,
    ) -> Result<Vec<IncidentEdge<Self::EdgeId, Self::VertexId>>, Self::Error>;

    /// Gets the total length of the edge geometry.
    fn edge_length(&self, edge: Self::EdgeId) -> Result<Length, Self::Error>;

    /// Gets the ordered coordinates of the edge geometry, in canonical
    /// (forward) direction, endpoints included.
    fn edge_shape(&self, edge: Self::EdgeId) -> Result<Vec<Coordinate>, Self::Error>;

    /// Gets the raw attributes of the edge.
    fn edge_attributes(&self, edge: Self::EdgeId) -> Result<Self::Attributes, Self::Error>;

    /// Computes the shortest path between two directed path endpoints, bounded
    /// by `max_distance` of travelled length. Returns `Ok(None)` when no route
    /// within the bound exists; the engine treats a missing route as "no
    /// route", never retrying.
    fn route_between(
        &self,
        from: PathToken<Self::EdgeId>,
        to: PathToken<Self::EdgeId>,
        max_distance: Length,
    ) -> Result<Option<Path<Self::VertexId, Self::EdgeId>>, Self::Error>;

    /// Gets the edge geometry oriented along the given travel direction.
    fn directed_edge_shape(
        &self,
        edge: DirectedEdge<Self::EdgeId>,
    ) -> Result<Vec<Coordinate>, Self::Error> {
        let mut shape = self.edge_shape(edge.edge)?;
        if edge.direction == Direction::Backward {
            shape.reverse();
        }
        Ok(shape)
    }
}

/// Traversability of an edge for the configured travel profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Factor {
    pub traversable: bool,
    /// Restriction to a single travel direction, `None` when both directions
    /// are allowed.
    pub oneway: Option<Direction>,
}

impl Factor {
    pub const BOTH: Self = Self { traversable: true, oneway: None };
    pub const NONE: Self = Self { traversable: false, oneway: None };

    pub const fn oneway(direction: Direction) -> Self {
        Self { traversable: true, oneway: Some(direction) }
    }

    /// True when the edge can be travelled in the given direction.
    pub fn allows(&self, direction: Direction) -> bool {
        self.traversable
            && match self.oneway {
                None => true,
                Some(oneway) => oneway == direction,
            }
    }
}

/// Road classification of an edge in OpenLR terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoadClass {
    pub frc: Frc,
    pub fow: Fow,
}

/// Policy object that interprets raw edge attributes for a travel profile.
///
/// The interpreter is the seam between the provider's map model (tags,
/// profiles, restrictions) and the matching engine: it reports how well an
/// edge matches a requested FOW/FRC, whether and in which direction the edge
/// can be travelled, and the classification to emit when encoding.
pub trait Interpreter {
    type Attributes;

    /// Match quality of the edge against the requested form of way and
    /// functional road class, in `[0, 2]`. A value of zero excludes the edge
    /// from candidate matching entirely.
    fn match_score(&self, attributes: &Self::Attributes, fow: Fow, frc: Frc) -> f64;

    /// Traversability of the edge.
    fn factor(&self, attributes: &Self::Attributes) -> Factor;

    /// FRC/FOW classification of the edge, used when emitting LRPs.
    fn classify(&self, attributes: &Self::Attributes) -> RoadClass;
}

/// Grading table for the default FOW/FRC match policy.
///
/// The concrete numbers are provider calibration and not part of the OpenLR
/// standard: interpreters are free to embed this table with different values
/// or to grade matches in an entirely different way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTable {
    /// Score per FRC distance in classes; larger distances score zero.
    pub frc: [f64; 3],
    /// Score for an exact FOW match.
    pub fow_exact: f64,
    /// Score when one side is undefined/other, or both are carriageway kinds.
    pub fow_related: f64,
}

impl Default for MatchTable {
    fn default() -> Self {
        Self { frc: [1.0, 0.8, 0.6], fow_exact: 1.0, fow_related: 0.5 }
    }
}

impl MatchTable {
    /// Grades a road class against a requested FOW/FRC, in `[0, 2]`:
    /// one point for the road class component plus one for the form of way.
    pub fn grade(&self, class: RoadClass, fow: Fow, frc: Frc) -> f64 {
        let frc_score = *self.frc.get(class.frc.distance(&frc) as usize).unwrap_or(&0.0);

        let fow_score = if class.fow == fow {
            self.fow_exact
        } else if Self::is_related(class.fow, fow) {
            self.fow_related
        } else {
            0.0
        };

        frc_score + fow_score
    }

    fn is_related(a: Fow, b: Fow) -> bool {
        use Fow::*;

        let carriageway = |fow| matches!(fow, Motorway | MultipleCarriageway | SingleCarriageway);
        let wildcard = |fow| matches!(fow, Undefined | Other);

        wildcard(a) || wildcard(b) || (carriageway(a) && carriageway(b))
    }
}


#[cfg(test)]
mod match_table_tests {
    use approx::assert_abs_diff_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn match_table_grades_exact_match_as_perfect() {
        let table = MatchTable::default();
        let class = RoadClass { frc: Frc::Frc2, fow: Fow::SingleCarriageway };
        assert_abs_diff_eq!(table.grade(class, Fow::SingleCarriageway, Frc::Frc2), 2.0);
    }

    #[test]
    fn match_table_degrades_by_frc_distance() {
        let table = MatchTable::default();
        let class = RoadClass { frc: Frc::Frc2, fow: Fow::SingleCarriageway };

        assert_abs_diff_eq!(table.grade(class, Fow::SingleCarriageway, Frc::Frc3), 1.8);
        assert_abs_diff_eq!(table.grade(class, Fow::SingleCarriageway, Frc::Frc4), 1.6);
        assert_abs_diff_eq!(table.grade(class, Fow::SingleCarriageway, Frc::Frc7), 1.0);
    }

    #[test]
    fn match_table_excludes_unrelated_roads() {
        let table = MatchTable::default();
        let class = RoadClass { frc: Frc::Frc7, fow: Fow::Roundabout };
        assert_abs_diff_eq!(table.grade(class, Fow::SingleCarriageway, Frc::Frc0), 0.0);
    }

    #[test]
    fn factor_allows_oneway_direction_only() {
        let factor = Factor::oneway(Direction::Forward);
        assert!(factor.allows(Direction::Forward));
        assert!(!factor.allows(Direction::Backward));

        assert!(Factor::BOTH.allows(Direction::Forward));
        assert!(Factor::BOTH.allows(Direction::Backward));

        assert!(!Factor::NONE.allows(Direction::Forward));
        assert!(!Factor::NONE.allows(Direction::Backward));
    }
}
