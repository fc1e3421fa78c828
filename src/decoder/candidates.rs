use tracing::{debug, trace};

use crate::decoder::DecoderConfig;
use crate::geometry;
use crate::network::{Direction, DirectedEdge, Interpreter, PathToken, RoadNetwork, SnapPoint};
use crate::score::{Score, ScoreKind};
use crate::{Bearing, Coordinate, Length, LineAttributes};

/// A snap point close to an LRP coordinate, rated by proximity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateLocation<V, E> {
    pub snap: SnapPoint<V, E>,
    pub score: Score,
}

/// Whether the LRP attributes describe the path leaving the point (first and
/// intermediate LRPs) or the path entering it (last LRP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDirection {
    Outgoing,
    Incoming,
}

/// A candidate location expanded into a directed path endpoint, rated by
/// proximity, FRC/FOW compatibility and bearing deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePathSegment<V, E> {
    pub location: CandidateLocation<V, E>,
    /// The candidate line, oriented in travel direction.
    pub line: DirectedEdge<E>,
    /// The candidate point on that line, used as route endpoint.
    pub token: PathToken<E>,
    pub score: Score,
}

/// Finds the snap points of the network that can act as candidates for an LRP
/// coordinate. Vertices close to the coordinate are preferred; if none of them
/// reaches a relaxed quality bar, the coordinate is instead projected onto
/// nearby lines ("virtual" candidates, no network mutation involved). An empty
/// result means nothing of the network lies within the search radius, which
/// callers must treat as a hard decode failure for that LRP.
pub fn find_candidate_locations<N: RoadNetwork>(
    config: &DecoderConfig,
    network: &N,
    coordinate: Coordinate,
) -> Result<Vec<CandidateLocation<N::VertexId, N::EdgeId>>, N::Error> {
    let max_distance = config.max_candidate_distance;
    let snaps = network.snap_near(coordinate, max_distance)?;
    debug!("Found {} snap points within {max_distance}", snaps.len());

    let rate = |distance: Length| {
        let value = (1.0 - distance.meters() / max_distance.meters()).max(0.0);
        Score::new(ScoreKind::Proximity, value, 1.0)
    };

    let mut vertices = vec![];
    let mut projections = vec![];

    for (snap, distance) in snaps {
        let candidate = CandidateLocation { snap, score: rate(distance) };
        match snap {
            SnapPoint::Vertex(_) => vertices.push(candidate),
            SnapPoint::Edge { .. } => projections.push(candidate),
        }
    }

    let relaxed_threshold = config.score_threshold / 2.0;
    let candidates = if vertices.iter().any(|c| c.score.ratio() > relaxed_threshold) {
        vertices
    } else if !projections.is_empty() {
        debug!("No vertex candidate above {relaxed_threshold}, projecting onto lines");
        projections
    } else {
        // low quality vertices are still better than failing the decode
        vertices
    };

    Ok(candidates)
}

/// Expands a candidate location into directed candidate lines compatible with
/// the LRP attributes.
///
/// For a vertex candidate every incident line is considered, filtered by the
/// profile's traversal factor and the requested direction. For a virtual
/// candidate the single underlying line is considered in both directions from
/// the projected point. Each surviving line is rated by the FOW/FRC match
/// quality of the interpreter (zero excludes the line) combined with the
/// deviation between the line bearing, measured over the configured bearing
/// distance from the candidate point, and the LRP bearing.
pub fn find_candidate_segments<N, I>(
    config: &DecoderConfig,
    network: &N,
    interpreter: &I,
    candidate: CandidateLocation<N::VertexId, N::EdgeId>,
    attributes: &LineAttributes,
    direction: MatchDirection,
) -> Result<Vec<CandidatePathSegment<N::VertexId, N::EdgeId>>, N::Error>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let mut segments = vec![];

    match candidate.snap {
        SnapPoint::Vertex(vertex) => {
            for incident in network.edges_at(vertex)? {
                let travel = match direction {
                    MatchDirection::Outgoing => incident.direction,
                    MatchDirection::Incoming => incident.direction.opposite(),
                };

                let offset = match direction {
                    MatchDirection::Outgoing => Length::ZERO,
                    MatchDirection::Incoming => network.edge_length(incident.edge)?,
                };

                let segment = rate_segment(
                    config,
                    network,
                    interpreter,
                    candidate,
                    DirectedEdge::new(incident.edge, travel),
                    offset,
                    attributes,
                    direction,
                )?;
                segments.extend(segment);
            }
        }
        SnapPoint::Edge { edge, offset } => {
            let length = network.edge_length(edge)?;

            for travel in [Direction::Forward, Direction::Backward] {
                // offset is measured along the canonical geometry
                let travel_offset = match travel {
                    Direction::Forward => offset,
                    Direction::Backward => length - offset,
                };

                let segment = rate_segment(
                    config,
                    network,
                    interpreter,
                    candidate,
                    DirectedEdge::new(edge, travel),
                    travel_offset,
                    attributes,
                    direction,
                )?;
                segments.extend(segment);
            }
        }
    }

    Ok(segments)
}

#[allow(clippy::too_many_arguments)]
fn rate_segment<N, I>(
    config: &DecoderConfig,
    network: &N,
    interpreter: &I,
    location: CandidateLocation<N::VertexId, N::EdgeId>,
    line: DirectedEdge<N::EdgeId>,
    offset: Length,
    attributes: &LineAttributes,
    direction: MatchDirection,
) -> Result<Option<CandidatePathSegment<N::VertexId, N::EdgeId>>, N::Error>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let edge_attributes = network.edge_attributes(line.edge)?;

    if !interpreter.factor(&edge_attributes).allows(line.direction) {
        trace!("Discarding {line:?}: not traversable in {:?}", line.direction);
        return Ok(None);
    }

    let match_quality = interpreter.match_score(&edge_attributes, attributes.fow, attributes.frc);
    if match_quality == 0.0 {
        trace!("Discarding {line:?}: FOW/FRC do not match");
        return Ok(None);
    }

    let Some(bearing) = segment_bearing(config, network, line, offset, direction)? else {
        trace!("Discarding {line:?}: degenerate geometry");
        return Ok(None);
    };

    let deviation = bearing.difference(&attributes.bearing);
    let bearing_score =
        Score::new(ScoreKind::BearingMatch, 1.0 - f64::from(deviation) / 180.0, 1.0);
    let match_score = Score::new(ScoreKind::RoadMatch, match_quality, 2.0);
    let score = location.score + match_score + bearing_score;

    let segment = CandidatePathSegment {
        location,
        line,
        token: PathToken::new(line.edge, line.direction, offset),
        score,
    };
    trace!("Rated candidate {:?} {:?}: {score}", segment.line, segment.token.offset);

    Ok(Some(segment))
}

/// Bearing of the candidate line at the candidate point: measured onwards
/// along the travel direction for outgoing candidates, and backwards from the
/// point for incoming ones (the last LRP bearing points against the path).
fn segment_bearing<N: RoadNetwork>(
    config: &DecoderConfig,
    network: &N,
    line: DirectedEdge<N::EdgeId>,
    offset: Length,
    direction: MatchDirection,
) -> Result<Option<Bearing>, N::Error> {
    let shape = network.directed_edge_shape(line)?;

    let bearing = match direction {
        MatchDirection::Outgoing => {
            let onwards = geometry::shape_from(&shape, offset);
            geometry::encode_bearing(&onwards, config.bearing_distance, false)
        }
        MatchDirection::Incoming => {
            let reversed: Vec<Coordinate> = shape.iter().rev().copied().collect();
            let length = geometry::polyline_length(&shape);
            let backwards = geometry::shape_from(&reversed, length - offset);
            geometry::encode_bearing(&backwards, config.bearing_distance, false)
        }
    };

    Ok(bearing)
}
