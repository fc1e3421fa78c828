use tracing::{debug, info};

use crate::encoder::EncoderConfig;
use crate::encoder::anchors::{adjust_end, adjust_start};
use crate::encoder::coverage::verify_coverage;
use crate::encoder::limits::limit_stretch_lengths;
use crate::encoder::lrp::emit_points;
use crate::encoder::validate::{validate_line, validate_path};
use crate::error::EncodeError;
use crate::location::{ReferencedLine, ReferencedPointAlongLine};
use crate::network::{Interpreter, RoadNetwork};
use crate::{Length, LineReference, Percentage, PointAlongLineReference};

/// Generates a line location reference for a path on the network.
///
/// The path is first validated, then its endpoints are adjusted to
/// topologically valid anchors (the added length is absorbed by the offsets),
/// the coverage by shortest paths is verified and repaired with intermediate
/// LRPs, overlong stretches are split, and finally the LRP list is emitted.
pub fn encode_line<N, I>(
    config: &EncoderConfig,
    network: &N,
    interpreter: &I,
    line: &ReferencedLine<N::VertexId, N::EdgeId>,
) -> Result<LineReference, EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    info!("Encoding line of {} edges with {config:?}", line.path.edges.len());

    validate_line(network, interpreter, line)?;

    let mut path = line.path.clone();
    let total = path_length(network, &path)?;
    let mut positive = total * line.positive_offset.fraction();
    let mut negative = total * line.negative_offset.fraction();

    positive += adjust_start(config, network, interpreter, &mut path)?;
    negative += adjust_end(config, network, interpreter, &mut path)?;

    let edge_lengths = edge_lengths(network, &path)?;
    let total: Length = edge_lengths.iter().copied().sum();

    let cuts = verify_coverage(network, &path, &edge_lengths)?;
    debug!("Location covered by {} shortest paths", cuts.len());

    let cuts = limit_stretch_lengths(
        config.max_segment_length,
        network,
        interpreter,
        &path,
        &edge_lengths,
        cuts,
    )?;

    let points = emit_points(config, network, interpreter, &path, &edge_lengths, &cuts)?;

    Ok(LineReference {
        points,
        positive_offset: as_percentage(positive, total),
        negative_offset: as_percentage(negative, total),
    })
}

/// Generates a point-along-line location reference.
///
/// The point path is referenced by exactly two LRPs, so no intermediate
/// points can repair it: the path between the adjusted endpoints must itself
/// be a shortest path within the representable stretch length, otherwise the
/// location cannot be encoded as a point along a line.
pub fn encode_point_along_line<N, I>(
    config: &EncoderConfig,
    network: &N,
    interpreter: &I,
    point: &ReferencedPointAlongLine<N::VertexId, N::EdgeId>,
) -> Result<PointAlongLineReference, EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    info!("Encoding point along line with {config:?}");

    validate_path(network, interpreter, &point.path)?;

    let mut path = point.path.clone();
    let lengths = edge_lengths(network, &path)?;

    if point.edge_index >= path.edges.len()
        || point.offset > lengths[point.edge_index]
    {
        return Err(EncodeError::InvalidPoint { index: point.edge_index });
    }

    let mut point_distance: Length =
        lengths[..point.edge_index].iter().copied().sum::<Length>() + point.offset;

    point_distance += adjust_start(config, network, interpreter, &mut path)?;
    adjust_end(config, network, interpreter, &mut path)?;

    let edge_lengths = edge_lengths(network, &path)?;
    let total: Length = edge_lengths.iter().copied().sum();

    if total > config.max_segment_length {
        return Err(EncodeError::Convergence {
            reason: "point path exceeds the representable stretch length",
        });
    }

    let cuts = verify_coverage(network, &path, &edge_lengths)?;
    if cuts.len() != 1 {
        return Err(EncodeError::Convergence {
            reason: "point path is not a shortest path between its reference points",
        });
    }

    let points = emit_points(config, network, interpreter, &path, &edge_lengths, &cuts)?;
    let points: [_; 2] = points
        .try_into()
        .map_err(|_| EncodeError::Convergence { reason: "point path needs exactly two LRPs" })?;

    Ok(PointAlongLineReference {
        points,
        offset: as_percentage(point_distance, total),
        orientation: point.orientation,
        side: Default::default(),
    })
}

fn as_percentage(offset: Length, total: Length) -> Percentage {
    if total.is_zero() {
        return Percentage::ZERO;
    }
    Percentage::from_percent(offset.meters() / total.meters() * 100.0)
}

fn edge_lengths<N: RoadNetwork>(
    network: &N,
    path: &crate::Path<N::VertexId, N::EdgeId>,
) -> Result<Vec<Length>, N::Error> {
    path.edges.iter().map(|edge| network.edge_length(edge.edge)).collect()
}

fn path_length<N: RoadNetwork>(
    network: &N,
    path: &crate::Path<N::VertexId, N::EdgeId>,
) -> Result<Length, N::Error> {
    Ok(edge_lengths(network, path)?.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use test_log::test;

    use super::*;
    use crate::network::tests::{EdgeId, TestProfile, VertexId, grid_network};
    use crate::network::{Direction, DirectedEdge, RoadNetwork};
    use crate::{Bearing, Fow, Frc, Path};

    fn forward(edge: usize) -> DirectedEdge<EdgeId> {
        DirectedEdge::new(EdgeId(edge), Direction::Forward)
    }

    #[test]
    fn encoder_encode_line_001() {
        let network = grid_network();
        let profile = TestProfile::default();
        let config = EncoderConfig::default();

        // b1 -> b2: both endpoints are junctions, no adjustment needed
        let line = ReferencedLine {
            path: Path {
                vertices: vec![VertexId(5), VertexId(6)],
                edges: vec![forward(4)],
                length: Length::from_meters(102.0),
            },
            positive_offset: Percentage::from_percent(10.0),
            negative_offset: Percentage::from_percent(20.0),
        };

        let reference = encode_line(&config, &network, &profile, &line).unwrap();

        assert_eq!(reference.points.len(), 2);
        assert_eq!(
            reference.points[0].coordinate,
            network.vertex_coordinate(VertexId(5)).unwrap()
        );
        assert!(reference.points[0].line.bearing.difference(&Bearing::from_degrees(90)) <= 1);
        assert_eq!(
            reference.points[1].coordinate,
            network.vertex_coordinate(VertexId(6)).unwrap()
        );
        assert!(reference.points[1].line.bearing.difference(&Bearing::from_degrees(270)) <= 1);

        // no expansion: the offsets survive unchanged
        assert_abs_diff_eq!(reference.positive_offset.percent(), 10.0, epsilon = 0.1);
        assert_abs_diff_eq!(reference.negative_offset.percent(), 20.0, epsilon = 0.1);
    }

    #[test]
    fn encoder_encode_line_002() {
        let network = grid_network();
        let profile = TestProfile::default();
        let config = EncoderConfig::default();

        // b0 -> b1 starts at the grid corner b0, an invalid pass-through: the
        // location is expanded backwards (b0 <- a0 <- a1) and the added
        // length is absorbed by the positive offset
        let line = ReferencedLine {
            path: Path {
                vertices: vec![VertexId(4), VertexId(5)],
                edges: vec![forward(3)],
                length: Length::from_meters(102.0),
            },
            positive_offset: Percentage::ZERO,
            negative_offset: Percentage::ZERO,
        };

        let reference = encode_line(&config, &network, &profile, &line).unwrap();

        assert_eq!(
            reference.points[0].coordinate,
            network.vertex_coordinate(VertexId(1)).unwrap(),
            "first LRP must sit on the valid anchor a1"
        );

        // ~201.7m of expansion over a ~303.4m total
        assert_abs_diff_eq!(reference.positive_offset.percent(), 66.5, epsilon = 1.0);
        assert_abs_diff_eq!(reference.negative_offset.percent(), 0.0, epsilon = 0.1);
    }

    #[test]
    fn encoder_encode_line_inserts_intermediate_points() {
        // same detour as the coverage tests: the emitted reference carries an
        // intermediate LRP at the divergence
        let network = grid_network();
        let profile = TestProfile::default();
        let config = EncoderConfig::default();

        let line = ReferencedLine {
            path: Path {
                vertices: vec![
                    VertexId(4),
                    VertexId(0),
                    VertexId(1),
                    VertexId(5),
                    VertexId(6),
                ],
                edges: vec![
                    DirectedEdge::new(EdgeId(6), Direction::Backward),
                    forward(0),
                    forward(7),
                    forward(4),
                ],
                length: Length::from_meters(405.0),
            },
            positive_offset: Percentage::ZERO,
            negative_offset: Percentage::ZERO,
        };

        let reference = encode_line(&config, &network, &profile, &line).unwrap();

        assert_eq!(reference.points.len(), 3);
        assert_eq!(
            reference.points[1].coordinate,
            network.vertex_coordinate(VertexId(0)).unwrap()
        );
        assert!(reference.points.last().unwrap().path.is_none());
    }

    #[test]
    fn encoder_encode_point_along_line_001() {
        let network = grid_network();
        let profile = TestProfile::default();
        let config = EncoderConfig::default();

        let edge_length = network.edge_length(EdgeId(4)).unwrap();
        let point = ReferencedPointAlongLine {
            path: Path {
                vertices: vec![VertexId(5), VertexId(6)],
                edges: vec![forward(4)],
                length: edge_length,
            },
            coordinate: network.vertex_coordinate(VertexId(5)).unwrap(),
            orientation: crate::Orientation::Forward,
            edge_index: 0,
            offset: Length::from_meters(30.0),
            edge_length,
        };

        let reference = encode_point_along_line(&config, &network, &profile, &point).unwrap();

        assert_abs_diff_eq!(reference.offset.percent(), 29.5, epsilon = 0.5);
        assert_eq!(reference.orientation, crate::Orientation::Forward);
        assert_eq!(
            reference.points[0].coordinate,
            network.vertex_coordinate(VertexId(5)).unwrap()
        );
        assert_eq!(
            reference.points[1].coordinate,
            network.vertex_coordinate(VertexId(6)).unwrap()
        );
    }

    #[test]
    fn encoder_encode_point_along_line_rejects_point_off_path() {
        let network = grid_network();
        let profile = TestProfile::default();
        let config = EncoderConfig::default();

        let edge_length = network.edge_length(EdgeId(4)).unwrap();
        let point = ReferencedPointAlongLine {
            path: Path {
                vertices: vec![VertexId(5), VertexId(6)],
                edges: vec![forward(4)],
                length: edge_length,
            },
            coordinate: network.vertex_coordinate(VertexId(5)).unwrap(),
            orientation: crate::Orientation::Unknown,
            edge_index: 3,
            offset: Length::from_meters(30.0),
            edge_length,
        };

        assert_eq!(
            encode_point_along_line(&config, &network, &profile, &point).unwrap_err(),
            EncodeError::InvalidPoint { index: 3 }
        );
    }

    #[test]
    fn encoder_encode_line_rejects_broken_location() {
        let network = grid_network();
        let profile = TestProfile::default();
        let config = EncoderConfig::default();

        let line = ReferencedLine {
            path: Path {
                vertices: vec![VertexId(5), VertexId(7)],
                edges: vec![forward(5)],
                length: Length::from_meters(102.0),
            },
            positive_offset: Percentage::ZERO,
            negative_offset: Percentage::ZERO,
        };

        assert_eq!(
            encode_line(&config, &network, &profile, &line).unwrap_err(),
            EncodeError::NotConnected { index: 0 }
        );
    }
}
