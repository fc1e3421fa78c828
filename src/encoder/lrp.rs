use crate::encoder::EncoderConfig;
use crate::error::EncodeError;
use crate::geometry;
use crate::network::{DirectedEdge, Interpreter, RoadNetwork};
use crate::{
    Coordinate, Length, LineAttributes, LocationReferencePoint, Path, PathAttributes,
};

/// Emits the ordered LRP list for a path and its anchor positions.
///
/// Every anchor produces a point carrying the FRC/FOW of the line leaving it,
/// the bearing of the path measured onwards from the anchor, the distance to
/// the next point and the lowest FRC encountered on the way there. The last
/// point carries the attributes of the line entering it, with its bearing
/// measured backwards along the path.
pub(crate) fn emit_points<N, I>(
    config: &EncoderConfig,
    network: &N,
    interpreter: &I,
    path: &Path<N::VertexId, N::EdgeId>,
    edge_lengths: &[Length],
    cuts: &[usize],
) -> Result<Vec<LocationReferencePoint>, EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let mut points = Vec::with_capacity(cuts.len() + 1);

    for (k, &cut) in cuts.iter().enumerate() {
        let end = cuts.get(k + 1).copied().unwrap_or(path.edges.len());

        let anchor = path.edges[cut];
        let class = interpreter.classify(&network.edge_attributes(anchor.edge)?);
        let coordinate = network.vertex_coordinate(path.vertices[cut])?;

        let shape = onward_shape(network, &path.edges[cut..], config.bearing_distance)?;
        let bearing = geometry::encode_bearing(&shape, config.bearing_distance, false)
            .ok_or(EncodeError::Convergence { reason: "degenerate line geometry at an LRP" })?;

        let mut lowest_frc = class.frc;
        for edge in &path.edges[cut..end] {
            let class = interpreter.classify(&network.edge_attributes(edge.edge)?);
            lowest_frc = lowest_frc.lowest(class.frc);
        }

        points.push(LocationReferencePoint {
            coordinate,
            line: LineAttributes { frc: class.frc, fow: class.fow, bearing },
            path: Some(PathAttributes {
                lowest_frc,
                distance_to_next: edge_lengths[cut..end].iter().copied().sum(),
            }),
        });
    }

    // the last point describes the line entering the end of the location
    let Some(&last) = path.edges.last() else {
        return Err(EncodeError::EmptyLocation);
    };
    let Some(&end_vertex) = path.vertices.last() else {
        return Err(EncodeError::EmptyLocation);
    };

    let class = interpreter.classify(&network.edge_attributes(last.edge)?);
    let shape = backward_shape(network, &path.edges, config.bearing_distance)?;
    let bearing = geometry::encode_bearing(&shape, config.bearing_distance, false)
        .ok_or(EncodeError::Convergence { reason: "degenerate line geometry at an LRP" })?;

    points.push(LocationReferencePoint {
        coordinate: network.vertex_coordinate(end_vertex)?,
        line: LineAttributes { frc: class.frc, fow: class.fow, bearing },
        path: None,
    });

    Ok(points)
}

/// Concatenated geometry of the path edges walking forwards, capped at
/// roughly the bearing measurement distance (whole edges are appended, the
/// bearing measurement clamps the remainder).
fn onward_shape<N: RoadNetwork>(
    network: &N,
    edges: &[DirectedEdge<N::EdgeId>],
    cap: Length,
) -> Result<Vec<Coordinate>, N::Error> {
    let mut shape: Vec<Coordinate> = vec![];
    let mut accumulated = Length::ZERO;

    for &edge in edges {
        let part = network.directed_edge_shape(edge)?;
        let skip = usize::from(!shape.is_empty()); // joint coordinate is shared
        shape.extend(part.into_iter().skip(skip));

        accumulated += network.edge_length(edge.edge)?;
        if accumulated >= cap {
            break;
        }
    }

    Ok(shape)
}

/// Concatenated geometry of the path edges walking backwards from its end.
fn backward_shape<N: RoadNetwork>(
    network: &N,
    edges: &[DirectedEdge<N::EdgeId>],
    cap: Length,
) -> Result<Vec<Coordinate>, N::Error> {
    let mut shape: Vec<Coordinate> = vec![];
    let mut accumulated = Length::ZERO;

    for &edge in edges.iter().rev() {
        let mut part = network.directed_edge_shape(edge)?;
        part.reverse();
        let skip = usize::from(!shape.is_empty());
        shape.extend(part.into_iter().skip(skip));

        accumulated += network.edge_length(edge.edge)?;
        if accumulated >= cap {
            break;
        }
    }

    Ok(shape)
}
