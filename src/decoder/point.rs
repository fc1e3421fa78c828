use tracing::{debug, info};

use crate::decoder::DecoderConfig;
use crate::decoder::line::{find_all_candidate_segments, resolve_pair_chain, stitch};
use crate::error::DecodeError;
use crate::geometry;
use crate::location::ReferencedPointAlongLine;
use crate::network::{Interpreter, RoadNetwork};
use crate::{Length, PointAlongLineReference};

/// Resolves a point-along-line reference into a point on the network.
///
/// The two LRPs are matched exactly like a line location; the point is then
/// found by walking the declared offset percentage along the resolved path
/// and interpolating the coordinate on the edge geometry it falls into. The
/// returned path is trimmed to exactly the edges needed to reach the point.
pub fn decode_point_along_line<N, I>(
    config: &DecoderConfig,
    network: &N,
    interpreter: &I,
    reference: &PointAlongLineReference,
) -> Result<ReferencedPointAlongLine<N::VertexId, N::EdgeId>, DecodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    info!("Decoding point along line with {config:?}");

    if !reference.offset.is_valid() {
        return Err(DecodeError::InvalidOffsets {
            positive: reference.offset.percent(),
            negative: 0.0,
        });
    }

    let points = &reference.points;
    if points[0].is_last() {
        return Err(DecodeError::InvalidPathAttributes { index: 0 });
    }
    if !points[1].is_last() {
        return Err(DecodeError::InvalidPathAttributes { index: 1 });
    }

    let segments = find_all_candidate_segments(config, network, interpreter, points)?;
    let pairs = resolve_pair_chain(config, network, points, segments)?;

    // the path starts at the source candidate point, possibly within the
    // first edge for projected candidates
    let entry_offset = pairs[0].source.token.offset;
    let mut path = stitch(pairs)?;

    let target = path.length * reference.offset.fraction();
    debug!("Resolving point at {target} of {}", path.length);

    let mut remaining = target;
    let mut resolved = None;

    for (index, &edge) in path.edges.iter().enumerate() {
        let edge_length = network.edge_length(edge.edge)?;
        let start = if index == 0 { entry_offset } else { Length::ZERO };
        let available = edge_length - start;

        if remaining <= available || index == path.edges.len() - 1 {
            let offset = start + remaining.min(available);
            let shape = network.directed_edge_shape(edge)?;
            let coordinate = geometry::point_along(&shape, offset)
                .unwrap_or(points[1].coordinate);

            resolved = Some((index, offset, edge_length, coordinate));
            break;
        }

        remaining = remaining - available;
    }

    // the path is non-empty whenever the pair chain resolves
    let Some((edge_index, offset, edge_length, coordinate)) = resolved else {
        return Err(DecodeError::RouteNotFound { index: 0 });
    };

    path.edges.truncate(edge_index + 1);
    path.vertices.truncate(edge_index + 2);
    path.length = target;

    Ok(ReferencedPointAlongLine {
        path,
        coordinate,
        orientation: reference.orientation,
        edge_index,
        offset,
        edge_length,
    })
}
