use rustc_hash::FxHashSet;
use tracing::debug;

use crate::encoder::EncoderConfig;
use crate::error::EncodeError;
use crate::network::{DirectedEdge, Interpreter, RoadNetwork};
use crate::{Length, Path};

/// Returns true if a vertex is topologically significant enough to anchor a
/// location reference point.
///
/// Data format rules recommend placing LRPs on valid vertices: vertices where
/// a shortest-path search has to decide between several ways. A vertex with
/// exactly two connected neighbors is a pass-through the search can step over
/// and is therefore invalid whenever traffic can traverse it in at least one
/// direction, regardless of one-way restrictions on its two sides. Dead ends
/// are valid (the only option there is to turn back), and so is any vertex
/// connecting three or more neighbors.
pub fn is_vertex_valid<N, I>(
    network: &N,
    interpreter: &I,
    vertex: N::VertexId,
) -> Result<bool, N::Error>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    // per-neighbor connectivity: can we leave towards it, can we enter from it
    let mut neighbors: Vec<(N::VertexId, bool, bool)> = vec![];

    for incident in network.edges_at(vertex)? {
        if incident.neighbor == vertex {
            continue; // self loops do not add a way out
        }

        let factor = interpreter.factor(&network.edge_attributes(incident.edge)?);
        let out = factor.allows(incident.direction);
        let entry = factor.allows(incident.direction.opposite());
        if !out && !entry {
            continue;
        }

        if let Some(neighbor) = neighbors.iter_mut().find(|(v, ..)| *v == incident.neighbor) {
            neighbor.1 |= out;
            neighbor.2 |= entry;
        } else {
            neighbors.push((incident.neighbor, out, entry));
        }
    }

    let valid = match neighbors.as_slice() {
        // dead ends are valid anchors
        [] | [_] => true,
        [(_, a_out, a_entry), (_, b_out, b_entry)] => {
            // a pass-through compatible with a single travel direction is not
            let through = (*a_entry && *b_out) || (*b_entry && *a_out);
            !through
        }
        _ => true,
    };

    Ok(valid)
}

/// Moves the start of the path backwards to the nearest valid vertex.
///
/// The path is extended with the edges walked; the added length must later be
/// absorbed by the positive offset. The walk keeps an explicit exclusion set
/// of visited vertices so that loops terminate, and gives up (leaving the
/// endpoint invalid, which the format tolerates) when no unambiguous
/// continuation exists or the extension would exceed the maximum stretch
/// length.
pub(crate) fn adjust_start<N, I>(
    config: &EncoderConfig,
    network: &N,
    interpreter: &I,
    path: &mut Path<N::VertexId, N::EdgeId>,
) -> Result<Length, EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let mut visited: FxHashSet<N::VertexId> = path.vertices.iter().copied().collect();
    let mut added = Length::ZERO;

    loop {
        let Some(start) = path.start_vertex() else { break };
        if is_vertex_valid(network, interpreter, start)? {
            break;
        }

        // step backwards through the only other side of the pass-through
        let mut extensions = network.edges_at(start)?;
        extensions.retain(|incident| !visited.contains(&incident.neighbor));

        let mut entering = None;
        for incident in extensions {
            let factor = interpreter.factor(&network.edge_attributes(incident.edge)?);
            if factor.allows(incident.direction.opposite()) {
                entering =
                    Some((incident.edge, incident.direction.opposite(), incident.neighbor));
                break;
            }
        }

        let Some((edge, direction, neighbor)) = entering else { break };

        let length = network.edge_length(edge)?;
        if added + length > config.max_segment_length {
            debug!("Stopping start adjustment: extension would exceed the maximum length");
            break;
        }

        debug!("Extending location start backwards through {edge:?}");
        path.vertices.insert(0, neighbor);
        path.edges.insert(0, DirectedEdge::new(edge, direction));
        path.length += length;
        visited.insert(neighbor);
        added += length;
    }

    Ok(added)
}

/// Moves the end of the path forwards to the nearest valid vertex.
/// Mirror image of [`adjust_start`]; the added length must later be absorbed
/// by the negative offset.
pub(crate) fn adjust_end<N, I>(
    config: &EncoderConfig,
    network: &N,
    interpreter: &I,
    path: &mut Path<N::VertexId, N::EdgeId>,
) -> Result<Length, EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let mut visited: FxHashSet<N::VertexId> = path.vertices.iter().copied().collect();
    let mut added = Length::ZERO;

    loop {
        let Some(end) = path.end_vertex() else { break };
        if is_vertex_valid(network, interpreter, end)? {
            break;
        }

        let mut extensions = network.edges_at(end)?;
        extensions.retain(|incident| !visited.contains(&incident.neighbor));

        let mut exiting = None;
        for incident in extensions {
            let factor = interpreter.factor(&network.edge_attributes(incident.edge)?);
            if factor.allows(incident.direction) {
                exiting = Some((incident.edge, incident.direction, incident.neighbor));
                break;
            }
        }

        let Some((edge, direction, neighbor)) = exiting else { break };

        let length = network.edge_length(edge)?;
        if added + length > config.max_segment_length {
            debug!("Stopping end adjustment: extension would exceed the maximum length");
            break;
        }

        debug!("Extending location end forwards through {edge:?}");
        path.vertices.push(neighbor);
        path.edges.push(DirectedEdge::new(edge, direction));
        path.length += length;
        visited.insert(neighbor);
        added += length;
    }

    Ok(added)
}
