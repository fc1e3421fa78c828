use crate::error::EncodeError;
use crate::location::ReferencedLine;
use crate::network::{Interpreter, RoadNetwork};
use crate::Path;

/// Returns an error if the location path is not a connected, traversable path
/// of the network. Every consecutive vertex pair must correspond to an
/// existing, correctly directed edge that the travel profile can traverse;
/// failures name the offending edge index.
pub(crate) fn validate_path<N, I>(
    network: &N,
    interpreter: &I,
    path: &Path<N::VertexId, N::EdgeId>,
) -> Result<(), EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    if path.edges.is_empty() {
        return Err(EncodeError::EmptyLocation);
    }

    if path.vertices.len() != path.edges.len() + 1 {
        return Err(EncodeError::NotConnected { index: 0 });
    }

    for (index, edge) in path.edges.iter().enumerate() {
        let start = path.vertices[index];
        let end = path.vertices[index + 1];

        let exists = network
            .edges_at(start)?
            .into_iter()
            .any(|i| i.edge == edge.edge && i.direction == edge.direction && i.neighbor == end);
        if !exists {
            return Err(EncodeError::NotConnected { index });
        }

        let attributes = network.edge_attributes(edge.edge)?;
        if !interpreter.factor(&attributes).allows(edge.direction) {
            return Err(EncodeError::NotTraversable { index });
        }
    }

    Ok(())
}

/// Validates a line location including its offsets.
pub(crate) fn validate_line<N, I>(
    network: &N,
    interpreter: &I,
    line: &ReferencedLine<N::VertexId, N::EdgeId>,
) -> Result<(), EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    validate_path(network, interpreter, &line.path)?;

    if !line.offsets_are_valid() {
        return Err(EncodeError::InvalidOffsets {
            positive: line.positive_offset.percent(),
            negative: line.negative_offset.percent(),
        });
    }

    Ok(())
}
