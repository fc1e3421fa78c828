use tracing::{debug, trace};

use crate::error::EncodeError;
use crate::network::{PathToken, RoadNetwork};
use crate::{Length, Path};

/// Verifies that the location is covered by a concatenation of shortest
/// paths, and determines where intermediate LRPs have to be placed.
///
/// Returns the LRP anchor positions as indices into the path edge list: LRP
/// `k` anchors at the directional start of `edges[cuts[k]]` and the last LRP
/// (not part of the result) anchors at the end of the last edge.
///
/// For every stretch between subsequent anchors the provider's shortest path
/// between the bounding edges is requested and compared edge by edge against
/// the location. Where the two diverge, a new intermediate anchor is inserted
/// exactly at the divergence point and the (now shorter) stretch is verified
/// again, until every stretch is provably a shortest path. Each insertion
/// strictly shrinks the stretch under verification, so the loop terminates;
/// an iteration cap guards against a provider that keeps answering with
/// inconsistent routes.
pub(crate) fn verify_coverage<N: RoadNetwork>(
    network: &N,
    path: &Path<N::VertexId, N::EdgeId>,
    edge_lengths: &[Length],
) -> Result<Vec<usize>, EncodeError<N::Error>> {
    let mut cuts = vec![0];
    let mut k = 0;

    let mut iterations = 0usize;
    let cap = path.edges.len() * 2 + 8;

    while k < cuts.len() {
        iterations += 1;
        if iterations > cap {
            return Err(EncodeError::Convergence {
                reason: "shortest-path coverage verification did not converge",
            });
        }

        let start = cuts[k];
        let end = cuts.get(k + 1).copied().unwrap_or(path.edges.len());
        let stretch = &path.edges[start..end];
        let stretch_length: Length = edge_lengths[start..end].iter().copied().sum();

        // a single line is trivially its own shortest path
        if stretch.len() == 1 {
            k += 1;
            continue;
        }

        let first = stretch[0];
        let last = stretch[stretch.len() - 1];
        let from = PathToken::new(first.edge, first.direction, Length::ZERO);
        let to = PathToken::new(last.edge, last.direction, edge_lengths[end - 1]);

        // the shortest path can only be shorter than the stretch itself
        let Some(route) = network.route_between(from, to, stretch_length)? else {
            return Err(EncodeError::RouteNotFound { index: k });
        };

        match divergence_index(stretch, &route.edges) {
            None => {
                trace!("Stretch {start}..{end} is a shortest path");
                k += 1;
            }
            Some(divergence) => {
                debug!("Location diverges from the shortest path at edge {}", start + divergence);
                cuts.insert(k + 1, start + divergence);
            }
        }
    }

    Ok(cuts)
}

/// Index of the first edge where the location stretch and the shortest route
/// differ, `None` when the route covers the stretch exactly. Both sequences
/// start with the same edge, so a divergence is never at index zero; a route
/// that is a strict prefix of the stretch (a location looping back over its
/// own last edge) diverges where the route ends.
fn divergence_index<E: PartialEq>(stretch: &[E], route: &[E]) -> Option<usize> {
    if stretch == route {
        return None;
    }

    let diverged = stretch
        .iter()
        .zip(route)
        .position(|(location_edge, route_edge)| location_edge != route_edge);

    let index = diverged.unwrap_or_else(|| stretch.len().min(route.len()));
    Some(index.clamp(1, stretch.len() - 1))
}
