use tracing::debug;

use crate::encoder::anchors::is_vertex_valid;
use crate::error::EncodeError;
use crate::network::{Interpreter, RoadNetwork};
use crate::{Length, Path};

/// Splits every stretch between subsequent LRP anchors that is longer than
/// the representable maximum.
///
/// The split vertex is the interior vertex maximizing a blended score of
/// topological validity and proximity of the two resulting half lengths to,
/// but not over, the limit (fewer but fuller stretches need fewer LRPs).
/// Halves that still exceed the limit go back on the worklist. A single edge
/// longer than the limit cannot be represented at all.
pub(crate) fn limit_stretch_lengths<N, I>(
    config_max: Length,
    network: &N,
    interpreter: &I,
    path: &Path<N::VertexId, N::EdgeId>,
    edge_lengths: &[Length],
    mut cuts: Vec<usize>,
) -> Result<Vec<usize>, EncodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let stretch_length = |start: usize, end: usize| -> Length {
        edge_lengths[start..end].iter().copied().sum()
    };

    let mut worklist: Vec<(usize, usize)> = cuts
        .iter()
        .enumerate()
        .map(|(k, &start)| (start, cuts.get(k + 1).copied().unwrap_or(path.edges.len())))
        .collect();

    while let Some((start, end)) = worklist.pop() {
        let length = stretch_length(start, end);
        if length <= config_max {
            continue;
        }

        if end - start == 1 {
            return Err(EncodeError::Convergence {
                reason: "a single line exceeds the representable stretch length",
            });
        }

        let mut best: Option<(usize, f64)> = None;

        for split in start + 1..end {
            let first = stretch_length(start, split);
            let second = stretch_length(split, end);

            let half = |length: Length| {
                if length <= config_max { length.meters() / config_max.meters() } else { 0.0 }
            };

            let validity_bonus = if is_vertex_valid(network, interpreter, path.vertices[split])? {
                1.0
            } else {
                0.0
            };

            let score = validity_bonus + (half(first) + half(second)) / 2.0;

            if best.is_none_or(|(_, value)| score > value) {
                best = Some((split, score));
            }
        }

        // end - start >= 2, so an interior split always exists
        let Some((split, score)) = best else {
            return Err(EncodeError::Convergence { reason: "no split vertex found" });
        };
        debug!("Splitting overlong stretch {start}..{end} at edge {split} (score {score:.3})");

        cuts.push(split);
        worklist.push((start, split));
        worklist.push((split, end));
    }

    cuts.sort_unstable();
    cuts.dedup();
    Ok(cuts)
}
