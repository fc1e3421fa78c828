use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::decoder::DecoderConfig;
use crate::decoder::candidates::CandidatePathSegment;
use crate::error::DecodeError;
use crate::network::RoadNetwork;
use crate::score::{Score, ScoreKind};
use crate::{Length, LocationReferencePoint, Path};

/// The best accepted route between the candidates of two subsequent LRPs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedPair<V, E> {
    pub path: Path<V, E>,
    pub source: CandidatePathSegment<V, E>,
    pub target: CandidatePathSegment<V, E>,
    pub score: Score,
}

/// Entry of the best-first candidate pair queue. Ordered by descending
/// combined score with stable insertion order as tie breaker, so the search
/// is reproducible.
#[derive(Debug, PartialEq, Eq)]
struct PairEntry {
    value: OrderedFloat<f64>,
    order: Reverse<usize>,
    pair: usize,
}

impl Ord for PairEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value).then_with(|| self.order.cmp(&other.order))
    }
}

impl PartialOrd for PairEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selects the best candidate pair between two subsequent LRPs and the route
/// that connects it.
///
/// All source/target combinations are rated by the sum of their segment
/// scores and visited best-first. For each pair a route is requested from the
/// network, bounded by a multiple of the declared distance between the LRPs;
/// a missing route discards the pair, an existing one is rated by how far its
/// length deviates from the declared distance. The iteration stops as soon as
/// the maximum score still achievable by the remaining (lower ranked) pairs
/// cannot beat the best accepted candidate, which bounds the otherwise
/// combinatorial pair space.
///
/// Returns an error naming the LRP boundary when no pair is accepted: the
/// whole decode fails, no partial result is returned.
pub(crate) fn resolve_pair<N: RoadNetwork>(
    config: &DecoderConfig,
    network: &N,
    sources: &[CandidatePathSegment<N::VertexId, N::EdgeId>],
    targets: &[CandidatePathSegment<N::VertexId, N::EdgeId>],
    lrp: &LocationReferencePoint,
    index: usize,
) -> Result<ResolvedPair<N::VertexId, N::EdgeId>, DecodeError<N::Error>> {
    let expected = lrp.distance_to_next();
    let max_route_distance = expected * config.route_distance_factor;

    let mut pairs = Vec::with_capacity(sources.len() * targets.len());
    let mut queue = BinaryHeap::with_capacity(sources.len() * targets.len());

    for source in sources {
        for target in targets {
            let combined = source.score + target.score;
            queue.push(PairEntry {
                value: OrderedFloat(combined.value()),
                order: Reverse(pairs.len()),
                pair: pairs.len(),
            });
            pairs.push((source, target, combined));
        }
    }

    debug!("Resolving {} candidate pairs between LRP {index} and its successor", pairs.len());
    let mut best: Option<ResolvedPair<N::VertexId, N::EdgeId>> = None;

    while let Some(entry) = queue.pop() {
        let (source, target, combined) = pairs[entry.pair];

        // No remaining pair can beat the current best even with a perfect
        // route and a perfect distance match.
        let max_achievable = (combined + Score::perfect(ScoreKind::Route, 1.0))
            * Score::perfect(ScoreKind::DistanceDeviation, 1.0);
        if let Some(best) = &best
            && max_achievable.value() <= best.score.value()
        {
            trace!("Pruning remaining pairs: {max_achievable} cannot beat {}", best.score);
            break;
        }

        let Some(path) = network.route_between(source.token, target.token, max_route_distance)?
        else {
            trace!("No route for pair {:?} -> {:?}", source.line, target.line);
            continue;
        };

        let deviation = distance_deviation_score(config, expected, path.length);
        let score = (combined + Score::perfect(ScoreKind::Route, 1.0)) * deviation;

        if score.ratio() <= config.score_threshold {
            trace!("Rejecting pair {:?} -> {:?}: {score}", source.line, target.line);
            continue;
        }

        if best.as_ref().is_none_or(|best| score.value() > best.score.value()) {
            debug!("Accepted pair {:?} -> {:?}: {score}", source.line, target.line);
            best = Some(ResolvedPair { path, source: *source, target: *target, score });
        }

        if best.as_ref().is_some_and(|best| best.score.is_perfect()) {
            break;
        }
    }

    best.ok_or(DecodeError::RouteNotFound { index })
}

/// Rates the deviation between the routed length and the distance declared by
/// the LRP: perfect within the distance grain of the physical format, then
/// linearly decaying to zero as the excess deviation approaches the full
/// declared distance.
fn distance_deviation_score(config: &DecoderConfig, expected: Length, actual: Length) -> Score {
    let deviation = (actual.meters() - expected.meters()).abs();
    let grain = config.distance_grain.meters();

    let value = if deviation <= grain {
        1.0
    } else if expected.meters() <= 0.0 {
        0.0
    } else {
        (1.0 - (deviation - grain) / expected.meters()).max(0.0)
    };

    Score::new(ScoreKind::DistanceDeviation, value, 1.0)
}
