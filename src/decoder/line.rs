use tracing::{debug, info};

use crate::decoder::DecoderConfig;
use crate::decoder::candidates::{
    CandidatePathSegment, MatchDirection, find_candidate_locations, find_candidate_segments,
};
use crate::decoder::search::{ResolvedPair, resolve_pair};
use crate::error::DecodeError;
use crate::location::ReferencedLine;
use crate::network::{Interpreter, RoadNetwork};
use crate::{LineReference, LocationReferencePoint, Path};

/// Resolves a line location reference into a path on the network.
///
/// Candidates are discovered independently for every LRP, then the best
/// candidate pair is selected for each pair of subsequent LRPs, left to
/// right: once a pair is resolved, its winning target candidate becomes the
/// only source candidate of the next pair, so the chain is greedy and never
/// backtracks across pair boundaries. The per-pair routes are concatenated
/// into one path and the declared offsets are attached unchanged.
pub fn decode_line<N, I>(
    config: &DecoderConfig,
    network: &N,
    interpreter: &I,
    reference: &LineReference,
) -> Result<ReferencedLine<N::VertexId, N::EdgeId>, DecodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    info!("Decoding line reference of {} points with {config:?}", reference.points.len());

    validate_reference(reference)?;

    let segments = find_all_candidate_segments(config, network, interpreter, &reference.points)?;
    let pairs = resolve_pair_chain(config, network, &reference.points, segments)?;
    let path = stitch(pairs)?;

    Ok(ReferencedLine {
        path,
        positive_offset: reference.positive_offset,
        negative_offset: reference.negative_offset,
    })
}

fn validate_reference<E>(reference: &LineReference) -> Result<(), DecodeError<E>> {
    let points = &reference.points;

    if points.len() < 2 {
        return Err(DecodeError::TooFewPoints(points.len()));
    }

    for (index, point) in points.iter().enumerate() {
        let is_last = index == points.len() - 1;
        if point.is_last() != is_last {
            return Err(DecodeError::InvalidPathAttributes { index });
        }
    }

    let (positive, negative) = (reference.positive_offset, reference.negative_offset);
    if !positive.is_valid() || !negative.is_valid() || positive.percent() + negative.percent() >= 100.0
    {
        return Err(DecodeError::InvalidOffsets {
            positive: positive.percent(),
            negative: negative.percent(),
        });
    }

    Ok(())
}

/// Discovers and rates the candidate lines of every LRP. Each lookup is
/// independent of the others; failures carry the index of the offending LRP.
pub(crate) fn find_all_candidate_segments<N, I>(
    config: &DecoderConfig,
    network: &N,
    interpreter: &I,
    points: &[LocationReferencePoint],
) -> Result<Vec<Vec<CandidatePathSegment<N::VertexId, N::EdgeId>>>, DecodeError<N::Error>>
where
    N: RoadNetwork,
    I: Interpreter<Attributes = N::Attributes>,
{
    let mut segments = Vec::with_capacity(points.len());

    for (index, point) in points.iter().enumerate() {
        let locations = find_candidate_locations(config, network, point.coordinate)?;
        if locations.is_empty() {
            return Err(DecodeError::CandidatesNotFound { index });
        }

        let direction = if point.is_last() {
            MatchDirection::Incoming
        } else {
            MatchDirection::Outgoing
        };

        let mut lrp_segments = vec![];
        for location in locations {
            lrp_segments.extend(find_candidate_segments(
                config,
                network,
                interpreter,
                location,
                &point.line,
                direction,
            )?);
        }

        if lrp_segments.is_empty() {
            return Err(DecodeError::NoMatchingCandidates { index });
        }

        debug!("LRP {index}: {} candidate lines", lrp_segments.len());
        segments.push(lrp_segments);
    }

    Ok(segments)
}

/// Resolves the best route for every pair of subsequent LRPs, seeding each
/// pair with the winning target of the previous one.
pub(crate) fn resolve_pair_chain<N: RoadNetwork>(
    config: &DecoderConfig,
    network: &N,
    points: &[LocationReferencePoint],
    segments: Vec<Vec<CandidatePathSegment<N::VertexId, N::EdgeId>>>,
) -> Result<Vec<ResolvedPair<N::VertexId, N::EdgeId>>, DecodeError<N::Error>> {
    let mut pairs = Vec::with_capacity(segments.len() - 1);
    let mut segments = segments.into_iter();
    let mut sources = segments.next().unwrap_or_default();

    for (index, targets) in segments.enumerate() {
        let pair = resolve_pair(config, network, &sources, &targets, &points[index], index)?;
        sources = vec![pair.target];
        pairs.push(pair);
    }

    Ok(pairs)
}

/// Concatenates the per-pair routes into one path. At each join the shared
/// boundary vertex (or edge, for candidates projected into the interior of a
/// line) is deduplicated by the path merge.
pub(crate) fn stitch<V: Copy + Eq, E: Copy + Eq, Err>(
    pairs: Vec<ResolvedPair<V, E>>,
) -> Result<Path<V, E>, DecodeError<Err>> {
    let mut path: Path<V, E> = Path::default();

    for (index, pair) in pairs.into_iter().enumerate() {
        path = path
            .merge(pair.path)
            .map_err(|_| DecodeError::DisconnectedRoutes { index })?;
    }

    Ok(path)
}
