use std::fmt;
use std::ops::{Add, Mul};

use strum::Display;

/// Confidence unit used to compose independent quality signals into a single
/// ranking key.
///
/// A score carries the achieved `value` together with the `reference` that a
/// perfect candidate would have achieved for the same signal. Two combination
/// rules exist:
///
/// - **Addition** sums values and references of two independent signals, so
///   the ratio stays a weighted average of the parts.
/// - **Multiplication** multiplies values and references component-wise, which
///   applies one score as a penalty on another: the acceptance ratio of the
///   product is the product of the ratios, and a perfect score stays perfect.
///
/// Candidates are ranked by raw `value` (higher is better) once all signals
/// have been combined; acceptance compares `value / reference` against a
/// configured threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    value: f64,
    reference: f64,
    kind: ScoreKind,
}

/// Signal that produced a score, kept for diagnostics.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Linear distance between an LRP and its snapped candidate.
    Proximity,
    /// FRC/FOW compatibility of a candidate line.
    RoadMatch,
    /// Angular deviation between a candidate line and the LRP bearing.
    BearingMatch,
    /// Existence of a route between two candidates.
    Route,
    /// Deviation between the routed distance and the declared distance.
    DistanceDeviation,
    /// Result of combining two or more signals.
    Combined,
}

impl Score {
    pub const fn new(kind: ScoreKind, value: f64, reference: f64) -> Self {
        Self { value, reference, kind }
    }

    /// A signal that achieved its full reference.
    pub const fn perfect(kind: ScoreKind, reference: f64) -> Self {
        Self::new(kind, reference, reference)
    }

    /// A signal that achieved nothing out of its reference.
    pub const fn failed(kind: ScoreKind, reference: f64) -> Self {
        Self::new(kind, 0.0, reference)
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn reference(&self) -> f64 {
        self.reference
    }

    pub const fn kind(&self) -> ScoreKind {
        self.kind
    }

    /// Achieved fraction of the reference, in `[0, 1]` for well-formed scores.
    pub fn ratio(&self) -> f64 {
        if self.reference == 0.0 { 0.0 } else { self.value / self.reference }
    }

    pub fn is_perfect(&self) -> bool {
        self.reference > 0.0 && self.value == self.reference
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:.3}/{:.3}", self.kind, self.value, self.reference)
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            value: self.value + other.value,
            reference: self.reference + other.reference,
            kind: ScoreKind::Combined,
        }
    }
}

impl Mul for Score {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            value: self.value * other.value,
            reference: self.reference * other.reference,
            kind: ScoreKind::Combined,
        }
    }
}
