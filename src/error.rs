use thiserror::Error;

/// Failure to resolve a location reference on the consumer map.
///
/// None of these are retried internally: the caller decides whether to retry
/// with relaxed parameters (larger search radius, lower score threshold).
/// Network provider faults pass through transparently.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DecodeError<NetworkError> {
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// A location reference needs at least two points.
    #[error("location reference has {0} points, at least 2 are required")]
    TooFewPoints(usize),
    /// Every point but the last must carry path attributes, and only the last
    /// may omit them.
    #[error("invalid path attributes at LRP {index}")]
    InvalidPathAttributes { index: usize },
    /// Offsets must be valid percentages leaving a non-empty location.
    #[error("invalid offsets: positive {positive}%, negative {negative}%")]
    InvalidOffsets { positive: f64, negative: f64 },
    /// Nothing of the network lies within the search radius of the LRP.
    #[error("no candidate found near LRP {index}")]
    CandidatesNotFound { index: usize },
    /// Candidates were found but none is compatible with the FOW/FRC/bearing
    /// of the LRP.
    #[error("no candidate line matches the attributes of LRP {index}")]
    NoMatchingCandidates { index: usize },
    /// No candidate pair between two subsequent LRPs produced an acceptable
    /// route: the whole decode fails, no partial result is returned.
    #[error("no acceptable route between LRP {index} and its successor")]
    RouteNotFound { index: usize },
    /// Routes resolved for subsequent LRP pairs do not connect. This signals
    /// an inconsistent answer from the routing provider.
    #[error("resolved routes do not connect at LRP {index}")]
    DisconnectedRoutes { index: usize },
}

/// Failure to construct a location reference for a path.
///
/// Validation failures describe a structurally broken input location;
/// convergence failures signal that the repair loop could not find a
/// representable configuration for a structurally sound one.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EncodeError<NetworkError> {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("location is empty")]
    EmptyLocation,
    /// Subsequent edges of the location do not connect.
    #[error("location is not connected at edge {index}")]
    NotConnected { index: usize },
    /// An edge of the location cannot be travelled in the direction the
    /// location traverses it.
    #[error("location is not traversable at edge {index}")]
    NotTraversable { index: usize },
    #[error("invalid offsets: positive {positive}%, negative {negative}%")]
    InvalidOffsets { positive: f64, negative: f64 },
    /// The point of a point-along-line location does not lie on its path.
    #[error("point does not lie on the location path (edge {index})")]
    InvalidPoint { index: usize },
    /// The provider could not route between two LRP candidates of the
    /// location being encoded; for a connected location this signals an
    /// inconsistent provider answer.
    #[error("no route between LRP {index} and its successor")]
    RouteNotFound { index: usize },
    /// The repair loop (endpoint adjustment, shortest-path coverage splitting
    /// or length limiting) could not reach a valid configuration: the
    /// location cannot be represented as a location reference.
    #[error("encoding did not converge: {reason}")]
    Convergence { reason: &'static str },
}
