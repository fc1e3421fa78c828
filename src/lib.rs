#![doc = include_str!("../README.md")]

mod decoder;
mod encoder;
mod error;
mod geometry;
mod location;
mod model;
mod network;
mod path;
mod score;

pub use decoder::candidates::{
    CandidateLocation, CandidatePathSegment, MatchDirection, find_candidate_locations,
    find_candidate_segments,
};
pub use decoder::{DecoderConfig, decode_line, decode_point_along_line};
pub use encoder::{EncoderConfig, encode_line, encode_point_along_line, is_vertex_valid};
pub use error::{DecodeError, EncodeError};
pub use geometry::{bearing_between, distance, encode_bearing, point_along, polyline_length};
pub use location::{Location, ReferencedLine, ReferencedPointAlongLine};
pub use model::{
    Bearing, Circle, Coordinate, Fow, Frc, Grid, GridSize, Length, LineAttributes, LineReference,
    LocationReference, LocationReferencePoint, LocationType, Orientation, PathAttributes,
    Percentage, PointAlongLineReference, Polygon, Rectangle, SideOfRoad,
};
pub use network::{
    Direction, DirectedEdge, Factor, IncidentEdge, Interpreter, MatchTable, PathToken, RoadClass,
    RoadNetwork, SnapPoint,
};
pub use path::{MergeError, Path};
pub use score::{Score, ScoreKind};
