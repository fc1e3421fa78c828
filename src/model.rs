use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use approx::abs_diff_eq;
use ordered_float::OrderedFloat;
use strum::{Display, FromRepr};

/// Functional Road Class.
/// The functional road class (FRC) of a line is a road classification
/// based on the importance of the road represented by the line.
#[derive(Debug, Display, FromRepr, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Frc {
    /// Main road, highest importance.
    Frc0 = 0,
    /// First class road.
    Frc1 = 1,
    /// Second class road.
    Frc2 = 2,
    /// Third class road.
    Frc3 = 3,
    /// Fourth class road.
    Frc4 = 4,
    /// Fifth class road.
    Frc5 = 5,
    /// Sixth class road.
    Frc6 = 6,
    /// Other class road, lowest importance.
    Frc7 = 7,
}

impl Frc {
    /// Number of classes between two FRC values.
    pub const fn distance(&self, other: &Self) -> u8 {
        (*self as u8).abs_diff(*other as u8)
    }

    /// The less important of the two classes (greater ordinal).
    pub fn lowest(self, other: Self) -> Self {
        self.max(other)
    }
}

impl Default for Frc {
    fn default() -> Self {
        Self::Frc7
    }
}

/// Form of Way.
/// The form of way (FOW) describes the physical road type of a line.
#[derive(Debug, Display, FromRepr, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Fow {
    /// The physical road type is unknown.
    Undefined = 0,
    /// A Motorway is defined as a road permitted for motorized vehicles
    /// only in combination with a prescribed minimum speed. It has two
    /// or more physically separated carriageways and no single level-crossings.
    Motorway = 1,
    /// A multiple carriageway is defined as a road with physically separated
    /// carriageways regardless of the number of lanes. If a road is also a
    /// motorway, it should be coded as such and not as a multiple carriageway.
    MultipleCarriageway = 2,
    /// All roads without separate carriageways are considered as roads with
    /// a single carriageway.
    SingleCarriageway = 3,
    /// A Roundabout is a road which forms a ring on which traffic traveling
    /// in only one direction is allowed.
    Roundabout = 4,
    /// A Traffic Square is an open area (partly) enclosed by roads which is
    /// used for non-traffic purposes and which is not a Roundabout.
    TrafficSquare = 5,
    /// A Slip Road is a road especially designed to enter or leave a line.
    SlipRoad = 6,
    /// The physical road type is known but does not fit into one of the
    /// other categories.
    Other = 7,
}

impl Default for Fow {
    fn default() -> Self {
        Self::Other
    }
}

/// The orientation information (ORI) describes the relationship between a
/// point of interest and the direction of a referenced line.
#[derive(Debug, Display, FromRepr, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Orientation {
    /// Point has no sense of orientation, or determination of orientation
    /// is not applicable.
    Unknown = 0,
    /// Point has orientation from first LRP towards second LRP.
    Forward = 1,
    /// Point has orientation from second LRP towards first LRP.
    Backward = 2,
    /// Point has orientation in both directions.
    Both = 3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::Unknown
    }
}

/// The side of road information (SOR) describes the relationship between a
/// point of interest and a referenced line.
#[derive(Debug, Display, FromRepr, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SideOfRoad {
    /// Point is directly on (or above) the road, or determination of right/left
    /// side is not applicable.
    OnRoadOrUnknown = 0,
    /// Point is on right side of the road.
    Right = 1,
    /// Point is on left side of the road.
    Left = 2,
    /// Point is on both sides of the road.
    Both = 3,
}

impl Default for SideOfRoad {
    fn default() -> Self {
        Self::OnRoadOrUnknown
    }
}

/// Distance in meters.
/// Backed by a totally ordered float so that lengths can be used as keys of
/// priority queues and maps during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Length(OrderedFloat<f64>);

impl Length {
    pub const ZERO: Self = Self::from_meters(0.0);
    pub const MAX: Self = Self::from_meters(f64::MAX);

    /// Maximum distance between two consecutive LRPs that the physical format
    /// can represent.
    pub const MAX_SEGMENT_LENGTH: Self = Self::from_meters(15_000.0);

    pub const fn from_meters(meters: f64) -> Self {
        Self(OrderedFloat(meters))
    }

    pub const fn meters(&self) -> f64 {
        self.0.0
    }

    pub fn round(self) -> Self {
        Self::from_meters(self.meters().round())
    }

    pub fn is_zero(&self) -> bool {
        self.meters() == 0.0
    }

    /// Subtraction clamped at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self::from_meters((self.meters() - other.meters()).max(0.0))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}m", self.meters())
    }
}

impl Add for Length {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::from_meters(self.meters() + other.meters())
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Length {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::from_meters(self.meters() - other.meters())
    }
}

impl Mul<f64> for Length {
    type Output = Self;
    fn mul(self, factor: f64) -> Self {
        Self::from_meters(self.meters() * factor)
    }
}

impl Sum for Length {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// The bearing describes the angle between the true North and the road.
/// The physical data format defines the bearing field as an integer value between 0
/// and 360 whereby "0" is included and "360" is excluded from that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Bearing(u16);

impl Bearing {
    pub const fn from_degrees(degrees: u16) -> Self {
        Self(degrees % 360)
    }

    pub const fn degrees(&self) -> u16 {
        self.0
    }

    /// Shortest angular difference between two bearings, in `[0, 180]` degrees.
    pub const fn difference(&self, other: &Self) -> u16 {
        let diff = self.0.abs_diff(other.0);
        if diff > 180 { 360 - diff } else { diff }
    }
}

/// Offset expressed as a percentage of a path length, in `[0, 100)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percentage(f64);

impl Percentage {
    pub const ZERO: Self = Self(0.0);

    pub const fn from_percent(percent: f64) -> Self {
        Self(percent)
    }

    pub const fn percent(&self) -> f64 {
        self.0
    }

    pub const fn fraction(&self) -> f64 {
        self.0 / 100.0
    }

    pub fn is_valid(&self) -> bool {
        (0.0..100.0).contains(&self.0)
    }
}

/// Coordinate pair stands for a pair of WGS84 longitude (lon) and latitude (lat)
/// values. This coordinate pair specifies a geometric point in a digital map.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        // decamicrodegree resolution of the physical format
        const EPSILON: f64 = 1e-5;
        abs_diff_eq!(self.lon, other.lon, epsilon = EPSILON)
            && abs_diff_eq!(self.lat, other.lat, epsilon = EPSILON)
    }
}

/// Line attributes are part of a location reference point and consist of
/// functional road class (FRC), form of way (FOW) and bearing (BEAR) data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineAttributes {
    pub frc: Frc,
    pub fow: Fow,
    pub bearing: Bearing,
}

/// The path attributes are part of a location reference point (except for the
/// last location reference point) and consist of the lowest functional road
/// class and the distance to the next point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathAttributes {
    /// Lowest functional road class encountered on the path to the next point.
    pub lowest_frc: Frc,
    /// Distance to the next point, measured along the location reference path.
    pub distance_to_next: Length,
}

/// The basis of a location reference is a sequence of location reference points
/// (LRPs). All values of an LRP refer to a node or line within the road network
/// of the party that produced the reference: the coordinate refers to a node of
/// a line or a point on a line, and the attributes refer to the line itself.
/// The attributes of the first and of any intermediate LRP describe the line
/// leaving the point; the attributes of the last LRP describe the line entering
/// the point against the travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationReferencePoint {
    pub coordinate: Coordinate,
    pub line: LineAttributes,
    pub path: Option<PathAttributes>,
}

impl LocationReferencePoint {
    /// True when this is the last point of a reference (no onward path).
    pub const fn is_last(&self) -> bool {
        self.path.is_none()
    }

    /// Declared distance to the next LRP, zero for the last point.
    pub fn distance_to_next(&self) -> Length {
        self.path.map(|p| p.distance_to_next).unwrap_or(Length::ZERO)
    }

    /// Declared lowest FRC on the way to the next LRP.
    pub fn lowest_frc_to_next(&self) -> Frc {
        self.path.map(|p| p.lowest_frc).unwrap_or_default()
    }
}

/// A line location reference describes a path within a map and consists of two
/// or more location reference points plus offset data. The offsets trim the
/// location reference path down to the size of the referenced location and are
/// expressed as percentages of the path length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineReference {
    pub points: Vec<LocationReferencePoint>,
    pub positive_offset: Percentage,
    pub negative_offset: Percentage,
}

/// Point along line is a point location which is defined by a line and an
/// offset value. The line is referenced by exactly two location reference
/// points and the concrete position on that line is referenced using the
/// positive offset. Additionally the orientation with respect to the direction
/// of the line and the side of the road can be attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointAlongLineReference {
    pub points: [LocationReferencePoint; 2],
    pub offset: Percentage,
    pub orientation: Orientation,
    pub side: SideOfRoad,
}

/// A circle location is given by the position of the center and the radius.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    pub center: Coordinate,
    pub radius: Length,
}

/// A rectangle location reference consists of the lower left and the upper
/// right corner points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub lower_left: Coordinate,
    pub upper_right: Coordinate,
}

/// A grid location is a special instance of a rectangle location: the base
/// rectangle is the lower left cell of the grid and is multiplied to the North
/// and to the East.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    pub rect: Rectangle,
    pub size: GridSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub columns: u16,
    pub rows: u16,
}

/// A polygon location is a non-intersecting shape defined by a sequence of
/// geo-coordinate pairs that form its corners.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub corners: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LocationType {
    Line = 0,
    GeoCoordinate = 1,
    PointAlongLine = 2,
    Circle = 3,
    Rectangle = 4,
    Grid = 5,
    Polygon = 6,
}

/// Structured model of a location reference, dispatched by the type field of
/// the physical format header. Only line and point-along-line references are
/// bound to the road network and carry map-matching logic; the remaining kinds
/// are coordinate pass-throughs handled entirely by the wire codec and its
/// callers.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationReference {
    Line(LineReference),
    GeoCoordinate(Coordinate),
    PointAlongLine(PointAlongLineReference),
    Circle(Circle),
    Rectangle(Rectangle),
    Grid(Grid),
    Polygon(Polygon),
}

impl LocationReference {
    pub const fn location_type(&self) -> LocationType {
        match self {
            Self::Line(_) => LocationType::Line,
            Self::GeoCoordinate(_) => LocationType::GeoCoordinate,
            Self::PointAlongLine(_) => LocationType::PointAlongLine,
            Self::Circle(_) => LocationType::Circle,
            Self::Rectangle(_) => LocationType::Rectangle,
            Self::Grid(_) => LocationType::Grid,
            Self::Polygon(_) => LocationType::Polygon,
        }
    }
}
