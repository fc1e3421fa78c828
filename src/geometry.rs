//! Shape math on raw edge geometries.
//!
//! The network provider only hands out ordered coordinate lists; everything
//! derived from them (lengths, interpolated points, the standardized bearing
//! measurement) is computed here on the WGS84 sphere.

use geo::{Bearing as _, Distance as _, Haversine, InterpolatePoint as _, Point};

use crate::{Bearing, Coordinate, Length};

impl Coordinate {
    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub(crate) fn from_point(point: Point<f64>) -> Self {
        Self { lon: point.x(), lat: point.y() }
    }
}

/// Great-circle distance between two coordinates.
pub fn distance(a: Coordinate, b: Coordinate) -> Length {
    Length::from_meters(Haversine.distance(a.to_point(), b.to_point()))
}

/// Bearing from `a` to `b` in degrees clockwise from true North, `[0, 360)`.
pub fn bearing_between(a: Coordinate, b: Coordinate) -> Bearing {
    let degrees = Haversine.bearing(a.to_point(), b.to_point()).rem_euclid(360.0);
    Bearing::from_degrees(degrees.round() as u16)
}

/// Total length of a polyline.
pub fn polyline_length(shape: &[Coordinate]) -> Length {
    shape.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}

/// Coordinate at the given distance from the start of the polyline.
/// The distance is clamped within the polyline length.
pub fn point_along(shape: &[Coordinate], distance_from_start: Length) -> Option<Coordinate> {
    let (&first, &last) = (shape.first()?, shape.last()?);

    if distance_from_start <= Length::ZERO {
        return Some(first);
    }

    let mut remaining = distance_from_start;
    for pair in shape.windows(2) {
        let segment = distance(pair[0], pair[1]);
        if remaining <= segment && !segment.is_zero() {
            let ratio = remaining.meters() / segment.meters();
            let point =
                Haversine.point_at_ratio_between(pair[0].to_point(), pair[1].to_point(), ratio);
            return Some(Coordinate::from_point(point));
        }
        remaining = remaining - segment;
    }

    Some(last)
}

/// Polyline truncated to start at the given distance from its start.
pub fn shape_from(shape: &[Coordinate], distance_from_start: Length) -> Vec<Coordinate> {
    let Some(start) = point_along(shape, distance_from_start) else {
        return vec![];
    };

    let mut result = vec![start];
    let mut travelled = Length::ZERO;

    for pair in shape.windows(2) {
        travelled += distance(pair[0], pair[1]);
        if travelled > distance_from_start {
            result.push(pair[1]);
        }
    }

    result
}

/// Bearing of the section of the polyline that goes from its start to the
/// point at `bearing_distance` along it, as mandated by the data format rules
/// for the BEAR attribute. With `start_at_end` the polyline is measured from
/// its other end, which yields the bearing of the last location reference
/// point (pointing backwards along the path).
///
/// Returns `None` for degenerate shapes (fewer than two distinct points).
pub fn encode_bearing(
    shape: &[Coordinate],
    bearing_distance: Length,
    start_at_end: bool,
) -> Option<Bearing> {
    let oriented: Vec<Coordinate> = if start_at_end {
        shape.iter().rev().copied().collect()
    } else {
        shape.to_vec()
    };

    let total = polyline_length(&oriented);
    if oriented.len() < 2 || total.is_zero() {
        return None;
    }

    let origin = oriented[0];
    let target = point_along(&oriented, bearing_distance.min(total))?;
    Some(bearing_between(origin, target))
}
