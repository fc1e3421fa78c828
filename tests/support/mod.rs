//! In-memory road network fixture for the integration tests, built on the
//! public [`RoadNetwork`] and [`Interpreter`] traits only.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use geo::{Bearing as _, Distance as _, Haversine, Point};
use thiserror::Error;

use openlr_referenced::{
    Coordinate, Direction, DirectedEdge, Factor, Fow, Frc, IncidentEdge, Interpreter, Length,
    MatchTable, Path, PathToken, RoadClass, RoadNetwork, SnapPoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureError {
    #[error("unknown vertex {0:?}")]
    UnknownVertex(VertexId),
    #[error("unknown edge {0:?}")]
    UnknownEdge(EdgeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes {
    pub class: RoadClass,
    pub factor: Factor,
}

#[derive(Debug, Clone)]
struct Edge {
    vertices: [VertexId; 2],
    length: Length,
    attributes: Attributes,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureNetwork {
    vertices: Vec<Coordinate>,
    edges: Vec<Edge>,
}

fn meters(a: Coordinate, b: Coordinate) -> Length {
    Length::from_meters(Haversine.distance(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat)))
}

impl FixtureNetwork {
    pub fn vertex(&mut self, lon: f64, lat: f64) -> VertexId {
        self.vertices.push(Coordinate { lon, lat });
        VertexId(self.vertices.len() - 1)
    }

    pub fn edge(&mut self, from: VertexId, to: VertexId, frc: Frc, fow: Fow) -> EdgeId {
        self.add_edge(from, to, Factor::BOTH, frc, fow)
    }

    pub fn oneway(&mut self, from: VertexId, to: VertexId, frc: Frc, fow: Fow) -> EdgeId {
        self.add_edge(from, to, Factor::oneway(Direction::Forward), frc, fow)
    }

    fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        factor: Factor,
        frc: Frc,
        fow: Fow,
    ) -> EdgeId {
        let length = meters(self.vertices[from.0], self.vertices[to.0]);
        self.edges.push(Edge {
            vertices: [from, to],
            length,
            attributes: Attributes { class: RoadClass { frc, fow }, factor },
        });
        EdgeId(self.edges.len() - 1)
    }

    fn edge_data(&self, edge: EdgeId) -> Result<&Edge, FixtureError> {
        self.edges.get(edge.0).ok_or(FixtureError::UnknownEdge(edge))
    }

    fn directional_vertices(&self, edge: DirectedEdge<EdgeId>) -> Result<(VertexId, VertexId), FixtureError> {
        let [start, end] = self.edge_data(edge.edge)?.vertices;
        Ok(match edge.direction {
            Direction::Forward => (start, end),
            Direction::Backward => (end, start),
        })
    }

    fn dijkstra(
        &self,
        origin: VertexId,
        destination: VertexId,
        max_length: Length,
    ) -> Result<Option<(Vec<DirectedEdge<EdgeId>>, Vec<VertexId>, Length)>, FixtureError> {
        #[derive(PartialEq, Eq)]
        struct Element {
            distance: Length,
            vertex: VertexId,
        }
        impl Ord for Element {
            fn cmp(&self, other: &Self) -> Ordering {
                other.distance.cmp(&self.distance).then_with(|| other.vertex.cmp(&self.vertex))
            }
        }
        impl PartialOrd for Element {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        let mut shortest = HashMap::from([(origin, Length::ZERO)]);
        let mut previous: HashMap<VertexId, (DirectedEdge<EdgeId>, VertexId)> = HashMap::new();
        let mut frontier = BinaryHeap::from([Element { vertex: origin, distance: Length::ZERO }]);

        while let Some(element) = frontier.pop() {
            if element.vertex == destination {
                let mut edges = vec![];
                let mut vertices = vec![destination];
                let mut next = destination;
                while let Some(&(edge, prev)) = previous.get(&next) {
                    edges.push(edge);
                    vertices.push(prev);
                    next = prev;
                }
                edges.reverse();
                vertices.reverse();
                return Ok(Some((edges, vertices, element.distance)));
            }

            if element.distance > *shortest.get(&element.vertex).unwrap_or(&Length::MAX) {
                continue;
            }

            for incident in self.edges_at(element.vertex)? {
                if !self.edge_data(incident.edge)?.attributes.factor.allows(incident.direction) {
                    continue;
                }
                let distance = element.distance + self.edge_data(incident.edge)?.length;
                if distance > max_length {
                    continue;
                }
                if distance < *shortest.get(&incident.neighbor).unwrap_or(&Length::MAX) {
                    shortest.insert(incident.neighbor, distance);
                    previous.insert(
                        incident.neighbor,
                        (DirectedEdge::new(incident.edge, incident.direction), element.vertex),
                    );
                    frontier.push(Element { vertex: incident.neighbor, distance });
                }
            }
        }

        Ok(None)
    }
}

impl RoadNetwork for FixtureNetwork {
    type VertexId = VertexId;
    type EdgeId = EdgeId;
    type Attributes = Attributes;
    type Error = FixtureError;

    fn vertex_coordinate(&self, vertex: VertexId) -> Result<Coordinate, FixtureError> {
        self.vertices.get(vertex.0).copied().ok_or(FixtureError::UnknownVertex(vertex))
    }

    fn snap_near(
        &self,
        coordinate: Coordinate,
        max_distance: Length,
    ) -> Result<Vec<(SnapPoint<VertexId, EdgeId>, Length)>, FixtureError> {
        let mut snaps = vec![];

        for (index, &vertex) in self.vertices.iter().enumerate() {
            let distance = meters(coordinate, vertex);
            if distance <= max_distance {
                snaps.push((SnapPoint::Vertex(VertexId(index)), distance));
            }
        }

        // straight-line edges: project onto the segment between the endpoints
        for (index, edge) in self.edges.iter().enumerate() {
            let [a, b] = edge.vertices;
            let (a, b) = (self.vertices[a.0], self.vertices[b.0]);

            let (dx, dy) = (b.lon - a.lon, b.lat - a.lat);
            let square = dx * dx + dy * dy;
            if square == 0.0 {
                continue;
            }

            let t = ((coordinate.lon - a.lon) * dx + (coordinate.lat - a.lat) * dy) / square;
            if !(0.0..=1.0).contains(&t) {
                continue;
            }

            let projected = Coordinate { lon: a.lon + dx * t, lat: a.lat + dy * t };
            let distance = meters(coordinate, projected);
            let offset = meters(a, projected);

            if distance <= max_distance && offset > Length::ZERO && offset < edge.length {
                snaps.push((SnapPoint::Edge { edge: EdgeId(index), offset }, distance));
            }
        }

        snaps.sort_by_key(|&(_, distance)| distance);
        Ok(snaps)
    }

    fn edges_at(&self, vertex: VertexId) -> Result<Vec<IncidentEdge<EdgeId, VertexId>>, FixtureError> {
        if vertex.0 >= self.vertices.len() {
            return Err(FixtureError::UnknownVertex(vertex));
        }

        let mut incident = vec![];
        for (index, edge) in self.edges.iter().enumerate() {
            let [start, end] = edge.vertices;
            if start == vertex {
                incident.push(IncidentEdge {
                    edge: EdgeId(index),
                    direction: Direction::Forward,
                    neighbor: end,
                });
            }
            if end == vertex {
                incident.push(IncidentEdge {
                    edge: EdgeId(index),
                    direction: Direction::Backward,
                    neighbor: start,
                });
            }
        }
        Ok(incident)
    }

    fn edge_length(&self, edge: EdgeId) -> Result<Length, FixtureError> {
        Ok(self.edge_data(edge)?.length)
    }

    fn edge_shape(&self, edge: EdgeId) -> Result<Vec<Coordinate>, FixtureError> {
        let [start, end] = self.edge_data(edge)?.vertices;
        Ok(vec![self.vertices[start.0], self.vertices[end.0]])
    }

    fn edge_attributes(&self, edge: EdgeId) -> Result<Attributes, FixtureError> {
        Ok(self.edge_data(edge)?.attributes)
    }

    fn route_between(
        &self,
        from: PathToken<EdgeId>,
        to: PathToken<EdgeId>,
        max_distance: Length,
    ) -> Result<Option<Path<VertexId, EdgeId>>, FixtureError> {
        let from_edge = DirectedEdge::new(from.edge, from.direction);
        let to_edge = DirectedEdge::new(to.edge, to.direction);

        if !self.edge_data(from.edge)?.attributes.factor.allows(from.direction) {
            return Ok(None);
        }
        if to.offset > Length::ZERO && !self.edge_data(to.edge)?.attributes.factor.allows(to.direction) {
            return Ok(None);
        }

        if from_edge == to_edge && from.offset <= to.offset {
            let length = to.offset - from.offset;
            let (start, end) = self.directional_vertices(from_edge)?;
            return Ok((length <= max_distance).then(|| Path {
                vertices: vec![start, end],
                edges: vec![from_edge],
                length,
            }));
        }

        let head = self.edge_data(from.edge)?.length - from.offset;
        let tail = to.offset;
        if head + tail > max_distance {
            return Ok(None);
        }

        let (from_start, origin) = self.directional_vertices(from_edge)?;
        let (goal, to_end) = self.directional_vertices(to_edge)?;

        let Some((middle_edges, middle_vertices, middle_length)) =
            self.dijkstra(origin, goal, max_distance - head - tail)?
        else {
            return Ok(None);
        };

        let mut vertices = vec![from_start];
        vertices.extend(middle_vertices);
        let mut edges = vec![from_edge];
        edges.extend(middle_edges);

        if tail > Length::ZERO {
            vertices.push(to_end);
            edges.push(to_edge);
        }

        Ok(Some(Path { vertices, edges, length: head + middle_length + tail }))
    }
}

/// Profile interpreting the fixture attributes with the default grading table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureProfile {
    pub table: MatchTable,
}

impl Interpreter for FixtureProfile {
    type Attributes = Attributes;

    fn match_score(&self, attributes: &Attributes, fow: Fow, frc: Frc) -> f64 {
        self.table.grade(attributes.class, fow, frc)
    }

    fn factor(&self, attributes: &Attributes) -> Factor {
        attributes.factor
    }

    fn classify(&self, attributes: &Attributes) -> RoadClass {
        attributes.class
    }
}

#[allow(dead_code)]
pub fn bearing_of(a: Coordinate, b: Coordinate) -> u16 {
    let degrees =
        Haversine.bearing(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat)).rem_euclid(360.0);
    degrees.round() as u16 % 360
}
