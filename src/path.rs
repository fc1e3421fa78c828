use thiserror::Error;

use crate::network::DirectedEdge;
use crate::Length;

/// Failure to concatenate two paths that do not share a boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("paths do not share a boundary vertex or edge")]
pub struct MergeError;

/// An ordered sequence of directed edges with the vertex sequence they span.
///
/// The vertex sequence lists the directional endpoints of the edges
/// (`vertices.len() == edges.len() + 1` for non-empty paths). A path that
/// starts or ends within an edge still lists that edge's endpoints; the
/// travelled `length` accounts for the partial traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<V, E> {
    pub vertices: Vec<V>,
    pub edges: Vec<DirectedEdge<E>>,
    pub length: Length,
}

impl<V, E> Default for Path<V, E> {
    fn default() -> Self {
        Self { vertices: vec![], edges: vec![], length: Length::ZERO }
    }
}

impl<V: Copy + Eq, E: Copy + Eq> Path<V, E> {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn start_vertex(&self) -> Option<V> {
        self.vertices.first().copied()
    }

    pub fn end_vertex(&self) -> Option<V> {
        self.vertices.last().copied()
    }

    /// Concatenates another path at the end of this one.
    ///
    /// The tail of this path must coincide with the head of the other: either
    /// the boundary is a shared vertex, or the two paths overlap on the same
    /// directed edge (a boundary that lies within an edge). The shared
    /// vertex/edge is kept exactly once and the lengths are summed.
    pub fn merge(mut self, other: Self) -> Result<Self, MergeError> {
        if other.is_empty() {
            return Ok(self);
        }
        if self.is_empty() {
            return Ok(other);
        }

        if self.edges.last() == other.edges.first() {
            // boundary point lies within the shared edge
            debug_assert!(self.vertices[self.vertices.len() - 2..] == other.vertices[..2]);
            self.edges.extend_from_slice(&other.edges[1..]);
            self.vertices.extend_from_slice(&other.vertices[2..]);
        } else if self.vertices.last() == other.vertices.first() {
            self.edges.extend_from_slice(&other.edges);
            self.vertices.extend_from_slice(&other.vertices[1..]);
        } else {
            return Err(MergeError);
        }

        self.length += other.length;
        Ok(self)
    }
}
