//! Instantiation graph storage
//!
//! Vertices (entities) and edges (instantiation events) live in two arenas and
//! are addressed by dense integer handles. Nothing is ever removed, so a handle
//! stays valid for the lifetime of the graph that issued it. Passing a handle
//! from another graph, or one that was never issued, is a contract violation
//! and panics on the index.

use super::kind::InstantiationKind;
use super::location::FileLocation;
use std::fmt;

/// Handle of a vertex in an [`InstantiationGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle of an edge in an [`InstantiationGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexProperty {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeProperty {
    pub kind: InstantiationKind,
    /// `None` for synthetic events that have no source position
    pub point_of_instantiation: Option<FileLocation>,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
struct VertexEntry {
    property: VertexProperty,
    out_edges: Vec<EdgeId>,
    in_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeEntry {
    source: VertexId,
    target: VertexId,
    property: EdgeProperty,
}

/// Directed multigraph of entities and the events that instantiated them
#[derive(Debug, Clone, Default)]
pub struct InstantiationGraph {
    vertices: Vec<VertexEntry>,
    edges: Vec<EdgeEntry>,
}

impl InstantiationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex. The returned handle is greater than every earlier one.
    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(VertexEntry {
            property: VertexProperty { name: name.into() },
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        });
        id
    }

    /// Append an enabled edge from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint was not issued by this graph.
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: InstantiationKind,
        point_of_instantiation: Option<FileLocation>,
    ) -> EdgeId {
        assert!(
            from.0 < self.vertices.len() && to.0 < self.vertices.len(),
            "edge endpoints {} -> {} out of range (graph has {} vertices)",
            from,
            to,
            self.vertices.len()
        );

        let id = EdgeId(self.edges.len());
        self.edges.push(EdgeEntry {
            source: from,
            target: to,
            property: EdgeProperty {
                kind,
                point_of_instantiation,
                enabled: true,
            },
        });
        self.vertices[from.0].out_edges.push(id);
        self.vertices[to.0].in_edges.push(id);
        id
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, vertex: VertexId) -> &VertexProperty {
        &self.vertices[vertex.0].property
    }

    pub fn vertex_mut(&mut self, vertex: VertexId) -> &mut VertexProperty {
        &mut self.vertices[vertex.0].property
    }

    pub fn edge(&self, edge: EdgeId) -> &EdgeProperty {
        &self.edges[edge.0].property
    }

    pub fn edge_mut(&mut self, edge: EdgeId) -> &mut EdgeProperty {
        &mut self.edges[edge.0].property
    }

    pub fn source(&self, edge: EdgeId) -> VertexId {
        self.edges[edge.0].source
    }

    pub fn target(&self, edge: EdgeId) -> VertexId {
        self.edges[edge.0].target
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    /// Outgoing edges in the order they were recorded
    pub fn out_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.vertices[vertex.0].out_edges
    }

    pub fn in_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.vertices[vertex.0].in_edges
    }

    /// Disable every edge the predicate holds for and return how many were
    /// newly disabled.
    ///
    /// Matches are collected before any flag changes, so the predicate always
    /// sees the graph as it was when the call started. Disabled edges are never
    /// re-enabled.
    pub fn disable_edges_if<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&InstantiationGraph, EdgeId) -> bool,
    {
        let matching: Vec<EdgeId> = self
            .edges()
            .filter(|&edge| self.edge(edge).enabled && pred(self, edge))
            .collect();

        for &edge in &matching {
            self.edges[edge.0].property.enabled = false;
        }
        matching.len()
    }

    pub fn num_disabled_edges(&self) -> usize {
        self.edges.iter().filter(|e| !e.property.enabled).count()
    }
}
