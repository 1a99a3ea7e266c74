//! Instantiation graph and reversible depth-first navigation
//!
//! - [`kind`]: the closed set of instantiation event kinds
//! - [`location`]: points of instantiation in the traced source
//! - [`graph`]: arena-backed multigraph of entities and events
//! - [`state`]: traversal state and the rollback log
//!
//! # Navigation Model
//!
//! [`Metaprogram`] walks the graph depth-first, pre-order, one `step()` per
//! user command. A step either descends along the next enabled out-edge of the
//! current frame, or backtracks until it can. Every enabled event is entered
//! once per visit of its source, but only the first event to reach an entity
//! discovers it: an entity reached again (typically through a memoization
//! event) is entered as a leaf and its own events are not walked again.
//!
//! Every step pushes a [`state::StepRollback`] so `step_back()` restores the
//! previous state exactly, without replaying the walk from the start.

pub mod graph;
pub mod kind;
pub mod location;
pub mod state;

use graph::{EdgeId, InstantiationGraph, VertexId};
use kind::InstantiationKind;
use location::FileLocation;
use state::{RollbackLog, StepRollback, TraversalState};
use tracing::{debug, info};

/// One line of a forward trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardTraceEntry {
    /// Distance from the vertex the trace was started at, starting at 1
    pub depth: usize,
    pub edge: EdgeId,
    /// The target was already listed earlier, so its subtree is not repeated
    pub repeated: bool,
}

/// A traced metaprogram together with its navigation state
#[derive(Debug, Clone)]
pub struct Metaprogram {
    graph: InstantiationGraph,
    root_vertex: VertexId,
    evaluation_result: String,
    state: TraversalState,
    history: RollbackLog,
}

impl Metaprogram {
    /// Create a metaprogram holding only the root vertex
    pub fn new(root_name: impl Into<String>, evaluation_result: impl Into<String>) -> Self {
        let mut graph = InstantiationGraph::new();
        let root_vertex = graph.add_vertex(root_name);
        let state = TraversalState::new(graph.num_vertices(), root_vertex);
        Metaprogram {
            graph,
            root_vertex,
            evaluation_result: evaluation_result.into(),
            state,
            history: RollbackLog::new(),
        }
    }

    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexId {
        let vertex = self.graph.add_vertex(name);
        self.state.grow();
        vertex
    }

    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: InstantiationKind,
        point_of_instantiation: Option<FileLocation>,
    ) -> EdgeId {
        self.graph.add_edge(from, to, kind, point_of_instantiation)
    }

    pub fn evaluation_result(&self) -> &str {
        &self.evaluation_result
    }

    pub(crate) fn set_evaluation_result(&mut self, evaluation_result: String) {
        self.evaluation_result = evaluation_result;
    }

    pub fn root_vertex(&self) -> VertexId {
        self.root_vertex
    }

    pub fn graph(&self) -> &InstantiationGraph {
        &self.graph
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    /// Forget the step history and go back to the initial state. The graph,
    /// including which edges are disabled, is left as it is.
    pub fn reset_state(&mut self) {
        self.state = TraversalState::new(self.graph.num_vertices(), self.root_vertex);
        self.history.clear();
    }

    /// The walk has backtracked out of the root frame
    pub fn is_finished(&self) -> bool {
        self.state.edge_stack.is_empty()
    }

    /// No step has been taken since construction or the last reset
    pub fn is_at_start(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of steps that `step_back` can undo
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn discovered_count(&self) -> usize {
        self.state.discovered.iter().filter(|&&d| d).count()
    }

    /// Disable matching edges; see [`InstantiationGraph::disable_edges_if`]
    pub fn disable_edges_if<P>(&mut self, pred: P) -> usize
    where
        P: FnMut(&InstantiationGraph, EdgeId) -> bool,
    {
        let disabled = self.graph.disable_edges_if(pred);
        info!(disabled, "disabled instantiation events");
        disabled
    }

    pub fn disable_edges_of_kind(&mut self, kind: InstantiationKind) -> usize {
        self.disable_edges_if(|graph, edge| graph.edge(edge).kind == kind)
    }

    /// Disable every event whose target name contains `fragment`
    pub fn disable_edges_to(&mut self, fragment: &str) -> usize {
        self.disable_edges_if(|graph, edge| graph.vertex(graph.target(edge)).name.contains(fragment))
    }

    /// Advance the walk by one move. Does nothing once the walk is finished.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }

        let mut rollback = StepRollback::default();
        // The top frame was entered by the previous step, so none of its
        // events have been walked yet
        let mut resume_after: Option<EdgeId> = None;
        while let Some(&frame) = self.state.edge_stack.last() {
            let next = if resume_after.is_none() && self.is_leaf_frame(frame) {
                None
            } else {
                self.next_enabled_edge(self.frame_vertex(frame), resume_after)
            };
            if let Some(edge) = next {
                let target = self.graph.target(edge);
                rollback.descent = Some(self.state.descend(edge, target));
                break;
            }
            self.state.edge_stack.pop();
            rollback.popped_frames.push(frame);
            resume_after = frame;
        }

        debug!(
            popped = rollback.popped_frames.len(),
            depth = self.get_backtrace_length(),
            finished = self.is_finished(),
            "step"
        );
        self.history.push(rollback);
    }

    /// Undo the most recent step. Does nothing at the start.
    pub fn step_back(&mut self) {
        if let Some(rollback) = self.history.pop() {
            self.state.undo(rollback);
            debug!(depth = self.get_backtrace_length(), "step back");
        }
    }

    /// Step up to `n` times and return how many steps were taken
    pub fn step_n(&mut self, n: usize) -> usize {
        let mut taken = 0;
        while taken < n && !self.is_finished() {
            self.step();
            taken += 1;
        }
        taken
    }

    /// Step back up to `n` times and return how many steps were undone
    pub fn step_back_n(&mut self, n: usize) -> usize {
        let mut undone = 0;
        while undone < n && !self.is_at_start() {
            self.step_back();
            undone += 1;
        }
        undone
    }

    /// Step until the backtrace is no deeper than it is now, skipping over
    /// everything the current entity instantiates.
    pub fn step_over(&mut self) -> usize {
        let depth = self.get_backtrace_length();
        let mut taken = 0;
        loop {
            if self.is_finished() {
                break;
            }
            self.step();
            taken += 1;
            if self.get_backtrace_length() <= depth {
                break;
            }
        }
        taken
    }

    /// Step until the walk is finished
    pub fn continue_to_end(&mut self) -> usize {
        self.step_n(usize::MAX)
    }

    /// Undo every step taken so far
    pub fn rewind(&mut self) -> usize {
        self.step_back_n(usize::MAX)
    }

    pub fn current_vertex(&self) -> VertexId {
        match self.state.edge_stack.last() {
            Some(&frame) => self.frame_vertex(frame),
            None => self.root_vertex,
        }
    }

    pub fn current_edge(&self) -> Option<EdgeId> {
        self.state.edge_stack.last().copied().flatten()
    }

    /// Edges from the root to the current vertex
    pub fn backtrace(&self) -> Vec<EdgeId> {
        self.state.edge_stack.iter().flatten().copied().collect()
    }

    pub fn get_backtrace_length(&self) -> usize {
        self.state.edge_stack.iter().flatten().count()
    }

    /// Enabled events below `vertex` in depth-first pre-order.
    ///
    /// A vertex's subtree is listed only at its first occurrence; later
    /// occurrences are marked `repeated`. With `max_depth` the listing stops
    /// descending below that depth.
    pub fn forward_trace(
        &self,
        vertex: VertexId,
        max_depth: Option<usize>,
    ) -> Vec<ForwardTraceEntry> {
        let mut seen = vec![false; self.graph.num_vertices()];
        seen[vertex.index()] = true;

        let mut entries = Vec::new();
        // Explicit stack of (depth, edge) so deep traces cannot overflow
        let mut pending: Vec<(usize, EdgeId)> = self
            .enabled_out_edges(vertex)
            .rev()
            .map(|edge| (1, edge))
            .collect();

        while let Some((depth, edge)) = pending.pop() {
            let target = self.graph.target(edge);
            let repeated = seen[target.index()];
            entries.push(ForwardTraceEntry {
                depth,
                edge,
                repeated,
            });
            if repeated || max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            seen[target.index()] = true;
            pending.extend(self.enabled_out_edges(target).rev().map(|e| (depth + 1, e)));
        }
        entries
    }

    fn enabled_out_edges(&self, vertex: VertexId) -> impl DoubleEndedIterator<Item = EdgeId> + '_ {
        self.graph
            .out_edges(vertex)
            .iter()
            .copied()
            .filter(|&edge| self.graph.edge(edge).enabled)
    }

    fn frame_vertex(&self, frame: Option<EdgeId>) -> VertexId {
        frame.map_or(self.root_vertex, |edge| self.graph.target(edge))
    }

    /// A frame entered through an event whose target was already discovered
    fn is_leaf_frame(&self, frame: Option<EdgeId>) -> bool {
        frame.is_some_and(|edge| !self.state.is_discovering_frame(edge, self.graph.target(edge)))
    }

    /// First enabled out-edge of `vertex` after `previous` (or the first one)
    fn next_enabled_edge(&self, vertex: VertexId, previous: Option<EdgeId>) -> Option<EdgeId> {
        let out_edges = self.graph.out_edges(vertex);
        let start = previous
            .and_then(|prev| out_edges.iter().position(|&edge| edge == prev))
            .map_or(0, |index| index + 1);
        out_edges[start..]
            .iter()
            .copied()
            .find(|&edge| self.graph.edge(edge).enabled)
    }

    pub(crate) fn log_loaded(&self) {
        info!(
            vertices = self.graph.num_vertices(),
            edges = self.graph.num_edges(),
            "metaprogram loaded"
        );
    }
}
