//! Traversal state and the rollback log that makes stepping reversible
//!
//! A forward step changes the state in two ways: it may pop any number of
//! exhausted frames off the edge stack, and it may then descend along one edge.
//! Descending into an entity that is already discovered pushes a leaf frame and
//! leaves `discovered` and `parent_edge` alone.
//! [`StepRollback`] records exactly those edits, so undoing a step is a matter
//! of replaying them in reverse instead of restoring a snapshot.

use super::graph::{EdgeId, VertexId};

/// Depth-first search state over one graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalState {
    pub(crate) discovered: Vec<bool>,
    pub(crate) parent_edge: Vec<Option<EdgeId>>,
    /// Recursion stack. The bottom entry is `None`, the root frame; every
    /// other entry is the edge that entered that frame.
    pub(crate) edge_stack: Vec<Option<EdgeId>>,
}

impl TraversalState {
    /// Fresh state: only `root` discovered, only the root frame on the stack
    pub fn new(num_vertices: usize, root: VertexId) -> Self {
        let mut discovered = vec![false; num_vertices];
        discovered[root.index()] = true;
        Self {
            discovered,
            parent_edge: vec![None; num_vertices],
            edge_stack: vec![None],
        }
    }

    pub fn discovered(&self) -> &[bool] {
        &self.discovered
    }

    pub fn is_discovered(&self, vertex: VertexId) -> bool {
        self.discovered[vertex.index()]
    }

    pub fn parent_edge(&self) -> &[Option<EdgeId>] {
        &self.parent_edge
    }

    pub fn edge_stack(&self) -> &[Option<EdgeId>] {
        &self.edge_stack
    }

    /// Make room for a vertex added after the state was created
    pub(crate) fn grow(&mut self) {
        self.discovered.push(false);
        self.parent_edge.push(None);
    }

    /// Enter `target` through `edge`, returning the record needed to undo it.
    ///
    /// An undiscovered `target` is discovered with `edge` as its parent edge.
    /// A discovered one is entered as a leaf.
    pub(crate) fn descend(&mut self, edge: EdgeId, target: VertexId) -> Descent {
        let discovery = if self.discovered[target.index()] {
            None
        } else {
            self.discovered[target.index()] = true;
            Some(Discovery {
                vertex: target,
                previous_parent_edge: self.parent_edge[target.index()].replace(edge),
            })
        };
        self.edge_stack.push(Some(edge));
        Descent { edge, discovery }
    }

    /// Whether the frame entered through `edge` discovered its target
    pub(crate) fn is_discovering_frame(&self, edge: EdgeId, target: VertexId) -> bool {
        self.parent_edge[target.index()] == Some(edge)
    }

    /// Apply the exact inverse of one forward step
    pub(crate) fn undo(&mut self, rollback: StepRollback) {
        if let Some(descent) = rollback.descent {
            let pushed = self.edge_stack.pop();
            debug_assert_eq!(pushed, Some(Some(descent.edge)));
            if let Some(discovery) = descent.discovery {
                self.discovered[discovery.vertex.index()] = false;
                self.parent_edge[discovery.vertex.index()] = discovery.previous_parent_edge;
            }
        }

        for frame in rollback.popped_frames.into_iter().rev() {
            self.edge_stack.push(frame);
        }
    }
}

/// The descent half of a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descent {
    pub edge: EdgeId,
    /// `None` when the target was already discovered
    pub discovery: Option<Discovery>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub vertex: VertexId,
    pub previous_parent_edge: Option<EdgeId>,
}

/// Everything one `step()` changed, in enough detail to invert it exactly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepRollback {
    /// Frames popped while backtracking, in pop order
    pub popped_frames: Vec<Option<EdgeId>>,
    pub descent: Option<Descent>,
}

/// Stack of rollback records, one per forward step taken
#[derive(Debug, Clone, Default)]
pub struct RollbackLog {
    entries: Vec<StepRollback>,
}

impl RollbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rollback: StepRollback) {
        self.entries.push(rollback);
    }

    pub fn pop(&mut self) -> Option<StepRollback> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
