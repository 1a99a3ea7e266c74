//! Abstract trace records shared by every input format

use crate::metaprogram::kind::InstantiationKind;
use crate::metaprogram::location::FileLocation;
use std::fmt;

/// Entity identifier local to one trace. `0` is always the root.
pub type LocalId = u64;

/// Local id that refers to the root vertex
pub const ROOT_ID: LocalId = 0;

/// Line and column in the trace input, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracePosition {
    pub line: usize,
    pub column: usize,
}

impl TracePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for TracePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// One record of the event stream a tracing tool produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    /// Declares a new entity
    Entity { id: LocalId, name: String },

    /// Processing `source` triggered an instantiation of `target`
    Instantiation {
        source: LocalId,
        target: LocalId,
        kind: InstantiationKind,
        point_of_instantiation: Option<FileLocation>,
    },

    /// Final evaluation result; must be the last record
    Result(String),
}
