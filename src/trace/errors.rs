//! Trace loading errors
//!
//! Every failure while turning an event stream into a [`Metaprogram`] is a
//! [`TraceFormatError`]. Loading is all-or-nothing: when an error is returned,
//! no partially built graph escapes.
//!
//! [`Metaprogram`]: crate::metaprogram::Metaprogram

use super::record::{LocalId, TracePosition};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceFormatError {
    /// Unparseable framing: bad token, wrong arity, unterminated string
    #[error("syntax error at {position}: {message}")]
    Syntax {
        message: String,
        position: TracePosition,
    },

    #[error("unknown instantiation kind '{name}' at {position}")]
    UnknownKind {
        name: String,
        position: TracePosition,
    },

    /// An instantiation refers to an entity that was never declared
    #[error("entity {id} is used at {position} but was never declared")]
    UndeclaredEntity { id: LocalId, position: TracePosition },

    #[error("entity {id} is declared again at {position}")]
    DuplicateEntity { id: LocalId, position: TracePosition },

    #[error("entity id 0 is reserved for the root (declared at {position})")]
    ReservedEntity { position: TracePosition },

    #[error("record at {position} follows the evaluation result")]
    TrailingRecord { position: TracePosition },

    #[error("trace has no evaluation result")]
    MissingResult,

    /// A templight end event with no matching begin
    #[error("unbalanced TemplateEnd at {position}")]
    UnbalancedEnd { position: TracePosition },

    #[error("malformed templight element at {position}: {message}")]
    Templight {
        message: String,
        position: TracePosition,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceFormatError {
    pub(crate) fn syntax(message: impl Into<String>, position: TracePosition) -> Self {
        TraceFormatError::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Where in the input the error was detected, when known
    pub fn position(&self) -> Option<TracePosition> {
        match self {
            TraceFormatError::Syntax { position, .. }
            | TraceFormatError::UnknownKind { position, .. }
            | TraceFormatError::UndeclaredEntity { position, .. }
            | TraceFormatError::DuplicateEntity { position, .. }
            | TraceFormatError::ReservedEntity { position }
            | TraceFormatError::TrailingRecord { position }
            | TraceFormatError::UnbalancedEnd { position }
            | TraceFormatError::Templight { position, .. } => Some(*position),
            TraceFormatError::MissingResult
            | TraceFormatError::Xml(_)
            | TraceFormatError::Io(_) => None,
        }
    }
}
