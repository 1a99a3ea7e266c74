//! Trace loading
//!
//! Turns a recorded instantiation trace into a ready-to-navigate
//! [`Metaprogram`]:
//! - [`lexer`] and [`parse`]: the line-oriented text record format
//! - [`templight`]: templight XML, lowered to the same records
//! - [`builder`]: applies records to a graph and checks their consistency
//! - [`errors`]: [`TraceFormatError`]
//!
//! # Format Detection
//!
//! Input whose first non-blank character is `<` is treated as templight XML,
//! anything else as text records.

pub mod builder;
pub mod errors;
pub mod lexer;
pub mod parse;
pub mod record;
pub mod templight;

pub use errors::TraceFormatError;
pub use record::{TracePosition, TraceRecord};

use crate::metaprogram::Metaprogram;
use builder::TraceBuilder;
use parse::RecordParser;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Supported trace encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Records,
    Templight,
}

impl TraceFormat {
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('<') {
            TraceFormat::Templight
        } else {
            TraceFormat::Records
        }
    }
}

/// Loads traces into metaprograms
#[derive(Debug, Clone)]
pub struct TraceLoader {
    root_name: String,
    evaluation_result: Option<String>,
}

impl TraceLoader {
    pub fn new(root_name: impl Into<String>) -> Self {
        TraceLoader {
            root_name: root_name.into(),
            evaluation_result: None,
        }
    }

    /// Use this evaluation result instead of the trace's own `result` record
    pub fn with_evaluation_result(mut self, evaluation_result: impl Into<String>) -> Self {
        self.evaluation_result = Some(evaluation_result.into());
        self
    }

    pub fn from_str(&self, text: &str) -> Result<Metaprogram, TraceFormatError> {
        let format = TraceFormat::detect(text);
        debug!(?format, bytes = text.len(), "loading trace");

        let records = match format {
            TraceFormat::Records => RecordParser::new(text)?.parse_records()?,
            TraceFormat::Templight => templight::lower(text)?,
        };

        let mut builder = TraceBuilder::new(&self.root_name);
        for (record, position) in records {
            builder.record(record, position)?;
        }

        // Templight traces carry no result of their own
        let evaluation_result = match (format, &self.evaluation_result) {
            (TraceFormat::Templight, None) => Some(String::new()),
            (_, explicit) => explicit.clone(),
        };
        builder.finish(evaluation_result)
    }

    /// Read the whole stream, then load it
    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<Metaprogram, TraceFormatError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.from_str(&text)
    }

    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<Metaprogram, TraceFormatError> {
        let text = fs::read_to_string(path)?;
        self.from_str(&text)
    }
}
