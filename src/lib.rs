//! # Introduction
//!
//! metastep loads a recorded trace of C++ template instantiations and lets you
//! walk it like a program: step into the next instantiation, step back out,
//! see why the current entity is being instantiated, and hide whole classes of
//! events the way a debugger uses breakpoints.
//!
//! ## Pipeline
//!
//! ```text
//! Trace (text records | templight XML) → Records → Metaprogram → TUI
//! ```
//!
//! 1. [`trace`]: parses the trace into records and builds the graph.
//! 2. [`metaprogram`]: the instantiation graph plus its reversible
//!    depth-first cursor. Every step is undoable exactly, so stepping back
//!    never replays the walk.
//! 3. [`logging`]: optional log file for the `tracing` events of the above.
//! 4. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use metastep::trace::TraceLoader;
//!
//! let trace = r#"
//! entity 1 "fib<1>"
//! instantiation 0 1 TemplateInstantiation "main.cpp" 3 12
//! result "int_<1>"
//! "#;
//!
//! let mut mp = TraceLoader::new("<root>").from_str(trace).unwrap();
//! mp.step();
//! assert_eq!(mp.graph().vertex(mp.current_vertex()).name, "fib<1>");
//! mp.step_back();
//! assert!(mp.is_at_start());
//! ```

pub mod logging;
pub mod metaprogram;
pub mod trace;
pub mod ui;
