//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`backtrace`]: root-to-current chain of instantiation events, innermost first
//! - [`forward`]: enabled subtree below the current entity
//! - [`event`]: details of the current event plus graph statistics
//! - [`status`]: status bar with keybindings and stepping state
//! - `utils`: block styling, scrolling and event formatting shared by the panes
//!
//! Each pane module exports one `render_*` function that reads the
//! [`Metaprogram`](crate::metaprogram::Metaprogram) and never mutates it.

mod utils;

pub mod backtrace;
pub mod event;
pub mod forward;
pub mod status;

// Re-export render functions for convenience
pub use backtrace::render_backtrace_pane;
pub use event::render_event_pane;
pub use forward::{render_forward_pane, ForwardTraceCache};
pub use status::{render_status_bar, StatusRenderData};
