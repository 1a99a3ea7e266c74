//! Forward trace pane: what the current entity goes on to instantiate
//!
//! Shows the enabled subtree below the current vertex as an indented tree.
//! Entities the walk has already discovered are dimmed; a repeated entity is
//! listed once more but not expanded again.

use super::utils::{edge_spans, pane_block, visible_window};
use crate::metaprogram::graph::EdgeId;
use crate::metaprogram::{ForwardTraceEntry, Metaprogram};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Step count, current edge and disabled-edge count the trace was built for
type CacheKey = (usize, Option<EdgeId>, usize);

/// Forward trace of the current vertex, rebuilt only when the cursor or the
/// filters move
#[derive(Debug, Default)]
pub struct ForwardTraceCache {
    key: Option<CacheKey>,
    entries: Vec<ForwardTraceEntry>,
    rebuilds: usize,
}

impl ForwardTraceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&mut self, metaprogram: &Metaprogram) -> &[ForwardTraceEntry] {
        let key = (
            metaprogram.history_len(),
            metaprogram.current_edge(),
            metaprogram.graph().num_disabled_edges(),
        );
        if self.key != Some(key) {
            self.entries = metaprogram.forward_trace(metaprogram.current_vertex(), None);
            self.key = Some(key);
            self.rebuilds += 1;
        }
        &self.entries
    }

    /// How many times the trace has been rebuilt
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

/// Render the forward trace pane
pub fn render_forward_pane(
    frame: &mut Frame,
    area: Rect,
    metaprogram: &Metaprogram,
    cache: &mut ForwardTraceCache,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let current = metaprogram.current_vertex();
    let graph = metaprogram.graph();
    let block = pane_block(" Forward Trace ", is_focused);

    if metaprogram.is_finished() {
        let paragraph = Paragraph::new("(metaprogram finished)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let entries = cache.entries(metaprogram);

    // Line 0 is the current entity, line i + 1 is entries[i]
    let visible_height = area.height.saturating_sub(2) as usize; // Account for borders
    let range = visible_window(entries.len() + 1, visible_height, scroll_offset);

    let mut items = Vec::with_capacity(range.len());
    for line in range {
        let Some(index) = line.checked_sub(1) else {
            items.push(ListItem::new(Line::from(Span::styled(
                graph.vertex(current).name.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.type_name)
                    .add_modifier(Modifier::BOLD),
            ))));
            continue;
        };

        let entry = entries[index];
        let target = graph.target(entry.edge);
        let mut spans = vec![Span::styled(
            format!("{}├ ", "│ ".repeat(entry.depth - 1)),
            Style::default().fg(DEFAULT_THEME.comment),
        )];
        spans.extend(edge_spans(metaprogram, entry.edge));
        if entry.repeated {
            spans.push(Span::styled(" …", Style::default().fg(DEFAULT_THEME.comment)));
        }

        let item = ListItem::new(Line::from(spans));
        items.push(if metaprogram.state().is_discovered(target) {
            item.style(Style::default().add_modifier(Modifier::DIM))
        } else {
            item
        });
    }

    frame.render_widget(List::new(items).block(block), area);
}
