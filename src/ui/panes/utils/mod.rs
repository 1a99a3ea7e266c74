//! Helpers shared by the panes

use crate::metaprogram::graph::EdgeId;
use crate::metaprogram::Metaprogram;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

/// Bordered block with the focus highlight applied
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `offset` so the last page stays full, returning the visible range
pub(crate) fn visible_window(total_items: usize, visible_height: usize, offset: &mut usize) -> std::ops::Range<usize> {
    let visible_height = visible_height.max(1);
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
    *offset..(*offset + visible_height).min(total_items)
}

/// `Name (Kind)` spans for one event, dimmed when the event is disabled
pub(crate) fn edge_spans(metaprogram: &Metaprogram, edge: EdgeId) -> Vec<Span<'static>> {
    let graph = metaprogram.graph();
    let property = graph.edge(edge);
    let name = graph.vertex(graph.target(edge)).name.clone();

    let (name_style, kind_style) = if property.enabled {
        (
            Style::default().fg(DEFAULT_THEME.type_name),
            Style::default().fg(DEFAULT_THEME.kind),
        )
    } else {
        (
            Style::default()
                .fg(DEFAULT_THEME.disabled)
                .add_modifier(Modifier::CROSSED_OUT),
            Style::default().fg(DEFAULT_THEME.disabled),
        )
    };

    vec![
        Span::styled(name, name_style),
        Span::styled(format!(" ({})", property.kind), kind_style),
    ]
}

/// Point of instantiation as text, `-` when the event has none
pub(crate) fn location_text(metaprogram: &Metaprogram, edge: EdgeId) -> String {
    metaprogram
        .graph()
        .edge(edge)
        .point_of_instantiation
        .as_ref()
        .map_or_else(|| "-".to_string(), |loc| loc.to_string())
}
