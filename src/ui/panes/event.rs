//! Event details pane

use super::utils::{location_text, pane_block};
use crate::metaprogram::Metaprogram;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph, Wrap},
    Frame,
};

/// Render the current event, the evaluation result and graph statistics
pub fn render_event_pane(frame: &mut Frame, area: Rect, metaprogram: &Metaprogram, is_focused: bool) {
    let block = pane_block(" Event ", is_focused).padding(Padding::new(1, 0, 0, 0));
    let graph = metaprogram.graph();

    let label = |text: &'static str| Span::styled(text, Style::default().fg(DEFAULT_THEME.comment));
    let mut lines = Vec::new();

    match metaprogram.current_edge() {
        Some(edge) => {
            let property = graph.edge(edge);
            lines.push(Line::from(vec![
                label("Entity:   "),
                Span::styled(
                    graph.vertex(graph.target(edge)).name.clone(),
                    Style::default()
                        .fg(DEFAULT_THEME.type_name)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(vec![
                label("Kind:     "),
                Span::styled(property.kind.to_string(), Style::default().fg(DEFAULT_THEME.kind)),
            ]));
            lines.push(Line::from(vec![
                label("Source:   "),
                Span::styled(
                    graph.vertex(graph.source(edge)).name.clone(),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
            ]));
            lines.push(Line::from(vec![
                label("At:       "),
                Span::styled(
                    location_text(metaprogram, edge),
                    Style::default().fg(DEFAULT_THEME.location),
                ),
            ]));
        }
        None => {
            let text = if metaprogram.is_finished() {
                "Metaprogram finished"
            } else {
                "Metaprogram started"
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(DEFAULT_THEME.fg))));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        label("Result:   "),
        Span::styled(
            metaprogram.evaluation_result().to_string(),
            Style::default().fg(DEFAULT_THEME.result),
        ),
    ]));
    lines.push(Line::from(vec![
        label("Graph:    "),
        Span::styled(
            format!(
                "{} entities, {} events ({} disabled), {} discovered",
                graph.num_vertices(),
                graph.num_edges(),
                graph.num_disabled_edges(),
                metaprogram.discovered_count()
            ),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
    ]));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
