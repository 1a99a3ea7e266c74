//! Backtrace pane: why the current entity is being instantiated
//!
//! Frames are listed innermost first, like a debugger call stack. Frame `#0` is
//! the current event; the last line is always the root.

use super::utils::{edge_spans, location_text, pane_block, visible_window};
use crate::metaprogram::Metaprogram;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Render the backtrace pane
pub fn render_backtrace_pane(
    frame: &mut Frame,
    area: Rect,
    metaprogram: &Metaprogram,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let backtrace = metaprogram.backtrace();
    let title = format!(" Backtrace ({}) ", backtrace.len());
    let block = pane_block(&title, is_focused);

    let mut items: Vec<ListItem> = backtrace
        .iter()
        .rev()
        .enumerate()
        .map(|(index, &edge)| {
            let marker_style = if index == 0 {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(format!("#{:<3}", index), marker_style)];
            spans.extend(edge_spans(metaprogram, edge));
            spans.push(Span::styled(
                format!("  at {}", location_text(metaprogram, edge)),
                Style::default().fg(DEFAULT_THEME.location),
            ));

            let item = ListItem::new(Line::from(spans));
            if index == 0 {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    let root_name = &metaprogram.graph().vertex(metaprogram.root_vertex()).name;
    items.push(ListItem::new(Line::from(vec![
        Span::styled(
            format!("#{:<3}", backtrace.len()),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(root_name.clone(), Style::default().fg(DEFAULT_THEME.primary)),
    ])));

    let visible_height = area.height.saturating_sub(2) as usize; // Account for borders
    let range = visible_window(items.len(), visible_height, scroll_offset);
    let visible_items: Vec<ListItem> = items.into_iter().skip(range.start).take(range.len()).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
