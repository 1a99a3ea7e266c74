//! Main TUI application state and logic

use crate::metaprogram::kind::InstantiationKind;
use crate::metaprogram::Metaprogram;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Backtrace,
    Forward,
    Event,
}

impl FocusedPane {
    /// Move focus to the next pane (backtrace -> forward -> event)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Backtrace => FocusedPane::Forward,
            FocusedPane::Forward => FocusedPane::Event,
            FocusedPane::Event => FocusedPane::Backtrace,
        }
    }
}

/// The main application state
pub struct App {
    pub metaprogram: Metaprogram,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub backtrace_scroll: usize,
    pub forward_scroll: usize,

    /// Forward trace of the current vertex, kept between redraws
    forward_cache: super::panes::ForwardTraceCache,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,

    /// Text typed into the filter prompt; `None` while the prompt is closed
    pub filter_input: Option<String>,
}

impl App {
    pub fn new(metaprogram: Metaprogram) -> Self {
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        App {
            metaprogram,
            focused_pane: FocusedPane::Backtrace,
            backtrace_scroll: 0,
            forward_scroll: 0,
            forward_cache: super::panes::ForwardTraceCache::new(),
            should_quit: false,
            status_message: String::from("Metaprogram started"),
            is_playing: false,
            last_play_time: long_ago,
            last_space_press: long_ago,
            filter_input: None,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.metaprogram.is_finished() {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                } else {
                    self.metaprogram.step();
                    self.status_message = "Playing...".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Backtrace (top) | Event (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        super::panes::render_backtrace_pane(
            frame,
            left_rows[0],
            &self.metaprogram,
            self.focused_pane == FocusedPane::Backtrace,
            &mut self.backtrace_scroll,
        );

        super::panes::render_event_pane(
            frame,
            left_rows[1],
            &self.metaprogram,
            self.focused_pane == FocusedPane::Event,
        );

        super::panes::render_forward_pane(
            frame,
            columns[1],
            &self.metaprogram,
            &mut self.forward_cache,
            self.focused_pane == FocusedPane::Forward,
            &mut self.forward_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            super::panes::StatusRenderData {
                message: &self.status_message,
                step: self.metaprogram.history_len(),
                depth: self.metaprogram.get_backtrace_length(),
                is_at_start: self.metaprogram.is_at_start(),
                is_finished: self.metaprogram.is_finished(),
                is_playing: self.is_playing,
                filter_input: self.filter_input.as_deref(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.filter_input.is_some() {
            self.handle_filter_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let stepped = self.metaprogram.step_n(n);
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.scroll_to_current();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Char('s') => {
                self.is_playing = false;
                let stepped = self.metaprogram.step_over();
                self.status_message = format!("Stepped over {} step(s)", stepped);
                self.scroll_to_current();
            }
            KeyCode::Char('m') => {
                let disabled = self
                    .metaprogram
                    .disable_edges_of_kind(InstantiationKind::Memoization);
                self.status_message = format!("Disabled {} memoization event(s)", disabled);
            }
            KeyCode::Char('/') => {
                self.is_playing = false;
                self.filter_input = Some(String::new());
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Backtrace => {
                    self.backtrace_scroll = self.backtrace_scroll.saturating_sub(1);
                }
                FocusedPane::Forward => {
                    self.forward_scroll = self.forward_scroll.saturating_sub(1);
                }
                FocusedPane::Event => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Backtrace => {
                    self.backtrace_scroll = self.backtrace_scroll.saturating_add(1);
                }
                FocusedPane::Forward => {
                    self.forward_scroll = self.forward_scroll.saturating_add(1);
                }
                FocusedPane::Event => {}
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let stepped = self.metaprogram.continue_to_end();
                self.status_message = format!("Metaprogram finished after {} step(s)", stepped);
                self.scroll_to_current();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.metaprogram.rewind();
                self.status_message = "Jumped to start".to_string();
                self.scroll_to_current();
            }
            _ => {}
        }
    }

    /// Keys while the filter prompt is open
    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(input) = self.filter_input.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => {
                self.filter_input = None;
                self.status_message = "Filter cancelled".to_string();
            }
            KeyCode::Enter => {
                let fragment = self.filter_input.take().unwrap_or_default();
                let fragment = fragment.trim();
                if fragment.is_empty() {
                    self.status_message = "Filter cancelled".to_string();
                } else {
                    let disabled = self.metaprogram.disable_edges_to(fragment);
                    self.status_message =
                        format!("Disabled {} event(s) matching \"{}\"", disabled, fragment);
                }
            }
            _ => {}
        }
    }

    /// Step forward in the metaprogram
    fn step_forward(&mut self) {
        if self.metaprogram.is_finished() {
            self.status_message = "Metaprogram finished".to_string();
            return;
        }
        self.metaprogram.step();
        self.status_message = if self.metaprogram.is_finished() {
            "Metaprogram finished".to_string()
        } else {
            "Stepped forward".to_string()
        };
        self.scroll_to_current();
    }

    /// Step backward in the metaprogram
    fn step_backward(&mut self) {
        if self.metaprogram.is_at_start() {
            self.status_message = "Metaprogram is at the start".to_string();
            return;
        }
        self.metaprogram.step_back();
        self.status_message = "Stepped backward".to_string();
        self.scroll_to_current();
    }

    /// The current frame is drawn first in both trace panes
    fn scroll_to_current(&mut self) {
        self.backtrace_scroll = 0;
        self.forward_scroll = 0;
    }
}
