//! Turns the terminal event stream into one input snapshot per frame.
//!
//! Instead of acting on each key event individually, the tracker records the
//! time of the last press/repeat of every key. A key is "held" while that
//! timestamp is fresh, or until its release event on terminals that report
//! releases (kitty keyboard protocol). Fire and start are edge-triggered: a
//! press of a key that was not already held.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use glam::Vec2;

use crate::geometry::Viewport;

/// How long a press/repeat keeps a key held without a release event. Covers
/// the OS key-repeat interval (≥ 15 Hz once repeating).
const HOLD_WINDOW_MS: u64 = 140;

/// Everything the game needs to know about input for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire key went down since the previous frame.
    pub fire: bool,
    /// Pointer position in world coordinates, once the terminal reported one.
    pub pointer: Option<Vec2>,
    pub pointer_down: bool,
    /// Enter went down since the previous frame (menu Start shortcut).
    pub start: bool,
    /// Quit signal (Ctrl+C, Esc, Q).
    pub quit: bool,
}

#[derive(Debug)]
pub struct InputTracker {
    /// Maps each held key to the time it was last seen (press or repeat).
    key_seen: HashMap<KeyCode, u64>,
    release_events: bool,
    fire: bool,
    start: bool,
    quit: bool,
    pointer_cell: Option<(u16, u16)>,
    pointer_down: bool,
}

impl InputTracker {
    /// `release_events`: the terminal reports key releases, so held keys do
    /// not need the hold window.
    pub fn new(release_events: bool) -> Self {
        Self {
            key_seen: HashMap::new(),
            release_events,
            fire: false,
            start: false,
            quit: false,
            pointer_cell: None,
            pointer_down: false,
        }
    }

    pub fn handle(&mut self, event: &Event, now: u64) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) => self.handle_key(*code, *kind, *modifiers, now),
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                self.pointer_cell = Some((*column, *row));
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.pointer_down = true,
                    MouseEventKind::Up(MouseButton::Left) => self.pointer_down = false,
                    _ => {}
                }
            }
            Event::FocusLost => {
                self.key_seen.clear();
                self.pointer_down = false;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers, now: u64) {
        match kind {
            KeyEventKind::Press => {
                let was_held = self.is_held(&code, now);
                self.key_seen.insert(code, now);
                match code {
                    KeyCode::Char('c') | KeyCode::Char('C')
                        if modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        self.quit = true;
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
                    KeyCode::Char(' ') if !was_held => self.fire = true,
                    KeyCode::Enter if !was_held => self.start = true,
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.key_seen.insert(code, now);
            }
            KeyEventKind::Release => {
                self.key_seen.remove(&code);
            }
        }
    }

    fn is_held(&self, key: &KeyCode, now: u64) -> bool {
        self.key_seen
            .get(key)
            .map(|&last| self.release_events || now.saturating_sub(last) <= HOLD_WINDOW_MS)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], now: u64) -> bool {
        keys.iter().any(|k| self.is_held(k, now))
    }

    /// Current state; edge-triggered flags are consumed.
    pub fn snapshot(&mut self, now: u64, viewport: &Viewport) -> FrameInput {
        FrameInput {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], now),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], now),
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], now),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], now),
            fire: std::mem::take(&mut self.fire),
            pointer: self
                .pointer_cell
                .map(|(col, row)| viewport.cell_to_world(col, row)),
            pointer_down: self.pointer_down,
            start: std::mem::take(&mut self.start),
            quit: std::mem::take(&mut self.quit),
        }
    }
}
