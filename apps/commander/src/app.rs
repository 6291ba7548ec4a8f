//! Commander application state machine.
//!
//! Tracks what the operator is looking at and what they have typed. No I/O
//! happens here: key handling returns an [`AppAction`] that the event loop
//! executes against the fleet manager.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::log::StatusLog;

/// Preset broadcast commands, bound to the number keys.
pub const PRESET_COMMANDS: &[(&str, &str)] = &[
    (
        "Fetch focused window",
        "dumpsys window | grep -E 'mCurrentFocus|mFocusedApp'",
    ),
    ("List running processes", "ps"),
    (
        "Get device info",
        "getprop ro.product.model && getprop ro.build.version.release",
    ),
];

/// Whether keys go to navigation or to the command input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

/// An action the event loop should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Scan,
    Broadcast(String),
}

/// Top-level UI state.
pub struct App {
    pub input_mode: InputMode,
    pub command_input: String,
    /// Index of the highlighted fleet row.
    pub selected: usize,
    pub log: StatusLog,
}

impl App {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            input_mode: InputMode::Normal,
            command_input: String::new(),
            selected: 0,
            log: StatusLog::new(log_capacity),
        }
    }

    /// Routes a key press. `fleet_len` bounds row selection.
    pub fn handle_key(&mut self, key: KeyEvent, fleet_len: usize) -> Option<AppAction> {
        // Ctrl-C always quits, regardless of mode.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppAction::Quit);
        }

        match self.input_mode {
            InputMode::Command => self.handle_command_key(key),
            InputMode::Normal => self.handle_normal_key(key, fleet_len),
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let command = std::mem::take(&mut self.command_input);
                let command = command.trim();
                if command.is_empty() {
                    None
                } else {
                    Some(AppAction::Broadcast(command.to_string()))
                }
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.command_input.clear();
                None
            }
            KeyCode::Backspace => {
                self.command_input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent, fleet_len: usize) -> Option<AppAction> {
        match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),
            KeyCode::Char('r') => Some(AppAction::Scan),
            KeyCode::Char('c') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                None
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                PRESET_COMMANDS
                    .get(index)
                    .map(|(_, command)| AppAction::Broadcast(command.to_string()))
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if fleet_len > 0 && self.selected + 1 < fleet_len {
                    self.selected += 1;
                }
                None
            }
            _ => None,
        }
    }

    /// Keeps the selection valid as the fleet grows and shrinks.
    pub fn clamp_selection(&mut self, fleet_len: usize) {
        if fleet_len == 0 {
            self.selected = 0;
        } else if self.selected >= fleet_len {
            self.selected = fleet_len - 1;
        }
    }
}
