//! Key bindings for the countdown screen.

use crate::key::{Binding, KeyMap as HelpKeyMap, KeyPress};
use crossterm::event::{KeyCode, KeyModifiers};

/// Bindings for every screen action.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Validate and start counting down.
    pub start: Binding,
    /// Stop a running countdown.
    pub stop: Binding,
    /// Clear everything.
    pub reset: Binding,
    /// Focus the next control.
    pub next_field: Binding,
    /// Focus the previous control.
    pub prev_field: Binding,
    /// Switch between AM and PM.
    pub toggle_meridiem: Binding,
    /// Show or hide the full help.
    pub help: Binding,
    /// Leave the program.
    pub quit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        let ctrl = |c| KeyPress::from((KeyCode::Char(c), KeyModifiers::CONTROL));
        Self {
            start: Binding::new(vec![KeyPress::from(KeyCode::Enter), ctrl('s')])
                .with_help("enter", "start"),
            stop: Binding::new(vec![KeyCode::Char('x')]).with_help("x", "stop"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            next_field: Binding::new(vec![KeyCode::Tab, KeyCode::Down])
                .with_help("tab", "next field"),
            prev_field: Binding::new(vec![
                KeyPress::from((KeyCode::BackTab, KeyModifiers::SHIFT)),
                KeyPress::from(KeyCode::BackTab),
                KeyPress::from(KeyCode::Up),
            ])
            .with_help("shift+tab", "prev field"),
            toggle_meridiem: Binding::new(vec![KeyCode::Char('m')]).with_help("m", "am/pm"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
            quit: Binding::new(vec![
                KeyPress::from(KeyCode::Char('q')),
                KeyPress::from(KeyCode::Esc),
                ctrl('c'),
            ])
            .with_help("q", "quit"),
        }
    }
}

impl KeyMap {
    /// Enables Start and Stop to match what the countdown allows.
    pub fn update_enabled(&mut self, can_start: bool, can_stop: bool) {
        self.start.set_enabled(can_start);
        self.stop.set_enabled(can_stop);
    }
}

impl HelpKeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.start, &self.stop, &self.reset, &self.help, &self.quit]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.start, &self.stop, &self.reset],
            vec![&self.next_field, &self.prev_field, &self.toggle_meridiem],
            vec![&self.help, &self.quit],
        ]
    }
}
