//! Single-line entry field for the date and time.
//!
//! Only the characters a field can hold are accepted, and the separator is
//! filled in as digits are typed at the end, so `20311231` becomes
//! `2031-12-31`.

use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;

/// What a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `YYYY-MM-DD`.
    Date,
    /// `H:MM` or `HH:MM`.
    Time,
}

impl FieldKind {
    /// Label shown before the field.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Date => "Date",
            FieldKind::Time => "Time",
        }
    }

    /// Hint shown while the field is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            FieldKind::Date => "YYYY-MM-DD",
            FieldKind::Time => "HH:MM",
        }
    }

    /// Maximum number of characters.
    pub fn char_limit(self) -> usize {
        self.placeholder().len()
    }

    fn separator(self) -> char {
        match self {
            FieldKind::Date => '-',
            FieldKind::Time => ':',
        }
    }

    /// Lengths at which a typed digit is preceded by the separator.
    fn separator_slots(self) -> &'static [usize] {
        match self {
            FieldKind::Date => &[4, 7],
            FieldKind::Time => &[2],
        }
    }

    fn accepts(self, c: char) -> bool {
        c.is_ascii_digit() || c == self.separator()
    }
}

/// An entry field.
#[derive(Debug, Clone)]
pub struct Model {
    kind: FieldKind,
    value: Vec<char>,
    pos: usize,
    focus: bool,
    /// Style of the entered text.
    pub text_style: Style,
    /// Style of the placeholder.
    pub placeholder_style: Style,
    /// Style of the character under the cursor.
    pub cursor_style: Style,
}

impl Model {
    /// Creates an empty, blurred field.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: Vec::new(),
            pos: 0,
            focus: false,
            text_style: Style::new(),
            placeholder_style: Style::new().faint(true),
            cursor_style: Style::new().reverse(true),
        }
    }

    /// What the field holds.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The entered text.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replaces the text, dropping characters the field does not accept,
    /// and moves the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value
            .chars()
            .filter(|c| self.kind.accepts(*c))
            .take(self.kind.char_limit())
            .collect();
        self.pos = self.value.len();
    }

    /// Cursor position in characters.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Empties the field.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Applies a key press. Returns `true` if the text changed.
    pub fn update(&mut self, msg: &KeyMsg) -> bool {
        if !self.focus {
            return false;
        }
        match (msg.key, msg.modifiers) {
            (KeyCode::Left, _) => {
                self.pos = self.pos.saturating_sub(1);
                false
            }
            (KeyCode::Right, _) => {
                self.pos = (self.pos + 1).min(self.value.len());
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.pos = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.pos = self.value.len();
                false
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let changed = self.pos > 0;
                self.value.drain(..self.pos);
                self.pos = 0;
                changed
            }
            (KeyCode::Backspace, _) => {
                if self.pos == 0 {
                    return false;
                }
                self.pos -= 1;
                self.value.remove(self.pos);
                true
            }
            (KeyCode::Delete, _) => {
                if self.pos >= self.value.len() {
                    return false;
                }
                self.value.remove(self.pos);
                true
            }
            (KeyCode::Char(c), mods) if !mods.contains(KeyModifiers::CONTROL) => self.insert(c),
            _ => false,
        }
    }

    fn insert(&mut self, c: char) -> bool {
        if !self.kind.accepts(c) {
            return false;
        }
        let at_end = self.pos == self.value.len();
        let separators = self
            .value
            .iter()
            .filter(|v| **v == self.kind.separator())
            .count();
        let slot = self.kind.separator_slots().iter().position(|s| *s == self.value.len());
        if at_end && c.is_ascii_digit() && slot == Some(separators) {
            self.value.push(self.kind.separator());
            self.pos += 1;
        }
        if self.value.len() >= self.kind.char_limit() {
            return false;
        }
        self.value.insert(self.pos, c);
        self.pos += 1;
        true
    }

    /// Renders the field, with a block cursor while focused.
    pub fn view(&self) -> String {
        if self.value.is_empty() {
            let placeholder = self.kind.placeholder();
            if !self.focus {
                return self
                    .placeholder_style
                    .clone()
                    .inline(true)
                    .render(placeholder);
            }
            let mut chars = placeholder.chars();
            let first = chars.next().map(String::from).unwrap_or_default();
            let rest: String = chars.collect();
            return format!(
                "{}{}",
                self.cursor_style.clone().inline(true).render(&first),
                self.placeholder_style.clone().inline(true).render(&rest)
            );
        }

        if !self.focus {
            return self.text_style.clone().inline(true).render(&self.value());
        }
        let before: String = self.value[..self.pos].iter().collect();
        let under: String = self
            .value
            .get(self.pos)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = self
            .value
            .get(self.pos + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();
        format!(
            "{}{}{}",
            self.text_style.clone().inline(true).render(&before),
            self.cursor_style.clone().inline(true).render(&under),
            self.text_style.clone().inline(true).render(&after)
        )
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut Model, code: KeyCode) -> bool {
        field.update(&KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn type_str(field: &mut Model, s: &str) {
        for c in s.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    fn focused(kind: FieldKind) -> Model {
        let mut field = Model::new(kind);
        field.focus();
        field
    }

    #[test]
    fn test_date_separators_filled_in() {
        let mut field = focused(FieldKind::Date);
        type_str(&mut field, "20311231");
        assert_eq!(field.value(), "2031-12-31");
    }

    #[test]
    fn test_typed_separator_not_doubled() {
        let mut field = focused(FieldKind::Date);
        type_str(&mut field, "2031-12-31");
        assert_eq!(field.value(), "2031-12-31");
    }

    #[test]
    fn test_time_short_hour() {
        let mut field = focused(FieldKind::Time);
        type_str(&mut field, "9:30");
        assert_eq!(field.value(), "9:30");

        let mut field = focused(FieldKind::Time);
        type_str(&mut field, "0930");
        assert_eq!(field.value(), "09:30");
    }

    #[test]
    fn test_rejects_letters_and_limit() {
        let mut field = focused(FieldKind::Time);
        assert!(!press(&mut field, KeyCode::Char('x')));
        type_str(&mut field, "123456");
        assert_eq!(field.value(), "12:34");
    }

    #[test]
    fn test_blurred_field_ignores_keys() {
        let mut field = Model::new(FieldKind::Date);
        assert!(!press(&mut field, KeyCode::Char('2')));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_editing_keys() {
        let mut field = focused(FieldKind::Time);
        type_str(&mut field, "10:45");
        assert!(press(&mut field, KeyCode::Backspace));
        assert_eq!(field.value(), "10:4");

        press(&mut field, KeyCode::Home);
        assert_eq!(field.position(), 0);
        assert!(press(&mut field, KeyCode::Delete));
        assert_eq!(field.value(), "0:4");

        press(&mut field, KeyCode::End);
        field.update(&KeyMsg {
            key: KeyCode::Char('u'),
            modifiers: KeyModifiers::CONTROL,
        });
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_set_value_filters() {
        let mut field = Model::new(FieldKind::Date);
        field.set_value("2031/01/02xyz");
        assert_eq!(field.value(), "20310102");
        assert_eq!(field.position(), 8);

        field.reset();
        assert_eq!(field.value(), "");
        assert_eq!(field.position(), 0);
    }

    #[test]
    fn test_view_placeholder_and_value() {
        let plain = |s: String| String::from_utf8(strip_ansi_escapes::strip(s)).unwrap();

        let mut field = Model::new(FieldKind::Date);
        assert_eq!(plain(field.view()), "YYYY-MM-DD");

        field.set_value("2031-01-02");
        assert_eq!(plain(field.view()), "2031-01-02");

        field.focus();
        assert_eq!(plain(field.view()), "2031-01-02 ");
    }
}
