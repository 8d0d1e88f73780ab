//! Rendering for the countdown screen.

use super::{App, Focus};
use crate::clock::Clock;
use crate::controller::RunState;
use crate::input::Meridiem;
use crate::validation::Field;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Width of a countdown box's content, wide enough for "Minutes".
const BOX_WIDTH: usize = 7;

/// Styles for the countdown screen.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Screen title.
    pub title: Style,
    /// Field labels.
    pub label: Style,
    /// Label of the focused control.
    pub focused_label: Style,
    /// Validation messages under a field.
    pub error: Style,
    /// The selected meridiem.
    pub meridiem_selected: Style,
    /// The other meridiem.
    pub meridiem_other: Style,
    /// An enabled button.
    pub button: Style,
    /// A disabled button.
    pub button_disabled: Style,
    /// Border around each countdown unit.
    pub unit_box: Style,
    /// The number inside a unit box.
    pub unit_value: Style,
    /// The unit name inside a unit box.
    pub unit_label: Style,
    /// Status line.
    pub message: Style,
    /// "Counting down to" line.
    pub target: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            title: Style::new()
                .foreground(Color::from("#FFFDF5"))
                .background(Color::from("#7D56F4"))
                .bold(true)
                .padding(0, 1, 0, 1),
            label: Style::new().foreground(Color::from("244")),
            focused_label: Style::new().foreground(Color::from("212")).bold(true),
            error: Style::new().foreground(Color::from("#FF5F87")),
            meridiem_selected: Style::new().foreground(Color::from("212")).bold(true),
            meridiem_other: Style::new().faint(true),
            button: Style::new()
                .foreground(Color::from("230"))
                .background(Color::from("62"))
                .padding(0, 1, 0, 1),
            button_disabled: Style::new().faint(true).padding(0, 1, 0, 1),
            unit_box: Style::new()
                .border_style(lipgloss::normal_border())
                .border_foreground(Color::from("#874BFD"))
                .padding(0, 1, 0, 1),
            unit_value: Style::new().bold(true),
            unit_label: Style::new().faint(true),
            message: Style::new().foreground(Color::from("#04B575")).bold(true),
            target: Style::new().faint(true),
        }
    }
}

impl<C: Clock> App<C> {
    /// Renders the whole screen.
    pub fn view(&self) -> String {
        let state = self.controller.state();
        let mut lines: Vec<String> = Vec::new();

        lines.push(self.styles.title.clone().render("⏳ Countdown Timer"));
        lines.push(String::new());

        lines.push(format!(
            "{} {}",
            self.label_view("Date", self.focus == Focus::Date),
            self.date.view()
        ));
        if let Some(error) = state.errors.get(Field::Date) {
            lines.push(self.error_view(error));
        }
        lines.push(format!(
            "{} {}  {}",
            self.label_view("Time", self.focus == Focus::Time),
            self.time.view(),
            self.meridiem_view(state.input.meridiem)
        ));
        if let Some(error) = state.errors.get(Field::Time) {
            lines.push(self.error_view(error));
        }
        lines.push(String::new());

        lines.push(self.buttons_view());
        lines.push(String::new());

        lines.push(self.countdown_view());

        if !state.message.is_empty() {
            lines.push(String::new());
            lines.push(
                self.styles
                    .message
                    .clone()
                    .inline(true)
                    .render(&state.message),
            );
        }
        if state.run_state == RunState::Running {
            if let Some(target) = self.controller.target() {
                lines.push(
                    self.styles
                        .target
                        .clone()
                        .inline(true)
                        .render(&format!("Counting down to {}", target)),
                );
            }
        }

        lines.push(String::new());
        lines.push(self.help.view(&self.keys));
        lines.join("\n")
    }

    fn label_view(&self, label: &str, focused: bool) -> String {
        let style = if focused {
            &self.styles.focused_label
        } else {
            &self.styles.label
        };
        style.clone().inline(true).render(&format!("{:<5}", label))
    }

    fn error_view(&self, error: &str) -> String {
        format!(
            "{:<6}{}",
            "",
            self.styles.error.clone().inline(true).render(error)
        )
    }

    fn meridiem_view(&self, selected: Meridiem) -> String {
        let focused = self.focus == Focus::Meridiem;
        let item = |meridiem: Meridiem| {
            let style = if meridiem == selected {
                &self.styles.meridiem_selected
            } else {
                &self.styles.meridiem_other
            };
            let text = if focused && meridiem == selected {
                format!("[{}]", meridiem)
            } else {
                format!(" {} ", meridiem)
            };
            style.clone().inline(true).render(&text)
        };
        format!("{}{}", item(Meridiem::Am), item(Meridiem::Pm))
    }

    fn buttons_view(&self) -> String {
        let button = |label: &str, enabled: bool| {
            let style = if enabled {
                &self.styles.button
            } else {
                &self.styles.button_disabled
            };
            style.clone().render(label)
        };
        let buttons = [
            button("Start", self.controller.can_start()),
            button("Stop", self.controller.can_stop()),
            button("Reset", true),
        ];
        let mut parts: Vec<&str> = Vec::new();
        for (i, b) in buttons.iter().enumerate() {
            if i > 0 {
                parts.push("  ");
            }
            parts.push(b.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    fn countdown_view(&self) -> String {
        let boxes: Vec<String> = self
            .controller
            .remaining()
            .labeled()
            .iter()
            .map(|(label, value)| {
                let content = format!(
                    "{}\n{}",
                    self.styles
                        .unit_value
                        .clone()
                        .inline(true)
                        .render(&format!("{:^width$}", value, width = BOX_WIDTH)),
                    self.styles
                        .unit_label
                        .clone()
                        .inline(true)
                        .render(&format!("{:^width$}", label, width = BOX_WIDTH))
                );
                self.styles.unit_box.clone().render(&content)
            })
            .collect();
        let parts: Vec<&str> = boxes.iter().map(String::as_str).collect();
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }
}
