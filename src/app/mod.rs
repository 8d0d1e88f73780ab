//! The interactive countdown screen.
//!
//! [`App`] wires a [`TimerController`] to bubbletea-rs. Ticks come from a
//! [`CommandScheduler`]: starting the countdown hands the first tick command
//! to the program, and every [`TickMsg`] for the live schedule is answered
//! with the next one. Ticks for a cancelled schedule get no answer, so the
//! chain ends by itself after stop, reset or expiry.
//!
//! Since [`bubbletea_rs::Model::init`] takes no arguments, command-line
//! choices reach the screen through [`set_launch_options`], called once
//! before the program starts.

pub mod field;
pub mod keymap;
pub mod view;


pub use field::{FieldKind, Model as EntryField};
pub use keymap::KeyMap;
pub use view::Styles;

use crate::alarm::Alarm;
use crate::clock::{Clock, SystemClock};
use crate::config::AlarmConfig;
use crate::controller::TimerController;
use crate::help;
use crate::input::Meridiem;
use crate::scheduler::{CommandScheduler, TickMsg};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use crossterm::event::KeyCode;
use once_cell::sync::OnceCell;
use tracing::debug;

static LAUNCH_OPTIONS: OnceCell<LaunchOptions> = OnceCell::new();

/// Choices made on the command line before the screen opens.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Initial date text.
    pub date: Option<String>,
    /// Initial time text.
    pub time: Option<String>,
    /// Initial meridiem, instead of the configured one.
    pub meridiem: Option<Meridiem>,
    /// Meridiem selected when the screen opens.
    pub default_meridiem: Meridiem,
    /// Press Start as soon as the screen opens.
    pub autostart: bool,
    /// How to sound the alarm.
    pub alarm: AlarmConfig,
    /// Make no sound regardless of `alarm`.
    pub silent: bool,
}

/// Stores the options the next [`App::init`] will use.
///
/// Only the first call has an effect; later calls get their options back.
pub fn set_launch_options(options: LaunchOptions) -> Result<(), LaunchOptions> {
    LAUNCH_OPTIONS.set(options)
}

/// The options stored by [`set_launch_options`], or the defaults.
pub fn launch_options() -> LaunchOptions {
    LAUNCH_OPTIONS.get().cloned().unwrap_or_default()
}

/// The control that receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The date field.
    #[default]
    Date,
    /// The time field.
    Time,
    /// The AM/PM selector.
    Meridiem,
}

impl Focus {
    /// The control after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Focus::Date => Focus::Time,
            Focus::Time => Focus::Meridiem,
            Focus::Meridiem => Focus::Date,
        }
    }

    /// The control before this one, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Focus::Date => Focus::Meridiem,
            Focus::Time => Focus::Date,
            Focus::Meridiem => Focus::Time,
        }
    }
}

/// The controller type driven by the screen.
pub type AppController<C> = TimerController<C, CommandScheduler, Box<dyn Alarm + Send>>;

/// The countdown screen.
pub struct App<C: Clock = SystemClock> {
    controller: AppController<C>,
    date: EntryField,
    time: EntryField,
    focus: Focus,
    keys: KeyMap,
    help: help::Model,
    /// Styling.
    pub styles: Styles,
}

impl<C: Clock> App<C> {
    /// Creates the screen with the date field focused.
    pub fn new(clock: C, alarm: Box<dyn Alarm + Send>, options: &LaunchOptions) -> Self {
        let mut controller = TimerController::new(clock, CommandScheduler::new(), alarm);
        controller.set_meridiem(options.meridiem.unwrap_or(options.default_meridiem));

        let mut date = EntryField::new(FieldKind::Date);
        let mut time = EntryField::new(FieldKind::Time);
        if let Some(value) = &options.date {
            date.set_value(value);
        }
        if let Some(value) = &options.time {
            time.set_value(value);
        }
        date.focus();

        let mut app = Self {
            controller,
            date,
            time,
            focus: Focus::Date,
            keys: KeyMap::default(),
            help: help::Model::new(),
            styles: Styles::default(),
        };
        app.sync_input();
        app.sync_keys();
        app
    }

    /// The countdown behind the screen.
    pub fn controller(&self) -> &AppController<C> {
        &self.controller
    }

    /// The focused control.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The key bindings, with Start and Stop enabled as the countdown allows.
    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    /// Whether the full help is shown.
    pub fn show_all_help(&self) -> bool {
        self.help.show_all
    }

    /// Handles any program message.
    pub fn handle(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            return self.handle_tick(tick);
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.help.width = size.width as usize;
        }
        None
    }

    /// Advances the countdown for a firing and re-arms the live schedule.
    pub fn handle_tick(&mut self, tick: &TickMsg) -> Option<Cmd> {
        self.controller.on_fire(tick.handle);
        self.sync_keys();
        self.controller.scheduler_mut().rearm(tick.handle)
    }

    /// Applies a key press.
    pub fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if self.keys.quit.matches(key) {
            return Some(bubbletea_rs::quit());
        }
        if self.keys.help.matches(key) {
            self.help.show_all = !self.help.show_all;
            return None;
        }
        if self.keys.start.matches(key) {
            return self.start();
        }
        if self.keys.stop.matches(key) {
            self.controller.stop();
            self.sync_keys();
            return None;
        }
        if self.keys.reset.matches(key) {
            self.reset();
            return None;
        }
        if self.keys.next_field.matches(key) {
            self.set_focus(self.focus.next());
            return None;
        }
        if self.keys.prev_field.matches(key) {
            self.set_focus(self.focus.prev());
            return None;
        }
        if self.keys.toggle_meridiem.matches(key) {
            self.toggle_meridiem();
            return None;
        }

        match self.focus {
            Focus::Date => {
                if self.date.update(key) {
                    self.sync_input();
                }
            }
            Focus::Time => {
                if self.time.update(key) {
                    self.sync_input();
                }
            }
            Focus::Meridiem => match key.key {
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => self.toggle_meridiem(),
                KeyCode::Char('a') | KeyCode::Char('A') => {
                    self.controller.set_meridiem(Meridiem::Am)
                }
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    self.controller.set_meridiem(Meridiem::Pm)
                }
                _ => {}
            },
        }
        None
    }

    /// Presses Start. Returns the first tick command when the input was valid.
    pub fn start(&mut self) -> Option<Cmd> {
        self.sync_input();
        let cmd = match self.controller.start() {
            Ok(_) => self.controller.scheduler_mut().take_command(),
            Err(errors) => {
                debug!(%errors, "start refused");
                None
            }
        };
        self.sync_keys();
        cmd
    }

    /// Presses Reset: clears the countdown and both fields.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.date.reset();
        self.time.reset();
        self.set_focus(Focus::Date);
        self.sync_keys();
    }

    fn toggle_meridiem(&mut self) {
        let meridiem = self.controller.input().meridiem.toggle();
        self.controller.set_meridiem(meridiem);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.date.blur();
        self.time.blur();
        match focus {
            Focus::Date => {
                self.date.focus();
            }
            Focus::Time => {
                self.time.focus();
            }
            Focus::Meridiem => {}
        }
    }

    fn sync_input(&mut self) {
        self.controller.set_date(self.date.value());
        self.controller.set_time(self.time.value());
    }

    fn sync_keys(&mut self) {
        self.keys
            .update_enabled(self.controller.can_start(), self.controller.can_stop());
    }
}

impl BubbleTeaModel for App<SystemClock> {
    fn init() -> (Self, Option<Cmd>) {
        let options = launch_options();
        let alarm = options.alarm.build(options.silent);
        let mut app = App::new(SystemClock, alarm, &options);
        let cmd = if options.autostart { app.start() } else { None };
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.handle(&msg)
    }

    fn view(&self) -> String {
        App::view(self)
    }
}
