//! Command-line arguments.

use crate::input::Meridiem;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Count down to a local date and time.
#[derive(Parser, Debug)]
#[command(name = "countdown")]
#[command(about = "Count down to a local date and time")]
#[command(version)]
pub struct Cli {
    /// Target date, YYYY-MM-DD
    #[arg(short, long)]
    pub date: Option<String>,

    /// Target time, HH:MM on a 12-hour clock
    #[arg(short, long)]
    pub time: Option<String>,

    /// AM or PM
    #[arg(short, long)]
    pub meridiem: Option<Meridiem>,

    /// Start counting down immediately
    #[arg(short, long)]
    pub start: bool,

    /// Print the countdown line by line instead of opening the screen
    #[arg(long)]
    pub headless: bool,

    /// Do not sound the alarm
    #[arg(long)]
    pub silent: bool,

    /// Configuration file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Subcommand, if any.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments of `countdown config`.
#[derive(Args, Debug, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Print the configuration file path
    #[arg(long)]
    pub path: bool,

    /// Write the default configuration, replacing the current file
    #[arg(long)]
    pub init: bool,
}
