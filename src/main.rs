use anyhow::{Context, Result};
use bubbletea_rs::Program;
use clap::Parser;
use countdown_tea::app::{set_launch_options, App, LaunchOptions};
use countdown_tea::cli::{Cli, Command, ConfigArgs};
use countdown_tea::clock::SystemClock;
use countdown_tea::config::Config;
use countdown_tea::controller::TimerController;
use countdown_tea::error::Error;
use countdown_tea::headless;
use countdown_tea::logging::{self, LogTarget};
use countdown_tea::scheduler::TokioScheduler;
use std::path::Path;
use std::process::ExitCode;

/// Exit status when the countdown target is rejected.
const EXIT_INVALID_TARGET: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(Command::Config(args)) = &cli.command {
        config_command(args, cli.config.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let loaded = Config::load_from(cli.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_target = match (&cli.log_file, cli.headless) {
        (Some(path), _) => Some(LogTarget::File(path.clone())),
        (None, true) => Some(LogTarget::Stderr),
        (None, false) => logging::default_log_path().ok().map(LogTarget::File),
    };
    if let Some(target) = &log_target {
        if let Err(err) = logging::init(target, config.log_level.as_deref()) {
            if cli.headless {
                eprintln!("warning: logging disabled: {err}");
            }
        }
    }
    if let Err(err) = &loaded {
        tracing::warn!(error = %err, "using default configuration");
    }

    if cli.headless {
        run_headless(cli, config).await
    } else {
        run_screen(cli, config).await
    }
}

async fn run_screen(cli: Cli, config: Config) -> Result<ExitCode> {
    let options = LaunchOptions {
        date: cli.date,
        time: cli.time,
        meridiem: cli.meridiem,
        default_meridiem: config.default_meridiem,
        autostart: cli.start,
        alarm: config.alarm,
        silent: cli.silent,
    };
    if set_launch_options(options).is_err() {
        anyhow::bail!("launch options were already set");
    }

    tracing::info!("opening countdown screen");
    let program = Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()
        .context("failed to set up the terminal")?;
    program.run().await.context("countdown screen failed")?;
    Ok(ExitCode::SUCCESS)
}

async fn run_headless(cli: Cli, config: Config) -> Result<ExitCode> {
    let (scheduler, mut ticks) = TokioScheduler::new();
    let mut controller =
        TimerController::new(SystemClock, scheduler, config.alarm.build(cli.silent));
    controller.set_date(cli.date.unwrap_or_default());
    controller.set_time(cli.time.unwrap_or_default());
    controller.set_meridiem(cli.meridiem.unwrap_or(config.default_meridiem));

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    let mut stdout = std::io::stdout();
    match headless::run(&mut controller, &mut ticks, &mut stdout, shutdown).await {
        Ok(state) => {
            tracing::info!(%state, "headless countdown finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            Ok(ExitCode::from(EXIT_INVALID_TARGET))
        }
        Err(err) => Err(err.into()),
    }
}

fn config_command(args: &ConfigArgs, path: Option<&Path>) -> Result<()> {
    let file = match path {
        Some(path) => path.to_path_buf(),
        None => Config::path()?,
    };
    if args.init {
        Config::default().store_path(&file)?;
        println!("wrote default configuration to {}", file.display());
    }
    if args.path || !args.init {
        println!("{}", file.display());
    }
    Ok(())
}
