//! focuslockd - terminal driver for the focus assistant
//!
//! Wires together:
//! - Configuration loading
//! - The focus engine (conversation, allowance lifecycle)
//! - The expiry ticker
//! - Line-based terminal input and plain-text output

mod commands;
mod render;
mod ticker;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Command, ContextField, HELP_TEXT, parse_command};
use focuslock_config::{Policy, load_config, load_config_or_default};
use focuslock_core::{CoreEvent, FocusEngine};
use focuslock_util::default_config_path;
use std::path::PathBuf;
use std::time::Duration;
use ticker::ExpiryTicker;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// focuslockd - a conversational gate in front of a locked device
#[derive(Parser, Debug)]
#[command(name = "focuslockd")]
#[command(about = "Conversational focus lock with timed allowances", long_about = None)]
struct Args {
    /// Configuration file path (default: $FOCUSLOCK_CONFIG or ~/.config/focuslock/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Seed for the encouragement phrase picker
    #[arg(long)]
    seed: Option<u64>,
}

/// Main driver state
struct Service {
    engine: FocusEngine,
    tick_interval: Duration,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let policy = load_policy(args.config.as_ref())?;

        let now = focuslock_util::now();
        let engine = match args.seed {
            Some(seed) => FocusEngine::with_seed(&policy, seed, now),
            None => FocusEngine::new(&policy, now),
        };

        Ok(Self {
            engine,
            tick_interval: policy.service.tick_interval,
        })
    }

    async fn run(mut self) -> Result<()> {
        let mut sigterm = signal(SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;
        let mut sigint = signal(SignalKind::interrupt())
            .context("Failed to install SIGINT handler")?;

        let mut ticker = ExpiryTicker::start(self.tick_interval);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        for message in self.engine.history() {
            println!("{}", render::render_message(message));
        }

        info!("focuslockd running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down");
                    break;
                }
                Some(now) = ticker.next() => {
                    if let Some(event) = self.engine.tick(now) {
                        log_event(&event);
                        self.print_latest(1);
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read from stdin")? else {
                        debug!("stdin closed");
                        break;
                    };
                    if !self.handle_line(&line) {
                        break;
                    }
                }
            }
        }

        info!("focuslockd stopped");
        Ok(())
    }

    /// Handle one input line. Returns `false` when the driver should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Bad input");
                println!("错误：{}", e);
                return true;
            }
        };

        let now = focuslock_util::now();

        match command {
            Command::Say(text) => {
                let before = self.engine.history().len();
                let outcome = self.engine.submit(&text, now);
                for event in &outcome.events {
                    log_event(event);
                }
                self.print_since(before, !text.is_empty());
            }
            Command::Screenshot(description) => {
                let outcome = self.engine.analyze_screenshot(&description, now);
                if let Some(event) = &outcome.event {
                    log_event(event);
                }
                self.print_latest(1);
            }
            Command::Lock => match self.engine.lock(now) {
                Some(event) => {
                    log_event(&event);
                    self.print_latest(1);
                }
                None => println!("{}", self.engine.status().label()),
            },
            Command::Status => {
                println!(
                    "{}",
                    render::render_status(
                        &now,
                        self.engine.status(),
                        self.engine.allowance(),
                        self.engine.remaining(now),
                    )
                );
            }
            Command::History => {
                for message in self.engine.history() {
                    println!("{}", render::render_message(message));
                }
            }
            Command::Reset => {
                self.engine.reset(now);
                self.print_latest(1);
            }
            Command::ShowContext => {
                println!("{}", render::render_context(self.engine.context()));
            }
            Command::Set { field, value } => {
                if field == ContextField::Time {
                    // A hand-set time stays until the next /set time
                    self.engine.set_auto_current_time(value.trim().is_empty());
                }
                field.apply(self.engine.context_mut(), value);
                println!("{}", render::render_context(self.engine.context()));
            }
            Command::Help => println!("{}", HELP_TEXT),
            Command::Quit => return false,
        }

        true
    }

    /// Print the last `count` history entries
    fn print_latest(&self, count: usize) {
        let history = self.engine.history();
        let start = history.len().saturating_sub(count);
        for message in &history[start..] {
            println!("{}", render::render_message(message));
        }
    }

    /// Print entries appended since `before`, skipping the echoed user message
    fn print_since(&self, before: usize, skip_user_echo: bool) {
        let start = if skip_user_echo { before + 1 } else { before };
        for message in self.engine.history().iter().skip(start) {
            println!("{}", render::render_message(message));
        }
    }
}

fn load_policy(explicit: Option<&PathBuf>) -> Result<Policy> {
    let policy = match explicit {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let path = default_config_path();
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    info!(
        tick_interval_ms = policy.service.tick_interval.as_millis() as u64,
        auto_current_time = policy.service.auto_current_time,
        encouragement_count = policy.phrases.encouragement.len(),
        "Configuration loaded"
    );

    Ok(policy)
}

fn log_event(event: &CoreEvent) {
    match event {
        CoreEvent::Unlocked {
            scenario,
            duration_minutes,
            expires_at,
            extended,
        } => info!(
            scenario = %scenario,
            duration_minutes = ?duration_minutes,
            expires_at = ?expires_at,
            extended,
            "Unlocked"
        ),
        CoreEvent::Locked { scenario, reason } => {
            info!(scenario = %scenario, reason = ?reason, "Locked")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "focuslockd starting");

    if focuslock_util::is_mock_time_active() {
        warn!("Mock time is active");
    }

    let service = Service::new(&args)?;
    service.run().await
}
