//! contact-tui - Terminal contact form
//!
//! A Ratatui-based contact form that validates input locally and hands
//! submissions to a form relay service or to a `/api/contact` endpoint.
//! `contact-tui serve` runs that endpoint.

mod api;
mod app;
mod config;
mod platform;
mod state;
mod transport;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use config::ContactConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::SubmissionStatus;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "contact-tui.log";

const AFTER_HELP: &str = "\
Configuration:
  The form sends through a Web3Forms-compatible relay by default, which
  needs an access key. Set `access_key` in the config file (create it with
  `contact-tui init-config`) or export CONTACT_TUI_ACCESS_KEY. Use
  CONTACT_TUI_TRANSPORT=endpoint to post to `contact-tui serve` instead.

Logs:
  While the form is open, logs go to contact-tui.log in the local data
  directory. `serve` and `init-config` log to stderr.";

#[derive(Debug, Parser)]
#[command(
    name = "contact-tui",
    version,
    about = "Terminal contact form",
    after_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the contact endpoint instead of the form
    Serve {
        /// Listen address, overrides the configured one
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Write the current configuration to the config file
    InitConfig,
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    /// The form owns the terminal, so logs go to a file in this directory
    File(PathBuf),
    Discard,
}

impl LogTarget {
    fn for_command(command: Option<&Command>, log_dir: Option<PathBuf>) -> Self {
        match (command, log_dir) {
            (Some(_), _) => Self::Stderr,
            (None, Some(dir)) => Self::File(dir),
            (None, None) => Self::Discard,
        }
    }
}

/// Install the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
fn init_logging(target: &LogTarget) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(io::stderr), None),
        LogTarget::File(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        LogTarget::Discard => (BoxMakeWriter::new(io::sink), None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contact_tui=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(*target == LogTarget::Stderr),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_target = LogTarget::for_command(cli.command.as_ref(), ContactConfig::log_dir());
    let _log_guard = init_logging(&log_target)?;

    let config = ContactConfig::load().context("failed to load configuration")?;

    match cli.command {
        Some(Command::Serve { bind }) => {
            let addr = match bind {
                Some(addr) => addr,
                None => config.bind_address()?,
            };
            api::serve(addr).await
        }
        Some(Command::InitConfig) => {
            match config.save()? {
                Some(path) => {
                    println!("Wrote {}", path.display());
                    if config.require_access_key().is_err() {
                        println!(
                            "Set \"access_key\" there (or CONTACT_TUI_ACCESS_KEY) before sending through the relay."
                        );
                    }
                }
                None => eprintln!("No config directory available on this platform"),
            }
            Ok(())
        }
        None => run_tui(&config).await,
    }
}

async fn run_tui(config: &ContactConfig) -> Result<()> {
    // Fail before touching the terminal when the backend is misconfigured
    let transport = transport::from_config(config)?;
    let mut app = App::new(config, transport);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Errors surface from main once the terminal is restored
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll faster while the spinner label or the success countdown is visible
        let poll_duration = match app.pipeline.status() {
            SubmissionStatus::Submitting | SubmissionStatus::Succeeded => {
                Duration::from_millis(50)
            }
            SubmissionStatus::Idle => Duration::from_millis(100),
        };

        // Handle crossterm events
        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    // Global quit: Ctrl+C
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    app.handle_key(key)?;
                }
            }
        }

        // Apply finished submissions and the success reset
        app.tick(Instant::now());

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
