use anyhow::{Context, Result};
use calnotes_core::models::WeekStart;
use calnotes_tui::{config::load_config, App, EventHandler};
use clap::Parser;
use crossterm::{
    execute,
    event::{EnableMouseCapture, DisableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CALNOTES_LOG";

#[derive(Parser, Debug)]
#[command(name = "calnotes")]
#[command(about = "Month calendar with per-day notes in the terminal", version)]
struct Cli {
    /// Config file (default: <config dir>/calnotes/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file (default: <data dir>/calnotes/calnotes.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Event poll interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 250)]
    tick_rate: u64,

    /// First day of the week, overrides the config file
    #[arg(long, value_name = "DAY", value_parser = parse_week_start)]
    week_start: Option<WeekStart>,
}

fn parse_week_start(s: &str) -> std::result::Result<WeekStart, String> {
    s.parse().map_err(|e: calnotes_core::Error| e.to_string())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("calnotes").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("calnotes.toml"))
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("calnotes").join("calnotes.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("calnotes.log"))
}

/// Send tracing output to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;

    // Config problems are reported before the terminal switches modes
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)?;
    if let Some(week_start) = cli.week_start {
        config.calendar.week_start = week_start;
    }
    let mut app = App::new(config)?;
    info!(config = %config_path.display(), version = env!("CARGO_PKG_VERSION"), "starting");

    // Leave the terminal usable if anything panics mid-frame
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(cli.tick_rate);

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    restore_terminal()?;
    terminal.show_cursor()?;

    info!(notes = app.notes.len(), "exiting");
    report_exit(result)
}

/// Log a failed run and hand the error back so the process exits non-zero
fn report_exit(result: Result<()>) -> Result<()> {
    if let Err(err) = &result {
        error!(error = %err, "exited with error");
    }
    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| calnotes_tui::ui::render(f, app))?;

        // Handle events
        match event_handler.next()? {
            calnotes_tui::Event::Key(key) => {
                calnotes_tui::event::handle_key_event(key, app);
            }
            calnotes_tui::Event::Mouse(mouse) => {
                calnotes_tui::event::handle_mouse_event(mouse, app);
            }
            calnotes_tui::Event::Tick => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
