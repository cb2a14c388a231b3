//! Dex TUI Entry Point
//!
//! Usage:
//!   dex-tui [OPTIONS] [QUERY]
//!
//! Options:
//!   --config <PATH>            Config file (default: $XDG_CONFIG_HOME/dex/dex.toml)
//!   --api-url <URL>            Data service base URL
//!   --frame-interval-ms <MS>   Sprite frame interval
//!   --mute                     Never play cries
//!
//! Logs go to the file named by `DEX_LOG_FILE`, filtered by `RUST_LOG`.
//! Without it nothing is logged, since the terminal is in raw mode.

use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dex_core::{load_config, load_config_from_path, ConfigOverrides, DexConfig};
use dex_tui::App;

/// Look up a creature, watch it turn around, hear its cry
#[derive(Debug, Parser)]
#[command(name = "dex-tui", version, about)]
struct Args {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Data service base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Milliseconds between sprite frames
    #[arg(long, value_name = "MS")]
    frame_interval_ms: Option<u64>,

    /// Never play cries
    #[arg(long)]
    mute: bool,

    /// Name or number to look up at startup
    query: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new().with_mute(self.mute);
        if let Some(ref url) = self.api_url {
            overrides = overrides.with_api_url(url.clone());
        }
        if let Some(ms) = self.frame_interval_ms {
            overrides = overrides.with_frame_interval_ms(ms);
        }
        overrides
    }
}

fn init_logging() -> anyhow::Result<()> {
    let Some(path) = std::env::var_os("DEX_LOG_FILE") else {
        return Ok(());
    };

    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", PathBuf::from(&path).display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

fn resolve_config(args: &Args) -> anyhow::Result<DexConfig> {
    let mut config = match args.config {
        Some(ref path) => load_config_from_path(Some(path.clone()))?,
        None => load_config()?,
    };
    args.overrides().apply(&mut config);
    config.validate()?;

    tracing::info!(
        api_url = %config.api_url,
        frame_interval_ms = config.frame_interval.as_millis(),
        audio = config.audio_enabled,
        source = %config.source(),
        "Configuration resolved"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging()?;
    let config = resolve_config(&args)?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: dex-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or ssh ran without -t.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &config, args.query).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &DexConfig,
    initial_query: Option<String>,
) -> anyhow::Result<()> {
    let mut app = App::new(config, initial_query)?;
    app.run(terminal).await
}
