use std::{
    fs::File,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use log::info;
use neuroscan_lib::{AnalysisSession, AnalyzerConfig};
use ratatui::{prelude::CrosstermBackend, Terminal};

mod app;
mod ui;

use app::App;

#[derive(Parser)]
#[command(author, version, about = "NeuroScan EEG upload panel for the terminal")]
struct Cli {
    /// Analyzer configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logging verbosity (e.g., debug, info, warn)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs here; the terminal is owned by the UI so logging is off otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for reproducible mock results
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level))
            .target(Target::Pipe(Box::new(file)))
            .init();
    }

    let config = AnalyzerConfig::load_or_default(args.config.as_deref())?.with_seed(args.seed);
    info!("starting NeuroScan TUI (delay {} ms)", config.analysis.delay_ms);
    let mut app = App::new(AnalysisSession::from_config(&config));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app);
    restore_terminal()?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(150);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("initializing terminal")
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
