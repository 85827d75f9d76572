mod app;
mod ui;

use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homebase::calculator::{compute, schedule, AmortizationResult, LoanQuote, ScheduleSummary};
use homebase::{Catalog, LocalGateway, Settings};

use crate::app::{App, Screen};
use crate::ui::ui;

#[derive(Parser)]
#[command(name = "homebase", version, about = "Browse homes, buy shares and run the numbers")]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listings file (JSON) to browse instead of the bundled catalog
    #[arg(short, long)]
    listings: Option<PathBuf>,

    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "homebase.log")]
    log_file: PathBuf,

    /// Start on the listings instead of the welcome flow
    #[arg(long)]
    skip_onboarding: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a loan estimate as JSON without starting the UI
    Quote {
        /// Property value
        #[arg(long)]
        value: f64,
        /// Down payment amount
        #[arg(long)]
        down: f64,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,
        /// Loan term in years
        #[arg(long, default_value_t = 30)]
        term: u32,
        /// Extra principal paid every month
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        /// Also write the amortization schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct QuoteReport {
    quote: LoanQuote,
    result: AmortizationResult,
    schedule: ScheduleSummary,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("homebase=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let settings = Settings::load(cli.config.as_deref())?;

    if let Some(Command::Quote {
        value,
        down,
        rate,
        term,
        extra,
        csv,
    }) = cli.command
    {
        return print_quote(value, down, rate, term, extra, csv.as_deref());
    }

    let catalog = match cli.listings.as_ref().or(settings.listings.as_ref()) {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    info!(listings = catalog.len(), "catalog ready");
    let gateway = LocalGateway::new(settings.media_dir.clone());

    let mut app = App::new(settings, catalog, Box::new(gateway));
    if cli.skip_onboarding {
        app.screen = Screen::Browse;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("{err:#}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                info!("bye");
                return Ok(());
            }
        }
    }
}

fn print_quote(
    value: f64,
    down: f64,
    rate: f64,
    term: u32,
    extra: f64,
    csv: Option<&Path>,
) -> Result<()> {
    let quote = LoanQuote::new(value, down, rate, term)?;
    let table = schedule(&quote, extra);

    if let Some(path) = csv {
        let file = File::create(path)
            .with_context(|| format!("could not create {}", path.display()))?;
        table.write_csv(BufWriter::new(file))?;
        info!(path = %path.display(), "exported schedule");
    }

    let report = QuoteReport {
        quote,
        result: compute(&quote),
        schedule: table.summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
