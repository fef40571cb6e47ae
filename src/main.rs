use anyhow::Result;
use clap::Parser;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sales_dashboard::api::ProductClient;
use sales_dashboard::data_fetcher::DataFetcher;
use sales_dashboard::models::{Config, MonthCode};
use sales_dashboard::ui::{self, ControlsView, DashboardApp, DashboardState};

#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", about = "Terminal dashboard for product transactions")]
struct Cli {
    /// Base URL of the product API
    #[arg(long)]
    api_base_url: Option<String>,

    /// Month to open with, 01-12
    #[arg(short, long)]
    month: Option<MonthCode>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,

    /// Fetch once, print the rendered dashboard and exit
    #[arg(long)]
    snapshot: bool,

    /// Snapshot width in columns
    #[arg(long, default_value_t = 120)]
    width: u16,

    /// Snapshot height in rows
    #[arg(long, default_value_t = 40)]
    height: u16,
}

impl Cli {
    /// Command line flags win over the environment
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(month) = self.month {
            config.initial_month = month;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        config
    }
}

/// Initialize logging - suppress most logs while the TUI owns the terminal
fn init_logging(log_file: Option<&str>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sales_dashboard=info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sales_dashboard=error"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("❌ Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.log_file.as_deref())?;
    info!("Using product API at {}", config.api_base_url);

    let client = ProductClient::new(&config)?;
    let fetcher = DataFetcher::new(Arc::new(client));

    if cli.snapshot {
        return print_snapshot(&fetcher, config.initial_month, cli.width, cli.height).await;
    }

    let app = DashboardApp::new(fetcher, config.initial_month);
    if let Err(e) = ui::run_app(app).await {
        error!("TUI error: {}", e);
        eprintln!("❌ TUI Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Non-interactive mode for pipes and CI
async fn print_snapshot(fetcher: &DataFetcher, month: MonthCode, width: u16, height: u16) -> Result<()> {
    let mut state = DashboardState::new(month);
    fetcher.refresh(&mut state).await;

    let screen = ui::render_to_string(&state, &ControlsView::default(), width, height)?;
    println!("{}", screen);

    if state.error().is_some() {
        anyhow::bail!("dashboard data could not be fetched");
    }
    Ok(())
}
