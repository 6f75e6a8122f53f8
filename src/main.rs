use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use configuration::{Config, LoggingSettings, StoreBackend};
use core_types::YearRange;
use dashboard::{DashboardSession, DashboardView};
use dataset::DatasetProvider;
use events::DashboardEvent;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use watchlist::{Mutation, Watchlist};

mod render;

/// The main entry point for the sales dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(backend) = cli.store {
        config.store.backend = backend;
    }

    // Keep the guard alive so buffered log lines are flushed on exit.
    let _guard = init_tracing(&config.logging)?;

    match cli.command {
        Commands::Show(args) => handle_show(config, args).await,
        Commands::Watchlist { action } => handle_watchlist(config, action).await,
        Commands::Serve(args) => web_server::run_server(config, args.addr).await,
        Commands::Interactive => handle_interactive(config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A yearly sales dashboard with a stock watchlist.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `store.backend` from the configuration.
    #[arg(long, global = true, value_enum)]
    store: Option<StoreBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for a year range.
    Show(ShowArgs),
    /// Inspect or edit the watchlist.
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
    /// Serve the dashboard as a JSON API.
    Serve(ServeArgs),
    /// Drive the dashboard with line commands read from stdin.
    Interactive,
}

#[derive(Args)]
struct ShowArgs {
    /// First year of the range (defaults to the configured start).
    #[arg(long)]
    from: Option<i32>,

    /// Last year of the range (defaults to the configured end).
    #[arg(long)]
    to: Option<i32>,

    /// Hide the profit line in the trend chart.
    #[arg(long)]
    no_profit: bool,

    /// Print the view as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum WatchlistAction {
    /// List every code, oldest first.
    List,
    /// Add a stock code.
    Add { code: String },
    /// Remove a stock code.
    Remove { code: String },
}

#[derive(Args)]
struct ServeArgs {
    /// The address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Logs go to stderr so they never mix with the tables on stdout. When a log directory is
/// configured, a daily rolling file is written as well.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level '{}'", settings.level))?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn start_session(config: Config) -> anyhow::Result<DashboardSession> {
    let store = database::open_store(&config.store)
        .await
        .context("Failed to open the watchlist store")?;
    let provider = DatasetProvider::from_settings(&config.data_source);
    let session = DashboardSession::start(config.dashboard, provider, store)
        .await
        .context("Failed to start the dashboard")?;
    Ok(session)
}

async fn handle_show(config: Config, args: ShowArgs) -> anyhow::Result<()> {
    let mut session = start_session(config).await?;

    let mut view = session.view();
    let mut notices = Vec::new();
    if args.from.is_some() || args.to.is_some() {
        let current = session.range();
        let requested = YearRange {
            start: args.from.unwrap_or(current.start),
            end: args.to.unwrap_or(current.end),
        };
        view = session.handle(DashboardEvent::SetRange(requested)).await?;
        notices.append(&mut view.notices);
    }
    if args.no_profit {
        view = session.handle(DashboardEvent::ToggleProfit(false)).await?;
        notices.append(&mut view.notices);
    }
    view.notices = notices;

    print(&view, args.json)
}

fn print(view: &DashboardView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        render::print_view(view);
    }
    Ok(())
}

async fn handle_watchlist(config: Config, action: WatchlistAction) -> anyhow::Result<()> {
    let store = database::open_store(&config.store)
        .await
        .context("Failed to open the watchlist store")?;
    let mut watchlist = Watchlist::load(store).await?;

    match action {
        WatchlistAction::List => {}
        WatchlistAction::Add { code } => match watchlist.add(&code).await? {
            Mutation::Added => println!("Added {}.", code.trim()),
            _ => println!("'{}' is empty or already on the watchlist.", code.trim()),
        },
        WatchlistAction::Remove { code } => match watchlist.remove(&code).await? {
            Mutation::Removed => println!("Removed {}.", code.trim()),
            _ => println!("'{}' is not on the watchlist.", code.trim()),
        },
    }

    println!("{}", render::watchlist_table(watchlist.entries()));
    Ok(())
}

const INTERACTIVE_HELP: &str = "Commands: range <start> <end> | profit on|off | add <code> | remove <code> | reload | refresh | quit";

async fn handle_interactive(config: Config) -> anyhow::Result<()> {
    let mut session = start_session(config).await?;
    render::print_view(&session.view());
    println!("\n{INTERACTIVE_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{INTERACTIVE_HELP}");
                continue;
            }
            _ => {}
        }

        match line.parse::<DashboardEvent>() {
            Ok(event) => {
                let view = session.handle(event).await?;
                render::print_view(&view);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unparseable line.");
                println!("{e}\n{INTERACTIVE_HELP}");
            }
        }
    }

    tracing::info!("Interactive session ended.");
    Ok(())
}
