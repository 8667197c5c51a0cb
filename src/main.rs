use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use latencyscope::app::{write_export, App};
use latencyscope::catalog::Catalog;
use latencyscope::config::{Overrides, Settings};
use latencyscope::data::LatencyStore;
use latencyscope::events::{self, CONTENT_START_ROW};
use latencyscope::logging::{init_tracing, LogTarget};
use latencyscope::probe::Prober;
use latencyscope::server::{self, Aggregator, LATENCY_PATH};
use latencyscope::source::{
    spawn_poller, AggregatorClient, DataSource, FeedUpdate, FileSource, LocalProbe, ReportFetcher,
};
use latencyscope::synth::Synthesizer;
use latencyscope::ui;

/// How often the UI loop drains a file source.
const FILE_RELOAD_INTERVAL: Duration = Duration::from_secs(1);
/// How often the UI loop drains a channel-backed source.
const CHANNEL_RELOAD_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "latencyscope")]
#[command(about = "Terminal dashboard for live exchange-to-cloud latency topology")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Poll an aggregation endpoint instead of probing in-process.
    /// Without a URL the configured endpoint is used.
    #[arg(short, long, num_args = 0..=1, conflicts_with_all = ["file", "serve"])]
    connect: Option<Option<String>>,

    /// Replay a saved latency report (JSON)
    #[arg(short, long, conflicts_with_all = ["connect", "serve"])]
    file: Option<PathBuf>,

    /// Run the aggregation endpoint instead of the dashboard.
    /// Without an address the configured listen address is used.
    #[arg(long, num_args = 0..=1, conflicts_with_all = ["export"])]
    serve: Option<Option<String>>,

    /// Run one cycle, export it as JSON and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Poll interval (e.g., "10s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Per-probe timeout (e.g., "8s")
    #[arg(long)]
    timeout: Option<String>,

    /// Deadline for one request to the aggregation endpoint
    /// (default: probe timeout + 5s)
    #[arg(long)]
    endpoint_timeout: Option<String>,

    /// Seed for the latency jitter, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Log file used while the dashboard owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Where reports come from.
#[derive(Debug, Clone)]
enum Feed {
    Probe,
    Remote(String),
    File(PathBuf),
}

impl Feed {
    fn from_args(args: &Args, settings: &Settings) -> Self {
        if let Some(path) = &args.file {
            Feed::File(path.clone())
        } else if args.connect.is_some() {
            Feed::Remote(settings.endpoint.clone())
        } else {
            Feed::Probe
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        poll_interval: args.refresh.clone(),
        probe_timeout: args.timeout.clone(),
        endpoint_timeout: args.endpoint_timeout.clone(),
        listen: args.serve.clone().flatten(),
        endpoint: args.connect.clone().flatten(),
        jitter_seed: args.seed,
        log_file: args.log_file.clone(),
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    // The dashboard owns the terminal, so only headless modes log to stderr
    let interactive = args.serve.is_none() && args.export.is_none();
    let log_target = if interactive {
        LogTarget::File(settings.log_file.clone())
    } else {
        LogTarget::Stderr
    };
    init_tracing(&log_target)?;

    let rt = Runtime::new()?;

    if args.serve.is_some() {
        return rt.block_on(run_server(&settings));
    }

    let feed = Feed::from_args(&args, &settings);

    if let Some(export_path) = &args.export {
        return rt.block_on(export_once(&feed, &settings, export_path));
    }

    run_dashboard(&rt, &feed, &settings)
}

fn build_fetcher(feed: &Feed, settings: &Settings) -> Result<Box<dyn ReportFetcher>> {
    match feed {
        Feed::Probe => {
            let prober = Prober::new(settings.probe_timeout, &settings.user_agent)?;
            Ok(Box::new(LocalProbe::new(prober, settings.targets.clone())))
        }
        Feed::Remote(url) => Ok(Box::new(AggregatorClient::new(
            url.clone(),
            settings.endpoint_timeout,
        )?)),
        Feed::File(path) => bail!("{} is replayed, not fetched", path.display()),
    }
}

fn load_catalog() -> Arc<Catalog> {
    let catalog = Catalog::builtin();
    let unresolved = catalog.unresolved_endpoints();
    if !unresolved.is_empty() {
        warn!(ids = ?unresolved, "Link endpoints missing from the catalog");
    }
    Arc::new(catalog)
}

/// Run the aggregation endpoint until Ctrl-C.
async fn run_server(settings: &Settings) -> Result<()> {
    let prober = Prober::new(settings.probe_timeout, &settings.user_agent)?;
    let aggregator = Arc::new(Aggregator::new(prober, settings.targets.clone()));

    let addr: SocketAddr = settings.listen;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(path = LATENCY_PATH, "Serving latency reports");

    server::serve(listener, aggregator, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
        }
    })
    .await?;
    Ok(())
}

/// Run a single cycle and write the synthesized snapshot to `export_path`.
async fn export_once(feed: &Feed, settings: &Settings, export_path: &Path) -> Result<()> {
    let report = match feed {
        Feed::File(path) => match FileSource::new(path).poll() {
            Some(FeedUpdate::Report(report)) => report,
            Some(FeedUpdate::Failed(reason)) => bail!(reason),
            None => bail!("No report in {}", path.display()),
        },
        _ => build_fetcher(feed, settings)?.fetch().await?,
    };

    let catalog = load_catalog();
    let mut synthesizer = Synthesizer::with_seed(catalog.clone(), settings.jitter_seed);
    let mut store = LatencyStore::new(catalog, settings.history_points);
    store.apply_snapshot(synthesizer.synthesize(&report));

    write_export(&store, export_path)?;
    println!(
        "Exported {} links to: {}",
        store.links().len(),
        export_path.display()
    );
    Ok(())
}

fn run_dashboard(rt: &Runtime, feed: &Feed, settings: &Settings) -> Result<()> {
    let (source, reload_interval): (Box<dyn DataSource>, Duration) = match feed {
        Feed::File(path) => (Box::new(FileSource::new(path)), FILE_RELOAD_INTERVAL),
        _ => {
            let fetcher = build_fetcher(feed, settings)?;
            // spawn_poller needs a runtime context
            let _guard = rt.enter();
            (
                Box::new(spawn_poller(fetcher, settings.poll_interval)),
                CHANNEL_RELOAD_INTERVAL,
            )
        }
    };

    let catalog = load_catalog();
    let synthesizer = Synthesizer::with_seed(catalog.clone(), settings.jitter_seed);
    let store = LatencyStore::new(catalog, settings.history_points);

    info!(source = source.description(), "Starting dashboard");
    run_tui(App::new(source, synthesizer, store, settings.poll_interval), reload_interval)
}

/// Run the TUI with the given app
fn run_tui(mut app: App, reload_interval: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    app.reload_data();

    let result = run_app(&mut terminal, &mut app, reload_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    reload_interval: Duration,
) -> Result<()> {
    let mut last_reload = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, CONTENT_START_ROW),
                _ => {}
            }
        }

        if last_reload.elapsed() >= reload_interval {
            app.reload_data();
            last_reload = Instant::now();
        }
    }

    Ok(())
}
