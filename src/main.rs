use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use tokio::sync::watch;

use syswatch::app::App;
use syswatch::config::{self, load_config, load_config_from_path};
use syswatch::event::{Event, EventHandler};
use syswatch::{headless, logging};
use syswatch::system::cpu::DEFAULT_SAMPLE_INTERVAL;
use syswatch::system::monitor::Monitor;
use syswatch::system::procfs::ProcSource;
use syswatch::system::snapshot::ChartSnapshot;
use syswatch::ui;
use syswatch::worker::{Shutdown, Worker};

#[derive(Parser)]
#[command(
    name = "syswatch",
    about = "Per-core CPU and memory utilization as scrolling line charts"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Line chart width (points of history per line)
    #[arg(long)]
    width: Option<usize>,

    /// procfs mount to read counters from
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Print this many sampling rounds as JSON lines instead of drawing charts.
    #[arg(long, value_name = "ROUNDS")]
    headless: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let log_path = logging::init_or_report(&config.logging);
    tracing::info!(
        log = ?log_path,
        width = config.general.window_width,
        proc_root = %config.general.proc_root.display(),
        "syswatch starting"
    );

    let source = ProcSource::new(&config.general.proc_root);
    let monitor = Monitor::new(
        source,
        config.general.window_width,
        DEFAULT_SAMPLE_INTERVAL,
    )?;
    let mut worker = Worker::new(monitor, config.general.max_consecutive_failures);

    if let Some(rounds) = cli.headless {
        return headless::write_rounds(&mut worker, rounds, std::io::stdout().lock());
    }

    let shutdown = Shutdown::new();
    let (snapshots, handle) = worker.spawn(shutdown.clone())?;

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, snapshots, config.chart.show_legend).await;
    ratatui::restore();
    shutdown.trigger();

    let app = result?;
    if app.worker_stopped {
        handle
            .join()
            .map_err(|_| eyre!("sampler thread panicked"))??;
    }

    tracing::info!("syswatch exiting");
    Ok(())
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    snapshots: watch::Receiver<Arc<ChartSnapshot>>,
    show_legend: bool,
) -> Result<App> {
    let initial = snapshots.borrow().clone();
    let mut app = App::new(initial, show_legend);
    let mut events = EventHandler::new(snapshots);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
            }
            Event::Resize => {}
            Event::Snapshot(snapshot) => app.on_snapshot(snapshot),
            Event::WorkerStopped => app.on_worker_stopped(),
        }
        if app.running {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }
    }

    Ok(app)
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(width) = cli.width {
        config.general.window_width = width;
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }

    config
}
