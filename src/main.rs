use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc;

use sentinel::app::App;
use sentinel::config::{self, Config};
use sentinel::daemon;
use sentinel::engine::Sampler;
use sentinel::event::{Event, EventHandler};
use sentinel::system::platform;
use sentinel::system::procfs::ProcFs;
use sentinel::system::users::UserDirectory;
use sentinel::{logging, ui};

#[derive(Parser)]
#[command(
    name = "sentinel",
    version,
    about = "top-like process monitor with threshold alerts"
)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long, global = true)]
    refresh_rate: Option<u64>,

    /// Clock ticks per second used for TIME+ (default: detect)
    #[arg(long, global = true)]
    hz: Option<u64>,

    /// Minimum log level written to the log file
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    /// Write logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive dashboard (default)
    Tui,
    /// Background alerting service
    Daemon {
        #[command(subcommand)]
        action: DaemonCommand,
    },
}

#[derive(Subcommand)]
enum DaemonCommand {
    /// Start the daemon in the background
    Start,
    /// Run the daemon in the foreground
    Run,
    /// Stop a running daemon
    Stop,
    /// Report whether the daemon is running
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&logging::log_path(), cli.log_level, cli.log_json)?;

    let config_path = cli
        .config
        .clone()
        .or_else(config::config_path)
        .ok_or_else(|| eyre!("no config directory; pass --config"))?;
    let mut config = config::load_config_from_path(&config_path);
    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    let period = Duration::from_millis(config.general.refresh_rate_ms.max(100));

    match &cli.command {
        None | Some(Command::Tui) => {
            let hz = resolve_clock_ticks(cli.hz, &config);
            run_tui(config, config_path, period, hz).await
        }
        Some(Command::Daemon { action }) => {
            let pid_path = daemon::default_pid_path();
            match action {
                DaemonCommand::Start => {
                    let pid = daemon::start(&config_path, period, &pid_path, &log_args(&cli))?;
                    println!("sentinel daemon started (PID {pid})");
                }
                DaemonCommand::Run => daemon::run(&config_path, period, &pid_path).await?,
                DaemonCommand::Stop => match daemon::stop(&pid_path)? {
                    Some(pid) => println!("sent SIGTERM to sentinel daemon (PID {pid})"),
                    None => println!("sentinel daemon is not running"),
                },
                DaemonCommand::Status => println!("{}", daemon::status_line(&pid_path)),
            }
            Ok(())
        }
    }
}

/// `--hz`, then a non-zero `clock_ticks` from the config, then the OS value.
fn resolve_clock_ticks(flag: Option<u64>, config: &Config) -> u64 {
    flag.filter(|&hz| hz > 0)
        .or((config.general.clock_ticks > 0).then_some(config.general.clock_ticks))
        .unwrap_or_else(platform::clock_ticks_per_second)
}

fn log_args(cli: &Cli) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("--log-level"),
        OsString::from(cli.log_level.as_str()),
    ];
    if cli.log_json {
        args.push(OsString::from("--log-json"));
    }
    args
}

async fn run_tui(config: Config, config_path: PathBuf, period: Duration, hz: u64) -> Result<()> {
    let sampler = Sampler::new(ProcFs::new(), UserDirectory::new())?;
    let (frame_tx, frame_rx) = mpsc::unbounded_channel();
    let handle = sampler.spawn(period, frame_tx)?;

    // Also installs a panic hook that restores the terminal.
    let mut terminal = ratatui::init();

    let mut app = App::new(config, Some(config_path), hz);
    let result = event_loop(&mut terminal, &mut app, EventHandler::new(frame_rx)).await;

    ratatui::restore();
    handle.shutdown();
    result
}

async fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    mut events: EventHandler,
) -> Result<()> {
    terminal.draw(|frame| ui::draw(frame, app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) => {
                let action = app.map_key(key);
                app.dispatch(action);
                true
            }
            Event::Sample(frame) => {
                app.apply_frame(*frame);
                true
            }
            Event::Tick => {
                let had_status = app.status_message.is_some();
                app.on_tick(std::time::Instant::now());
                had_status && app.status_message.is_none()
            }
            Event::Resize => true,
        };
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, app))?;
        }
    }

    Ok(())
}
