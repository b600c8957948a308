mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use clap::{Parser as ClapParser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use daytint::app::{Action, App};
use daytint::clock::{Clock, FixedClock, SystemClock, TimeOfDay};
use daytint::config::{watch_config, Config};
use daytint::events::{self, AppEvent, ChannelTarget};
use daytint::palette::PaletteTable;
use daytint::scheduler::{self, SchedulerHandle, Visibility};
use daytint::target::{Fanout, OutputFormat, StyleSheet, StylesheetFile};
use daytint::tint::{Tinter, Trigger};

#[derive(ClapParser, Debug)]
#[command(name = "daytint", about = "Blend time-of-day color palettes into CSS variables")]
struct Cli {
    /// JSON config file (interval, output, format, palette overrides).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the blended palette once.
    Show {
        /// Time to compute for, as HH:MM (defaults to now).
        #[arg(long)]
        at: Option<TimeOfDay>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Keep a stylesheet file up to date until interrupted.
    Watch {
        /// Stylesheet to write (overrides the config's `output`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds between refreshes.
        #[arg(short, long)]
        interval: Option<u64>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Live terminal preview of the palette over the day.
    Preview {
        /// Also keep this stylesheet up to date.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load(path)
            .wrap_err_with(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Show { at, format } => {
            init_logging(cli.log_file.as_deref(), "warn", true)?;
            show(&config, at, format)
        }
        Command::Watch {
            output,
            interval,
            format,
        } => {
            init_logging(cli.log_file.as_deref(), "info", true)?;
            let interval = match interval {
                Some(0) => bail!("--interval must be at least 1 second"),
                Some(secs) => Duration::from_secs(secs),
                None => config.interval,
            };
            let Some(output) = output.or_else(|| config.output.clone()) else {
                bail!("no output file: pass --output or set `output` in the config");
            };
            let format = format.unwrap_or(config.format);
            watch(&config, cli.config.as_deref(), output, interval, format)
        }
        Command::Preview { output } => {
            // stderr belongs to the terminal UI; only log when a file was given.
            init_logging(cli.log_file.as_deref(), "info", false)?;
            preview(&config, cli.config.as_deref(), output.or_else(|| config.output.clone()))
        }
    }
}

fn init_logging(log_file: Option<&Path>, default_level: &str, stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None if stderr => builder.with_writer(io::stderr).try_init(),
        None => return Ok(()),
    };
    result.map_err(|e| eyre!("failed to initialize logging: {e}"))
}

fn show(config: &Config, at: Option<TimeOfDay>, format: Option<OutputFormat>) -> Result<()> {
    let time = at.unwrap_or_else(|| SystemClock.now());
    let mut tinter = Tinter::new(config.table.clone(), FixedClock(time), StyleSheet::new());
    tinter.refresh(Trigger::Startup)?;

    let formatter = format.unwrap_or(config.format).formatter(&config.selector);
    print!("{}", tinter.target().render(formatter.as_ref()));
    Ok(())
}

fn watch(
    config: &Config,
    config_path: Option<&Path>,
    output: PathBuf,
    interval: Duration,
    format: OutputFormat,
) -> Result<()> {
    let file = StylesheetFile::new(&output, format.formatter(&config.selector));
    let tinter = Tinter::new(config.table.clone(), SystemClock, file);
    let handle = scheduler::spawn(tinter, interval)?;
    tracing::info!(output = %output.display(), ?interval, "watching");

    let (reload_tx, mut reloads) = tokio::sync::mpsc::unbounded_channel::<PaletteTable>();
    let _config_watcher = match config_path {
        Some(path) => Some(watch_config(path, move |path| match Config::load(path) {
            Ok(config) => {
                let _ = reload_tx.send(config.table);
            }
            Err(e) => tracing::warn!("ignoring config change: {e}"),
        })?),
        None => None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to start signal runtime")?;

    runtime.block_on(async {
        let mut resume = ResumeSignal::new()?;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                res = &mut ctrl_c => {
                    res.wrap_err("Failed to listen for Ctrl-C")?;
                    break;
                }
                Some(table) = reloads.recv() => {
                    tracing::info!("config reloaded");
                    handle.reload(table)?;
                }
                _ = resume.recv() => {
                    handle.set_visibility(Visibility::Hidden)?;
                    handle.set_visibility(Visibility::Visible)?;
                }
            }
        }
        Ok::<_, color_eyre::Report>(())
    })?;

    let tinter = handle.stop()?;
    tracing::info!(applied = tinter.applied(), "stopped");
    Ok(())
}

/// SIGUSR1 tells a headless watcher the display came back (e.g. after a resume).
#[cfg(unix)]
struct ResumeSignal(tokio::signal::unix::Signal);

#[cfg(unix)]
impl ResumeSignal {
    fn new() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        let sig = signal(SignalKind::user_defined1()).wrap_err("Failed to listen for SIGUSR1")?;
        Ok(Self(sig))
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct ResumeSignal;

#[cfg(not(unix))]
impl ResumeSignal {
    fn new() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}

fn preview(config: &Config, config_path: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    let mut targets = Fanout::new();
    targets.push(ChannelTarget::new(tx.clone()));
    if let Some(ref output) = output {
        targets.push(StylesheetFile::new(output, config.format.formatter(&config.selector)));
    }
    let tinter = Tinter::new(config.table.clone(), SystemClock, targets);

    // Set up config watcher before touching the terminal so errors print normally.
    let tx_config = tx.clone();
    let _config_watcher = match config_path {
        Some(path) => Some(watch_config(path, move |path| {
            let _ = tx_config.send(AppEvent::ConfigChanged(path.to_path_buf()));
        })?),
        None => None,
    };

    // Launch TUI.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.table.clone(), SystemClock.now());
    let result = scheduler::spawn(tinter, config.interval).and_then(|handle| {
        events::spawn_input_reader(tx.clone());
        events::spawn_tick_timer(tx.clone(), Duration::from_secs(1));
        let result = run_tui(&mut terminal, &mut app, &handle, &rx);
        first_error(result, handle.stop())
    });

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// The UI loop's error wins; a failed stop is reported only when the loop succeeded.
fn first_error<T>(run: Result<()>, stopped: Result<T>) -> Result<()> {
    run.and(stopped.map(|_| ()))
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    handle: &SchedulerHandle<SystemClock, Fanout>,
    rx: &mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(AppEvent::Key(key)) => {
                if app.handle_key(key) == Action::Refresh {
                    handle.refresh()?;
                }
            }
            Ok(AppEvent::Focus(visibility)) => {
                app.on_focus(visibility);
                handle.set_visibility(visibility)?;
            }
            Ok(AppEvent::PaletteApplied(palette)) => app.on_palette_applied(palette),
            Ok(AppEvent::ConfigChanged(path)) => match Config::load(&path) {
                Ok(config) => {
                    handle.reload(config.table.clone())?;
                    app.on_table_reloaded(config.table);
                }
                Err(e) => {
                    tracing::warn!("ignoring config change: {e}");
                    app.on_config_error(format!("config error: {e}"));
                }
            },
            Ok(AppEvent::Tick) => app.on_tick(SystemClock.now()),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
