//! guardian-news — browse Guardian search results in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ LoaderEvent ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs  │ ──────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio     │  (channel)  │ (state)  │          │ (render) │
//! │  task)     │             └──────────┘          └──────────┘
//! └────────────┘                  ▲
//!       │ fetch_news()            │ handle_key_event()
//! ┌────────────┐             ┌──────────┐
//! │ source/    │             │ input.rs │
//! └────────────┘             └──────────┘
//! ```
//!
//! * **`source/`** — the `Fetcher` seam, the HTTP fetcher and the JSON
//!   parser.
//! * **`loader`** — cached, de-duplicating async load state machine.
//! * **`connectivity`** — reachability probe consulted before loading.
//! * **`config`** — command-line / environment options.
//! * **`app`**, **`ui`**, **`input`** — the terminal front end.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod config;
mod connectivity;
mod error;
mod input;
mod loader;
mod source;
mod ui;

use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, NO_CONNECTION};
use config::{Cli, Config};
use connectivity::{ConnectivityProbe, TcpProbe};
use loader::{LoadResult, LoaderEvent, NewsLoader};
use source::HttpFetcher;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Terminal mode owns stdout, so it only logs when given a file.  Plain
/// mode logs to stderr.
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&config.log_file, config.plain) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, true) => builder.with_writer(io::stderr).init(),
        (None, false) => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    init_logging(&config)?;

    let runtime = Runtime::new().context("cannot start async runtime")?;
    let fetcher = HttpFetcher::new(config.timeouts).context("cannot build HTTP client")?;
    let loader = NewsLoader::new(
        config.request_url.clone(),
        Arc::new(fetcher),
        runtime.handle().clone(),
    );
    let probe = TcpProbe::for_url(
        config.request_url.as_deref(),
        TcpProbe::DEFAULT_TIMEOUT,
        runtime.handle().clone(),
    );
    info!(url = ?config.request_url, "starting");

    if config.plain {
        run_plain(&runtime, loader, &probe)
    } else {
        install_panic_hook();
        run_terminal(loader, &probe)
    }
}

/// Load once and print one article per line.
fn run_plain(runtime: &Runtime, mut loader: NewsLoader, probe: &dyn ConnectivityProbe) -> Result<()> {
    if !probe.has_connectivity() {
        anyhow::bail!(NO_CONNECTION);
    }

    loader.start();
    match runtime.block_on(loader.finished()) {
        Some(LoadResult::Success(items)) if items.is_empty() => println!("{}", app::NO_NEWS),
        Some(LoadResult::Success(items)) => {
            for item in items {
                println!("{item}\n    {}", item.url);
            }
        }
        Some(LoadResult::Failure(e)) => anyhow::bail!("{}: {e}", app::NO_NEWS),
        None => {}
    }
    Ok(())
}

/// Forward every pending loader event to the app.
fn drain_events(events: &mut UnboundedReceiver<LoaderEvent>, app: &mut App) {
    while let Ok(event) = events.try_recv() {
        event.dispatch(app);
    }
}

/// Discard the cached result and load again, or show the offline message.
///
/// The `Reset` event is applied before the offline status is set, so it
/// cannot clear that status on the next tick.
fn reload(
    loader: &mut NewsLoader,
    events: &mut UnboundedReceiver<LoaderEvent>,
    app: &mut App,
    probe: &dyn ConnectivityProbe,
) {
    loader.reset();
    drain_events(events, app);

    if probe.has_connectivity() {
        loader.start();
    } else {
        app.show_offline();
    }
}

fn run_terminal(mut loader: NewsLoader, probe: &dyn ConnectivityProbe) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    let mut events = loader.subscribe();

    if probe.has_connectivity() {
        loader.start();
    } else {
        app.show_offline();
    }

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply a finished load, then drain loader events into the app.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    //   4. Act on a reload request.
    let tick_rate = Duration::from_millis(100);

    loop {
        loader.poll();
        drain_events(&mut events, &mut app);

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }

        if app.take_reload_request() && !loader.is_loading() {
            reload(&mut loader, &mut events, &mut app, probe);
        }
    }

    // Dropping the loader cancels any load still in flight.
    loader.unsubscribe();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
