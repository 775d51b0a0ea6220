use anyhow::{Context, Result};
use azdo_dash::app::App;
use azdo_dash::azure::{AzureDevOpsClient, ClientConfig};
use azdo_dash::cli::{self, Cli};
use azdo_dash::config;
use azdo_dash::events::{map_event_to_action, Action, Effect, EventHandler, SPINNER_INTERVAL};
use azdo_dash::refresh::{FetchResult, Orchestrator, RefreshTrigger};
use azdo_dash::ui;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::exit_code(e.kind()));
        }
    };

    if cli.verbose {
        match init_logging() {
            Ok(path) => eprintln!("Logging to {}", path.display()),
            Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
        }
    }

    let settings = match config::load_config(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            eprintln!("\nSee config.toml.example for the expected format.");
            std::process::exit(1);
        }
    };

    let client = match AzureDevOpsClient::new(ClientConfig::from_settings(&settings)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create Azure DevOps client: {}", e);
            std::process::exit(1);
        }
    };

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<FetchResult>();
    let orchestrator = Orchestrator::new(
        Arc::new(client.clone()),
        &settings.projects,
        settings.display.max_items_per_project,
        result_tx,
    );

    let projects = settings.projects.iter().map(|p| p.name.clone()).collect();
    let mut app = App::new(projects, &settings.display, client.portal_urls());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let size = terminal.size()?;
    app.update(Action::Resize {
        width: size.width,
        height: size.height,
    });

    let mut event_handler = EventHandler::new(settings.display.refresh_interval(), SPINNER_INTERVAL);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    action_tx.send(Action::Refresh(RefreshTrigger::Startup))?;

    let result = run_app(
        &mut terminal,
        &mut app,
        &orchestrator,
        &mut event_handler,
        &mut action_rx,
        &mut result_rx,
        action_tx,
    )
    .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    orchestrator: &Orchestrator,
    event_handler: &mut EventHandler,
    action_rx: &mut mpsc::UnboundedReceiver<Action>,
    result_rx: &mut mpsc::UnboundedReceiver<FetchResult>,
    action_tx: mpsc::UnboundedSender<Action>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        tokio::select! {
            Some(event) = event_handler.next() => {
                let action = map_event_to_action(event, app);
                action_tx.send(action)?;
            }

            Some(result) = result_rx.recv() => {
                action_tx.send(Action::FetchCompleted(result))?;
            }

            Some(action) = action_rx.recv() => {
                if let Some(effect) = app.update(action) {
                    handle_effect(effect, orchestrator).await?;
                }

                if app.should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn handle_effect(effect: Effect, orchestrator: &Orchestrator) -> Result<()> {
    match effect {
        Effect::Fetch(keys) => {
            orchestrator.dispatch(keys);
        }

        Effect::OpenUrl(url) => {
            tracing::debug!(%url, "opening in browser");
            tokio::task::spawn_blocking(move || open_in_browser(&url)).await?;
        }
    }

    Ok(())
}

/// Launches the platform browser. The child is never waited on and failures are ignored.
fn open_in_browser(url: &str) {
    #[cfg(target_os = "linux")]
    let _ = std::process::Command::new("xdg-open").arg(url).spawn();

    #[cfg(target_os = "macos")]
    let _ = std::process::Command::new("open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let _ = std::process::Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .spawn();
}

/// Sends tracing output to a file; stdout belongs to the TUI.
fn init_logging() -> Result<PathBuf> {
    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .context("no state or cache directory available")?
        .join("azdo-dash");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join("azdo-dash.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    Ok(path)
}
