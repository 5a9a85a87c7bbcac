use anyhow::{Context, Result};
use gitsafe::{
    config::Config,
    git::GitCli,
    logging,
    state::LastRepo,
    ui::{self, App, EventHandler},
};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize panic handler for better error messages
    std::panic::set_hook(Box::new(|panic_info| {
        // Restore terminal before showing panic
        let _ = ui::terminal::restore();
        eprintln!("{}", panic_info);
    }));

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    if !GitCli::new(&cwd).is_installed().await {
        eprintln!("Error: Git is not installed or not in PATH.");
        eprintln!();
        eprintln!("Install it with your package manager, for example:");
        eprintln!("  Debian/Ubuntu:  sudo apt install git");
        eprintln!("  Fedora:         sudo dnf install git");
        eprintln!("  Arch:           sudo pacman -S git");
        eprintln!("  macOS:          brew install git");
        eprintln!("  Windows:        https://git-scm.com/download/win");
        std::process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}; using default configuration", e);
            Config::default()
        }
    };
    if let Err(e) = logging::init(&config.settings.log_file()) {
        eprintln!("Warning: {:#}; logging disabled", e);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting gitsafe");

    // Run the application
    if let Err(e) = run(config, cwd).await {
        ui::terminal::restore()?;
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(config: Config, cwd: std::path::PathBuf) -> Result<()> {
    let last = LastRepo::load();
    let last_repo = last.existing();
    if let Some(path) = last_repo {
        info!(repo = %path.display(), "restoring last repository");
    } else if last.last_repo.is_some() {
        warn!("last repository no longer exists");
    }

    // Initialize terminal
    let mut terminal = ui::terminal::init()?;

    let mut app = App::new(&config, cwd)?;
    app.init(last_repo);

    let mut event_handler = EventHandler::new(Duration::from_millis(config.settings.tick_rate_ms));
    event_handler.start();

    // Main event loop
    while app.is_running() {
        // Update application state
        app.update()?;

        // Render the UI
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Handle events
        if let Some(event) = event_handler.next().await {
            app.handle_event(event)?;
        }
    }

    // Restore terminal
    ui::terminal::restore()?;
    info!("exiting");

    Ok(())
}
