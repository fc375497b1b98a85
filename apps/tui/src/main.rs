mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::{App, AppActions};
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use places_wheel::config::{init_app_config, log_file_path};
use places_wheel::logging::{init_logging, LogTarget};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    // Without a terminal there is nothing to draw on
    let headless = args.headless || !is_terminal();
    if headless {
        init_logging(LogTarget::Stderr, config.debug)?;
    } else {
        init_logging(LogTarget::File(&log_file_path()), config.debug)?;
    }
    info!(headless, "starting places-wheel");

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let actions = AppActions::new(&config, events_tx)?;
    let mut app = App::new(&config, actions);

    if headless {
        return event::run_headless(&mut app, args.json).await;
    }

    app.start();

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app, &mut events_rx).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
