#![deny(warnings)]

use std::{sync::Arc, time::Duration};

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::mpsc;

use skytui::{
    core::{cmd_executor::CmdExecutor, state::AppState},
    infrastructure::{
        bsky::BskyClient,
        cli::Cli,
        config::Config,
        launcher::CommandLauncher,
        session::{self, FileSessionStore},
        tui::real::RealTui,
    },
    integration::app_runner::AppRunner,
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    let config = Config::new()?;
    let credentials = config.credentials();

    let client = Arc::new(BskyClient::new(config.service.clone()));
    let sessions = Arc::new(FileSessionStore::in_dir(&config.config._data_dir));
    let session = session::sign_in(client.as_ref(), sessions.as_ref(), credentials.as_ref()).await?;

    let (tx, rx) = mpsc::unbounded_channel();
    let launcher = Arc::new(CommandLauncher::new(config.launcher.clone()));
    let executor = CmdExecutor::new(client, launcher, sessions, tx).with_credentials(credentials);

    let state = AppState::new(config.keybindings.clone()).with_handle(session.handle);
    let tui = RealTui::new()?
        .tick_rate(args.tick_rate)
        .frame_rate(args.frame_rate)
        .paste(true);
    let sync_interval =
        Duration::from_millis(args.sync_interval.unwrap_or(config.sync_interval_ms));

    let mut runner = AppRunner::new(state, executor, rx, tui, sync_interval)
        .with_notification_interval(Duration::from_millis(config.notification_interval_ms));
    runner.run().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
