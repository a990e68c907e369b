//! Stockroom: command-line admin for a product catalog

use std::{
    error::Error,
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use stockroom_app::{
    confirm::{AssumeYes, Confirm},
    context::AppContext,
};
use tracing::{error, info};

use crate::{
    config::Config,
    terminal::{TerminalNotifier, TerminalPrompt},
};

mod commands;
mod config;
mod logging;
mod render;
mod terminal;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(source) = logging::init(&config.logging) {
        report(&source);

        return ExitCode::FAILURE;
    }

    let confirm: Arc<dyn Confirm> = if config.command.assumes_yes() {
        Arc::new(AssumeYes)
    } else {
        Arc::new(TerminalPrompt)
    };

    info!(store = %config.store.path.display(), "opening catalog");

    let mut context =
        AppContext::from_store_path(&config.store.path, Arc::new(TerminalNotifier), confirm).await;

    match commands::run(config.command, &mut context.catalog, io::stdout().lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(source) => {
            error!("command failed: {source}");
            report(&source);

            ExitCode::FAILURE
        }
    }
}

/// Prints an error and its sources to stderr.
fn report(error: &dyn Error) {
    let mut stderr = io::stderr().lock();
    let mut message = format!("error: {error}");
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }

    if writeln!(stderr, "{message}").is_err() {
        error!("{message}");
    }
}
