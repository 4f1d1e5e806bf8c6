use clap::Parser;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

mod app;
mod cli;
mod clipboard;
mod config;
mod confirm;
mod core;
mod display;
mod input;
mod providers;
mod session;
mod system;
#[cfg(test)]
mod testing;

use crate::app::Application;
use crate::cli::Args;
use crate::clipboard::SystemClipboard;
use crate::config::{Config, Settings};
use crate::core::error::AitermError;
use crate::core::executor::SystemShell;
use crate::input::ChatEditor;
use crate::providers::openrouter::OpenRouterProvider;
use crate::system::SystemInfo;

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("tracing subscriber already installed");
    }
}

async fn run(args: Args) -> Result<(), AitermError> {
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::resolve(&config, &args, |name| std::env::var(name).ok())?;
    info!(model = %settings.model, base_url = %settings.base_url, "configuration resolved");

    let system_info = SystemInfo::detect();
    let provider = OpenRouterProvider::new(&settings)?;
    let shell = SystemShell::new(&system_info);
    let mut editor = ChatEditor::new()?;

    let app = Application::new(
        settings,
        system_info,
        Box::new(provider),
        Box::new(SystemClipboard),
        Box::new(shell),
    );
    app.run(&mut editor).await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "startup failed");
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
