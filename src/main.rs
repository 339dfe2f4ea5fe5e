mod app;
mod color;
mod state;
mod summary;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::InWorkPovertyApp;
use inwork_poverty::config::Config;
use inwork_poverty::data::clean;
use inwork_poverty::data::loader::Loader;
use state::AppState;

const DEFAULT_LOGGING_LEVEL: &str = "info";

/// Explore in-work at-risk-of-poverty rates across Europe.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV file or http(s) URL to read instead of the automatic lookup
    #[arg(short, long)]
    source: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a summary of the cleaned table instead of opening the window
    #[arg(long)]
    summary: bool,
}

fn print_summary(loader: &Loader, source: Option<&str>) -> anyhow::Result<()> {
    let loaded = loader.load(source)?;
    println!("Source: {}", loaded.source);
    summary::display_profile(&clean::profile(&loaded.table)?);
    summary::display_dataset(&clean::clean(&loaded.table)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to read configuration")?;
    log::debug!("{config:?}");
    let loader = Loader::new(config);

    if cli.summary {
        return print_summary(&loader, cli.source.as_deref());
    }

    let state = AppState::new(loader, cli.source.as_deref());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "In-work poverty in Europe",
        options,
        Box::new(|_cc| Ok(Box::new(InWorkPovertyApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}
