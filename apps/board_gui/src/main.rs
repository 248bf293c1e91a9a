mod backend_bridge;
mod controller;
mod ui;

use std::time::Duration;

use board_core::{load_settings, PresentationMode};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::events::UiEvent;
use ui::app::BoardApp;

#[derive(Parser, Debug)]
#[command(about = "Wall board for the week's inbound and outbound shipments")]
struct Args {
    /// URL or file path of the shipment document.
    #[arg(long)]
    source: Option<String>,
    /// `marquee` or `grid`.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<PresentationMode>,
    #[arg(long)]
    refresh_secs: Option<u64>,
    #[arg(long)]
    rows_per_page: Option<usize>,
}

fn parse_mode(raw: &str) -> Result<PresentationMode, String> {
    raw.parse::<PresentationMode>().map_err(|err| err.to_string())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(source) = args.source {
        settings.source = source;
    }
    if let Some(mode) = args.mode {
        settings.presentation_mode = mode;
    }
    if let Some(secs) = args.refresh_secs {
        settings.refresh_interval = Duration::from_secs(secs);
    }
    if let Some(rows) = args.rows_per_page {
        settings.rows_per_page = rows.max(1);
    }
    tracing::info!(
        source = %settings.source,
        mode = %settings.presentation_mode,
        refresh_secs = settings.refresh_interval.as_secs(),
        "starting shipment board"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(cmd_tx.clone(), cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shipment Board")
            .with_inner_size([1600.0, 900.0])
            .with_min_inner_size([960.0, 540.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Shipment Board",
        options,
        Box::new(move |_cc| Ok(Box::new(BoardApp::new(cmd_tx, ui_rx, &settings)))),
    )
}
