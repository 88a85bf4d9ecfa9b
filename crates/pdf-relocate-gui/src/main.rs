#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod documents;
mod handlers;
mod logger;
mod state;
mod ui_components;
mod views;
mod worker;

/// Entries kept for the log panel
const MAX_LOG_ENTRIES: usize = 500;

fn main() -> anyhow::Result<()> {
    let logger = logger::AppLogger::new(MAX_LOG_ENTRIES);
    logger.clone().init()?;

    // The runtime must outlive the UI loop; the worker task lives on it
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let tokio_handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_title("PDF Address Relocator"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Address Relocator",
        options,
        Box::new(move |cc| Ok(Box::new(app::RelocateApp::new(cc, tokio_handle, logger)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start UI: {}", e))?;

    Ok(())
}
