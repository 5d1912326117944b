mod app;
mod color;
mod config;
mod controller;
mod data;
mod scale;
mod scene;
mod state;
mod ui;

use app::CarScatterApp;
use clap::Parser;
use config::{Cli, ViewerConfig};
use eframe::egui;

fn main() -> eframe::Result {
    let cli = Cli::parse();
    env_logger::init();

    let config = ViewerConfig::discover().with_cli(cli);
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Car Scatter",
        options,
        Box::new(|_cc| Ok(Box::new(CarScatterApp::new(config)))),
    )
}
