mod app;

use app::PayablesUploader;
use eframe::CreationContext;
use payables_uploader::config::UploaderConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = UploaderConfig::load(&base_dir);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 620.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Payables Report Uploader",
        options,
        Box::new(move |cc: &CreationContext| Box::new(PayablesUploader::new(cc, config))),
    )
}
