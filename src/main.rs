use eframe::egui;
use egui::ViewportBuilder;
use image::ImageReader;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod app;
mod cache;
mod config;
mod error;
mod executor;
mod hn_client;
mod models;
mod session;
mod sort;
mod theme;

use crate::app::SearchApp;
use crate::config::Settings;
use crate::executor::SearchExecutor;
use crate::hn_client::HackerNewsClient;

fn load_icon(path: &str) -> anyhow::Result<egui::IconData> {
    let img = ImageReader::open(path)?.decode()?;
    let rgba_image = img.into_rgba8();
    let (width, height) = rgba_image.dimensions();

    Ok(egui::IconData {
        rgba: rgba_image.into_raw(),
        width,
        height,
    })
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<(), eframe::Error> {
    let (settings, settings_problem) = config::load_settings();
    init_tracing(&settings);

    if let Some(err) = settings_problem {
        tracing::warn!("ignoring {}: {err:#}", config::SETTINGS_FILE);
    }
    tracing::info!(
        base_url = %settings.base_url,
        hits_per_page = settings.hits_per_page,
        "starting hn_search"
    );

    let mut options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("Hacker News Search"),
        ..Default::default()
    };

    match load_icon("logo/logo.png") {
        Ok(icon) => options.viewport.icon = Some(Arc::new(icon)),
        Err(e) => tracing::debug!("no window icon: {e}"),
    }

    eframe::run_native(
        "Hacker News Search",
        options,
        Box::new(move |cc| {
            let client = HackerNewsClient::new(&settings)?;
            let ctx = cc.egui_ctx.clone();
            let executor = SearchExecutor::new(client).with_waker(move || ctx.request_repaint());

            Ok(Box::new(SearchApp::new(&settings, executor)))
        }),
    )
}
