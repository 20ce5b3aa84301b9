mod app;
mod color;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::CatalogExplorerApp;
use catalog_explorer::config::Args;
use catalog_explorer::data::{export, filter, loader};

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    if args.headless() {
        return run_headless(&args);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Catalog Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(CatalogExplorerApp::new(args)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// `--summary` / `--export`: apply the startup selection without a window.
fn run_headless(args: &Args) -> Result<()> {
    let catalog = Arc::new(
        loader::load_file(&args.source)
            .with_context(|| format!("loading {}", args.source.display()))?,
    );
    let criteria = args.initial_criteria(&catalog);
    let (view, aggregates) = filter::filter(&catalog, &criteria, &args.filter_options());

    if args.summary {
        let json = serde_json::to_string_pretty(&aggregates).context("serialising aggregates")?;
        println!("{json}");
    }
    if let Some(path) = &args.export {
        export::export_to_path(&view, path)?;
    }
    Ok(())
}
