use eframe::egui;

use catalog_explorer::config::Args;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CatalogExplorerApp {
    pub state: AppState,
}

impl CatalogExplorerApp {
    /// Build the app and load the configured source, if it exists.
    pub fn new(args: Args) -> Self {
        let source = args.source.clone();
        let mut state = AppState::new(args);
        if source.exists() {
            state.open(&source);
        } else {
            log::info!("{} not found, waiting for File → Open", source.display());
        }
        Self { state }
    }
}

impl eframe::App for CatalogExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
        });
    }
}
