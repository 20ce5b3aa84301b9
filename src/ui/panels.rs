use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use catalog_explorer::data::export::DEFAULT_EXPORT_NAME;
use catalog_explorer::data::filter::YearRange;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(catalog) = state.catalog.clone() else {
        ui.label("No catalog loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Release year range ----
            if let Some((lo, hi)) = catalog.release_years {
                ui.strong("Release year");
                let before = state.criteria.years;
                let range = state.criteria.years.get_or_insert(YearRange::new(lo, hi));
                ui.add(egui::Slider::new(&mut range.min, lo..=hi).text("from"));
                ui.add(egui::Slider::new(&mut range.max, lo..=hi).text("to"));
                if range.min > range.max {
                    range.max = range.min;
                }
                if state.criteria.years != before {
                    state.refilter();
                }
                ui.separator();
            }

            // ---- Title types ----
            ui.strong("Type");
            for kind in catalog.types.iter().copied() {
                let mut checked = state.criteria.types.contains(&kind);
                let text = RichText::new(kind.as_str()).color(state.colors.for_type(kind));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_type(kind);
                }
            }
            ui.separator();

            // ---- Countries (top 20 of the whole catalog) ----
            let n_selected = state.criteria.countries.len();
            let n_total = catalog.top_countries.len();
            let header_text = format!("Country  ({n_selected}/{n_total})");

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_countries();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_countries();
                        }
                    });

                    for choice in &catalog.top_countries {
                        let mut checked = state.criteria.countries.contains(&choice.value);
                        let label = format!("{}  ({})", choice.value, choice.count);
                        if ui.checkbox(&mut checked, label).changed() {
                            state.toggle_country(&choice.value);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.view.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(catalog), Some(agg)) = (&state.catalog, state.aggregates()) {
            ui.label(format!(
                "{} titles loaded, {} visible",
                catalog.len(),
                agg.total
            ));
            if catalog.skipped_rows > 0 {
                ui.label(
                    RichText::new(format!("{} rows skipped", catalog.skipped_rows))
                        .color(Color32::YELLOW),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered catalog")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
