use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use catalog_explorer::data::filter::FilteredView;
use catalog_explorer::data::model::Title;

/// Rows shown in the preview table.
const PREVIEW_ROWS: usize = 100;

const HEADERS: [&str; 8] = [
    "id", "type", "title", "country", "release", "added", "duration", "delay",
];

fn cells(t: &Title) -> [String; 8] {
    [
        t.id.clone(),
        t.kind.to_string(),
        t.title.clone().unwrap_or_default(),
        t.country.clone(),
        t.release_year.to_string(),
        t.date_added.map(|d| d.to_string()).unwrap_or_default(),
        t.duration.clone().unwrap_or_default(),
        t.delay_years.map(|d| d.to_string()).unwrap_or_default(),
    ]
}

/// First rows of the filtered view, in source order.
pub fn table(ui: &mut Ui, view: &FilteredView) {
    let rows: Vec<&Title> = view.iter().take(PREVIEW_ROWS).collect();
    if rows.is_empty() {
        ui.label("No rows.");
        return;
    }
    ui.label(format!("Showing {} of {} rows", rows.len(), view.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                for text in cells(rows[row.index()]) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
