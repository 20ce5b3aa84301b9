use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

use catalog_explorer::data::aggregate::Aggregates;
use catalog_explorer::data::model::TitleType;

use crate::color::ChartColors;
use crate::state::AppState;
use crate::ui::preview;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart of the dashboard in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some((view, agg)) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = match &state.status_message {
                Some(msg) => msg.clone(),
                None => "Open a catalog to explore it  (File → Open…)".to_string(),
            };
            ui.heading(hint);
        });
        return;
    };
    let colors = &state.colors;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Media catalog exploration");
            ui.add_space(8.0);
            metrics(ui, agg);

            section(ui, "Movies vs TV shows");
            type_chart(ui, agg, colors);

            section(ui, "Missing values per column (whole catalog)");
            missing_chart(ui, agg, colors);

            section(ui, "Delay between release and addition");
            delay_chart(ui, agg, colors);

            section(ui, "Movie durations");
            duration_chart(ui, agg, colors);

            section(ui, "Top countries");
            country_chart(ui, agg, colors);

            section(ui, "Data preview");
            preview::table(ui, view);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(title);
}

fn info(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).italics().color(Color32::GRAY));
}

// ---------------------------------------------------------------------------
// Key metrics
// ---------------------------------------------------------------------------

fn metrics(ui: &mut Ui, agg: &Aggregates) {
    let years = agg
        .release_years
        .map_or_else(|| "–".to_string(), |r| format!("{} - {}", r.min, r.max));
    let cells = [
        ("Titles (filtered)", agg.total.to_string()),
        ("Movies", agg.type_count(TitleType::Movie).to_string()),
        ("TV shows", agg.type_count(TitleType::TvShow).to_string()),
        ("Years covered", years),
    ];

    ui.columns(cells.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cells) {
            col.label(RichText::new(label).small());
            col.label(RichText::new(value).size(24.0).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn type_chart(ui: &mut Ui, agg: &Aggregates, colors: &ChartColors) {
    if agg.total == 0 {
        info(ui, "No titles match the selected filters.");
        return;
    }
    let bars: Vec<Bar> = agg
        .type_counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .name(c.kind.as_str())
                .fill(colors.for_type(c.kind))
                .width(0.6)
        })
        .collect();

    Plot::new("type_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Titles")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Titles per type"));
        });
}

fn missing_chart(ui: &mut Ui, agg: &Aggregates, colors: &ChartColors) {
    if agg.missing.is_empty() {
        info(ui, "No missing values.");
        return;
    }
    // Largest first, drawn top-down.
    let n = agg.missing.len();
    let bars: Vec<Bar> = agg
        .missing
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new((n - i) as f64, m.missing as f64)
                .name(m.column.name())
                .fill(colors.warning)
                .width(0.7)
        })
        .collect();

    Plot::new("missing_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Missing values")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
    labels(
        ui,
        "missing_values",
        agg.missing.iter().map(|m| (m.column.name().to_string(), m.missing)),
    );
}

fn delay_chart(ui: &mut Ui, agg: &Aggregates, colors: &ChartColors) {
    if agg.delays.iter().all(|d| d.spread.is_none()) {
        info(ui, "No delay data for the selected filters.");
        return;
    }
    let boxes: Vec<BoxElem> = agg
        .delays
        .iter()
        .enumerate()
        .filter_map(|(i, d)| {
            let s = d.spread?;
            let color = colors.for_type(d.kind);
            Some(
                BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                    .name(d.kind.as_str())
                    .fill(color.linear_multiply(0.3))
                    .stroke(Stroke::new(1.5, color))
                    .box_width(0.5),
            )
        })
        .collect();

    Plot::new("delay_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Years")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("Delay (years)"));
        });

    for d in &agg.delays {
        let mean = d
            .mean
            .map_or_else(|| "N/A".to_string(), |m| format!("{m:.1} years"));
        ui.label(format!("Average delay, {}: {mean}", d.kind));
    }
}

fn duration_chart(ui: &mut Ui, agg: &Aggregates, colors: &ChartColors) {
    let hist = &agg.duration_histogram;
    if hist.is_empty() {
        info(ui, "Not enough movie duration data for the selected filters.");
        return;
    }
    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.0}–{:.0} min", b.start, b.end))
                .fill(colors.for_type(TitleType::Movie))
        })
        .collect();

    Plot::new("duration_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Duration (minutes)")
        .y_axis_label("Movies")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn country_chart(ui: &mut Ui, agg: &Aggregates, colors: &ChartColors) {
    if agg.top_countries.is_empty() {
        info(ui, "No titles match the selected filters.");
        return;
    }
    let n = agg.top_countries.len();
    let bars: Vec<Bar> = agg
        .top_countries
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new((n - i) as f64, c.count as f64)
                .name(&c.value)
                .fill(colors.accent)
                .width(0.7)
        })
        .collect();

    Plot::new("country_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Titles")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
    labels(
        ui,
        "country_values",
        agg.top_countries.iter().map(|c| (c.value.clone(), c.count)),
    );
}

/// Ranked name/count list under a horizontal bar chart.
fn labels(ui: &mut Ui, id: &str, rows: impl Iterator<Item = (String, usize)>) {
    egui::CollapsingHeader::new("Values")
        .id_salt(id)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new((id, "grid")).striped(true).show(ui, |ui: &mut Ui| {
                for (name, count) in rows {
                    ui.label(name);
                    ui.label(count.to_string());
                    ui.end_row();
                }
            });
        });
}
