use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use catalog_explorer::data::model::TitleType;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` visually distinct colours with evenly spaced hues, starting at `hue_offset`.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Fixed series colours so a type keeps its colour across every chart.
#[derive(Debug, Clone)]
pub struct ChartColors {
    movie: Color32,
    tv_show: Color32,
    /// Colour of single-series bar charts.
    pub accent: Color32,
    /// Colour of the missing-values chart.
    pub warning: Color32,
}

impl Default for ChartColors {
    fn default() -> Self {
        let series = generate_palette(2, 210.0);
        let extras = generate_palette(2, 30.0);
        ChartColors {
            movie: series[0],
            tv_show: series[1],
            accent: extras[1],
            warning: extras[0],
        }
    }
}

impl ChartColors {
    pub fn for_type(&self, kind: TitleType) -> Color32 {
        match kind {
            TitleType::Movie => self.movie,
            TitleType::TvShow => self.tv_show,
        }
    }
}
