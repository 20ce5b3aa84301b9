//! Statistics behind every chart of the dashboard.
//!
//! Statistics that can be unavailable (no eligible rows) are `Option`s;
//! nothing here ever yields NaN.

use serde::Serialize;

use super::filter::{FilteredView, YearRange};
use super::model::{MissingCount, RankedValue, TitleType, rank_values};

/// Tunables of the aggregate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Number of equal-width bins of the duration histogram.
    pub histogram_bins: usize,
    /// How many countries the filtered ranking keeps.
    pub top_countries: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            histogram_bins: 50,
            top_countries: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub kind: TitleType,
    pub count: usize,
}

/// Five-number summary used for box plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// `None` for an empty sample. Quartiles interpolate linearly between ranks.
    pub fn from_sample(values: &[u32]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let (&first, &last) = (sorted.first()?, sorted.last()?);
        Some(BoxStats {
            min: first as f64,
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: last as f64,
        })
    }
}

fn quantile(sorted: &[u32], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] as f64 + (sorted[upper] as f64 - sorted[lower] as f64) * frac
}

/// Delay between release and addition for one title type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayStats {
    pub kind: TitleType,
    /// Rows of this type with a known delay.
    pub count: usize,
    pub mean: Option<f64>,
    pub spread: Option<BoxStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Exclusive upper edge, inclusive for the last bin.
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Equal-width bins spanning the observed minimum to maximum.
    pub fn from_values(values: &[u32], bins: usize) -> Self {
        let (Some(&lo), Some(&hi)) = (values.iter().min(), values.iter().max()) else {
            return Histogram::default();
        };
        let lo = lo as f64;
        let hi = hi as f64;

        if hi == lo {
            return Histogram {
                bins: vec![HistogramBin {
                    start: lo,
                    end: lo + 1.0,
                    count: values.len(),
                }],
            };
        }

        let n = bins.max(1);
        let width = (hi - lo) / n as f64;
        let mut out: Vec<HistogramBin> = (0..n)
            .map(|i| HistogramBin {
                start: lo + width * i as f64,
                end: if i + 1 == n { hi } else { lo + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v as f64) - lo) / width) as usize;
            out[idx.min(n - 1)].count += 1;
        }
        Histogram { bins: out }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Everything the presentation renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub total: usize,
    pub type_counts: Vec<TypeCount>,
    /// Oldest and newest release in the view.
    pub release_years: Option<YearRange>,
    pub delays: Vec<DelayStats>,
    /// `duration_min` of the Movie rows in the view.
    pub duration_histogram: Histogram,
    pub top_countries: Vec<RankedValue>,
    /// Top countries of the unfiltered catalog (filter choices).
    pub country_choices: Vec<RankedValue>,
    /// Missing values of the unfiltered catalog.
    pub missing: Vec<MissingCount>,
}

impl Aggregates {
    pub fn compute(view: &FilteredView, options: &FilterOptions) -> Self {
        let catalog = view.catalog();

        let type_counts = TitleType::ALL
            .iter()
            .map(|&kind| TypeCount {
                kind,
                count: view.iter().filter(|t| t.kind == kind).count(),
            })
            .collect();

        let release_years = view.iter().fold(None, |acc: Option<YearRange>, t| {
            let y = t.release_year;
            Some(match acc {
                None => YearRange::new(y, y),
                Some(r) => YearRange::new(r.min.min(y), r.max.max(y)),
            })
        });

        let delays = TitleType::ALL
            .iter()
            .map(|&kind| {
                let sample: Vec<u32> = view
                    .iter()
                    .filter(|t| t.kind == kind)
                    .filter_map(|t| t.delay_years)
                    .collect();
                let mean = (!sample.is_empty())
                    .then(|| sample.iter().map(|&d| d as f64).sum::<f64>() / sample.len() as f64);
                DelayStats {
                    kind,
                    count: sample.len(),
                    mean,
                    spread: BoxStats::from_sample(&sample),
                }
            })
            .collect();

        let minutes: Vec<u32> = view
            .iter()
            .filter(|t| t.kind == TitleType::Movie)
            .filter_map(|t| t.duration_min)
            .collect();

        Aggregates {
            total: view.len(),
            type_counts,
            release_years,
            delays,
            duration_histogram: Histogram::from_values(&minutes, options.histogram_bins),
            top_countries: rank_values(
                view.iter().map(|t| t.country.as_str()),
                options.top_countries,
            ),
            country_choices: catalog.top_countries.clone(),
            missing: catalog.missing.clone(),
        }
    }

    pub fn type_count(&self, kind: TitleType) -> usize {
        self.type_counts
            .iter()
            .find(|c| c.kind == kind)
            .map_or(0, |c| c.count)
    }

    pub fn delay(&self, kind: TitleType) -> Option<&DelayStats> {
        self.delays.iter().find(|d| d.kind == kind)
    }
}
