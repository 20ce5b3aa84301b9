use std::path::PathBuf;

use clap::Parser;

use crate::data::aggregate::FilterOptions;
use crate::data::filter::FilterCriteria;
use crate::data::model::Catalog;

/// Command-line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "catalog-explorer", version, about = "Explore a media catalog dataset")]
pub struct Args {
    /// Catalog file to open (.csv, .json or .parquet).
    #[arg(default_value = "netflix_titles.csv")]
    pub source: PathBuf,

    /// First release year selected at startup (clamped to the data).
    #[arg(long, default_value_t = 2000)]
    pub year_from: i32,

    /// How many of the most frequent countries are selected at startup.
    #[arg(long, default_value_t = 5)]
    pub countries: usize,

    /// Number of bins of the movie duration histogram.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(1..))]
    pub bins: u16,

    /// Print the aggregates of the startup selection as JSON and exit.
    #[arg(long)]
    pub summary: bool,

    /// Write the startup selection as CSV to this path and exit.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Default log level; RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Args {
    fn default() -> Self {
        Args::parse_from(["catalog-explorer"])
    }
}

impl Args {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            histogram_bins: usize::from(self.bins),
            ..FilterOptions::default()
        }
    }

    pub fn initial_criteria(&self, catalog: &Catalog) -> FilterCriteria {
        FilterCriteria::initial(catalog, self.year_from, self.countries)
    }

    /// Whether the run ends without opening a window.
    pub fn headless(&self) -> bool {
        self.summary || self.export.is_some()
    }
}
