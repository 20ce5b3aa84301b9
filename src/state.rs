use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use catalog_explorer::config::Args;
use catalog_explorer::data::aggregate::{Aggregates, FilterOptions};
use catalog_explorer::data::cache::CatalogCache;
use catalog_explorer::data::export;
use catalog_explorer::data::filter::{FilterCriteria, FilteredView, filter};
use catalog_explorer::data::model::{Catalog, TitleType};

use crate::color::ChartColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub args: Args,

    cache: CatalogCache,

    /// File the current catalog came from.
    pub source: Option<PathBuf>,

    /// Loaded catalog (None until a file loads successfully).
    pub catalog: Option<Arc<Catalog>>,

    /// Current sidebar selection.
    pub criteria: FilterCriteria,

    pub options: FilterOptions,

    /// Rows passing the current criteria, with their aggregates (cached).
    pub view: Option<(FilteredView, Aggregates)>,

    pub colors: ChartColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(args: Args) -> Self {
        let options = args.filter_options();
        Self {
            args,
            cache: CatalogCache::new(),
            source: None,
            catalog: None,
            criteria: FilterCriteria::default(),
            options,
            view: None,
            colors: ChartColors::default(),
            status_message: None,
        }
    }

    /// Load (or reuse) the catalog at `path` and reset the filters.
    ///
    /// On failure the previous catalog stays on screen and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(catalog) => {
                self.source = Some(path.to_path_buf());
                self.set_catalog(catalog);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current source if it changed on disk.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.open(&path);
        }
    }

    /// Ingest a newly loaded catalog and initialise the filters.
    pub fn set_catalog(&mut self, catalog: Arc<Catalog>) {
        let unchanged = self
            .catalog
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &catalog));
        if !unchanged {
            self.criteria = self.args.initial_criteria(&catalog);
        }
        self.catalog = Some(catalog);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view and aggregates after a filter change.
    pub fn refilter(&mut self) {
        self.view = self
            .catalog
            .as_ref()
            .map(|catalog| filter(catalog, &self.criteria, &self.options));
    }

    pub fn aggregates(&self) -> Option<&Aggregates> {
        self.view.as_ref().map(|(_, agg)| agg)
    }

    pub fn toggle_type(&mut self, kind: TitleType) {
        if !self.criteria.types.remove(&kind) {
            self.criteria.types.insert(kind);
        }
        self.refilter();
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.criteria.countries.remove(country) {
            self.criteria.countries.insert(country.to_string());
        }
        self.refilter();
    }

    /// Select every country offered as a filter choice.
    pub fn select_all_countries(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.criteria.countries = catalog
                .top_countries
                .iter()
                .map(|c| c.value.clone())
                .collect();
            self.refilter();
        }
    }

    pub fn select_no_countries(&mut self) {
        self.criteria.countries.clear();
        self.refilter();
    }

    /// Write the current view to `path`.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let Some((view, _)) = &self.view else {
            anyhow::bail!("no catalog loaded");
        };
        export::export_to_path(view, path)?;
        self.status_message = Some(format!("Exported {} titles to {}", view.len(), path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(source: &str) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        std::fs::write(&path, source).unwrap();
        let mut state = AppState::new(Args::default());
        state.open(&path);
        (dir, state)
    }

    const SOURCE: &str = "type,release_year,country\n\
                          Movie,2010,France\n\
                          TV Show,2012,France\n\
                          Movie,2015,India\n";

    #[test]
    fn opening_a_file_applies_startup_selection() {
        let (_dir, state) = state_with(SOURCE);
        let agg = state.aggregates().unwrap();
        assert_eq!(agg.total, 3);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn toggles_refilter_immediately() {
        let (_dir, mut state) = state_with(SOURCE);
        state.toggle_type(TitleType::TvShow);
        assert_eq!(state.aggregates().unwrap().total, 2);
        state.toggle_country("India");
        assert_eq!(state.aggregates().unwrap().total, 1);
        state.select_no_countries();
        assert_eq!(state.aggregates().unwrap().total, 0);
        state.select_all_countries();
        assert_eq!(state.aggregates().unwrap().total, 2);
    }

    #[test]
    fn reload_of_unchanged_source_keeps_selection() {
        let (_dir, mut state) = state_with(SOURCE);
        state.toggle_type(TitleType::Movie);
        state.reload();
        assert!(!state.criteria.types.contains(&TitleType::Movie));
    }

    #[test]
    fn failed_open_reports_and_keeps_catalog() {
        let (dir, mut state) = state_with(SOURCE);
        state.open(&dir.path().join("nope.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert!(state.catalog.is_some());
    }

    #[test]
    fn export_writes_current_view() {
        let (dir, mut state) = state_with(SOURCE);
        let out = dir.path().join("out.csv");
        state.export_to(&out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
