use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use super::aggregate::{Aggregates, FilterOptions};
use super::model::{Catalog, Title, TitleType};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        YearRange { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// What the user currently selects. Built fresh on every interaction.
///
/// An empty `types` or `countries` set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub years: Option<YearRange>,
    pub types: BTreeSet<TitleType>,
    pub countries: BTreeSet<String>,
}

impl FilterCriteria {
    /// Starting selection for a freshly loaded catalog.
    ///
    /// Years run from `year_from` (clamped into the data range) to the newest
    /// release; every observed type is selected; the first
    /// `preselected_countries` of the top countries are selected.
    pub fn initial(catalog: &Catalog, year_from: i32, preselected_countries: usize) -> Self {
        let years = catalog
            .release_years
            .map(|(lo, hi)| YearRange::new(year_from.clamp(lo, hi), hi));

        FilterCriteria {
            years,
            types: catalog.types.iter().copied().collect(),
            countries: catalog
                .top_countries
                .iter()
                .take(preselected_countries)
                .map(|c| c.value.clone())
                .collect(),
        }
    }

    /// Whether a title passes every constraint.
    ///
    /// Country matching is on the whole string: `"United States, France"`
    /// only matches that exact selection.
    pub fn accepts(&self, title: &Title) -> bool {
        self.years.is_some_and(|r| r.contains(title.release_year))
            && self.types.contains(&title.kind)
            && self.countries.contains(&title.country)
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a catalog snapshot that passed a [`FilterCriteria`], in source order.
///
/// Holds its own `Arc` so a reload elsewhere never changes what it sees.
#[derive(Debug, Clone)]
pub struct FilteredView {
    catalog: Arc<Catalog>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &Title> + '_ {
        let titles = self.catalog.titles();
        self.indices.iter().map(move |&i| &titles[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl PartialEq for FilteredView {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.catalog, &other.catalog) && self.indices == other.indices
    }
}

/// Return indices of titles that pass the criteria.
pub fn filtered_indices(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<usize> {
    catalog
        .titles()
        .iter()
        .enumerate()
        .filter(|(_, title)| criteria.accepts(title))
        .map(|(i, _)| i)
        .collect()
}

/// Apply the criteria and compute every aggregate the dashboard shows.
pub fn filter(
    catalog: &Arc<Catalog>,
    criteria: &FilterCriteria,
    options: &FilterOptions,
) -> (FilteredView, Aggregates) {
    let view = FilteredView {
        catalog: Arc::clone(catalog),
        indices: filtered_indices(catalog, criteria),
    };
    log::debug!("Filter kept {} of {} titles", view.len(), catalog.len());
    let aggregates = Aggregates::compute(&view, options);
    (view, aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;

    fn catalog() -> Arc<Catalog> {
        let text = "type,release_year,country\n\
                    Movie,1999,France\n\
                    TV Show,2005,France\n\
                    Movie,2010,India\n\
                    Movie,2020,\"United States, France\"\n\
                    TV Show,2021,India\n";
        Arc::new(load_csv_reader(text.as_bytes()).unwrap())
    }

    fn criteria(min: i32, max: i32, types: &[TitleType], countries: &[&str]) -> FilterCriteria {
        FilterCriteria {
            years: Some(YearRange::new(min, max)),
            types: types.iter().copied().collect(),
            countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn rows_must_pass_every_constraint() {
        let catalog = catalog();
        let c = criteria(2000, 2021, &[TitleType::Movie], &["France", "India"]);
        assert_eq!(filtered_indices(&catalog, &c), vec![2]);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let catalog = catalog();
        let c = criteria(1999, 2005, &TitleType::ALL, &["France"]);
        assert_eq!(filtered_indices(&catalog, &c), vec![0, 1]);
    }

    #[test]
    fn multi_country_strings_match_only_whole() {
        let catalog = catalog();
        let c = criteria(1900, 2100, &TitleType::ALL, &["United States"]);
        assert!(filtered_indices(&catalog, &c).is_empty());
        let c = criteria(1900, 2100, &TitleType::ALL, &["United States, France"]);
        assert_eq!(filtered_indices(&catalog, &c), vec![3]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let catalog = catalog();
        let c = criteria(1900, 2100, &[], &["France"]);
        assert!(filtered_indices(&catalog, &c).is_empty());
        assert!(filtered_indices(&catalog, &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn initial_criteria_clamp_years_and_preselect_top_countries() {
        let catalog = catalog();
        let c = FilterCriteria::initial(&catalog, 2000, 1);
        assert_eq!(c.years, Some(YearRange::new(2000, 2021)));
        assert_eq!(c.types, TitleType::ALL.into_iter().collect::<BTreeSet<_>>());
        assert_eq!(c.countries, BTreeSet::from(["France".to_string()]));

        let c = FilterCriteria::initial(&catalog, 1800, 0);
        assert_eq!(c.years, Some(YearRange::new(1999, 2021)));
        assert!(c.countries.is_empty());
    }

    #[test]
    fn view_keeps_its_snapshot() {
        let catalog = catalog();
        let c = criteria(1900, 2100, &TitleType::ALL, &["India"]);
        let (view, _) = filter(&catalog, &c, &FilterOptions::default());
        drop(catalog);
        let years: Vec<i32> = view.iter().map(|t| t.release_year).collect();
        assert_eq!(years, vec![2010, 2021]);
    }
}
