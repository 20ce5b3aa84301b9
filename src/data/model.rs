use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

/// Placeholder stored in `country`, `director` and `cast` when the source cell is empty.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Placeholder stored in `rating` when the source cell is empty.
pub const NOT_CLASSIFIED: &str = "Not classified";

/// How many countries the filter panel offers.
pub const COUNTRY_CHOICES: usize = 20;

// ---------------------------------------------------------------------------
// TitleType
// ---------------------------------------------------------------------------

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TitleType {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl TitleType {
    pub const ALL: [TitleType; 2] = [TitleType::Movie, TitleType::TvShow];

    pub fn as_str(self) -> &'static str {
        match self {
            TitleType::Movie => "Movie",
            TitleType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Movie" => Ok(TitleType::Movie),
            "TV Show" => Ok(TitleType::TvShow),
            other => Err(format!("unknown title type '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the exported / inspected columns, in export order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    ShowId,
    Type,
    Title,
    Director,
    Cast,
    Country,
    DateAdded,
    ReleaseYear,
    Rating,
    Duration,
    ListedIn,
    Description,
    YearAdded,
    MonthAdded,
    DurationMin,
    DurationSeasons,
    DelayYears,
}

impl Column {
    pub const ALL: [Column; 17] = [
        Column::ShowId,
        Column::Type,
        Column::Title,
        Column::Director,
        Column::Cast,
        Column::Country,
        Column::DateAdded,
        Column::ReleaseYear,
        Column::Rating,
        Column::Duration,
        Column::ListedIn,
        Column::Description,
        Column::YearAdded,
        Column::MonthAdded,
        Column::DurationMin,
        Column::DurationSeasons,
        Column::DelayYears,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::ShowId => "show_id",
            Column::Type => "type",
            Column::Title => "title",
            Column::Director => "director",
            Column::Cast => "cast",
            Column::Country => "country",
            Column::DateAdded => "date_added",
            Column::ReleaseYear => "release_year",
            Column::Rating => "rating",
            Column::Duration => "duration",
            Column::ListedIn => "listed_in",
            Column::Description => "description",
            Column::YearAdded => "year_added",
            Column::MonthAdded => "month_added",
            Column::DurationMin => "duration_min",
            Column::DurationSeasons => "duration_seasons",
            Column::DelayYears => "delay_years",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Title – one row of the catalog after derivation
// ---------------------------------------------------------------------------

/// A single catalog entry with its derived columns.
///
/// `country`, `director`, `cast` and `rating` are always populated: absent
/// source values hold [`NOT_SPECIFIED`] / [`NOT_CLASSIFIED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub id: String,
    pub kind: TitleType,
    pub title: Option<String>,
    pub director: String,
    pub cast: String,
    pub country: String,
    pub date_added: Option<NaiveDate>,
    pub year_added: Option<i32>,
    pub month_added: Option<u32>,
    pub release_year: i32,
    pub rating: String,
    pub duration: Option<String>,
    pub duration_min: Option<u32>,
    pub duration_seasons: Option<u32>,
    /// Years between release and addition; never negative.
    pub delay_years: Option<u32>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

impl Title {
    /// Whether the given column has no value on this row.
    ///
    /// Imputed columns count as present: their sentinel is a value.
    pub fn is_missing(&self, column: Column) -> bool {
        match column {
            Column::ShowId
            | Column::Type
            | Column::Director
            | Column::Cast
            | Column::Country
            | Column::ReleaseYear
            | Column::Rating => false,
            Column::Title => self.title.is_none(),
            Column::DateAdded => self.date_added.is_none(),
            Column::Duration => self.duration.is_none(),
            Column::ListedIn => self.listed_in.is_none(),
            Column::Description => self.description.is_none(),
            Column::YearAdded => self.year_added.is_none(),
            Column::MonthAdded => self.month_added.is_none(),
            Column::DurationMin => self.duration_min.is_none(),
            Column::DurationSeasons => self.duration_seasons.is_none(),
            Column::DelayYears => self.delay_years.is_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded table
// ---------------------------------------------------------------------------

/// Count of missing values for one column of the unfiltered catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: Column,
    pub missing: usize,
}

/// A value and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedValue {
    pub value: String,
    pub count: usize,
}

/// The full derived table with statistics that never depend on filters.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    titles: Vec<Title>,
    /// Rows dropped during load because `type` or `release_year` was unusable.
    pub skipped_rows: usize,
    /// Title types in order of first appearance.
    pub types: Vec<TitleType>,
    /// Smallest and largest `release_year`, `None` when empty.
    pub release_years: Option<(i32, i32)>,
    /// Most frequent countries of the whole table, used as filter choices.
    pub top_countries: Vec<RankedValue>,
    /// Columns with at least one missing value, most missing first.
    pub missing: Vec<MissingCount>,
}

impl Catalog {
    /// Build the catalog and its filter-independent statistics.
    pub fn from_titles(titles: Vec<Title>, skipped_rows: usize) -> Self {
        let mut types = Vec::new();
        for t in &titles {
            if !types.contains(&t.kind) {
                types.push(t.kind);
            }
        }

        let release_years = titles.iter().fold(None, |acc, t| match acc {
            None => Some((t.release_year, t.release_year)),
            Some((lo, hi)) => Some((t.release_year.min(lo), t.release_year.max(hi))),
        });

        let top_countries = rank_values(titles.iter().map(|t| t.country.as_str()), COUNTRY_CHOICES);
        let missing = missing_counts(&titles);

        Catalog {
            titles,
            skipped_rows,
            types,
            release_years,
            top_countries,
            missing,
        }
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Count values and keep the `limit` most frequent.
///
/// Ties keep the order in which values were first seen.
pub fn rank_values<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<RankedValue> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<RankedValue> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => ranked[i].count += 1,
            None => {
                index.insert(value, ranked.len());
                ranked.push(RankedValue {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable: equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

fn missing_counts(titles: &[Title]) -> Vec<MissingCount> {
    let mut counts: Vec<MissingCount> = Column::ALL
        .iter()
        .map(|&column| MissingCount {
            column,
            missing: titles.iter().filter(|t| t.is_missing(column)).count(),
        })
        .filter(|c| c.missing > 0)
        .collect();
    counts.sort_by(|a, b| b.missing.cmp(&a.missing));
    counts
}
