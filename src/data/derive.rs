//! Turning raw text cells into typed, derived [`Title`] rows.
//!
//! Every parser here returns `Option`: a malformed cell becomes an absent
//! value on that row and never fails the load.

use chrono::{Datelike, NaiveDate};

use super::model::{Catalog, NOT_CLASSIFIED, NOT_SPECIFIED, Title, TitleType};

/// One source row, every cell still text. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTitle {
    pub show_id: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Duration grammar
// ---------------------------------------------------------------------------

/// A parsed `duration` cell.
///
/// ```text
/// duration := <integer> " " "min"
///           | <integer> " " "Season" ["s"]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSpec {
    Minutes(u32),
    Seasons(u32),
}

impl DurationSpec {
    pub fn parse(text: &str) -> Option<Self> {
        let (amount, unit) = text.trim().split_once(char::is_whitespace)?;
        if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let amount: u32 = amount.parse().ok()?;
        match unit.trim() {
            "min" => Some(DurationSpec::Minutes(amount)),
            "Season" | "Seasons" => Some(DurationSpec::Seasons(amount)),
            _ => None,
        }
    }

    pub fn minutes(self) -> Option<u32> {
        match self {
            DurationSpec::Minutes(m) => Some(m),
            DurationSpec::Seasons(_) => None,
        }
    }

    pub fn seasons(self) -> Option<u32> {
        match self {
            DurationSpec::Seasons(s) => Some(s),
            DurationSpec::Minutes(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Parse a `date_added` cell such as `September 25, 2021`.
///
/// `%B` also accepts abbreviated month names, so `Sep 25, 2021` parses too.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Parse a year cell. Integral floats (`2015.0`, as some exporters write) are accepted.
pub fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Ok(year) = text.parse::<i32>() {
        return Some(year);
    }
    let value: f64 = text.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// `year_added - release_year`, or `None` when that would be negative.
pub fn delay_years(year_added: Option<i32>, release_year: i32) -> Option<u32> {
    let delay = year_added?.checked_sub(release_year)?;
    u32::try_from(delay).ok()
}

fn impute(value: Option<String>, sentinel: &str) -> String {
    value.unwrap_or_else(|| sentinel.to_string())
}

// ---------------------------------------------------------------------------
// Row derivation
// ---------------------------------------------------------------------------

/// Why a row could not become a [`Title`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    Type(Option<String>),
    ReleaseYear(Option<String>),
}

/// Derive a [`Title`] from a raw row. `row` numbers rows that lack a `show_id`.
pub fn derive_title(raw: RawTitle, row: usize) -> Result<Title, RowRejection> {
    let kind = match raw.kind.as_deref().map(str::parse::<TitleType>) {
        Some(Ok(kind)) => kind,
        _ => return Err(RowRejection::Type(raw.kind)),
    };
    let release_year = match raw.release_year.as_deref().and_then(parse_year) {
        Some(year) => year,
        None => return Err(RowRejection::ReleaseYear(raw.release_year)),
    };

    let date_added = raw.date_added.as_deref().and_then(parse_date);
    let year_added = date_added.map(|d| d.year());
    let month_added = date_added.map(|d| d.month());
    let duration_spec = raw.duration.as_deref().and_then(DurationSpec::parse);

    Ok(Title {
        id: raw.show_id.unwrap_or_else(|| format!("row-{row}")),
        kind,
        title: raw.title,
        director: impute(raw.director, NOT_SPECIFIED),
        cast: impute(raw.cast, NOT_SPECIFIED),
        country: impute(raw.country, NOT_SPECIFIED),
        date_added,
        year_added,
        month_added,
        release_year,
        rating: impute(raw.rating, NOT_CLASSIFIED),
        duration: raw.duration,
        duration_min: duration_spec.and_then(DurationSpec::minutes),
        duration_seasons: duration_spec.and_then(DurationSpec::seasons),
        delay_years: delay_years(year_added, release_year),
        listed_in: raw.listed_in,
        description: raw.description,
    })
}

/// Derive every row and build the [`Catalog`]. Unusable rows are logged and counted.
pub fn derive_catalog(rows: impl IntoIterator<Item = RawTitle>) -> Catalog {
    let mut titles = Vec::new();
    let mut skipped = 0;

    for (row, raw) in rows.into_iter().enumerate() {
        match derive_title(raw, row) {
            Ok(title) => titles.push(title),
            Err(RowRejection::Type(value)) => {
                log::warn!("Skipping row {row}: unusable type {value:?}");
                skipped += 1;
            }
            Err(RowRejection::ReleaseYear(value)) => {
                log::warn!("Skipping row {row}: unusable release_year {value:?}");
                skipped += 1;
            }
        }
    }

    Catalog::from_titles(titles, skipped)
}

/// Normalise a raw cell: surrounding whitespace trimmed, empty becomes `None`.
pub fn cell(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, duration: &str, release_year: &str, date_added: &str) -> RawTitle {
        RawTitle {
            kind: cell(kind),
            duration: cell(duration),
            release_year: cell(release_year),
            date_added: cell(date_added),
            ..RawTitle::default()
        }
    }

    #[test]
    fn duration_grammar_accepts_minutes_and_seasons() {
        assert_eq!(DurationSpec::parse("90 min"), Some(DurationSpec::Minutes(90)));
        assert_eq!(DurationSpec::parse("1 Season"), Some(DurationSpec::Seasons(1)));
        assert_eq!(DurationSpec::parse(" 3 Seasons "), Some(DurationSpec::Seasons(3)));
    }

    #[test]
    fn duration_grammar_rejects_malformed_text() {
        let malformed = [
            "", "min", "90min", "abc min", "-5 min", "1.5 min", "2 seasons", "3 Episodes",
            "90 min extra",
        ];
        for text in malformed {
            assert_eq!(DurationSpec::parse(text), None, "{text:?} should not parse");
        }
    }

    #[test]
    fn dates_parse_in_source_and_iso_forms() {
        let expected = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        assert_eq!(parse_date("January 1, 2018"), Some(expected));
        assert_eq!(parse_date(" January 1, 2018"), Some(expected));
        assert_eq!(parse_date("Jan 1, 2018"), Some(expected));
        assert_eq!(parse_date("2018-01-01"), Some(expected));
        assert_eq!(parse_date("01/01/2018"), Some(expected));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("someday"), None);
    }

    #[test]
    fn years_accept_integral_floats_only() {
        assert_eq!(parse_year("2015"), Some(2015));
        assert_eq!(parse_year("2015.0"), Some(2015));
        assert_eq!(parse_year("2015.5"), None);
        assert_eq!(parse_year("NaN"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn negative_delay_is_absent_not_zero() {
        assert_eq!(delay_years(Some(2018), 2015), Some(3));
        assert_eq!(delay_years(Some(2015), 2015), Some(0));
        assert_eq!(delay_years(Some(2010), 2015), None);
        assert_eq!(delay_years(None, 2015), None);
    }

    #[test]
    fn movie_row_derives_minutes_and_delay() {
        let title = derive_title(raw("Movie", "90 min", "2015", "January 1, 2018"), 0).unwrap();
        assert_eq!(title.duration_min, Some(90));
        assert_eq!(title.duration_seasons, None);
        assert_eq!(title.year_added, Some(2018));
        assert_eq!(title.month_added, Some(1));
        assert_eq!(title.delay_years, Some(3));
    }

    #[test]
    fn missing_categoricals_are_imputed() {
        let title = derive_title(raw("TV Show", "3 Seasons", "2020", ""), 7).unwrap();
        assert_eq!(title.id, "row-7");
        assert_eq!(title.country, NOT_SPECIFIED);
        assert_eq!(title.director, NOT_SPECIFIED);
        assert_eq!(title.cast, NOT_SPECIFIED);
        assert_eq!(title.rating, NOT_CLASSIFIED);
    }

    #[test]
    fn present_values_are_not_overwritten() {
        let mut row = raw("Movie", "100 min", "2001", "");
        row.country = cell("Japan");
        row.rating = cell("PG");
        let title = derive_title(row, 0).unwrap();
        assert_eq!(title.country, "Japan");
        assert_eq!(title.rating, "PG");
    }

    #[test]
    fn unusable_required_cells_reject_the_row() {
        assert_eq!(
            derive_title(raw("Podcast", "", "2020", ""), 0),
            Err(RowRejection::Type(Some("Podcast".into())))
        );
        assert_eq!(
            derive_title(raw("Movie", "", "soon", ""), 0),
            Err(RowRejection::ReleaseYear(Some("soon".into())))
        );
    }

    #[test]
    fn derive_catalog_counts_skipped_rows() {
        let catalog = derive_catalog(vec![
            raw("Movie", "90 min", "2015", ""),
            raw("", "90 min", "2015", ""),
            raw("TV Show", "2 Seasons", "", ""),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped_rows, 2);
    }
}
