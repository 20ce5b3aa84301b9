use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use super::filter::FilteredView;
use super::model::{Column, Title, TitleType};

/// File name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "catalog_filtered.csv";

/// One exported row. Field order must follow [`Column::ALL`].
#[derive(Serialize)]
struct ExportRow<'a> {
    show_id: &'a str,
    #[serde(rename = "type")]
    kind: TitleType,
    title: Option<&'a str>,
    director: &'a str,
    cast: &'a str,
    country: &'a str,
    date_added: Option<NaiveDate>,
    release_year: i32,
    rating: &'a str,
    duration: Option<&'a str>,
    listed_in: Option<&'a str>,
    description: Option<&'a str>,
    year_added: Option<i32>,
    month_added: Option<u32>,
    duration_min: Option<u32>,
    duration_seasons: Option<u32>,
    delay_years: Option<u32>,
}

impl<'a> From<&'a Title> for ExportRow<'a> {
    fn from(t: &'a Title) -> Self {
        ExportRow {
            show_id: &t.id,
            kind: t.kind,
            title: t.title.as_deref(),
            director: &t.director,
            cast: &t.cast,
            country: &t.country,
            date_added: t.date_added,
            release_year: t.release_year,
            rating: &t.rating,
            duration: t.duration.as_deref(),
            listed_in: t.listed_in.as_deref(),
            description: t.description.as_deref(),
            year_added: t.year_added,
            month_added: t.month_added,
            duration_min: t.duration_min,
            duration_seasons: t.duration_seasons,
            delay_years: t.delay_years,
        }
    }
}

/// Write the view as CSV, derived columns included. The header is written
/// even when the view is empty.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(Column::ALL.iter().map(|c| c.name()))
        .context("writing CSV header")?;
    for title in view.iter() {
        out.serialize(ExportRow::from(title))
            .with_context(|| format!("writing title {}", title.id))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// The export as UTF-8 bytes, ready for a download or a save dialog.
pub fn to_csv_bytes(view: &FilteredView) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

pub fn export_to_path(view: &FilteredView, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, std::io::BufWriter::new(file))?;
    log::info!("Exported {} titles to {}", view.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::aggregate::FilterOptions;
    use crate::data::filter::{FilterCriteria, filter};
    use crate::data::loader::load_csv_reader;

    fn view(countries: &[&str]) -> FilteredView {
        let text = "show_id,type,title,country,date_added,release_year,duration\n\
                    s1,Movie,Alpha,France,\"January 1, 2018\",2015,90 min\n\
                    s2,TV Show,Beta,,,2020,3 Seasons\n";
        let catalog = Arc::new(load_csv_reader(text.as_bytes()).unwrap());
        let mut criteria = FilterCriteria::initial(&catalog, 1900, 0);
        criteria.countries = countries.iter().map(|c| c.to_string()).collect();
        filter(&catalog, &criteria, &FilterOptions::default()).0
    }

    #[test]
    fn export_includes_derived_columns() {
        let text = String::from_utf8(to_csv_bytes(&view(&["France"])).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,\
             listed_in,description,year_added,month_added,duration_min,duration_seasons,delay_years"
        );
        assert_eq!(
            lines.next().unwrap(),
            "s1,Movie,Alpha,Not specified,Not specified,France,2018-01-01,2015,Not classified,\
             90 min,,,2018,1,90,,3"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn tv_show_label_round_trips_to_source_text() {
        let text = String::from_utf8(to_csv_bytes(&view(&["Not specified"])).unwrap()).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("s2,TV Show,Beta,"));
    }

    #[test]
    fn empty_view_still_has_header() {
        let text = String::from_utf8(to_csv_bytes(&view(&[])).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
