use std::io::Read;
use std::path::{Path, PathBuf};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::derive::{RawTitle, cell, derive_catalog};
use super::model::Catalog;

/// Columns without which no row can be derived.
pub const REQUIRED_COLUMNS: [&str; 2] = ["type", "release_year"];

/// Fatal load failures. Nothing is returned alongside these.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("source is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("JSON record {0} is not an object")]
    NotRecords(usize),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the catalog columns (`netflix_titles.csv` layout)
/// * `.json`    – `[{ "type": "Movie", "release_year": 2015, ... }, ...]`
/// * `.parquet` – one column per catalog field, strings or integers
pub fn load_file(path: &Path) -> Result<Catalog, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalog = match ext.as_str() {
        "csv" => load_csv_reader(open(path)?),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!(
        "Loaded {} titles from {} ({} rows skipped)",
        catalog.len(),
        path.display(),
        catalog.skipped_rows
    );
    Ok(catalog)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Column lookup shared by all formats
// ---------------------------------------------------------------------------

/// Position of each catalog field among the source columns.
#[derive(Debug)]
struct ColumnIndex {
    show_id: Option<usize>,
    kind: usize,
    title: Option<usize>,
    director: Option<usize>,
    cast: Option<usize>,
    country: Option<usize>,
    date_added: Option<usize>,
    release_year: usize,
    rating: Option<usize>,
    duration: Option<usize>,
    listed_in: Option<usize>,
    description: Option<usize>,
}

impl ColumnIndex {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        let (Some(kind), Some(release_year)) = (find("type"), find("release_year")) else {
            return Err(LoadError::MissingColumns(missing));
        };

        Ok(ColumnIndex {
            show_id: find("show_id"),
            kind,
            title: find("title"),
            director: find("director"),
            cast: find("cast"),
            country: find("country"),
            date_added: find("date_added"),
            release_year,
            rating: find("rating"),
            duration: find("duration"),
            listed_in: find("listed_in"),
            description: find("description"),
        })
    }

    /// Build a raw row, `get` returning the text of a column by position.
    fn raw_title(&self, get: impl Fn(usize) -> Option<String>) -> RawTitle {
        let opt = |idx: Option<usize>| idx.and_then(&get);
        RawTitle {
            show_id: opt(self.show_id),
            kind: get(self.kind),
            title: opt(self.title),
            director: opt(self.director),
            cast: opt(self.cast),
            country: opt(self.country),
            date_added: opt(self.date_added),
            release_year: get(self.release_year),
            rating: opt(self.rating),
            duration: opt(self.duration),
            listed_in: opt(self.listed_in),
            description: opt(self.description),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load a catalog from CSV text with a header row.
///
/// The header must be valid UTF-8. A data cell that is not reads as absent.
pub fn load_csv_reader<R: Read>(source: R) -> Result<Catalog, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();
    let headers: Vec<&str> = headers.iter().collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(columns.raw_title(|idx| {
            record
                .get(idx)
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
                .and_then(cell)
        }));
    }

    Ok(derive_catalog(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
///
/// Required keys are checked across all records: a key counts as present
/// when any record carries it.
fn load_json(path: &Path) -> Result<Catalog, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let objects: Vec<&Map<String, JsonValue>> = records
        .iter()
        .enumerate()
        .map(|(i, rec)| rec.as_object().ok_or(LoadError::NotRecords(i)))
        .collect::<Result<_, _>>()?;

    let mut headers: Vec<&str> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    let columns = ColumnIndex::resolve(&headers)?;

    let rows = objects.iter().map(|obj| {
        columns.raw_title(|idx| obj.get(headers[idx]).and_then(json_text))
    });
    Ok(derive_catalog(rows.collect::<Vec<_>>()))
}

fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => cell(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per catalog field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`, including
/// `category` columns) and **Polars** (`df.write_parquet()`); integer
/// `release_year` columns are fine.
fn load_parquet(path: &Path) -> Result<Catalog, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let columns = ColumnIndex::resolve(&headers)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let text = text_columns(&batch);
        for row in 0..batch.num_rows() {
            rows.push(columns.raw_title(|idx| {
                text.get(idx)
                    .and_then(Option::as_ref)
                    .and_then(|col| arrow_text(col, row))
            }));
        }
    }

    Ok(derive_catalog(rows))
}

/// Cast every column of a batch to UTF-8 strings, so dictionary, view and
/// numeric columns all read the same way. A column that cannot be cast is
/// `None` and its cells read as absent.
fn text_columns(batch: &RecordBatch) -> Vec<Option<ArrayRef>> {
    let schema = batch.schema();
    batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(col, field)| match cast(col, &DataType::Utf8) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!(
                    "Ignoring parquet column {} of type {}: {err}",
                    field.name(),
                    col.data_type()
                );
                None
            }
        })
        .collect()
}

/// One cell of a column produced by [`text_columns`].
fn arrow_text(col: &ArrayRef, row: usize) -> Option<String> {
    let text = col.as_string_opt::<i32>()?;
    if text.is_null(row) {
        return None;
    }
    cell(text.value(row))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        DictionaryArray, Float64Array, Int64Array, StringArray, StringViewArray,
    };
    use arrow::datatypes::{Field, Int32Type, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::derive::parse_year;
    use crate::data::model::{NOT_SPECIFIED, TitleType};

    const HEADER: &str = "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description\n";

    #[test]
    fn csv_with_all_columns_loads() {
        let text = format!(
            "{HEADER}s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,A film\n"
        );
        let catalog = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        let title = &catalog.titles()[0];
        assert_eq!(title.id, "s1");
        assert_eq!(title.year_added, Some(2021));
        assert_eq!(title.delay_years, Some(1));
        assert_eq!(title.cast, NOT_SPECIFIED);
    }

    #[test]
    fn missing_required_columns_are_fatal() {
        let err = load_csv_reader("title,country\nA,France\n".as_bytes()).unwrap_err();
        match err {
            LoadError::MissingColumns(cols) => assert_eq!(cols, vec!["type", "release_year"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_required_columns_is_enough() {
        let catalog = load_csv_reader("type,release_year\nTV Show,2019\n".as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.titles()[0].duration_seasons, None);
    }

    #[test]
    fn short_rows_read_missing_cells_as_absent() {
        let text = "type,release_year,duration\nMovie,2019\n";
        let catalog = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.titles()[0].duration, None);
    }

    #[test]
    fn json_numbers_and_strings_both_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.json");
        std::fs::write(
            &path,
            r#"[{"type":"Movie","release_year":2015,"duration":"95 min"},
                {"type":"TV Show","release_year":"2019","country":null}]"#,
        )
        .unwrap();
        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.titles()[0].duration_min, Some(95));
        assert_eq!(catalog.titles()[1].release_year, 2019);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.json");
        std::fs::write(&path, r#"[{"type":"Movie","release_year":2015}, 3]"#).unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::NotRecords(1))));
    }

    #[test]
    fn invalid_utf8_cell_reads_as_absent() {
        let mut text = b"type,release_year,description\nMovie,2015,ok\nMovie,2016,bad ".to_vec();
        text.extend_from_slice(&[0xff, b'\n']);

        let catalog = load_csv_reader(text.as_slice()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped_rows, 0);
        assert_eq!(catalog.titles()[0].description.as_deref(), Some("ok"));
        assert_eq!(catalog.titles()[1].description, None);
        assert_eq!(catalog.titles()[1].release_year, 2016);
    }

    fn write_parquet(
        dir: &tempfile::TempDir,
        fields: Vec<Field>,
        columns: Vec<ArrayRef>,
    ) -> PathBuf {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = dir.path().join("titles.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_with_integer_years_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            &dir,
            vec![
                Field::new("type", DataType::Utf8, true),
                Field::new("release_year", DataType::Int64, true),
                Field::new("date_added", DataType::Utf8, true),
            ],
            vec![
                Arc::new(StringArray::from(vec![Some("Movie"), Some("TV Show")])),
                Arc::new(Int64Array::from(vec![Some(2015), None])),
                Arc::new(StringArray::from(vec![Some("January 1, 2018"), None])),
            ],
        );

        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped_rows, 1);
        assert_eq!(catalog.titles()[0].delay_years, Some(3));
    }

    #[test]
    fn parquet_dictionary_strings_load() {
        let kinds: DictionaryArray<Int32Type> =
            vec!["Movie", "TV Show", "Movie"].into_iter().collect();
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            &dir,
            vec![
                Field::new(
                    "type",
                    DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                    true,
                ),
                Field::new("release_year", DataType::Int64, true),
            ],
            vec![
                Arc::new(kinds),
                Arc::new(Int64Array::from(vec![Some(2015), Some(2019), Some(2020)])),
            ],
        );

        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.skipped_rows, 0);
        let kinds: Vec<TitleType> = catalog.titles().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TitleType::Movie, TitleType::TvShow, TitleType::Movie]);
    }

    #[test]
    fn view_and_float_columns_read_as_text() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("type", DataType::Utf8View, true),
            Field::new("release_year", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringViewArray::from(vec![Some("TV Show"), None])),
            Arc::new(Float64Array::from(vec![Some(2019.0), Some(2020.0)])),
        ];
        let batch = RecordBatch::try_new(schema, columns).unwrap();

        let text = text_columns(&batch);
        let kind = text[0].as_ref().unwrap();
        assert_eq!(arrow_text(kind, 0).as_deref(), Some("TV Show"));
        assert_eq!(arrow_text(kind, 1), None);
        let year = arrow_text(text[1].as_ref().unwrap(), 0).unwrap();
        assert_eq!(parse_year(&year), Some(2019));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("titles.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
