use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const COUNTRIES: [&str; 9] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "France",
    "Spain",
    "Brazil",
    "United States, Canada",
];
const RATINGS: [&str; 6] = ["TV-MA", "TV-14", "PG-13", "R", "TV-PG", "PG"];
const GENRES: [&str; 5] = ["Dramas", "Comedies", "Documentaries", "Action & Adventure", "Kids' TV"];
const HEADER: [&str; 12] = [
    "show_id", "type", "title", "director", "cast", "country", "date_added", "release_year",
    "rating", "duration", "listed_in", "description",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.range(0, items.len() as i64 - 1) as usize]
    }

    /// True with probability `percent` / 100.
    fn chance(&mut self, percent: i64) -> bool {
        self.range(1, 100) <= percent
    }
}

/// One generated row, cells in [`HEADER`] order. Empty string = missing.
fn generate_row(id: usize, rng: &mut SimpleRng) -> [String; 12] {
    let is_movie = rng.chance(70);
    let release_year = rng.range(1960, 2021);

    // Mostly added after release; a few deliberately before it.
    let year_added = if rng.chance(3) {
        release_year - rng.range(1, 5)
    } else {
        (release_year + rng.range(0, 6)).min(2021)
    };
    let date_added = if rng.chance(2) {
        String::new()
    } else {
        format!("{} {}, {year_added}", rng.pick(&MONTHS), rng.range(1, 28))
    };

    let duration = match (is_movie, rng.chance(1)) {
        (_, true) => String::new(),
        (true, false) => format!("{} min", rng.range(60, 180)),
        (false, false) => match rng.range(1, 6) {
            1 => "1 Season".to_string(),
            n => format!("{n} Seasons"),
        },
    };

    let optional = |rng: &mut SimpleRng, percent: i64, value: String| {
        if rng.chance(percent) { String::new() } else { value }
    };

    let director = format!("Director {}", rng.range(1, 400));
    let cast = format!("Actor {}, Actor {}", rng.range(1, 900), rng.range(1, 900));
    let country = rng.pick(&COUNTRIES).to_string();
    let rating = rng.pick(&RATINGS).to_string();

    [
        format!("s{id}"),
        if is_movie { "Movie" } else { "TV Show" }.to_string(),
        format!("Title {id}"),
        optional(rng, 30, director),
        optional(rng, 10, cast),
        optional(rng, 9, country),
        date_added,
        release_year.to_string(),
        optional(rng, 1, rating),
        duration,
        rng.pick(&GENRES).to_string(),
        format!("Synthetic catalog entry number {id}."),
    ]
}

fn write_csv(path: &str, rows: &[[String; 12]]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[[String; 12]]) -> anyhow::Result<()> {
    let release_idx = HEADER.iter().position(|h| *h == "release_year").unwrap_or(7);

    let fields: Vec<Field> = HEADER
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let ty = if i == release_idx { DataType::Int64 } else { DataType::Utf8 };
            Field::new(*name, ty, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = (0..HEADER.len())
        .map(|i| -> ArrayRef {
            if i == release_idx {
                Arc::new(Int64Array::from_iter(rows.iter().map(|r| r[i].parse::<i64>().ok())))
            } else {
                Arc::new(StringArray::from_iter(
                    rows.iter().map(|r| (!r[i].is_empty()).then_some(r[i].as_str())),
                ))
            }
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let count: usize = std::env::args()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .unwrap_or(2000);

    let rows: Vec<[String; 12]> = (1..=count).map(|id| generate_row(id, &mut rng)).collect();

    write_csv("sample_titles.csv", &rows)?;
    write_parquet("sample_titles.parquet", &rows)?;

    println!("Wrote {count} titles to sample_titles.csv and sample_titles.parquet");
    Ok(())
}
