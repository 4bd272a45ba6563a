use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use execution_atlas::data::loader::{
    COL_COUNTY, COL_DATE, COL_FIRST, COL_FOREIGN, COL_ID, COL_LAST, COL_METHOD, COL_MIDDLE,
    COL_RACE, COL_SEX, COL_STATE, COL_SUFFIX, COL_VICTIMS, COL_VOLUNTEER, VICTIM_BREAKDOWN,
};
use execution_atlas::{FIRST_YEAR, Method, Race};

/// Write a deterministic synthetic dataset in the DPIC export layout.
#[derive(Parser, Debug)]
#[command(name = "generate-sample")]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV.
    #[arg(default_value = "sample_executions.csv")]
    output: PathBuf,

    #[arg(long, default_value_t = 1500)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<T: Copy>(&mut self, items: &[(T, f64)]) -> T {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for &(item, w) in items {
            if target < w {
                return item;
            }
            target -= w;
        }
        items[items.len() - 1].0
    }
}

const LAST_YEAR: i32 = 2021;
const FIRST_NAMES: [&str; 8] = ["James", "Robert", "John", "Michael", "David", "Linda", "Mary", "Karla"];
const LAST_NAMES: [&str; 8] = ["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis"];
const STATES: [(&str, f64); 8] = [
    ("Texas", 0.37),
    ("Oklahoma", 0.08),
    ("Virginia", 0.07),
    ("Florida", 0.07),
    ("Missouri", 0.06),
    ("Georgia", 0.05),
    ("Alabama", 0.05),
    ("Ohio", 0.04),
];

/// One synthetic row, as text fields in header order.
fn synth_row(rng: &mut SimpleRng, id: usize) -> Vec<String> {
    // Executions ramp up towards the late 1990s.
    let span = (LAST_YEAR - FIRST_YEAR + 1) as f64;
    let year = FIRST_YEAR + (rng.next_f64().sqrt() * span) as i32;
    let year = year.min(LAST_YEAR);
    let month = 1 + (rng.next_u64() % 12);
    let day = 1 + (rng.next_u64() % 28);

    let method = if year > 2000 {
        rng.weighted(&[(Method::LethalInjection, 0.97), (Method::Electrocution, 0.03)])
    } else {
        rng.weighted(&[
            (Method::LethalInjection, 0.8),
            (Method::Electrocution, 0.15),
            (Method::Gas, 0.02),
            (Method::Hanging, 0.02),
            (Method::FiringSquad, 0.01),
        ])
    };
    let race = rng.weighted(&[
        (Race::White.label(), 0.55),
        (Race::Black.label(), 0.34),
        (Race::Latino.label(), 0.08),
        (Race::Asian.label(), 0.01),
        ("American Indian or Alaska Native", 0.02),
    ]);
    let sex = rng.weighted(&[("Male", 0.99), ("Female", 0.01)]);
    let victims = 1 + (rng.next_f64() * rng.next_f64() * 3.0) as u32;
    let first = FIRST_NAMES[(rng.next_u64() % FIRST_NAMES.len() as u64) as usize];
    let last = LAST_NAMES[(rng.next_u64() % LAST_NAMES.len() as u64) as usize];

    let mut row = vec![
        (id + 1).to_string(),
        format!("{month:02}/{day:02}/{year}"),
        first.to_string(),
        String::new(),
        last.to_string(),
        String::new(),
        sex.to_string(),
        race.to_string(),
        rng.weighted(&STATES).to_string(),
        "Synthetic".to_string(),
        method.label().to_string(),
        victims.to_string(),
        if rng.next_f64() < 0.05 { "Yes" } else { "No" }.to_string(),
        if rng.next_f64() < 0.1 { "Yes" } else { "No" }.to_string(),
    ];
    // All victims recorded as white males; the breakdown is not analysed.
    row.push(victims.to_string());
    row.extend(std::iter::repeat("0".to_string()).take(VICTIM_BREAKDOWN.len() - 1));
    row
}

fn headers() -> Vec<&'static str> {
    let mut headers = vec![
        COL_ID, COL_DATE, COL_FIRST, COL_MIDDLE, COL_LAST, COL_SUFFIX, COL_SEX, COL_RACE,
        COL_STATE, COL_COUNTY, COL_METHOD, COL_VICTIMS, COL_FOREIGN, COL_VOLUNTEER,
    ];
    headers.extend(VICTIM_BREAKDOWN);
    headers
}

fn write_csv(path: &Path, rows: &[Vec<String>]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer.write_record(headers()).expect("Failed to write header");
    for row in rows {
        writer.write_record(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");
}

fn write_parquet(path: &Path, rows: &[Vec<String>]) {
    let headers = headers();
    let numeric = |name: &str| {
        name == COL_ID || name == COL_VICTIMS || VICTIM_BREAKDOWN.iter().any(|c| *c == name)
    };

    let mut fields = Vec::with_capacity(headers.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(headers.len());
    for (idx, &name) in headers.iter().enumerate() {
        let values = rows.iter().map(|row| row[idx].as_str());
        if numeric(name) {
            let ints: Vec<i64> = values
                .map(|v| v.parse().expect("synthetic counts are integers"))
                .collect();
            fields.push(Field::new(name, DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from(ints)));
        } else {
            fields.push(Field::new(name, DataType::Utf8, false));
            columns.push(Arc::new(StringArray::from(values.collect::<Vec<_>>())));
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let rows: Vec<Vec<String>> = (0..args.rows).map(|id| synth_row(&mut rng, id)).collect();

    let is_parquet = args
        .output
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&args.output, &rows);
    } else {
        write_csv(&args.output, &rows);
    }

    log::info!("Wrote {} synthetic executions to {}", rows.len(), args.output.display());
    println!("Wrote {} executions to {}", rows.len(), args.output.display());
}
