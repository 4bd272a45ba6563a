use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ExecutionTable, Method, Race, Record, Region, Sex, VictimCounts};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Source columns (DPIC execution database export)
// ---------------------------------------------------------------------------

pub const COL_ID: &str = "Execution#";
pub const COL_DATE: &str = "Execution Date";
pub const COL_YEAR: &str = "Execution Year";
pub const COL_STATE: &str = "State";
pub const COL_COUNTY: &str = "County";
pub const COL_SEX: &str = "Sex";
pub const COL_RACE: &str = "Race";
pub const COL_METHOD: &str = "Execution Method";
pub const COL_FIRST: &str = "First Name";
pub const COL_MIDDLE: &str = "Middle Name(s)";
pub const COL_LAST: &str = "Last Name";
pub const COL_SUFFIX: &str = "Suffix";
pub const COL_VICTIMS: &str = "Number of Victims";
pub const COL_FOREIGN: &str = "Foreign National";
pub const COL_VOLUNTEER: &str = "Execution Volunteer";

/// Victim breakdown columns, in [`VictimCounts`] field order (male, then female).
pub const VICTIM_BREAKDOWN: [&str; 12] = [
    "Number of White Male Victims",
    "Number of Black Male Victims",
    "Number of Latino Male Victims",
    "Number of Asian Male Victims",
    "Number of Native American Male Victims",
    "Number of Other Race Male Victims",
    "Number of White Female Victims",
    "Number of Black Female Victims",
    "Number of Latino Female Victims",
    "Number of Asian Female Victims",
    "Number of Native American Female Victims",
    "Number of Other Race Female Victims",
];

const REQUIRED: [&str; 4] = [COL_STATE, COL_SEX, COL_RACE, COL_METHOD];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an execution table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the DPIC export, one execution per row
/// * `.json`    – `[{ "State": "Texas", "Execution Date": "...", ... }, ...]`
/// * `.parquet` – same columns; categorical and timestamp columns are accepted
pub fn load_file(path: &Path) -> Result<ExecutionTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?)?,
        "json" => read_json(&std::fs::read_to_string(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    log::info!(
        "Loaded {} executions from {} (years {:?})",
        table.len(),
        path.display(),
        table.year_range
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Cells: one source value before typing
// ---------------------------------------------------------------------------

/// A raw cell as read from any of the source formats.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

type Row = BTreeMap<String, Cell>;

fn text<'r>(row: &'r Row, column: &str) -> Option<Cow<'r, str>> {
    match row.get(column)? {
        Cell::Text(s) if !s.trim().is_empty() => Some(Cow::Borrowed(s.trim())),
        Cell::Integer(i) => Some(Cow::Owned(i.to_string())),
        Cell::Float(f) => Some(Cow::Owned(f.to_string())),
        Cell::Bool(b) => Some(Cow::Owned(b.to_string())),
        Cell::Text(_) | Cell::Null => None,
    }
}

fn required<'r>(row: &'r Row, row_no: usize, column: &'static str) -> Result<Cow<'r, str>, LoadError> {
    text(row, column).ok_or(LoadError::MissingValue { row: row_no, column })
}

/// Non-negative whole number; blank or absent counts as 0.
fn count(row: &Row, row_no: usize, column: &'static str) -> Result<u32, LoadError> {
    let bad = |value: String| LoadError::Count {
        row: row_no,
        column,
        value,
    };
    match row.get(column) {
        None | Some(Cell::Null) => Ok(0),
        Some(Cell::Integer(i)) => u32::try_from(*i).map_err(|_| bad(i.to_string())),
        Some(Cell::Float(f)) if *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 => {
            Ok(*f as u32)
        }
        Some(Cell::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(Cell::Text(s)) => s.trim().parse().map_err(|_| bad(s.clone())),
        Some(other) => Err(bad(format!("{other:?}"))),
    }
}

fn flag(row: &Row, column: &str) -> bool {
    match row.get(column) {
        Some(Cell::Bool(b)) => *b,
        Some(Cell::Integer(i)) => *i != 0,
        Some(Cell::Float(f)) => *f != 0.0 && !f.is_nan(),
        Some(Cell::Text(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        ),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Typing: cells → Record
// ---------------------------------------------------------------------------

fn is_four_digit(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

/// Year of an execution date in any of the layouts the exports use.
fn parse_year(date: &str) -> Option<i32> {
    const FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];
    let date = date.trim();
    // Timestamps such as "2005-01-02 00:00:00" keep only the date part.
    let date = date.split_whitespace().next().unwrap_or(date);
    FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
        .map(|d| d.year())
        .find(|y| is_four_digit(*y))
}

fn year(row: &Row, row_no: usize) -> Result<i32, LoadError> {
    let bad = |value: &str| LoadError::Date {
        row: row_no,
        value: value.to_string(),
    };
    if let Some(raw) = text(row, COL_YEAR) {
        return raw
            .parse::<f64>()
            .ok()
            .filter(|y| y.fract() == 0.0)
            .map(|y| y as i32)
            .filter(|y| is_four_digit(*y))
            .ok_or_else(|| bad(&*raw));
    }
    // pandas `to_json` writes datetimes as epoch milliseconds.
    if let Some(Cell::Integer(millis)) = row.get(COL_DATE) {
        return DateTime::<Utc>::from_timestamp_millis(*millis)
            .map(|d| d.year())
            .filter(|y| is_four_digit(*y))
            .ok_or_else(|| bad(&millis.to_string()));
    }
    let raw = required(row, row_no, COL_DATE)?;
    parse_year(&raw).ok_or_else(|| bad(&*raw))
}

/// Race with rare categories folded into `Other`. The flag reports a fold.
fn recode_race(raw: &str) -> Option<(Race, bool)> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "asian" => Some((Race::Asian, false)),
        "black" => Some((Race::Black, false)),
        "latino" | "latinx" | "hispanic" => Some((Race::Latino, false)),
        "white" => Some((Race::White, false)),
        "other" => Some((Race::Other, false)),
        "other race" | "native american" | "american indian or alaska native" => {
            Some((Race::Other, true))
        }
        _ => None,
    }
}

fn recode_method(raw: &str) -> Option<Method> {
    raw.parse::<Method>().ok().or_else(|| {
        raw.trim()
            .eq_ignore_ascii_case("gas chamber")
            .then_some(Method::Gas)
    })
}

fn recode_sex(raw: &str) -> Option<Sex> {
    raw.parse::<Sex>().ok().or_else(|| match raw.trim() {
        "M" | "m" => Some(Sex::Male),
        "F" | "f" => Some(Sex::Female),
        _ => None,
    })
}

fn vocabulary<T>(
    row: &Row,
    row_no: usize,
    column: &'static str,
    recode: impl Fn(&str) -> Option<T>,
) -> Result<T, LoadError> {
    let raw = required(row, row_no, column)?;
    recode(&*raw).ok_or_else(|| LoadError::Vocabulary {
        row: row_no,
        column,
        value: raw.into_owned(),
    })
}

/// Accumulates typed records from raw rows of any source format.
#[derive(Default)]
struct TableBuilder {
    records: Vec<Record>,
    folded_races: usize,
}

impl TableBuilder {
    fn push(&mut self, row: &Row) -> Result<(), LoadError> {
        let row_no = self.records.len();
        let s = |column| text(row, column).map(Cow::into_owned).unwrap_or_default();

        let (race, folded) = vocabulary(row, row_no, COL_RACE, recode_race)?;
        if folded {
            self.folded_races += 1;
        }
        let victims: Vec<u32> = VICTIM_BREAKDOWN
            .iter()
            .map(|column| count(row, row_no, column))
            .collect::<Result<_, _>>()?;

        self.records.push(Record {
            execution_id: match text(row, COL_ID) {
                Some(_) => Some(count(row, row_no, COL_ID)?),
                None => None,
            },
            year: year(row, row_no)?,
            region: vocabulary(row, row_no, COL_STATE, |raw| Region::new(raw).ok())?,
            county: s(COL_COUNTY),
            sex: vocabulary(row, row_no, COL_SEX, recode_sex)?,
            race,
            method: vocabulary(row, row_no, COL_METHOD, recode_method)?,
            first_name: s(COL_FIRST),
            middle_name: s(COL_MIDDLE),
            last_name: s(COL_LAST),
            suffix: s(COL_SUFFIX),
            victims: VictimCounts {
                total: count(row, row_no, COL_VICTIMS)?,
                white_male: victims[0],
                black_male: victims[1],
                latino_male: victims[2],
                asian_male: victims[3],
                native_american_male: victims[4],
                other_race_male: victims[5],
                white_female: victims[6],
                black_female: victims[7],
                latino_female: victims[8],
                asian_female: victims[9],
                native_american_female: victims[10],
                other_race_female: victims[11],
            },
            foreign_national: flag(row, COL_FOREIGN),
            volunteer: flag(row, COL_VOLUNTEER),
        });
        Ok(())
    }

    fn finish(self) -> ExecutionTable {
        if self.folded_races > 0 {
            log::debug!("Folded {} rare race values into 'Other'", self.folded_races);
        }
        ExecutionTable::from_records(self.records)
    }
}

fn check_columns<'h>(headers: impl IntoIterator<Item = &'h str>) -> Result<(), LoadError> {
    let present: Vec<&str> = headers.into_iter().collect();
    if let Some(missing) = REQUIRED.iter().find(|c| !present.contains(*c)) {
        return Err(LoadError::MissingColumn(*missing));
    }
    if !present.contains(&COL_DATE) && !present.contains(&COL_YEAR) {
        return Err(LoadError::MissingColumn(COL_DATE));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the DPIC column names, one execution per row.
/// Empty fields are treated as missing.
pub fn read_csv<R: io::Read>(source: R) -> Result<ExecutionTable, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_columns(headers.iter().map(String::as_str))?;

    let mut builder = TableBuilder::default();
    for result in reader.records() {
        let record = result?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| {
                let cell = if value.is_empty() {
                    Cell::Null
                } else {
                    Cell::Text(value.to_string())
                };
                (col.clone(), cell)
            })
            .collect();
        builder.push(&row)?;
    }
    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Dates may be strings or epoch milliseconds:
///
/// ```json
/// [
///   { "Execution Date": "12/07/1982", "State": "Texas", "Sex": "Male", ... },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> Result<ExecutionTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut builder = TableBuilder::default();
    for rec in records {
        let obj = rec.as_object().ok_or(LoadError::JsonShape)?;
        let row: Row = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();
        builder.push(&row)?;
    }
    Ok(builder.finish())
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the DPIC columns.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), where
/// categorical columns arrive dictionary-encoded and dates as timestamps.
fn load_parquet(path: &Path) -> Result<ExecutionTable, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut builder = TableBuilder::default();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;

        let columns: Vec<(String, ArrayRef)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| -> Result<(String, ArrayRef), LoadError> {
                Ok((field.name().clone(), normalize_column(col)?))
            })
            .collect::<Result<_, _>>()?;

        for row_idx in 0..batch.num_rows() {
            let row: Row = columns
                .iter()
                .map(|(name, col)| (name.clone(), extract_cell(col, row_idx)))
                .collect();
            builder.push(&row)?;
        }
    }
    Ok(builder.finish())
}

/// Cast encodings pandas produces onto the few types [`extract_cell`] reads.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    let target = match col.data_type() {
        DataType::Dictionary(_, _) | DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
        DataType::Timestamp(_, _) | DataType::Date64 => DataType::Date32,
        _ => return Ok(col.clone()),
    };
    Ok(cast(col, &target)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::Int32 => Cell::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        DataType::Date32 => {
            // Days since the Unix epoch; 719_163 is the epoch's day number from CE.
            let days = col.as_primitive::<Date32Type>().value(row);
            NaiveDate::from_num_days_from_ce_opt(days + 719_163)
                .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Cell::Null)
        }
        other => Cell::Text(format!("{other:?}")),
    }
}
