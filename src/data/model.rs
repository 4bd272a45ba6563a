use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PipelineError;

/// First year covered by the dataset (the modern era of executions).
pub const FIRST_YEAR: i32 = 1977;

// ---------------------------------------------------------------------------
// Region – validated state name from the fixed geography vocabulary
// ---------------------------------------------------------------------------

/// Region names, sorted so that `Region`'s index order is alphabetical.
///
/// "Federal" and "U.S. Military" appear in the source data but have no
/// feature in the state geography.
pub const REGIONS: [&str; 54] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "District of Columbia",
    "Federal",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Puerto Rico",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "U.S. Military",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// A U.S. state or state-equivalent. Only constructible from a name in
/// [`REGIONS`], so holding a `Region` proves the name is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region(u8);

impl Region {
    pub fn new(name: &str) -> Result<Self, PipelineError> {
        let name = name.trim();
        REGIONS
            .iter()
            .position(|r| r.eq_ignore_ascii_case(name))
            .map(|i| Region(i as u8))
            .ok_or_else(|| PipelineError::InvalidRegion(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        REGIONS[self.0 as usize]
    }
}

impl FromStr for Region {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::new(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Region::new(&name).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Closed categorical vocabularies
// ---------------------------------------------------------------------------

/// Declares a closed categorical vocabulary: the enum, its display labels,
/// `ALL`, `Display` and a strict `FromStr` over the labels.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = PipelineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| PipelineError::UnknownCategory {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

vocabulary! {
    Sex, "sex" {
        Male => "Male",
        Female => "Female",
    }
}

vocabulary! {
    /// Race of the executed person. Rare categories are folded into
    /// `Other` by the loader.
    Race, "race" {
        Asian => "Asian",
        Black => "Black",
        Latino => "Latino",
        White => "White",
        Other => "Other",
    }
}

vocabulary! {
    Method, "execution method" {
        FiringSquad => "Firing Squad",
        Electrocution => "Electrocution",
        Gas => "Gas",
        Hanging => "Hanging",
        LethalInjection => "Lethal Injection",
    }
}

// ---------------------------------------------------------------------------
// Record – one execution event
// ---------------------------------------------------------------------------

/// Victim counts, total and broken out by victim race and sex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VictimCounts {
    pub total: u32,
    pub white_male: u32,
    pub black_male: u32,
    pub latino_male: u32,
    pub asian_male: u32,
    pub native_american_male: u32,
    pub other_race_male: u32,
    pub white_female: u32,
    pub black_female: u32,
    pub latino_female: u32,
    pub asian_female: u32,
    pub native_american_female: u32,
    pub other_race_female: u32,
}

/// A single execution (one row of the source table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Sequence number from the source, when present.
    pub execution_id: Option<u32>,
    pub year: i32,
    pub region: Region,
    pub county: String,
    pub sex: Sex,
    pub race: Race,
    pub method: Method,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub suffix: String,
    pub victims: VictimCounts,
    pub foreign_national: bool,
    pub volunteer: bool,
}

impl Record {
    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ---------------------------------------------------------------------------
// Projections – typed column subsets handed to aggregators
// ---------------------------------------------------------------------------

/// The columns every aggregator needs; names, victims and flags are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoreRow {
    pub year: i32,
    pub region: Region,
    pub sex: Sex,
    pub race: Race,
    pub method: Method,
}

/// One line of the tabular listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub year: i32,
    pub method: Method,
    pub name: String,
    pub sex: Sex,
    pub race: Race,
    pub victims: u32,
}

/// A fixed column projection of a [`Record`]. Projecting never adds or
/// removes rows; it only narrows what each row carries.
pub trait Projection<'a>: Sized {
    fn project(record: &'a Record) -> Self;
}

impl<'a> Projection<'a> for &'a Record {
    fn project(record: &'a Record) -> Self {
        record
    }
}

impl<'a> Projection<'a> for CoreRow {
    fn project(record: &'a Record) -> Self {
        CoreRow {
            year: record.year,
            region: record.region,
            sex: record.sex,
            race: record.race,
            method: record.method,
        }
    }
}

impl<'a> Projection<'a> for ListingRow {
    fn project(record: &'a Record) -> Self {
        ListingRow {
            year: record.year,
            method: record.method,
            name: record.full_name(),
            sex: record.sex,
            race: record.race,
            victims: record.victims.total,
        }
    }
}

// ---------------------------------------------------------------------------
// ExecutionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full, immutable record table and its observed year range.
#[derive(Debug, Clone, Default)]
pub struct ExecutionTable {
    records: Vec<Record>,
    /// Lowest and highest observed year, `None` for an empty table.
    pub year_range: Option<(i32, i32)>,
}

impl ExecutionTable {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = ExecutionTable::default();
        for rec in &records {
            table.year_range = Some(match table.year_range {
                Some((lo, hi)) => (lo.min(rec.year), hi.max(rec.year)),
                None => (rec.year, rec.year),
            });
        }
        table.records = records;
        table
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Bounds of the year slider: from [`FIRST_YEAR`] to the last observed
    /// year (or `FIRST_YEAR` when nothing later was loaded).
    pub fn year_bounds(&self) -> (i32, i32) {
        let last = self
            .year_range
            .map(|(_, hi)| hi)
            .unwrap_or(FIRST_YEAR)
            .max(FIRST_YEAR);
        (FIRST_YEAR, last)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
