use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{CoreRow, FIRST_YEAR, ListingRow, Method, Race, Region, Sex};
use super::summary::Summary;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Summary rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotal {
    pub region: Region,
    pub count: usize,
    /// `ln(count + 1)`: colour scale for the choropleth, defined at zero.
    pub log_count: f64,
}

impl RegionTotal {
    fn new(region: Region, count: usize) -> Self {
        RegionTotal {
            region,
            count,
            log_count: (count as f64 + 1.0).ln(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodYearTotal {
    pub method: Method,
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceSexTotal {
    /// Title-cased race label.
    pub race: String,
    pub sex: Sex,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodTotal {
    pub method: Method,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Count rows per key, in key order, without zero-count groups.
fn count_by<K, F>(rows: &[CoreRow], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&CoreRow) -> K,
{
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    // Zero-count groups are never reported.
    counts.retain(|_, n| *n != 0);
    counts
}

fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Aggregators
// ---------------------------------------------------------------------------

/// Executions per region for the choropleth.
///
/// With a selected region the result is always that region's single row,
/// count 0 included, so the zoomed map has a feature to draw. Without one,
/// an empty input yields [`Summary::Empty`].
pub fn regional_totals(rows: &[CoreRow], selected: Option<Region>) -> Summary<Vec<RegionTotal>> {
    let summary = match selected {
        Some(region) => {
            let count = rows.iter().filter(|r| r.region == region).count();
            Summary::Data(vec![RegionTotal::new(region, count)])
        }
        None => Summary::from_rows(
            count_by(rows, |r| r.region)
                .into_iter()
                .map(|(region, count)| RegionTotal::new(region, count))
                .collect(),
        ),
    };
    log::debug!("regional_totals: {} rows", summary.rows().len());
    summary
}

/// Executions per (method, year), ordered by year then method.
pub fn method_year_totals(rows: &[CoreRow]) -> Summary<Vec<MethodYearTotal>> {
    let summary = Summary::from_rows(
        count_by(rows, |r| (r.year, r.method))
            .into_iter()
            .map(|((year, method), count)| MethodYearTotal { method, year, count })
            .collect(),
    );
    log::debug!("method_year_totals: {} rows", summary.rows().len());
    summary
}

/// Executions per (race, sex), optionally within one region.
pub fn race_sex_totals(rows: &[CoreRow], region: Option<Region>) -> Summary<Vec<RaceSexTotal>> {
    let scoped: Vec<CoreRow> = rows
        .iter()
        .filter(|r| region.map_or(true, |sel| r.region == sel))
        .copied()
        .collect();
    let summary = Summary::from_rows(
        count_by(&scoped, |r| (r.race, r.sex))
            .into_iter()
            .map(|((race, sex), count): ((Race, Sex), usize)| RaceSexTotal {
                race: title_case(race.label()),
                sex,
                count,
            })
            .collect(),
    );
    log::debug!("race_sex_totals: {} rows", summary.rows().len());
    summary
}

/// Executions per method within one region. Only meaningful once a region
/// is selected; a missing region is a caller error.
pub fn method_totals(
    rows: &[CoreRow],
    region: Option<Region>,
) -> Result<Summary<Vec<MethodTotal>>, PipelineError> {
    let region = region.ok_or(PipelineError::MissingRequiredRegion {
        view: "method totals",
    })?;
    let scoped: Vec<CoreRow> = rows.iter().filter(|r| r.region == region).copied().collect();
    let summary = Summary::from_rows(
        count_by(&scoped, |r| r.method)
            .into_iter()
            .map(|(method, count)| MethodTotal { method, count })
            .collect(),
    );
    log::debug!("method_totals({region}): {} rows", summary.rows().len());
    Ok(summary)
}

/// Executions per year over `[FIRST_YEAR, as_of_year)`, with years that
/// have no executions present as explicit zeros.
///
/// Rows outside that range do not appear. An empty input is
/// [`Summary::Empty`] even though the zero-filled table would have rows.
pub fn year_totals(rows: &[CoreRow], as_of_year: i32) -> Summary<Vec<YearTotal>> {
    if rows.is_empty() {
        log::debug!("year_totals: no input rows");
        return Summary::Empty;
    }
    let counts = count_by(rows, |r| r.year);
    let summary = Summary::from_rows(
        (FIRST_YEAR..as_of_year)
            .map(|year| YearTotal {
                year,
                count: counts.get(&year).copied().unwrap_or(0),
            })
            .collect(),
    );
    log::debug!("year_totals: {} rows", summary.rows().len());
    summary
}

/// The tabular listing, in filter output order.
pub fn listing(rows: Vec<ListingRow>) -> Summary<Vec<ListingRow>> {
    log::debug!("listing: {} rows", rows.len());
    Summary::from_rows(rows)
}

/// Number of rows, optionally within one region.
pub fn execution_count(rows: &[CoreRow], region: Option<Region>) -> usize {
    rows.iter()
        .filter(|r| region.map_or(true, |sel| r.region == sel))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, region: &str, sex: Sex, race: Race, method: Method) -> CoreRow {
        CoreRow {
            year,
            region: Region::new(region).unwrap(),
            sex,
            race,
            method,
        }
    }

    #[test]
    fn title_case_normalizes_each_word() {
        assert_eq!(title_case("native AMERICAN"), "Native American");
        assert_eq!(title_case("white"), "White");
    }

    #[test]
    fn regional_totals_add_log_scale() {
        let rows = vec![
            row(1999, "Texas", Sex::Male, Race::White, Method::LethalInjection),
            row(1999, "Texas", Sex::Male, Race::Black, Method::LethalInjection),
            row(1999, "Ohio", Sex::Male, Race::Black, Method::LethalInjection),
        ];
        let totals = regional_totals(&rows, None);
        let texas = totals
            .rows()
            .iter()
            .find(|t| t.region.name() == "Texas")
            .unwrap();
        assert_eq!(texas.count, 2);
        assert!((texas.log_count - 3f64.ln()).abs() < 1e-12);
        assert_eq!(totals.rows().len(), 2);
    }

    #[test]
    fn selected_region_without_rows_is_a_zero_row_not_empty() {
        let texas = Region::new("Texas").unwrap();
        let totals = regional_totals(&[], Some(texas));
        assert_eq!(totals, Summary::Data(vec![RegionTotal::new(texas, 0)]));
        assert_eq!(totals.rows()[0].log_count, 0.0);
    }

    #[test]
    fn method_year_totals_are_sorted_by_year() {
        let rows = vec![
            row(2003, "Texas", Sex::Male, Race::White, Method::LethalInjection),
            row(1985, "Florida", Sex::Male, Race::White, Method::Electrocution),
            row(2003, "Texas", Sex::Male, Race::White, Method::LethalInjection),
            row(1985, "Texas", Sex::Male, Race::White, Method::LethalInjection),
        ];
        let totals = method_year_totals(&rows);
        let keys: Vec<(i32, Method, usize)> = totals
            .rows()
            .iter()
            .map(|t| (t.year, t.method, t.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1985, Method::Electrocution, 1),
                (1985, Method::LethalInjection, 1),
                (2003, Method::LethalInjection, 2),
            ]
        );
    }

    #[test]
    fn method_totals_require_a_region() {
        let rows = vec![row(2000, "Texas", Sex::Male, Race::White, Method::Gas)];
        assert_eq!(
            method_totals(&rows, None),
            Err(PipelineError::MissingRequiredRegion {
                view: "method totals"
            })
        );
        let ohio = Region::new("Ohio").unwrap();
        assert!(method_totals(&rows, Some(ohio)).unwrap().is_empty());
    }

    #[test]
    fn year_totals_fill_gaps_with_zero() {
        let rows = vec![
            row(1979, "Texas", Sex::Male, Race::White, Method::Gas),
            row(1979, "Texas", Sex::Male, Race::White, Method::Gas),
            row(1981, "Texas", Sex::Male, Race::White, Method::Gas),
        ];
        let totals = year_totals(&rows, 1982);
        let counts: Vec<(i32, usize)> = totals.rows().iter().map(|t| (t.year, t.count)).collect();
        assert_eq!(
            counts,
            vec![(1977, 0), (1978, 0), (1979, 2), (1980, 0), (1981, 1)]
        );
    }

    #[test]
    fn year_totals_exclude_the_as_of_year_itself() {
        let rows = vec![row(1980, "Texas", Sex::Male, Race::White, Method::Gas)];
        let totals = year_totals(&rows, 1980);
        assert_eq!(totals.rows().iter().map(|t| t.count).sum::<usize>(), 0);
        assert_eq!(totals.rows().len(), 3);
    }

    #[test]
    fn execution_count_scopes_to_region() {
        let rows = vec![
            row(2000, "Texas", Sex::Male, Race::White, Method::Gas),
            row(2000, "Ohio", Sex::Male, Race::White, Method::Gas),
        ];
        assert_eq!(execution_count(&rows, None), 2);
        assert_eq!(execution_count(&rows, Some(Region::new("Ohio").unwrap())), 1);
    }
}
