mod common;

use proptest::prelude::*;
use proptest::sample::subsequence;

use execution_atlas::data::aggregate;
use execution_atlas::data::filter::filter;
use execution_atlas::data::model::{CoreRow, ListingRow};
use execution_atlas::{
    ExecutionTable, FilterParams, Method, Race, Record, Region, Sex, Window, FIRST_YEAR,
};

use common::{ids, record};

const LAST_YEAR: i32 = 2021;
const STATES: [&str; 4] = ["Texas", "Florida", "Ohio", "Virginia"];

fn arb_table() -> impl Strategy<Value = ExecutionTable> {
    let row = (
        FIRST_YEAR..=LAST_YEAR,
        0..STATES.len(),
        0..Sex::ALL.len(),
        0..Race::ALL.len(),
        0..Method::ALL.len(),
    );
    prop::collection::vec(row, 0..60).prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, (year, state, sex, race, method))| {
                record(
                    i as u32,
                    year,
                    STATES[state],
                    Sex::ALL[sex],
                    Race::ALL[race],
                    Method::ALL[method],
                )
            })
            .collect();
        ExecutionTable::from_records(records)
    })
}

fn arb_params() -> impl Strategy<Value = FilterParams> {
    (
        FIRST_YEAR..=LAST_YEAR,
        any::<bool>(),
        subsequence(Sex::ALL.to_vec(), 0..=Sex::ALL.len()),
        subsequence(Race::ALL.to_vec(), 0..=Race::ALL.len()),
        subsequence(Method::ALL.to_vec(), 0..=Method::ALL.len()),
        prop::option::of(0..STATES.len()),
    )
        .prop_map(|(year, cumulative, genders, races, methods, state)| {
            FilterParams::new(year, cumulative)
                .with_genders(genders)
                .with_races(races)
                .with_methods(methods)
                .with_region(state.map(|i| Region::new(STATES[i]).unwrap()))
        })
}

proptest! {
    #[test]
    fn point_windows_partition_the_cumulative_window(table in arb_table(), params in arb_params()) {
        let cumulative = FilterParams { cumulative: true, ..params.clone() };
        let mut expected = ids(&filter::<&Record>(&table, &cumulative, Window::FollowMode));
        expected.sort_unstable();

        let mut union = Vec::new();
        for year in FIRST_YEAR..=params.as_of_year {
            let point = FilterParams { as_of_year: year, cumulative: false, ..params.clone() };
            let rows = filter::<&Record>(&table, &point, Window::FollowMode);
            prop_assert!(rows.iter().all(|r| r.year == year));
            union.extend(ids(&rows));
        }
        union.sort_unstable();
        // Sorted equality with a duplicate-free side also proves disjointness.
        prop_assert_eq!(union, expected);
    }

    #[test]
    fn categorical_predicates_commute(table in arb_table(), params in arb_params()) {
        type Test = fn(&FilterParams, &Record) -> bool;
        let sex: Test = |p, r| p.admits_sex(r.sex);
        let race: Test = |p, r| p.admits_race(r.race);
        let method: Test = |p, r| p.admits_method(r.method);
        let orders: [[Test; 3]; 6] = [
            [sex, race, method],
            [sex, method, race],
            [race, sex, method],
            [race, method, sex],
            [method, sex, race],
            [method, race, sex],
        ];

        let reference: Vec<&Record> = table
            .records()
            .iter()
            .filter(|r| params.admits_categories(r))
            .collect();
        for order in orders {
            let mut rows: Vec<&Record> = table.records().iter().collect();
            for test in order {
                rows.retain(|r| test(&params, *r));
            }
            prop_assert_eq!(ids(&rows), ids(&reference));
        }
    }

    #[test]
    fn year_totals_have_one_row_per_year(table in arb_table(), params in arb_params()) {
        let rows: Vec<CoreRow> = filter(&table, &params, Window::ThroughYear);
        let totals = aggregate::year_totals(&rows, params.as_of_year);
        if rows.is_empty() || params.as_of_year <= FIRST_YEAR {
            prop_assert!(totals.is_empty());
        } else {
            let years: Vec<i32> = totals.rows().iter().map(|t| t.year).collect();
            prop_assert_eq!(years, (FIRST_YEAR..params.as_of_year).collect::<Vec<_>>());
            let in_range = rows.iter().filter(|r| r.year < params.as_of_year).count();
            prop_assert_eq!(totals.rows().iter().map(|t| t.count).sum::<usize>(), in_range);
        }
    }

    #[test]
    fn empty_sentinel_iff_empty_input(table in arb_table(), params in arb_params()) {
        let rows: Vec<CoreRow> = filter(&table, &params, Window::FollowMode);
        let empty = rows.is_empty();

        prop_assert_eq!(aggregate::regional_totals(&rows, None).is_empty(), empty);
        prop_assert_eq!(aggregate::method_year_totals(&rows).is_empty(), empty);
        prop_assert_eq!(aggregate::race_sex_totals(&rows, params.region).is_empty(), empty);
        prop_assert_eq!(aggregate::execution_count(&rows, params.region) == 0, empty);

        let listing: Vec<ListingRow> = filter(&table, &params, Window::FollowMode);
        prop_assert_eq!(aggregate::listing(listing).is_empty(), empty);

        let through: Vec<CoreRow> = filter(&table, &params, Window::ThroughYear);
        if params.as_of_year > FIRST_YEAR {
            prop_assert_eq!(
                aggregate::year_totals(&through, params.as_of_year).is_empty(),
                through.is_empty()
            );
        }

        if let Some(region) = params.region {
            prop_assert_eq!(aggregate::method_totals(&rows, Some(region)).unwrap().is_empty(), empty);
            let selected = aggregate::regional_totals(&rows, Some(region));
            prop_assert!(!selected.is_empty());
            prop_assert_eq!(selected.rows()[0].count, rows.len());
        }
    }

    #[test]
    fn aggregators_agree_on_totals(table in arb_table(), params in arb_params()) {
        let rows: Vec<CoreRow> = filter(&table, &params.nationwide(), Window::FollowMode);
        let count = aggregate::execution_count(&rows, None);
        let by_region: usize = aggregate::regional_totals(&rows, None).rows().iter().map(|t| t.count).sum();
        let by_race: usize = aggregate::race_sex_totals(&rows, None).rows().iter().map(|t| t.count).sum();
        let by_method_year: usize = aggregate::method_year_totals(&rows).rows().iter().map(|t| t.count).sum();
        prop_assert_eq!(by_region, count);
        prop_assert_eq!(by_race, count);
        prop_assert_eq!(by_method_year, count);
    }

    #[test]
    fn filtering_is_idempotent(table in arb_table(), params in arb_params()) {
        let first = ids(&filter::<&Record>(&table, &params, Window::FollowMode));
        let second = ids(&filter::<&Record>(&table, &params, Window::FollowMode));
        prop_assert_eq!(first, second);
    }
}
