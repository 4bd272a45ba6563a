#![allow(dead_code)]

use execution_atlas::data::model::VictimCounts;
use execution_atlas::{ExecutionTable, Method, Race, Record, Region, Sex};

pub fn record(id: u32, year: i32, region: &str, sex: Sex, race: Race, method: Method) -> Record {
    Record {
        execution_id: Some(id),
        year,
        region: Region::new(region).expect("fixture region"),
        county: "Test County".to_string(),
        sex,
        race,
        method,
        first_name: format!("First{id}"),
        middle_name: String::new(),
        last_name: format!("Last{id}"),
        suffix: String::new(),
        victims: VictimCounts {
            total: 1,
            ..VictimCounts::default()
        },
        foreign_national: false,
        volunteer: false,
    }
}

/// The three-row table used by the documented scenarios.
pub fn scenario_table() -> ExecutionTable {
    ExecutionTable::from_records(vec![
        record(1, 1999, "Texas", Sex::Male, Race::White, Method::LethalInjection),
        record(2, 1999, "Texas", Sex::Male, Race::Black, Method::LethalInjection),
        record(3, 2005, "Florida", Sex::Female, Race::White, Method::Electrocution),
    ])
}

pub fn ids(records: &[&Record]) -> Vec<u32> {
    records.iter().filter_map(|r| r.execution_id).collect()
}
