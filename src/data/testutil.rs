use super::model::{ExecutionTable, Method, Race, Record, Region, Sex, VictimCounts};

pub fn record(year: i32, region: &str, sex: Sex, race: Race, method: Method) -> Record {
    Record {
        execution_id: None,
        year,
        region: Region::new(region).unwrap(),
        county: String::new(),
        sex,
        race,
        method,
        first_name: "John".to_string(),
        middle_name: String::new(),
        last_name: format!("Doe{year}"),
        suffix: String::new(),
        victims: VictimCounts {
            total: 1,
            ..VictimCounts::default()
        },
        foreign_national: false,
        volunteer: false,
    }
}

pub fn table(records: Vec<Record>) -> ExecutionTable {
    ExecutionTable::from_records(records)
}
