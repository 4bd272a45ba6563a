use serde::Serialize;

use crate::data::filter::FilterParams;
use crate::data::model::FIRST_YEAR;

/// Card titles for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headings {
    pub overview: String,
    pub race_sex: String,
    pub methods: String,
    pub listing: String,
    pub timeline: String,
}

impl Headings {
    /// `count` is the number of executions in the listing.
    pub fn new(params: &FilterParams, count: usize) -> Self {
        let year = params.as_of_year;
        let period = if params.cumulative {
            format!("from {FIRST_YEAR} - {year}")
        } else {
            format!("in {year}")
        };
        let place = params
            .region
            .map_or("the United States of America", |r| r.name());

        Headings {
            overview: format!("Executions {period} in the USA"),
            race_sex: format!("Racial/Gender Distribution of Executions {period}"),
            methods: format!("Distribution of Execution Methods {period}"),
            listing: format!("{count} Executions {period}"),
            timeline: format!("Executions per Year ({FIRST_YEAR} - {year}) in {place}"),
        }
    }
}
