use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{ExecutionTable, Method, Projection, Race, Record, Region, Sex};

// ---------------------------------------------------------------------------
// Filter parameters: one immutable value per user interaction
// ---------------------------------------------------------------------------

/// Everything that narrows the record table for one pipeline run.
///
/// Selections inside a dimension are alternatives (any selected race
/// passes); dimensions are combined with AND. An empty selection matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterParams {
    pub as_of_year: i32,
    pub cumulative: bool,
    pub genders: BTreeSet<Sex>,
    pub races: BTreeSet<Race>,
    pub methods: BTreeSet<Method>,
    pub region: Option<Region>,
}

impl FilterParams {
    /// Parameters with every category selected and no region.
    pub fn new(as_of_year: i32, cumulative: bool) -> Self {
        FilterParams {
            as_of_year,
            cumulative,
            genders: Sex::ALL.iter().copied().collect(),
            races: Race::ALL.iter().copied().collect(),
            methods: Method::ALL.iter().copied().collect(),
            region: None,
        }
    }

    pub fn with_genders(mut self, genders: impl IntoIterator<Item = Sex>) -> Self {
        self.genders = genders.into_iter().collect();
        self
    }

    pub fn with_races(mut self, races: impl IntoIterator<Item = Race>) -> Self {
        self.races = races.into_iter().collect();
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    /// Same selection, nationwide.
    pub fn nationwide(&self) -> Self {
        self.clone().with_region(None)
    }

    pub fn admits_sex(&self, sex: Sex) -> bool {
        self.genders.contains(&sex)
    }

    pub fn admits_race(&self, race: Race) -> bool {
        self.races.contains(&race)
    }

    pub fn admits_method(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// True when no region is selected or the region matches.
    pub fn admits_region(&self, region: Region) -> bool {
        match self.region {
            Some(selected) => selected == region,
            None => true,
        }
    }

    /// The categorical conjunction: sex AND race AND method.
    pub fn admits_categories(&self, record: &Record) -> bool {
        self.admits_sex(record.sex)
            && self.admits_race(record.race)
            && self.admits_method(record.method)
    }
}

// ---------------------------------------------------------------------------
// Temporal windows
// ---------------------------------------------------------------------------

/// Which years survive the temporal filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Follow the accumulate toggle: every year up to and including the
    /// as-of year when cumulative, otherwise only the as-of year.
    FollowMode,
    /// Every year up to and including the as-of year, whatever the toggle.
    /// Trend lines always show the full history.
    ThroughYear,
}

impl Window {
    pub fn admits(self, params: &FilterParams, year: i32) -> bool {
        match self {
            Window::FollowMode if !params.cumulative => year == params.as_of_year,
            Window::FollowMode | Window::ThroughYear => year <= params.as_of_year,
        }
    }
}

// ---------------------------------------------------------------------------
// Record filter
// ---------------------------------------------------------------------------

/// Rows of `table` that pass the temporal window, the categorical filters
/// and (when selected) the region, projected to `P`.
///
/// Rows keep table order. No match yields an empty vector.
pub fn filter<'a, P: Projection<'a>>(
    table: &'a ExecutionTable,
    params: &FilterParams,
    window: Window,
) -> Vec<P> {
    table
        .records()
        .iter()
        .filter(|rec| window.admits(params, rec.year))
        .filter(|rec| params.admits_categories(rec))
        .filter(|rec| params.admits_region(rec.region))
        .map(P::project)
        .collect()
}
