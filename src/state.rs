use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::filter::FilterParams;
use crate::data::model::{ExecutionTable, Method, Race, Region, Sex};
use crate::data::views::DashboardViews;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// A filter dimension with a multi-select checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Gender,
    Race,
    Method,
}

/// One checklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Gender(Sex),
    Race(Race),
    Method(Method),
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// One viewer's selection over a shared table, plus the views it last produced.
///
/// Every mutation rebuilds a fresh [`FilterParams`] and recomputes the
/// views; the previous views stay in place if recomputation fails.
#[derive(Debug, Clone)]
pub struct DashboardState {
    table: Arc<ExecutionTable>,
    year: i32,
    accumulate: bool,
    genders: BTreeSet<Sex>,
    races: BTreeSet<Race>,
    methods: BTreeSet<Method>,
    region: Option<Region>,
    views: Option<DashboardViews>,

    /// Last recomputation error, shown in place of fresh results.
    pub status_message: Option<String>,
}

impl DashboardState {
    /// Start at the latest year, accumulating, with everything selected.
    pub fn new(table: Arc<ExecutionTable>) -> Self {
        let (_, last) = table.year_bounds();
        let mut state = DashboardState {
            table,
            year: last,
            accumulate: true,
            genders: Sex::ALL.iter().copied().collect(),
            races: Race::ALL.iter().copied().collect(),
            methods: Method::ALL.iter().copied().collect(),
            region: None,
            views: None,
            status_message: None,
        };
        state.refresh();
        state
    }

    pub fn table(&self) -> &Arc<ExecutionTable> {
        &self.table
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn accumulate(&self) -> bool {
        self.accumulate
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn is_selected(&self, choice: Choice) -> bool {
        match choice {
            Choice::Gender(sex) => self.genders.contains(&sex),
            Choice::Race(race) => self.races.contains(&race),
            Choice::Method(method) => self.methods.contains(&method),
        }
    }

    /// Views for the current selection, `None` only if the very first
    /// computation failed.
    pub fn views(&self) -> Option<&DashboardViews> {
        self.views.as_ref()
    }

    /// A fresh, immutable parameter set for the current selection.
    pub fn params(&self) -> FilterParams {
        FilterParams::new(self.year, self.accumulate)
            .with_genders(self.genders.iter().copied())
            .with_races(self.races.iter().copied())
            .with_methods(self.methods.iter().copied())
            .with_region(self.region)
    }

    /// Recompute all views; keep the previous ones on failure.
    pub fn refresh(&mut self) {
        match DashboardViews::compute(&self.table, &self.params()) {
            Ok(views) => {
                self.views = Some(views);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to recompute views: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Move the year slider, clamped to the table's year range.
    pub fn set_year(&mut self, year: i32) {
        let (first, last) = self.table.year_bounds();
        self.year = year.clamp(first, last);
        self.refresh();
    }

    /// Advance one year for the play animation, wrapping to the first year.
    pub fn step_year(&mut self) {
        let (first, last) = self.table.year_bounds();
        self.year = if self.year >= last { first } else { self.year + 1 };
        self.refresh();
    }

    pub fn set_accumulate(&mut self, accumulate: bool) {
        self.accumulate = accumulate;
        self.refresh();
    }

    /// Toggle a single checklist entry.
    pub fn toggle(&mut self, choice: Choice) {
        match choice {
            Choice::Gender(sex) => toggle(&mut self.genders, sex),
            Choice::Race(race) => toggle(&mut self.races, race),
            Choice::Method(method) => toggle(&mut self.methods, method),
        }
        self.refresh();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Gender => self.genders = Sex::ALL.iter().copied().collect(),
            Dimension::Race => self.races = Race::ALL.iter().copied().collect(),
            Dimension::Method => self.methods = Method::ALL.iter().copied().collect(),
        }
        self.refresh();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Gender => self.genders.clear(),
            Dimension::Race => self.races.clear(),
            Dimension::Method => self.methods.clear(),
        }
        self.refresh();
    }

    pub fn select_region(&mut self, region: Region) {
        self.region = Some(region);
        self.refresh();
    }

    /// Select a region by the name a map click reports.
    pub fn select_region_by_name(&mut self, name: &str) -> Result<(), PipelineError> {
        let region = Region::new(name)?;
        self.select_region(region);
        Ok(())
    }

    pub fn clear_region(&mut self) {
        self.region = None;
        self.refresh();
    }
}
