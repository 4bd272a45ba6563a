use serde::Serialize;

use super::aggregate::{
    self, MethodTotal, MethodYearTotal, RaceSexTotal, RegionTotal, YearTotal,
};
use super::filter::{FilterParams, Window, filter};
use super::model::{CoreRow, ExecutionTable, ListingRow};
use super::summary::Summary;
use crate::error::PipelineError;
use crate::headings::Headings;

// ---------------------------------------------------------------------------
// Individual views: filter variant + aggregator
// ---------------------------------------------------------------------------

/// Nationwide choropleth. Ignores the selected region.
pub fn national_map(table: &ExecutionTable, params: &FilterParams) -> Summary<Vec<RegionTotal>> {
    let rows: Vec<CoreRow> = filter(table, &params.nationwide(), Window::FollowMode);
    aggregate::regional_totals(&rows, None)
}

/// Nationwide method trend, always over the full history up to the as-of year.
pub fn national_trend(
    table: &ExecutionTable,
    params: &FilterParams,
) -> Summary<Vec<MethodYearTotal>> {
    let rows: Vec<CoreRow> = filter(table, &params.nationwide(), Window::ThroughYear);
    aggregate::method_year_totals(&rows)
}

/// Choropleth zoomed to the selected region.
pub fn region_map(
    table: &ExecutionTable,
    params: &FilterParams,
) -> Result<Summary<Vec<RegionTotal>>, PipelineError> {
    let region = params.region.ok_or(PipelineError::MissingRequiredRegion {
        view: "region map",
    })?;
    let rows: Vec<CoreRow> = filter(table, params, Window::FollowMode);
    Ok(aggregate::regional_totals(&rows, Some(region)))
}

pub fn race_sex_breakdown(
    table: &ExecutionTable,
    params: &FilterParams,
) -> Summary<Vec<RaceSexTotal>> {
    let rows: Vec<CoreRow> = filter(table, params, Window::FollowMode);
    aggregate::race_sex_totals(&rows, params.region)
}

pub fn method_breakdown(
    table: &ExecutionTable,
    params: &FilterParams,
) -> Result<Summary<Vec<MethodTotal>>, PipelineError> {
    let rows: Vec<CoreRow> = filter(table, params, Window::FollowMode);
    aggregate::method_totals(&rows, params.region)
}

/// Per-year timeline, zero-filled, over the full history.
pub fn timeline(table: &ExecutionTable, params: &FilterParams) -> Summary<Vec<YearTotal>> {
    let rows: Vec<CoreRow> = filter(table, params, Window::ThroughYear);
    aggregate::year_totals(&rows, params.as_of_year)
}

pub fn execution_list(table: &ExecutionTable, params: &FilterParams) -> Summary<Vec<ListingRow>> {
    aggregate::listing(filter(table, params, Window::FollowMode))
}

pub fn execution_count(table: &ExecutionTable, params: &FilterParams) -> usize {
    let rows: Vec<CoreRow> = filter(table, params, Window::FollowMode);
    aggregate::execution_count(&rows, params.region)
}

// ---------------------------------------------------------------------------
// DashboardViews – everything one interaction recomputes
// ---------------------------------------------------------------------------

/// All view results for one parameter set. Region-scoped views are `None`
/// until a region is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub params: FilterParams,
    pub headings: Headings,
    pub count: usize,
    pub national_map: Summary<Vec<RegionTotal>>,
    pub national_trend: Summary<Vec<MethodYearTotal>>,
    pub region_map: Option<Summary<Vec<RegionTotal>>>,
    pub race_sex: Summary<Vec<RaceSexTotal>>,
    pub methods: Option<Summary<Vec<MethodTotal>>>,
    pub timeline: Summary<Vec<YearTotal>>,
    pub listing: Summary<Vec<ListingRow>>,
}

impl DashboardViews {
    pub fn compute(table: &ExecutionTable, params: &FilterParams) -> Result<Self, PipelineError> {
        let count = execution_count(table, params);
        let (region_map, methods) = match params.region {
            Some(_) => (
                Some(region_map(table, params)?),
                Some(method_breakdown(table, params)?),
            ),
            None => (None, None),
        };
        log::debug!(
            "computed views for {} (cumulative: {}, region: {:?}): {count} executions",
            params.as_of_year,
            params.cumulative,
            params.region.map(|r| r.name())
        );
        Ok(DashboardViews {
            params: params.clone(),
            headings: Headings::new(params, count),
            count,
            national_map: national_map(table, params),
            national_trend: national_trend(table, params),
            region_map,
            race_sex: race_sex_breakdown(table, params),
            methods,
            timeline: timeline(table, params),
            listing: execution_list(table, params),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Method, Race, Region, Sex};
    use crate::data::testutil::{record, table};

    #[test]
    fn region_scoped_views_need_a_region() {
        let t = table(vec![record(2000, "Texas", Sex::Male, Race::White, Method::Gas)]);
        let params = FilterParams::new(2000, true);
        assert!(matches!(
            region_map(&t, &params),
            Err(PipelineError::MissingRequiredRegion { .. })
        ));
        assert!(method_breakdown(&t, &params).is_err());

        let views = DashboardViews::compute(&t, &params).unwrap();
        assert!(views.region_map.is_none());
        assert!(views.methods.is_none());
    }

    #[test]
    fn national_views_ignore_the_selected_region() {
        let t = table(vec![
            record(2000, "Texas", Sex::Male, Race::White, Method::Gas),
            record(2000, "Ohio", Sex::Male, Race::White, Method::Gas),
        ]);
        let params = FilterParams::new(2000, true).with_region(Some(Region::new("Ohio").unwrap()));
        assert_eq!(national_map(&t, &params).rows().len(), 2);
        assert_eq!(execution_count(&t, &params), 1);

        let views = DashboardViews::compute(&t, &params).unwrap();
        assert_eq!(views.count, 1);
        assert_eq!(views.region_map.unwrap().rows()[0].count, 1);
        assert_eq!(views.methods.unwrap().rows()[0].method, Method::Gas);
    }

    #[test]
    fn listing_keeps_table_order_and_full_names() {
        let t = table(vec![
            record(2001, "Texas", Sex::Male, Race::White, Method::Gas),
            record(1999, "Texas", Sex::Female, Race::Black, Method::Hanging),
        ]);
        let list = execution_list(&t, &FilterParams::new(2001, true));
        let names: Vec<&str> = list.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["John Doe2001", "John Doe1999"]);
    }
}
