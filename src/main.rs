use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use execution_atlas::data::loader::load_file;
use execution_atlas::{DashboardViews, FilterParams, Method, Race, Region, Sex};

/// Compute every dashboard view for one selection and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "execution-atlas", version, about)]
struct Cli {
    /// Dataset file (.csv, .json or .parquet).
    data: PathBuf,

    /// As-of year; defaults to the latest year in the data.
    #[arg(long)]
    year: Option<i32>,

    /// Only the as-of year instead of everything up to it.
    #[arg(long)]
    point: bool,

    /// Restrict to a sex (repeatable; default all).
    #[arg(long = "gender")]
    genders: Vec<Sex>,

    /// Restrict to a race (repeatable; default all).
    #[arg(long = "race")]
    races: Vec<Race>,

    /// Restrict to an execution method (repeatable; default all).
    #[arg(long = "method")]
    methods: Vec<Method>,

    /// Zoom to a state, e.g. "Texas".
    #[arg(long)]
    region: Option<Region>,
}

impl Cli {
    fn params(&self, default_year: i32) -> FilterParams {
        let mut params = FilterParams::new(self.year.unwrap_or(default_year), !self.point)
            .with_region(self.region);
        if !self.genders.is_empty() {
            params = params.with_genders(self.genders.iter().copied());
        }
        if !self.races.is_empty() {
            params = params.with_races(self.races.iter().copied());
        }
        if !self.methods.is_empty() {
            params = params.with_methods(self.methods.iter().copied());
        }
        params
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let table = load_file(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;

    let (_, last_year) = table.year_bounds();
    let params = cli.params(last_year);
    log::info!(
        "Computing views for {} ({})",
        params.as_of_year,
        if params.cumulative { "cumulative" } else { "point" }
    );

    let views = DashboardViews::compute(&table, &params).context("computing views")?;

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &views).context("writing views")?;
    writeln!(out)?;
    Ok(())
}
