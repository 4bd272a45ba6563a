//! Filter and aggregation pipeline behind the U.S. executions dashboard.
//!
//! Load a table once with [`data::loader::load_file`], then recompute
//! [`DashboardViews`] for every [`FilterParams`] a viewer produces. All
//! pipeline functions are pure and take their parameters explicitly, so a
//! shared table can serve any number of viewers.

pub mod data;
pub mod error;
pub mod headings;
pub mod state;

pub use data::filter::{FilterParams, Window};
pub use data::model::{ExecutionTable, Method, Race, Record, Region, Sex, FIRST_YEAR};
pub use data::summary::Summary;
pub use data::views::DashboardViews;
pub use error::{LoadError, PipelineError};
pub use state::DashboardState;
