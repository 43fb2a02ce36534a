//! Load a KPI performance sheet, pick a (perspective, sub-unit, month) slice,
//! and derive its scorecard metrics and month-over-month trends.

pub mod config;
pub mod derive;
pub mod error;
pub mod load;
pub mod model;
pub mod report;
pub mod select;
pub mod trend;

pub use derive::{derive, Metric, MetricSet};
pub use error::{ErrorKind, KpiError, Result};
pub use load::{load, load_path, FileKind, LoadOptions};
pub use model::{MonthKey, Percent, Perspective, Record, UnitColumn};
pub use report::Scorecard;
pub use select::{select, Dataset, DuplicatePolicy, Selection};
pub use trend::{compare, Direction, Trend};
