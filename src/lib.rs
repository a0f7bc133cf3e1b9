//! Aggregation core for the "Silent Struggle" survey dashboard.
//!
//! The crate is split the same way the binary consumes it:
//!
//! * [`data`] loads the survey file into an immutable [`data::SurveyTable`].
//! * [`aggregate`] holds the pure transforms that turn the table into
//!   chart-ready summaries.
//! * [`dashboard`] is the fixed catalogue of charts on the page.
//! * [`config`] carries the few knobs the page exposes.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;

pub use error::{AggregateError, ConfigError, DatasetError};
