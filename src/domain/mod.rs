//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - query enums (`Blockchain`, `TimeRange`, `SortOrder`, per-endpoint sort fields)
//! - request parameters (`QueryParams`) and pagination (`PageState`)
//! - decoded series types (`NumericSeries`, `DateSeries`, `NamedSeries`)

pub mod types;

pub use types::*;
