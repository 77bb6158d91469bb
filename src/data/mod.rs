//! Data access: the HTTP client and typed row access.

pub mod client;
pub mod row;

pub use client::{MetricsSource, UnleashClient};
pub use row::{Field, RawRow};
