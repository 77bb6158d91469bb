//! Decoding of the API's string-encoded list fields.
//!
//! Everything that knows about list *literals* lives here; the rest of the
//! crate only sees typed `NumericSeries` / `DateSeries`.

pub mod align;
pub mod literal;
pub mod series;

pub use align::{align_all, align_to};
pub use series::{decode_date_series, decode_numeric_series, parse_numeric_token};
