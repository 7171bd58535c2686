//! Value formatting module
//!
//! Renders numbers with custom thousands and decimal separators, and renders and parses
//! dates through chrono with localized names.

mod datetime;
mod numeric;

pub use datetime::{delocalize, format_date, format_datetime, parse_date, parse_datetime};
pub use numeric::{format_decimal, format_float, format_integer};
