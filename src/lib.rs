pub mod description;
pub mod error;
pub mod formatter;
pub mod locale;
pub mod metadata;
pub mod parser;
pub mod processor;
pub mod reader;
pub mod types;
pub mod writer;

// Main API
pub use description::{FieldDescription, ObjectDescription, ObjectType};
pub use error::{DateParseError, GrammarError, LocaleError, MetaCsvError, ReadException, Result};
pub use metadata::{MetaCsvData, MetaCsvDataBuilder, MetaCsvParser, render_metadata};
pub use parser::{ColTypeParser, parse_col_type};
pub use processor::{AnyFieldProcessor, FieldProcessor};
pub use reader::MetaCsvReader;
pub use types::*;
pub use writer::MetaCsvWriter;

#[cfg(test)]
mod tests;
