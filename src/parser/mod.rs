//! Column type grammar parsing module
//!
//! This module splits slash-delimited grammar strings, converts ULDML date patterns to
//! C89 formats and builds [`FieldDescription`](crate::FieldDescription)s.
//! The main entry point is the `parse_col_type` function.

mod col_type;
mod date_format;
mod params;

pub use col_type::{ColTypeParser, ObjectFactory, parse_col_type};
pub use date_format::{
    DateFormatLexer, OpCode, Token, c89_directive, convert_date_format, lex_date_format,
};
pub use params::{escape_parameter, render_parameters, split_parameters};
