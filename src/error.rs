//! Error types for grammar parsing, cell decoding and metadata handling.

use thiserror::Error;

/// A malformed column type grammar string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("unknown data type: {0}")]
    UnknownDataType(String),

    #[error("bad number of {datatype} parameters: {parameters:?}")]
    ParameterCount {
        datatype: &'static str,
        parameters: Vec<String>,
    },

    #[error("thousands separator and decimal separator are both {0:?}")]
    IdenticalSeparators(String),

    #[error("unknown symbol position {0:?}, expected \"pre\" or \"post\"")]
    UnknownPosition(String),

    #[error("unknown {datatype} number type: {number_type:?}")]
    UnknownNumberType {
        datatype: &'static str,
        number_type: String,
    },

    #[error("empty {parameter} in {datatype} type")]
    EmptyParameter {
        datatype: &'static str,
        parameter: &'static str,
    },

    /// Raised by caller-supplied object factories.
    #[error("invalid object parameters: {0}")]
    Object(String),
}

/// A cell whose text does not match its column type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {text:?}")]
pub struct ReadException {
    pub text: String,
    pub reason: String,
}

impl ReadException {
    pub fn new(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// A date or datetime that does not match its C89 format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),

    #[error("expected fraction digits")]
    MissingFraction,

    #[error("unconverted data remains: {0:?}")]
    TrailingInput(String),
}

/// Errors raised by the time-locale tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("locale not found: {0}")]
    NotFound(String),

    #[error("error parsing locale data: {0}")]
    ParseError(String),
}

/// Crate-level error for reading and writing metadata and data files.
#[derive(Debug, Error)]
pub enum MetaCsvError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Read(#[from] ReadException),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad metadata header, expected [\"domain\", \"key\", \"value\"], was {0:?}")]
    BadHeader(Vec<String>),

    #[error("bad metadata row, expected 3 fields, was {0:?}")]
    BadRow(Vec<String>),

    #[error("unknown metadata domain: {0}")]
    UnknownDomain(String),

    #[error("unknown {domain} domain key: {key}")]
    UnknownKey { domain: String, key: String },

    #[error("bad column index in data key {0:?}")]
    BadColumnIndex(String),

    #[error("bad value for {key}: {value:?}")]
    BadValue { key: String, value: String },

    #[error("unsupported encoding {0:?}, only UTF-8 data files can be read and written")]
    UnsupportedEncoding(String),

    #[error("data file is empty, a header row is required")]
    MissingHeader,
}

pub type Result<T> = std::result::Result<T, MetaCsvError>;
