//! Type definitions shared by the grammar parser and the field codecs
//!
//! This module defines the in-memory values produced by decoding cells, the data type
//! tags reported by descriptions, the error-policy enum and the time-locale settings.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// The semantic kind of a column, as declared by its description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    CurrencyInteger,
    CurrencyDecimal,
    Date,
    Datetime,
    Decimal,
    Float,
    Integer,
    PercentageDecimal,
    PercentageFloat,
    Text,
    Object,
}

impl DataType {
    /// Upper-case tag, e.g. `CURRENCY_DECIMAL`
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::CurrencyInteger => "CURRENCY_INTEGER",
            DataType::CurrencyDecimal => "CURRENCY_DECIMAL",
            DataType::Date => "DATE",
            DataType::Datetime => "DATETIME",
            DataType::Decimal => "DECIMAL",
            DataType::Float => "FLOAT",
            DataType::Integer => "INTEGER",
            DataType::PercentageDecimal => "PERCENTAGE_DECIMAL",
            DataType::PercentageFloat => "PERCENTAGE_FLOAT",
            DataType::Text => "TEXT",
            DataType::Object => "OBJECT",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-erased payload produced by a caller-defined object type.
///
/// Two object values are equal only when they share the same allocation.
#[derive(Clone)]
pub struct ObjectValue(Arc<dyn Any + Send + Sync>);

impl ObjectValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectValue(..)")
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A decoded cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Text(String),
    Object(ObjectValue),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Datetime(dt) => write!(f, "{dt}"),
            Value::Text(s) => f.write_str(s),
            Value::Object(_) => f.write_str("<object>"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Datetime(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Marker substituted for a malformed cell under [`OnError::Wrap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    /// The raw cell text
    pub text: String,
    /// The grammar string of the column's description
    pub description: String,
}

impl ReadError {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReadError({}, {})", self.text, self.description)
    }
}

/// One decoded cell of a row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Value(Value),
    Error(ReadError),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Option<Value>> for Cell {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => Cell::Value(value),
            None => Cell::Null,
        }
    }
}

/// How a reader surfaces a cell that fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Substitute a [`ReadError`] marker
    #[default]
    Wrap,
    /// Substitute a null
    Null,
    /// Substitute the raw text
    Text,
    /// Fail the row
    Exception,
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrap" => Ok(OnError::Wrap),
            "null" => Ok(OnError::Null),
            "text" => Ok(OnError::Text),
            "exception" => Ok(OnError::Exception),
            _ => Err(format!("unknown error policy: {s}")),
        }
    }
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnError::Wrap => "wrap",
            OnError::Null => "null",
            OnError::Text => "text",
            OnError::Exception => "exception",
        })
    }
}

/// Localized names used when rendering and parsing dates
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleSettings {
    /// AM/PM markers
    pub ampm_markers: [String; 2],
    /// Full month names, January first
    pub month_names: [String; 12],
    /// Abbreviated month names
    pub short_month_names: [String; 12],
    /// Full day names, Sunday first
    pub day_names: [String; 7],
    /// Abbreviated day names, Sunday first
    pub short_day_names: [String; 7],
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            ampm_markers: ["AM".to_string(), "PM".to_string()],
            month_names: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .map(String::from),
            short_month_names: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]
            .map(String::from),
            day_names: [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]
            .map(String::from),
            short_day_names: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].map(String::from),
        }
    }
}

impl LocaleSettings {
    pub fn with_ampm_markers(mut self, markers: [&str; 2]) -> Self {
        self.ampm_markers = markers.map(String::from);
        self
    }

    pub fn with_month_names(mut self, names: [&str; 12]) -> Self {
        self.month_names = names.map(String::from);
        self
    }

    pub fn with_short_month_names(mut self, names: [&str; 12]) -> Self {
        self.short_month_names = names.map(String::from);
        self
    }

    pub fn with_day_names(mut self, names: [&str; 7]) -> Self {
        self.day_names = names.map(String::from);
        self
    }

    pub fn with_short_day_names(mut self, names: [&str; 7]) -> Self {
        self.short_day_names = names.map(String::from);
        self
    }
}
