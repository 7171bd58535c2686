//! Field processors: per-column codecs between cell text and typed values
//!
//! Every processor is bound to the null sentinel of its column. A cell whose trimmed
//! text equals the sentinel decodes to `None`, and `None` renders back to the sentinel.
//! [`AnyFieldProcessor`] wraps the concrete processors behind the dynamic [`Value`] type.

mod affixed;
mod numeric;
mod object;
mod temporal;
mod text;

pub use affixed::{CurrencyFieldProcessor, Percent, PercentageFieldProcessor};
pub use numeric::{DecimalFieldProcessor, FloatFieldProcessor, IntegerFieldProcessor};
pub use object::ObjectFieldProcessor;
pub use temporal::{DateFieldProcessor, DatetimeFieldProcessor};
pub use text::{BooleanFieldProcessor, TextFieldProcessor};

use chrono::NaiveTime;
use rust_decimal::Decimal;

use crate::error::ReadException;
use crate::types::Value;

/// A codec between cell text and values of one column type
pub trait FieldProcessor {
    type Value;

    /// Decode a cell; the sentinel and a missing cell decode to `None`
    fn to_object(&self, text: Option<&str>) -> Result<Option<Self::Value>, ReadException>;

    /// Encode a value; `None` encodes to the sentinel
    fn to_string(&self, value: Option<&Self::Value>) -> String;
}

/// `None` if the cell is missing or matches the sentinel once trimmed, else the cell
pub(crate) fn text_or_none<'a>(text: Option<&'a str>, null_value: &str) -> Option<&'a str> {
    text.filter(|text| text.trim() != null_value)
}

/// A processor for any [`FieldDescription`](crate::FieldDescription), over [`Value`]s
#[derive(Debug, Clone)]
pub enum AnyFieldProcessor {
    Text(TextFieldProcessor),
    Boolean(BooleanFieldProcessor),
    Integer(IntegerFieldProcessor),
    Float(FloatFieldProcessor),
    Decimal(DecimalFieldProcessor),
    Date(DateFieldProcessor),
    Datetime(DatetimeFieldProcessor),
    CurrencyInteger(CurrencyFieldProcessor<IntegerFieldProcessor>),
    CurrencyDecimal(CurrencyFieldProcessor<DecimalFieldProcessor>),
    PercentageDecimal(PercentageFieldProcessor<DecimalFieldProcessor>),
    PercentageFloat(PercentageFieldProcessor<FloatFieldProcessor>),
    Object(ObjectFieldProcessor),
}

impl AnyFieldProcessor {
    pub fn null_value(&self) -> &str {
        match self {
            AnyFieldProcessor::Text(p) => p.null_value(),
            AnyFieldProcessor::Boolean(p) => p.null_value(),
            AnyFieldProcessor::Integer(p) => p.null_value(),
            AnyFieldProcessor::Float(p) => p.null_value(),
            AnyFieldProcessor::Decimal(p) => p.null_value(),
            AnyFieldProcessor::Date(p) => p.null_value(),
            AnyFieldProcessor::Datetime(p) => p.null_value(),
            AnyFieldProcessor::CurrencyInteger(p) => p.null_value(),
            AnyFieldProcessor::CurrencyDecimal(p) => p.null_value(),
            AnyFieldProcessor::PercentageDecimal(p) => p.null_value(),
            AnyFieldProcessor::PercentageFloat(p) => p.null_value(),
            AnyFieldProcessor::Object(p) => p.null_value(),
        }
    }
}

impl FieldProcessor for AnyFieldProcessor {
    type Value = Value;

    fn to_object(&self, text: Option<&str>) -> Result<Option<Value>, ReadException> {
        Ok(match self {
            AnyFieldProcessor::Text(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Boolean(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Integer(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Float(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Decimal(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Date(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Datetime(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::CurrencyInteger(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::CurrencyDecimal(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::PercentageDecimal(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::PercentageFloat(p) => p.to_object(text)?.map(Value::from),
            AnyFieldProcessor::Object(p) => p.to_object(text)?,
        })
    }

    fn to_string(&self, value: Option<&Value>) -> String {
        let Some(value) = value else {
            return self.null_value().to_string();
        };
        match (self, value) {
            (AnyFieldProcessor::Text(p), Value::Text(s)) => p.to_string(Some(s)),
            (AnyFieldProcessor::Text(p), other) => p.to_string(Some(&other.to_string())),
            (AnyFieldProcessor::Boolean(p), Value::Boolean(b)) => p.to_string(Some(b)),
            (AnyFieldProcessor::Integer(p), Value::Integer(i)) => p.to_string(Some(i)),
            (AnyFieldProcessor::Float(p), Value::Float(x)) => p.to_string(Some(x)),
            (AnyFieldProcessor::Float(p), Value::Integer(i)) => p.to_string(Some(&(*i as f64))),
            (AnyFieldProcessor::Decimal(p), Value::Decimal(d)) => p.to_string(Some(d)),
            (AnyFieldProcessor::Decimal(p), Value::Integer(i)) => {
                p.to_string(Some(&Decimal::from(*i)))
            }
            (AnyFieldProcessor::Date(p), Value::Date(d)) => p.to_string(Some(d)),
            (AnyFieldProcessor::Date(p), Value::Datetime(dt)) => p.to_string(Some(&dt.date())),
            (AnyFieldProcessor::Datetime(p), Value::Datetime(dt)) => p.to_string(Some(dt)),
            (AnyFieldProcessor::Datetime(p), Value::Date(d)) => {
                p.to_string(Some(&d.and_time(NaiveTime::MIN)))
            }
            (AnyFieldProcessor::CurrencyInteger(p), Value::Integer(i)) => p.to_string(Some(i)),
            (AnyFieldProcessor::CurrencyDecimal(p), Value::Decimal(d)) => p.to_string(Some(d)),
            (AnyFieldProcessor::CurrencyDecimal(p), Value::Integer(i)) => {
                p.to_string(Some(&Decimal::from(*i)))
            }
            (AnyFieldProcessor::PercentageDecimal(p), Value::Decimal(d)) => p.to_string(Some(d)),
            (AnyFieldProcessor::PercentageDecimal(p), Value::Integer(i)) => {
                p.to_string(Some(&Decimal::from(*i)))
            }
            (AnyFieldProcessor::PercentageFloat(p), Value::Float(x)) => p.to_string(Some(x)),
            (AnyFieldProcessor::PercentageFloat(p), Value::Integer(i)) => {
                p.to_string(Some(&(*i as f64)))
            }
            (AnyFieldProcessor::Object(p), value) => p.to_string(Some(value)),
            (processor, value) => {
                tracing::warn!(
                    ?processor,
                    value = %value,
                    "value does not match the column type, writing its display form"
                );
                value.to_string()
            }
        }
    }
}
