//! Numbers written with a symbol before or after them: currencies and percentages

use rust_decimal::Decimal;

use crate::error::ReadException;
use crate::processor::{FieldProcessor, text_or_none};

/// A symbol on one side of a number, separated by one space when rendered
#[derive(Debug, Clone, PartialEq, Eq)]
struct SymbolAffix {
    prefixed: bool,
    symbol: String,
}

impl SymbolAffix {
    fn new(prefixed: bool, symbol: &str) -> Self {
        Self {
            prefixed,
            symbol: symbol.to_string(),
        }
    }

    /// The number part of `text`; a missing symbol is an error
    fn strip<'a>(&self, text: &'a str) -> Result<&'a str, ReadException> {
        let trimmed = text.trim();
        let number = if self.prefixed {
            trimmed.strip_prefix(self.symbol.as_str())
        } else {
            trimmed.strip_suffix(self.symbol.as_str())
        };
        number.map(str::trim).ok_or_else(|| {
            ReadException::new(text, format!("missing {} symbol", self.symbol))
        })
    }

    fn attach(&self, number: String) -> String {
        if self.prefixed {
            format!("{} {}", self.symbol, number)
        } else {
            format!("{} {}", number, self.symbol)
        }
    }
}

/// A currency amount, decoded and encoded by the wrapped number processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFieldProcessor<P> {
    affix: SymbolAffix,
    number_processor: P,
    null_value: String,
}

impl<P: FieldProcessor> CurrencyFieldProcessor<P> {
    pub fn new(prefixed: bool, symbol: &str, number_processor: P, null_value: &str) -> Self {
        Self {
            affix: SymbolAffix::new(prefixed, symbol),
            number_processor,
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl<P: FieldProcessor> FieldProcessor for CurrencyFieldProcessor<P> {
    type Value = P::Value;

    fn to_object(&self, text: Option<&str>) -> Result<Option<P::Value>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        let number = self.affix.strip(text)?;
        self.number_processor.to_object(Some(number))
    }

    fn to_string(&self, value: Option<&P::Value>) -> String {
        match value {
            Some(value) => self.affix.attach(self.number_processor.to_string(Some(value))),
            None => self.null_value.clone(),
        }
    }
}

/// Numbers that can be read as a percentage
pub trait Percent {
    /// `self / 100`
    fn from_percent(self) -> Self;
}

impl Percent for f64 {
    fn from_percent(self) -> Self {
        self / 100.0
    }
}

impl Percent for Decimal {
    fn from_percent(self) -> Self {
        self / Decimal::ONE_HUNDRED
    }
}

/// A percentage: `12.5 %` decodes to `0.125`
///
/// Encoding writes the value as is, without multiplying it by 100, so `0.125`
/// encodes to `0.125 %`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentageFieldProcessor<P> {
    affix: SymbolAffix,
    number_processor: P,
    null_value: String,
}

impl<P> PercentageFieldProcessor<P>
where
    P: FieldProcessor,
    P::Value: Percent,
{
    pub fn new(prefixed: bool, symbol: &str, number_processor: P, null_value: &str) -> Self {
        Self {
            affix: SymbolAffix::new(prefixed, symbol),
            number_processor,
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl<P> FieldProcessor for PercentageFieldProcessor<P>
where
    P: FieldProcessor,
    P::Value: Percent,
{
    type Value = P::Value;

    fn to_object(&self, text: Option<&str>) -> Result<Option<P::Value>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        let number = self.affix.strip(text)?;
        Ok(self
            .number_processor
            .to_object(Some(number))?
            .map(Percent::from_percent))
    }

    fn to_string(&self, value: Option<&P::Value>) -> String {
        match value {
            Some(value) => self.affix.attach(self.number_processor.to_string(Some(value))),
            None => self.null_value.clone(),
        }
    }
}
