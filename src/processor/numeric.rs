use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ReadException;
use crate::formatter::{format_decimal, format_float, format_integer};
use crate::processor::{FieldProcessor, text_or_none};

/// Remove the separators so that the text is in Rust's default number syntax
fn normalize_number(text: &str, thousands_separator: Option<&str>, decimal_separator: &str) -> String {
    let mut normalized = text.trim().to_string();
    if let Some(separator) = thousands_separator {
        normalized = normalized.replace(separator, "");
    }
    if decimal_separator != "." {
        normalized = normalized.replace(decimal_separator, ".");
    }
    normalized
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerFieldProcessor {
    thousands_separator: Option<String>,
    null_value: String,
}

impl IntegerFieldProcessor {
    pub fn new(thousands_separator: Option<&str>, null_value: &str) -> Self {
        Self {
            thousands_separator: thousands_separator
                .filter(|sep| !sep.is_empty())
                .map(str::to_string),
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for IntegerFieldProcessor {
    type Value = i64;

    fn to_object(&self, text: Option<&str>) -> Result<Option<i64>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        let normalized = normalize_number(text, self.thousands_separator.as_deref(), ".");
        normalized
            .parse::<i64>()
            .map(Some)
            .map_err(|e| ReadException::new(text, format!("invalid integer: {e}")))
    }

    fn to_string(&self, value: Option<&i64>) -> String {
        match value {
            Some(value) => format_integer(*value, self.thousands_separator.as_deref()),
            None => self.null_value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatFieldProcessor {
    thousands_separator: Option<String>,
    decimal_separator: String,
    null_value: String,
}

impl FloatFieldProcessor {
    pub fn new(thousands_separator: Option<&str>, decimal_separator: &str, null_value: &str) -> Self {
        Self {
            thousands_separator: thousands_separator
                .filter(|sep| !sep.is_empty())
                .map(str::to_string),
            decimal_separator: decimal_separator.to_string(),
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for FloatFieldProcessor {
    type Value = f64;

    fn to_object(&self, text: Option<&str>) -> Result<Option<f64>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        let normalized = normalize_number(
            text,
            self.thousands_separator.as_deref(),
            &self.decimal_separator,
        );
        normalized
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ReadException::new(text, format!("invalid float: {e}")))
    }

    fn to_string(&self, value: Option<&f64>) -> String {
        match value {
            Some(value) => format_float(
                *value,
                self.thousands_separator.as_deref(),
                &self.decimal_separator,
            ),
            None => self.null_value.clone(),
        }
    }
}

/// Arbitrary-precision decimals; scientific notation is accepted on input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalFieldProcessor {
    thousands_separator: Option<String>,
    decimal_separator: String,
    null_value: String,
}

impl DecimalFieldProcessor {
    pub fn new(thousands_separator: Option<&str>, decimal_separator: &str, null_value: &str) -> Self {
        Self {
            thousands_separator: thousands_separator
                .filter(|sep| !sep.is_empty())
                .map(str::to_string),
            decimal_separator: decimal_separator.to_string(),
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for DecimalFieldProcessor {
    type Value = Decimal;

    fn to_object(&self, text: Option<&str>) -> Result<Option<Decimal>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        let normalized = normalize_number(
            text,
            self.thousands_separator.as_deref(),
            &self.decimal_separator,
        );
        Decimal::from_str(&normalized)
            .or_else(|_| Decimal::from_scientific(&normalized))
            .map(Some)
            .map_err(|e| ReadException::new(text, format!("invalid decimal: {e}")))
    }

    fn to_string(&self, value: Option<&Decimal>) -> String {
        match value {
            Some(value) => format_decimal(
                value,
                self.thousands_separator.as_deref(),
                &self.decimal_separator,
            ),
            None => self.null_value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        let processor = IntegerFieldProcessor::new(Some("~"), "NULL");
        assert_eq!(processor.to_object(Some("-12~345~678")).unwrap(), Some(-12345678));
        assert_eq!(processor.to_object(Some(" 42 ")).unwrap(), Some(42));
        assert_eq!(processor.to_object(Some("NULL")).unwrap(), None);
        assert!(processor.to_object(Some("null")).is_err());
        assert!(processor.to_object(Some("foo")).is_err());
        assert_eq!(processor.to_string(Some(&-12345678)), "-12~345~678");
        assert_eq!(processor.to_string(Some(&-11)), "-11");
        assert_eq!(processor.to_string(None), "NULL");
    }

    #[test]
    fn test_float() {
        let processor = FloatFieldProcessor::new(Some("."), ",", "");
        assert_eq!(processor.to_object(Some("1.234,5")).unwrap(), Some(1234.5));
        assert_eq!(processor.to_object(Some("")).unwrap(), None);
        assert!(processor.to_object(Some("1,2,3")).is_err());
        assert_eq!(processor.to_string(Some(&-1234.5)), "-1.234,5");
    }

    #[test]
    fn test_decimal() {
        let processor = DecimalFieldProcessor::new(Some(" "), ",", "NULL");
        assert_eq!(
            processor.to_object(Some("1 234,5")).unwrap(),
            Some(Decimal::from_str("1234.5").unwrap())
        );
        assert_eq!(
            processor.to_object(Some("1,5e3")).unwrap(),
            Some(Decimal::from(1500))
        );
        assert!(processor.to_object(Some("abc")).is_err());
        assert_eq!(
            processor.to_string(Some(&Decimal::from_str("-12345678.910").unwrap())),
            "-12 345 678,910"
        );
    }
}
