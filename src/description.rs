//! Immutable column type descriptions
//!
//! A [`FieldDescription`] is built once per column from its grammar string, renders back
//! to an equivalent grammar string, and produces [`AnyFieldProcessor`]s bound to a null
//! sentinel on demand.

use std::fmt;
use std::sync::Arc;

use crate::error::{GrammarError, ReadException};
use crate::parser::{convert_date_format, render_parameters};
use crate::processor::{
    AnyFieldProcessor, BooleanFieldProcessor, CurrencyFieldProcessor, DateFieldProcessor,
    DatetimeFieldProcessor, DecimalFieldProcessor, FloatFieldProcessor, IntegerFieldProcessor,
    ObjectFieldProcessor, PercentageFieldProcessor, TextFieldProcessor,
};
use crate::types::{DataType, Value};

/// Default encoding appended to a locale name that has none
pub const DEFAULT_LOCALE_ENCODING: &str = ".UTF-8";

/// `boolean/<true word>[/<false word>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanDescription {
    true_word: String,
    false_word: String,
}

impl BooleanDescription {
    pub fn new(true_word: &str, false_word: &str) -> Result<Self, GrammarError> {
        if true_word.is_empty() {
            return Err(GrammarError::EmptyParameter {
                datatype: "boolean",
                parameter: "true word",
            });
        }
        Ok(Self {
            true_word: true_word.to_string(),
            false_word: false_word.to_string(),
        })
    }

    pub fn true_word(&self) -> &str {
        &self.true_word
    }

    pub fn false_word(&self) -> &str {
        &self.false_word
    }
}

/// `integer[/<thousands separator>]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerDescription {
    thousands_separator: Option<String>,
}

impl IntegerDescription {
    /// An empty separator means no grouping
    pub fn new(thousands_separator: Option<&str>) -> Self {
        Self {
            thousands_separator: thousands_separator
                .filter(|sep| !sep.is_empty())
                .map(str::to_string),
        }
    }

    pub fn thousands_separator(&self) -> Option<&str> {
        self.thousands_separator.as_deref()
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = vec!["integer".to_string()];
        parameters.extend(self.thousands_separator.clone());
        parameters
    }

    pub fn to_field_processor(&self, null_value: &str) -> IntegerFieldProcessor {
        IntegerFieldProcessor::new(self.thousands_separator(), null_value)
    }
}

/// Separators of a `float/…` or `decimal/…` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberDescription {
    thousands_separator: Option<String>,
    decimal_separator: String,
}

impl NumberDescription {
    /// The decimal separator is trimmed unless it is a single space.
    pub fn new(
        thousands_separator: Option<&str>,
        decimal_separator: &str,
    ) -> Result<Self, GrammarError> {
        let thousands_separator = thousands_separator.filter(|sep| !sep.is_empty());
        let decimal_separator = if decimal_separator == " " {
            decimal_separator
        } else {
            decimal_separator.trim()
        };
        if decimal_separator.is_empty() {
            return Err(GrammarError::EmptyParameter {
                datatype: "number",
                parameter: "decimal separator",
            });
        }
        if thousands_separator == Some(decimal_separator) {
            return Err(GrammarError::IdenticalSeparators(
                decimal_separator.to_string(),
            ));
        }
        Ok(Self {
            thousands_separator: thousands_separator.map(str::to_string),
            decimal_separator: decimal_separator.to_string(),
        })
    }

    pub fn thousands_separator(&self) -> Option<&str> {
        self.thousands_separator.as_deref()
    }

    pub fn decimal_separator(&self) -> &str {
        &self.decimal_separator
    }

    fn parameters(&self, datatype: &str) -> Vec<String> {
        vec![
            datatype.to_string(),
            self.thousands_separator.clone().unwrap_or_default(),
            self.decimal_separator.clone(),
        ]
    }

    pub fn to_float_processor(&self, null_value: &str) -> FloatFieldProcessor {
        FloatFieldProcessor::new(
            self.thousands_separator(),
            &self.decimal_separator,
            null_value,
        )
    }

    pub fn to_decimal_processor(&self, null_value: &str) -> DecimalFieldProcessor {
        DecimalFieldProcessor::new(
            self.thousands_separator(),
            &self.decimal_separator,
            null_value,
        )
    }
}

/// `date/<pattern>[/<locale>]` and `datetime/<pattern>[/<locale>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDescription {
    pattern: String,
    format: String,
    locale: Option<String>,
}

impl DateDescription {
    /// Build from a ULDML pattern; a locale without an encoding gets
    /// [`DEFAULT_LOCALE_ENCODING`].
    pub fn new(pattern: &str, locale: Option<&str>) -> Result<Self, GrammarError> {
        if pattern.is_empty() {
            return Err(GrammarError::EmptyParameter {
                datatype: "date",
                parameter: "pattern",
            });
        }
        let locale = locale.map(|name| {
            if name.contains('.') {
                name.to_string()
            } else {
                format!("{name}{DEFAULT_LOCALE_ENCODING}")
            }
        });
        let format = convert_date_format(pattern);
        tracing::debug!(pattern, format = %format, "converted date pattern");
        Ok(Self {
            pattern: pattern.to_string(),
            format,
            locale,
        })
    }

    /// The ULDML pattern as written in the grammar string
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The C89 `strftime` format derived from the pattern
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn parameters(&self, datatype: &str) -> Vec<String> {
        let mut parameters = vec![datatype.to_string(), self.pattern.clone()];
        parameters.extend(self.locale.clone());
        parameters
    }
}

/// Numeric type wrapped by a currency column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyNumber {
    Integer(IntegerDescription),
    Decimal(NumberDescription),
}

/// `sign/<pre|post>/<symbol>/<integer|decimal>/…`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyDescription {
    prefixed: bool,
    symbol: String,
    number: CurrencyNumber,
}

impl CurrencyDescription {
    pub fn new(prefixed: bool, symbol: &str, number: CurrencyNumber) -> Self {
        Self {
            prefixed,
            symbol: symbol.to_string(),
            number,
        }
    }

    pub fn is_prefixed(&self) -> bool {
        self.prefixed
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn number(&self) -> &CurrencyNumber {
        &self.number
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = vec![
            "sign".to_string(),
            position(self.prefixed).to_string(),
            self.symbol.clone(),
        ];
        parameters.extend(match &self.number {
            CurrencyNumber::Integer(integer) => integer.parameters(),
            CurrencyNumber::Decimal(decimal) => decimal.parameters("decimal"),
        });
        parameters
    }
}

/// Numeric type wrapped by a percentage column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentageNumber {
    Decimal(NumberDescription),
    Float(NumberDescription),
}

/// `percentage/<pre|post>/<symbol>/<decimal|float>/…`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentageDescription {
    prefixed: bool,
    symbol: String,
    number: PercentageNumber,
}

impl PercentageDescription {
    pub fn new(prefixed: bool, symbol: &str, number: PercentageNumber) -> Self {
        Self {
            prefixed,
            symbol: symbol.to_string(),
            number,
        }
    }

    pub fn is_prefixed(&self) -> bool {
        self.prefixed
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn number(&self) -> &PercentageNumber {
        &self.number
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = vec![
            "percentage".to_string(),
            position(self.prefixed).to_string(),
            self.symbol.clone(),
        ];
        parameters.extend(match &self.number {
            PercentageNumber::Decimal(decimal) => decimal.parameters("decimal"),
            PercentageNumber::Float(float) => float.parameters("float"),
        });
        parameters
    }
}

fn position(prefixed: bool) -> &'static str {
    if prefixed { "pre" } else { "post" }
}

/// A caller-defined column type, reached through `object/…` grammar strings
pub trait ObjectType: fmt::Debug + Send + Sync {
    /// Stable name, used for equality between descriptions
    fn name(&self) -> &str;

    /// Decode a non-null cell
    fn to_object(&self, text: &str) -> Result<Value, ReadException>;

    /// Encode a value
    fn to_string(&self, value: &Value) -> String;

    fn data_type(&self) -> DataType {
        DataType::Object
    }
}

/// `object/<parameters…>` bound to a caller-defined [`ObjectType`]
#[derive(Debug, Clone)]
pub struct ObjectDescription {
    parameters: Vec<String>,
    object_type: Arc<dyn ObjectType>,
}

impl ObjectDescription {
    pub fn new(parameters: &[String], object_type: Arc<dyn ObjectType>) -> Self {
        Self {
            parameters: parameters.to_vec(),
            object_type,
        }
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn object_type(&self) -> &Arc<dyn ObjectType> {
        &self.object_type
    }
}

impl PartialEq for ObjectDescription {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters && self.object_type.name() == other.object_type.name()
    }
}

/// Semantic type of a column
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldDescription {
    Boolean(BooleanDescription),
    Integer(IntegerDescription),
    Float(NumberDescription),
    Decimal(NumberDescription),
    Date(DateDescription),
    Datetime(DateDescription),
    #[default]
    Text,
    Currency(CurrencyDescription),
    Percentage(PercentageDescription),
    Object(ObjectDescription),
}

impl FieldDescription {
    /// Unescaped grammar parameters, data type keyword first
    pub fn parameters(&self) -> Vec<String> {
        match self {
            FieldDescription::Boolean(boolean) => vec![
                "boolean".to_string(),
                boolean.true_word.clone(),
                boolean.false_word.clone(),
            ],
            FieldDescription::Integer(integer) => integer.parameters(),
            FieldDescription::Float(float) => float.parameters("float"),
            FieldDescription::Decimal(decimal) => decimal.parameters("decimal"),
            FieldDescription::Date(date) => date.parameters("date"),
            FieldDescription::Datetime(datetime) => datetime.parameters("datetime"),
            FieldDescription::Text => vec!["text".to_string()],
            FieldDescription::Currency(currency) => currency.parameters(),
            FieldDescription::Percentage(percentage) => percentage.parameters(),
            FieldDescription::Object(object) => {
                let mut parameters = vec!["object".to_string()];
                parameters.extend(object.parameters.iter().cloned());
                parameters
            }
        }
    }

    /// The canonical grammar string
    ///
    /// # Examples
    /// ```
    /// use meta_csv::parse_col_type;
    ///
    /// let description = parse_col_type("sign/pre/$/decimal//.").unwrap();
    /// assert_eq!(description.render(), "sign/pre/$/decimal//.");
    /// ```
    pub fn render(&self) -> String {
        render_parameters(&self.parameters())
    }

    pub fn data_type(&self) -> DataType {
        match self {
            FieldDescription::Boolean(_) => DataType::Boolean,
            FieldDescription::Integer(_) => DataType::Integer,
            FieldDescription::Float(_) => DataType::Float,
            FieldDescription::Decimal(_) => DataType::Decimal,
            FieldDescription::Date(_) => DataType::Date,
            FieldDescription::Datetime(_) => DataType::Datetime,
            FieldDescription::Text => DataType::Text,
            FieldDescription::Currency(currency) => match currency.number {
                CurrencyNumber::Integer(_) => DataType::CurrencyInteger,
                CurrencyNumber::Decimal(_) => DataType::CurrencyDecimal,
            },
            FieldDescription::Percentage(percentage) => match percentage.number {
                PercentageNumber::Decimal(_) => DataType::PercentageDecimal,
                PercentageNumber::Float(_) => DataType::PercentageFloat,
            },
            FieldDescription::Object(object) => object.object_type.data_type(),
        }
    }

    /// Build the codec for this column, bound to `null_value`
    pub fn to_field_processor(&self, null_value: &str) -> AnyFieldProcessor {
        match self {
            FieldDescription::Boolean(boolean) => AnyFieldProcessor::Boolean(
                BooleanFieldProcessor::new(&boolean.true_word, &boolean.false_word, null_value),
            ),
            FieldDescription::Integer(integer) => {
                AnyFieldProcessor::Integer(integer.to_field_processor(null_value))
            }
            FieldDescription::Float(float) => {
                AnyFieldProcessor::Float(float.to_float_processor(null_value))
            }
            FieldDescription::Decimal(decimal) => {
                AnyFieldProcessor::Decimal(decimal.to_decimal_processor(null_value))
            }
            FieldDescription::Date(date) => AnyFieldProcessor::Date(DateFieldProcessor::new(
                &date.format,
                date.locale(),
                null_value,
            )),
            FieldDescription::Datetime(datetime) => {
                AnyFieldProcessor::Datetime(DatetimeFieldProcessor::new(
                    &datetime.format,
                    datetime.locale(),
                    null_value,
                ))
            }
            FieldDescription::Text => AnyFieldProcessor::Text(TextFieldProcessor::new(null_value)),
            FieldDescription::Currency(currency) => match &currency.number {
                CurrencyNumber::Integer(integer) => {
                    AnyFieldProcessor::CurrencyInteger(CurrencyFieldProcessor::new(
                        currency.prefixed,
                        &currency.symbol,
                        integer.to_field_processor(null_value),
                        null_value,
                    ))
                }
                CurrencyNumber::Decimal(decimal) => {
                    AnyFieldProcessor::CurrencyDecimal(CurrencyFieldProcessor::new(
                        currency.prefixed,
                        &currency.symbol,
                        decimal.to_decimal_processor(null_value),
                        null_value,
                    ))
                }
            },
            FieldDescription::Percentage(percentage) => match &percentage.number {
                PercentageNumber::Decimal(decimal) => {
                    AnyFieldProcessor::PercentageDecimal(PercentageFieldProcessor::new(
                        percentage.prefixed,
                        &percentage.symbol,
                        decimal.to_decimal_processor(null_value),
                        null_value,
                    ))
                }
                PercentageNumber::Float(float) => {
                    AnyFieldProcessor::PercentageFloat(PercentageFieldProcessor::new(
                        percentage.prefixed,
                        &percentage.symbol,
                        float.to_float_processor(null_value),
                        null_value,
                    ))
                }
            },
            FieldDescription::Object(object) => AnyFieldProcessor::Object(
                ObjectFieldProcessor::new(Arc::clone(&object.object_type), null_value),
            ),
        }
    }
}

impl fmt::Display for FieldDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
