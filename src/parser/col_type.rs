//! Column type grammar parser
//!
//! Turns strings such as `sign/pre/$/decimal//.` into [`FieldDescription`]s. Currency and
//! percentage types parse their trailing parameters recursively as the wrapped number
//! type.

use std::fmt;

use crate::description::{
    BooleanDescription, CurrencyDescription, CurrencyNumber, DateDescription, FieldDescription,
    IntegerDescription, NumberDescription, PercentageDescription, PercentageNumber,
};
use crate::error::GrammarError;
use crate::parser::params::split_parameters;

/// Factory for `object/…` types, given the parameters after the keyword
pub type ObjectFactory =
    dyn Fn(&[String]) -> Result<FieldDescription, GrammarError> + Send + Sync;

/// Parser for column type grammar strings
pub struct ColTypeParser {
    create_object_description: Box<ObjectFactory>,
}

impl Default for ColTypeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ColTypeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColTypeParser").finish_non_exhaustive()
    }
}

impl ColTypeParser {
    /// A parser whose `object` types all decode as text
    pub fn new() -> Self {
        Self {
            create_object_description: Box::new(|_| Ok(FieldDescription::Text)),
        }
    }

    /// A parser that hands `object/…` parameters to `factory`
    pub fn with_object_factory<F>(factory: F) -> Self
    where
        F: Fn(&[String]) -> Result<FieldDescription, GrammarError> + Send + Sync + 'static,
    {
        Self {
            create_object_description: Box::new(factory),
        }
    }

    /// Parse a grammar string into a description
    pub fn parse_col_type(&self, value: &str) -> Result<FieldDescription, GrammarError> {
        let parameters = split_parameters(value);
        let (datatype, parameters) = parameters
            .split_first()
            .ok_or_else(|| GrammarError::UnknownDataType(value.to_string()))?;

        let description = match datatype.as_str() {
            "bool" | "boolean" => FieldDescription::Boolean(parse_boolean(parameters)?),
            "sign" | "currency" => FieldDescription::Currency(parse_currency(parameters)?),
            "date" => FieldDescription::Date(parse_date(parameters)?),
            "datetime" => FieldDescription::Datetime(parse_date(parameters)?),
            "decimal" => FieldDescription::Decimal(parse_number("decimal", parameters)?),
            "float" => FieldDescription::Float(parse_number("float", parameters)?),
            "integer" => FieldDescription::Integer(parse_integer(parameters)?),
            "percentage" => FieldDescription::Percentage(parse_percentage(parameters)?),
            "text" => FieldDescription::Text,
            "object" => (self.create_object_description)(parameters)?,
            _ => return Err(GrammarError::UnknownDataType(value.to_string())),
        };
        tracing::debug!(grammar = value, data_type = %description.data_type(), "parsed column type");
        Ok(description)
    }
}

/// Parse a grammar string with the default parser
///
/// # Examples
/// ```
/// use meta_csv::{parse_col_type, FieldDescription};
///
/// assert_eq!(parse_col_type("text").unwrap(), FieldDescription::Text);
/// assert!(parse_col_type("complex").is_err());
/// ```
pub fn parse_col_type(value: &str) -> Result<FieldDescription, GrammarError> {
    ColTypeParser::new().parse_col_type(value)
}

fn parameter_count(datatype: &'static str, parameters: &[String]) -> GrammarError {
    GrammarError::ParameterCount {
        datatype,
        parameters: parameters.to_vec(),
    }
}

fn parse_boolean(parameters: &[String]) -> Result<BooleanDescription, GrammarError> {
    match parameters {
        [true_word] => BooleanDescription::new(true_word, ""),
        [true_word, false_word] => BooleanDescription::new(true_word, false_word),
        _ => Err(parameter_count("boolean", parameters)),
    }
}

fn parse_position(value: &str) -> Result<bool, GrammarError> {
    match value {
        "pre" => Ok(true),
        "post" => Ok(false),
        _ => Err(GrammarError::UnknownPosition(value.to_string())),
    }
}

fn parse_currency(parameters: &[String]) -> Result<CurrencyDescription, GrammarError> {
    let [position, symbol, number_type, number_parameters @ ..] = parameters else {
        return Err(parameter_count("currency", parameters));
    };
    let prefixed = parse_position(position)?;
    let number = match number_type.as_str() {
        "integer" => CurrencyNumber::Integer(parse_integer(number_parameters)?),
        "decimal" => CurrencyNumber::Decimal(parse_number("decimal", number_parameters)?),
        _ => {
            return Err(GrammarError::UnknownNumberType {
                datatype: "currency",
                number_type: number_type.clone(),
            });
        }
    };
    Ok(CurrencyDescription::new(prefixed, symbol, number))
}

fn parse_percentage(parameters: &[String]) -> Result<PercentageDescription, GrammarError> {
    let [position, symbol, number_type, number_parameters @ ..] = parameters else {
        return Err(parameter_count("percentage", parameters));
    };
    let prefixed = parse_position(position)?;
    let number = match number_type.as_str() {
        "decimal" => PercentageNumber::Decimal(parse_number("decimal", number_parameters)?),
        "float" => PercentageNumber::Float(parse_number("float", number_parameters)?),
        _ => {
            return Err(GrammarError::UnknownNumberType {
                datatype: "percentage",
                number_type: number_type.clone(),
            });
        }
    };
    Ok(PercentageDescription::new(prefixed, symbol, number))
}

fn parse_date(parameters: &[String]) -> Result<DateDescription, GrammarError> {
    match parameters {
        [pattern] => DateDescription::new(pattern, None),
        [pattern, locale] => DateDescription::new(pattern, Some(locale)),
        _ => Err(parameter_count("date", parameters)),
    }
}

fn parse_number(
    datatype: &'static str,
    parameters: &[String],
) -> Result<NumberDescription, GrammarError> {
    match parameters {
        [thousands_separator, decimal_separator] => {
            NumberDescription::new(Some(thousands_separator), decimal_separator)
        }
        _ => Err(parameter_count(datatype, parameters)),
    }
}

fn parse_integer(parameters: &[String]) -> Result<IntegerDescription, GrammarError> {
    match parameters {
        [] => Ok(IntegerDescription::new(None)),
        [thousands_separator] => Ok(IntegerDescription::new(Some(thousands_separator))),
        _ => Err(parameter_count("integer", parameters)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(
            parse_col_type("integer").unwrap(),
            FieldDescription::Integer(IntegerDescription::new(None))
        );
        assert_eq!(
            parse_col_type("integer/,").unwrap(),
            FieldDescription::Integer(IntegerDescription::new(Some(",")))
        );
        assert!(matches!(
            parse_col_type("integer/,/."),
            Err(GrammarError::ParameterCount { datatype: "integer", .. })
        ));
    }

    #[test]
    fn test_parse_number_separators() {
        let description = parse_col_type("float/ /,").unwrap();
        let FieldDescription::Float(float) = description else {
            panic!("expected a float description");
        };
        assert_eq!(float.thousands_separator(), Some(" "));
        assert_eq!(float.decimal_separator(), ",");

        let FieldDescription::Decimal(decimal) = parse_col_type("decimal//  . ").unwrap() else {
            panic!("expected a decimal description");
        };
        assert_eq!(decimal.thousands_separator(), None);
        assert_eq!(decimal.decimal_separator(), ".");

        let FieldDescription::Float(spaced) = parse_col_type("float/./ ").unwrap() else {
            panic!("expected a float description");
        };
        assert_eq!(spaced.decimal_separator(), " ");
    }

    #[test]
    fn test_parse_number_errors() {
        assert_eq!(
            parse_col_type("decimal/./."),
            Err(GrammarError::IdenticalSeparators(".".to_string()))
        );
        assert!(parse_col_type("float/.").is_err());
        assert!(parse_col_type("decimal").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(
            parse_col_type("bool/T").unwrap(),
            FieldDescription::Boolean(BooleanDescription::new("T", "").unwrap())
        );
        assert_eq!(
            parse_col_type("boolean/yes/no").unwrap(),
            FieldDescription::Boolean(BooleanDescription::new("yes", "no").unwrap())
        );
        assert!(parse_col_type("bool").is_err());
        assert!(parse_col_type("bool/a/b/c").is_err());
    }

    #[test]
    fn test_parse_currency() {
        let description = parse_col_type("sign/pre/$/decimal//.").unwrap();
        assert_eq!(
            description,
            FieldDescription::Currency(CurrencyDescription::new(
                true,
                "$",
                CurrencyNumber::Decimal(NumberDescription::new(None, ".").unwrap())
            ))
        );
        assert_eq!(
            parse_col_type("currency/post/€/integer").unwrap(),
            FieldDescription::Currency(CurrencyDescription::new(
                false,
                "€",
                CurrencyNumber::Integer(IntegerDescription::new(None))
            ))
        );
    }

    #[test]
    fn test_parse_currency_errors() {
        assert!(matches!(
            parse_col_type("sign/pre/$"),
            Err(GrammarError::ParameterCount { .. })
        ));
        assert_eq!(
            parse_col_type("sign/middle/$/integer"),
            Err(GrammarError::UnknownPosition("middle".to_string()))
        );
        assert!(matches!(
            parse_col_type("sign/pre/$/float//."),
            Err(GrammarError::UnknownNumberType { datatype: "currency", .. })
        ));
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(
            parse_col_type("percentage/post/%/float/ /.").unwrap(),
            FieldDescription::Percentage(PercentageDescription::new(
                false,
                "%",
                PercentageNumber::Float(NumberDescription::new(Some(" "), ".").unwrap())
            ))
        );
        assert!(matches!(
            parse_col_type("percentage/post/%/integer"),
            Err(GrammarError::UnknownNumberType { datatype: "percentage", .. })
        ));
    }

    #[test]
    fn test_parse_date() {
        let FieldDescription::Date(date) = parse_col_type("date/yyyy-MM-dd").unwrap() else {
            panic!("expected a date description");
        };
        assert_eq!(date.format(), "%Y-%m-%d");
        assert_eq!(date.locale(), None);

        let FieldDescription::Datetime(datetime) =
            parse_col_type("datetime/dd\\/MM\\/yyyy HH:mm/fr_FR").unwrap()
        else {
            panic!("expected a datetime description");
        };
        assert_eq!(datetime.format(), "%d/%m/%Y %H:%M");
        assert_eq!(datetime.locale(), Some("fr_FR.UTF-8"));

        assert!(parse_col_type("date/yyyy/fr_FR/x").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_col_type("complex/1"),
            Err(GrammarError::UnknownDataType("complex/1".to_string()))
        );
    }

    #[test]
    fn test_default_object_factory() {
        assert_eq!(parse_col_type("object/url").unwrap(), FieldDescription::Text);
    }

    #[test]
    fn test_custom_object_factory() {
        let parser = ColTypeParser::with_object_factory(|parameters| match parameters {
            [kind] if kind == "int" => Ok(FieldDescription::Integer(IntegerDescription::new(None))),
            _ => Err(GrammarError::Object(parameters.join("/"))),
        });
        assert_eq!(
            parser.parse_col_type("object/int").unwrap(),
            FieldDescription::Integer(IntegerDescription::new(None))
        );
        assert_eq!(
            parser.parse_col_type("object/x/y"),
            Err(GrammarError::Object("x/y".to_string()))
        );
    }
}
