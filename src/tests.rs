use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::description::*;
use crate::error::{GrammarError, ReadException};
use crate::parser::*;
use crate::processor::*;
use crate::types::*;

#[test]
fn test_split_escapes() {
    assert_eq!(split_parameters("date\\/yyyy"), vec!["date/yyyy"]);
    assert_eq!(split_parameters("a//b"), vec!["a", "", "b"]);
    assert_eq!(split_parameters(""), vec![""]);
}

#[test]
fn test_render_canonical_examples() {
    for grammar in [
        "integer",
        "integer/,",
        "decimal//.",
        "float/ /,",
        "sign/pre/$/decimal//.",
        "percentage/post/%/float/ /.",
        "date/yyyy-MM-dd",
        "date/yyyy-MM-dd/en_US.UTF-8",
        "boolean/T",
        "boolean/yes/no",
        "text",
    ] {
        let description = parse_col_type(grammar).unwrap();
        assert_eq!(description.render(), grammar);
        assert_eq!(parse_col_type(&description.render()).unwrap(), description);
    }
}

#[test]
fn test_render_aliases() {
    assert_eq!(parse_col_type("bool/T/F").unwrap().render(), "boolean/T/F");
    assert_eq!(
        parse_col_type("currency/post/€/integer/ ").unwrap().render(),
        "sign/post/€/integer/ "
    );
    assert_eq!(
        parse_col_type("date/yyyy/fr_FR").unwrap().render(),
        "date/yyyy/fr_FR.UTF-8"
    );
}

#[test]
fn test_render_escapes_every_parameter() {
    let description = parse_col_type("boolean/a\\/b/c\\\\").unwrap();
    assert_eq!(
        description,
        FieldDescription::Boolean(BooleanDescription::new("a/b", "c\\").unwrap())
    );
    assert_eq!(description.render(), "boolean/a\\/b/c\\\\");
}

#[test]
fn test_data_types() {
    let cases = [
        ("boolean/T", DataType::Boolean),
        ("sign/pre/$/integer", DataType::CurrencyInteger),
        ("sign/pre/$/decimal//.", DataType::CurrencyDecimal),
        ("date/yyyy", DataType::Date),
        ("datetime/yyyy", DataType::Datetime),
        ("decimal//.", DataType::Decimal),
        ("float//.", DataType::Float),
        ("integer", DataType::Integer),
        ("percentage/post/%/decimal//.", DataType::PercentageDecimal),
        ("percentage/post/%/float//.", DataType::PercentageFloat),
        ("text", DataType::Text),
    ];
    for (grammar, data_type) in cases {
        assert_eq!(parse_col_type(grammar).unwrap().data_type(), data_type, "{grammar}");
    }
    assert_eq!(DataType::CurrencyDecimal.to_string(), "CURRENCY_DECIMAL");
}

#[test]
fn test_null_round_trip() {
    for grammar in [
        "boolean/T",
        "integer/,",
        "float/ /,",
        "decimal//.",
        "date/yyyy-MM-dd",
        "datetime/yyyy-MM-dd HH:mm/de_DE",
        "sign/pre/$/integer",
        "percentage/post/%/float//.",
        "text",
    ] {
        let processor = parse_col_type(grammar).unwrap().to_field_processor("NULL");
        assert_eq!(processor.to_object(Some("NULL")).unwrap(), None, "{grammar}");
        assert_eq!(processor.to_object(Some("  NULL ")).unwrap(), None, "{grammar}");
        assert_eq!(processor.to_object(None).unwrap(), None, "{grammar}");
        assert_eq!(processor.to_string(None), "NULL", "{grammar}");
    }
}

#[test]
fn test_integer_grouping() {
    let processor = IntegerDescription::new(Some("~")).to_field_processor("NULL");
    assert_eq!(processor.to_string(Some(&-12345678)), "-12~345~678");
    assert_eq!(processor.to_string(Some(&-11)), "-11");
}

#[test]
fn test_decimal_parsing() {
    let processor = NumberDescription::new(Some(" "), ",")
        .unwrap()
        .to_decimal_processor("NULL");
    assert_eq!(
        processor.to_object(Some("1 234,5")).unwrap(),
        Some(Decimal::from_str("1234.5").unwrap())
    );
}

#[test]
fn test_currency() {
    let processor = CurrencyFieldProcessor::new(
        true,
        "$",
        IntegerFieldProcessor::new(None, "NULL"),
        "NULL",
    );
    assert_eq!(processor.to_string(Some(&10)), "$ 10");
    let err = processor.to_object(Some("10€")).unwrap_err();
    assert_eq!(err.text, "10€");
}

#[test]
fn test_percentage() {
    let processor = parse_col_type("percentage/post/%/float//.")
        .unwrap()
        .to_field_processor("NULL");
    assert_eq!(
        processor.to_object(Some("12.5%")).unwrap(),
        Some(Value::Float(0.125))
    );
    // written back as stored, not as hundredths
    assert_eq!(processor.to_string(Some(&Value::Float(0.125))), "0.125 %");
}

#[test]
fn test_any_processor_widens_integers() {
    let float = parse_col_type("float/,/.").unwrap().to_field_processor("");
    assert_eq!(float.to_string(Some(&Value::Integer(1234))), "1,234");
    let decimal = parse_col_type("sign/post/€/decimal//,").unwrap().to_field_processor("");
    assert_eq!(decimal.to_string(Some(&Value::Integer(5))), "5 €");
}

#[test]
fn test_any_processor_mismatched_value() {
    let integer = parse_col_type("integer").unwrap().to_field_processor("");
    assert_eq!(integer.to_string(Some(&Value::from("n/a"))), "n/a");
    let text = parse_col_type("text").unwrap().to_field_processor("");
    assert_eq!(text.to_string(Some(&Value::Boolean(true))), "true");
}

#[test]
fn test_date_lexing() {
    let tokens: Vec<Token> = lex_date_format("yyyy-MM-dd'T'HH:mm:ss,SSSSZ").collect();
    let opcodes: Vec<OpCode> = tokens.iter().map(|t| t.opcode).collect();
    for pair in opcodes.windows(2).take(12) {
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(tokens.last().map(|t| t.opcode), Some(OpCode::Field));
    assert_eq!(tokens.last().map(|t| t.text.as_str()), Some("Z"));
    assert_eq!(convert_date_format("yyyy'%'"), "%Y%%");
}

#[test]
fn test_error_policies() {
    let description = parse_col_type("integer").unwrap();
    let processor = description.to_field_processor("NULL");
    let err = processor.to_object(Some("foo")).unwrap_err();
    assert_eq!(err.text, "foo");
    assert_eq!(
        ReadError::new("foo", description.render()),
        ReadError::new("foo", "integer")
    );
    assert_eq!(ReadError::new("foo", "integer").to_string(), "ReadError(foo, integer)");
    assert_eq!("exception".parse::<OnError>(), Ok(OnError::Exception));
    assert_eq!(OnError::default(), OnError::Wrap);
    assert!("ignore".parse::<OnError>().is_err());
}

#[derive(Debug)]
struct Complex;

impl ObjectType for Complex {
    fn name(&self) -> &str {
        "complex"
    }

    fn to_object(&self, text: &str) -> Result<Value, ReadException> {
        let (re, im) = text
            .trim()
            .split_once('+')
            .ok_or_else(|| ReadException::new(text, "not a complex"))?;
        let parse = |part: &str| {
            part.trim_end_matches('i')
                .parse::<f64>()
                .map_err(|e| ReadException::new(text, e.to_string()))
        };
        Ok(Value::Object(ObjectValue::new((parse(re)?, parse(im)?))))
    }

    fn to_string(&self, value: &Value) -> String {
        match value {
            Value::Object(object) => match object.downcast_ref::<(f64, f64)>() {
                Some((re, im)) => format!("{re}+{im}i"),
                None => String::new(),
            },
            other => other.to_string(),
        }
    }
}

#[test]
fn test_object_type() {
    let parser = ColTypeParser::with_object_factory(|parameters| match parameters {
        [kind] if kind == "complex" => Ok(FieldDescription::Object(ObjectDescription::new(
            parameters,
            Arc::new(Complex),
        ))),
        _ => Err(GrammarError::Object(parameters.join("/"))),
    });
    let description = parser.parse_col_type("object/complex").unwrap();
    assert_eq!(description.render(), "object/complex");
    assert_eq!(description.data_type(), DataType::Object);
    assert_eq!(parser.parse_col_type("object/complex").unwrap(), description);

    let processor = description.to_field_processor("");
    let value = processor.to_object(Some("1+2i")).unwrap().unwrap();
    let Value::Object(object) = &value else {
        panic!("expected an object value");
    };
    assert_eq!(object.downcast_ref::<(f64, f64)>(), Some(&(1.0, 2.0)));
    assert_eq!(processor.to_string(Some(&value)), "1+2i");
    assert_eq!(processor.to_object(Some("")).unwrap(), None);
    assert!(processor.to_object(Some("x")).is_err());
}
