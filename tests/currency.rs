use std::str::FromStr;

use meta_csv::{FieldProcessor, GrammarError, Value, parse_col_type};
use rust_decimal::Decimal;

// Helper to decode one cell with a grammar string, "NULL" being the sentinel
fn read(grammar: &str, text: &str) -> Result<Option<Value>, GrammarError> {
    let processor = parse_col_type(grammar)?.to_field_processor("NULL");
    Ok(processor.to_object(Some(text)).ok().flatten())
}

fn write(grammar: &str, value: Value) -> Result<String, GrammarError> {
    let processor = parse_col_type(grammar)?.to_field_processor("NULL");
    Ok(processor.to_string(Some(&value)))
}

fn decimal(text: &str) -> Value {
    Value::Decimal(Decimal::from_str(text).unwrap())
}

#[test]
fn test_prefixed_currency() -> Result<(), GrammarError> {
    assert_eq!(read("sign/pre/$/integer", "$ 10")?, Some(Value::Integer(10)));
    assert_eq!(read("sign/pre/$/integer", "$10")?, Some(Value::Integer(10)));
    assert_eq!(read("sign/pre/$/integer", " $ -3 ")?, Some(Value::Integer(-3)));
    assert_eq!(write("sign/pre/$/integer", Value::Integer(10))?, "$ 10");
    Ok(())
}

#[test]
fn test_suffixed_currency() -> Result<(), GrammarError> {
    assert_eq!(
        read("currency/post/€/decimal/ /,", "1 234,56 €")?,
        Some(decimal("1234.56"))
    );
    assert_eq!(
        write("currency/post/€/decimal/ /,", decimal("1234.56"))?,
        "1 234,56 €"
    );
    assert_eq!(
        write("sign/post/€/integer/.", Value::Integer(-1234567))?,
        "-1.234.567 €"
    );
    Ok(())
}

#[test]
fn test_currency_symbol_mismatch() -> Result<(), GrammarError> {
    let processor = parse_col_type("sign/pre/$/integer")?.to_field_processor("NULL");
    let err = processor.to_object(Some("10 €")).unwrap_err();
    assert_eq!(err.text, "10 €");
    assert!(processor.to_object(Some("$ ten")).is_err());
    Ok(())
}

#[test]
fn test_currency_null() -> Result<(), GrammarError> {
    assert_eq!(read("sign/pre/$/integer", "NULL")?, None);
    let processor = parse_col_type("sign/pre/$/integer")?.to_field_processor("NULL");
    assert_eq!(processor.to_string(None), "NULL");
    Ok(())
}

#[test]
fn test_percentage_float() -> Result<(), GrammarError> {
    assert_eq!(
        read("percentage/post/%/float//.", "12.5%")?,
        Some(Value::Float(0.125))
    );
    assert_eq!(
        read("percentage/post/%/float//.", "50 %")?,
        Some(Value::Float(0.5))
    );
    Ok(())
}

#[test]
fn test_percentage_decimal() -> Result<(), GrammarError> {
    assert_eq!(
        read("percentage/post/%/decimal/ /,", "12,5 %")?,
        Some(decimal("0.125"))
    );
    assert_eq!(
        read("percentage/pre/%/decimal//.", "% 1 000")?,
        None,
        "a thousands separator the column does not declare is malformed"
    );
    Ok(())
}

#[test]
fn test_percentage_renders_stored_value() -> Result<(), GrammarError> {
    assert_eq!(
        write("percentage/post/%/decimal//,", decimal("0.125"))?,
        "0,125 %"
    );
    assert_eq!(write("percentage/pre/pct/float//.", Value::Float(2.0))?, "pct 2");
    Ok(())
}
