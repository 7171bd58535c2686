use rust_decimal::Decimal;

/// Insert `separator` every three digits, counting from the least significant digit.
///
/// A leading sign is kept in front and does not take part in the grouping.
pub(crate) fn group_digits(text: &str, separator: &str) -> String {
    let (sign, digits) = match text.strip_prefix(['-', '+']) {
        Some(rest) => (&text[..1], rest),
        None => ("", text),
    };
    let digit_chars: Vec<char> = digits.chars().collect();

    let mut grouped: Vec<String> = Vec::with_capacity(digit_chars.len() + digit_chars.len() / 3);
    for (count, digit) in digit_chars.iter().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(separator.to_string());
        }
        grouped.push(digit.to_string());
    }
    grouped.reverse();

    let mut result = String::with_capacity(text.len() + grouped.len());
    result.push_str(sign);
    result.extend(grouped);
    result
}

/// Re-insert separators into the default `"."`-separated rendering of a number
fn format_number_text(text: String, thousands_separator: Option<&str>, decimal_separator: &str) -> String {
    let thousands_separator = thousands_separator.filter(|sep| !sep.is_empty());
    if thousands_separator.is_none() && decimal_separator == "." {
        return text;
    }

    let (integer_part, fraction_part) = match text.find('.') {
        Some(index) => (&text[..index], Some(&text[index + 1..])),
        None => (text.as_str(), None),
    };
    let mut result = match thousands_separator {
        Some(separator) => group_digits(integer_part, separator),
        None => integer_part.to_string(),
    };
    if let Some(fraction) = fraction_part {
        result.push_str(decimal_separator);
        result.push_str(fraction);
    }
    result
}

/// Format an integer with an optional thousands separator
///
/// # Examples
/// ```
/// use meta_csv::formatter::format_integer;
///
/// assert_eq!(format_integer(-12345678, Some("~")), "-12~345~678");
/// assert_eq!(format_integer(-11, Some("~")), "-11");
/// assert_eq!(format_integer(1234, None), "1234");
/// ```
pub fn format_integer(value: i64, thousands_separator: Option<&str>) -> String {
    let text = value.to_string();
    match thousands_separator.filter(|sep| !sep.is_empty()) {
        Some(separator) => group_digits(&text, separator),
        None => text,
    }
}

/// Format a decimal, keeping its scale
pub fn format_decimal(
    value: &Decimal,
    thousands_separator: Option<&str>,
    decimal_separator: &str,
) -> String {
    format_number_text(value.to_string(), thousands_separator, decimal_separator)
}

/// Format a float using its shortest round-tripping representation
pub fn format_float(value: f64, thousands_separator: Option<&str>, decimal_separator: &str) -> String {
    format_number_text(value.to_string(), thousands_separator, decimal_separator)
}
