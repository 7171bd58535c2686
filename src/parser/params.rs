//! Escape-aware splitting and joining of slash-delimited grammar parameters.

use winnow::combinator::{alt, repeat, separated};
use winnow::token::{any, literal, take_while};
use winnow::{ModalResult, Parser};

/// Parse one escape sequence or run of plain characters inside a parameter
fn parse_parameter_piece<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        literal("\\/").value("/"),
        literal("\\\\").value("\\"),
        // any other escaped character keeps its backslash
        ('\\', any).take(),
        // a trailing lone backslash
        literal("\\"),
        take_while(1.., |c: char| c != '/' && c != '\\'),
    ))
    .parse_next(input)
}

/// Parse a single, possibly empty, parameter
fn parse_parameter(input: &mut &str) -> ModalResult<String> {
    repeat(0.., parse_parameter_piece)
        .fold(String::new, |mut acc, piece: &str| {
            acc.push_str(piece);
            acc
        })
        .parse_next(input)
}

fn parse_parameters(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., parse_parameter, '/').parse_next(input)
}

/// Split a grammar string on unescaped `/`
///
/// `\/` yields a literal slash and `\\` a literal backslash; any other character after a
/// backslash is kept together with the backslash. Never fails: the empty string yields a
/// single empty parameter.
///
/// # Examples
/// ```
/// use meta_csv::parser::split_parameters;
///
/// assert_eq!(split_parameters(r"date/dd\/MM\/yyyy"), vec!["date", "dd/MM/yyyy"]);
/// assert_eq!(split_parameters("a//b"), vec!["a", "", "b"]);
/// ```
pub fn split_parameters(value: &str) -> Vec<String> {
    parse_parameters
        .parse(value)
        .unwrap_or_else(|_| vec![value.to_string()])
}

/// Escape `/` and `\` in a single parameter
pub fn escape_parameter(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '/' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Join parameters into a grammar string, the inverse of [`split_parameters`]
///
/// Trailing empty parameters are dropped; the first parameter (the data type keyword) is
/// always kept.
pub fn render_parameters<S: AsRef<str>>(values: &[S]) -> String {
    let mut last = values.len();
    while last > 1 && values[last - 1].as_ref().is_empty() {
        last -= 1;
    }
    values[..last]
        .iter()
        .map(|value| escape_parameter(value.as_ref()))
        .collect::<Vec<_>>()
        .join("/")
}
