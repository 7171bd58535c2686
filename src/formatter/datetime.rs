//! Locale-aware rendering and parsing of C89 `strftime` formats with chrono
//!
//! chrono only knows English names, so rendering substitutes localized names into the
//! format before handing it over, and parsing maps localized names in the input back
//! to English first.

use std::fmt::{self, Write};

use chrono::format::{Parsed, StrftimeItems, parse_and_remainder};
use chrono::{Datelike, NaiveDate, NaiveDateTime, ParseResult, Timelike};

use crate::error::DateParseError;
use crate::types::LocaleSettings;

/// Directives whose output depends on the locale
const LOCALIZED_DIRECTIVES: [char; 6] = ['a', 'A', 'b', 'B', 'h', 'p'];

/// Rewrite a C89 format for chrono rendering, substituting localized names when a locale is given
///
/// `%f` means microseconds in C89 and becomes chrono's six-digit `%6f`. Naive values
/// have no zone, so `%Z` and `%z` render empty.
fn to_chrono_format(
    format: &str,
    datetime: Option<&NaiveDateTime>,
    locale: Option<&LocaleSettings>,
) -> String {
    let mut result = String::with_capacity(format.len());
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            result.push(c);
            continue;
        }
        let Some(directive) = chars.next() else {
            result.push('%');
            break;
        };
        let name = match (datetime, locale) {
            (Some(dt), Some(locale)) if LOCALIZED_DIRECTIVES.contains(&directive) => {
                Some(localized_name(directive, dt, locale))
            }
            _ => None,
        };
        match (name, directive) {
            (Some(name), _) => result.push_str(&name.replace('%', "%%")),
            (None, 'f') => result.push_str("%6f"),
            (None, 'Z' | 'z') => {}
            (None, _) => {
                result.push('%');
                result.push(directive);
            }
        }
    }
    result
}

fn localized_name<'a>(directive: char, dt: &NaiveDateTime, locale: &'a LocaleSettings) -> &'a str {
    let weekday = dt.weekday().num_days_from_sunday() as usize;
    let month = dt.month0() as usize;
    match directive {
        'a' => &locale.short_day_names[weekday],
        'A' => &locale.day_names[weekday],
        'b' | 'h' => &locale.short_month_names[month],
        'B' => &locale.month_names[month],
        _ => &locale.ampm_markers[usize::from(dt.hour() >= 12)],
    }
}

/// Render a datetime with a C89 format
///
/// Fails when the format holds a directive chrono does not know.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use meta_csv::formatter::format_datetime;
///
/// let dt = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 7, 0).unwrap();
/// assert_eq!(format_datetime(&dt, "%d/%m/%Y %I:%M %p", None).unwrap(), "05/03/2024 02:07 PM");
/// ```
pub fn format_datetime(
    datetime: &NaiveDateTime,
    format: &str,
    locale: Option<&LocaleSettings>,
) -> Result<String, fmt::Error> {
    let chrono_format = to_chrono_format(format, Some(datetime), locale);
    let mut result = String::new();
    write!(result, "{}", datetime.format(&chrono_format))?;
    Ok(result)
}

/// Render a date with a C89 format; time directives render as midnight
pub fn format_date(
    date: &NaiveDate,
    format: &str,
    locale: Option<&LocaleSettings>,
) -> Result<String, fmt::Error> {
    format_datetime(&date.and_time(chrono::NaiveTime::MIN), format, locale)
}

/// Replace localized names in `text` with their English equivalents
///
/// Only the name kinds that `format` renders are considered. Matching is
/// case-insensitive, left to right, preferring the longest name.
pub fn delocalize(text: &str, format: &str, locale: &LocaleSettings) -> String {
    let english = LocaleSettings::default();
    let present: Vec<char> = directives(format).collect();
    let mut candidates: Vec<(&str, &str)> = Vec::new();
    if present.contains(&'A') {
        candidates.extend(pairs(&locale.day_names, &english.day_names));
    }
    if present.contains(&'B') {
        candidates.extend(pairs(&locale.month_names, &english.month_names));
    }
    if present.contains(&'a') {
        candidates.extend(pairs(&locale.short_day_names, &english.short_day_names));
    }
    if present.contains(&'b') || present.contains(&'h') {
        candidates.extend(pairs(&locale.short_month_names, &english.short_month_names));
    }
    if present.contains(&'p') {
        candidates.extend(pairs(&locale.ampm_markers, &english.ampm_markers));
    }
    if candidates.is_empty() {
        return text.to_string();
    }
    // stable sort keeps full names ahead of abbreviations of the same length
    candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(c) = rest.chars().next() {
        for (localized, name) in &candidates {
            let matched = rest
                .get(..localized.len())
                .is_some_and(|prefix| prefix.to_lowercase() == localized.to_lowercase());
            if matched {
                result.push_str(name);
                rest = &rest[localized.len()..];
                continue 'scan;
            }
        }
        result.push(c);
        rest = &rest[c.len_utf8()..];
    }
    result
}

fn pairs<'a>(
    localized: &'a [String],
    english: &'a [String],
) -> impl Iterator<Item = (&'a str, &'a str)> {
    localized
        .iter()
        .zip(english)
        .filter(|(l, _)| !l.is_empty())
        .map(|(l, e)| (l.as_str(), e.as_str()))
}

/// Directive letters of a C89 format, skipping `%%` escapes
fn directives(format: &str) -> impl Iterator<Item = char> + '_ {
    let mut chars = format.chars();
    std::iter::from_fn(move || {
        while let Some(c) = chars.next() {
            if c == '%' {
                match chars.next()? {
                    '%' => continue,
                    directive => return Some(directive),
                }
            }
        }
        None
    })
}

/// A run of a C89 format as matched against input
#[derive(Debug, PartialEq, Eq)]
enum Piece {
    /// Directives and literals chrono parses as they are
    Chrono(String),
    /// `%f`: one to nine fraction digits
    Fraction,
    /// `%z`: an optional UTC offset
    Offset,
}

fn pieces(format: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            current.push(c);
            continue;
        }
        let piece = match chars.next() {
            Some('f') => Piece::Fraction,
            Some('z') => Piece::Offset,
            Some(directive) => {
                current.push('%');
                current.push(directive);
                continue;
            }
            None => {
                current.push('%');
                break;
            }
        };
        if !current.is_empty() {
            pieces.push(Piece::Chrono(std::mem::take(&mut current)));
        }
        pieces.push(piece);
    }
    if !current.is_empty() {
        pieces.push(Piece::Chrono(current));
    }
    pieces
}

/// Consume fraction digits, right-padded to nanoseconds
fn parse_fraction<'a>(parsed: &mut Parsed, text: &'a str) -> Result<&'a str, DateParseError> {
    let digits = text
        .bytes()
        .take(9)
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return Err(DateParseError::MissingFraction);
    }
    let (fraction, rest) = text.split_at(digits);
    let nanos = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));
    parsed.set_nanosecond(nanos)?;
    Ok(rest)
}

/// Skip an optional `Z`, `+hhmm` or `+hh:mm` offset; naive values ignore it
fn skip_offset(text: &str) -> &str {
    let Some(body) = text.strip_prefix(['+', '-']) else {
        return text.strip_prefix('Z').unwrap_or(text);
    };
    let end = body
        .find(|c: char| !(c.is_ascii_digit() || c == ':'))
        .unwrap_or(body.len());
    &body[end..]
}

/// Match `text` against a non-localized C89 format, requiring the whole input
fn parse_fields(text: &str, format: &str) -> Result<Parsed, DateParseError> {
    let mut parsed = Parsed::new();
    let mut rest = text;
    for piece in pieces(format) {
        rest = match piece {
            Piece::Chrono(items) => {
                parse_and_remainder(&mut parsed, rest, StrftimeItems::new(&items))?
            }
            Piece::Fraction => parse_fraction(&mut parsed, rest)?,
            Piece::Offset => skip_offset(rest),
        };
    }
    if !rest.is_empty() {
        return Err(DateParseError::TrailingInput(rest.to_string()));
    }
    Ok(parsed)
}

/// Year 1900, January and the first day stand in for absent date fields
fn default_date_fields(parsed: &mut Parsed) -> ParseResult<()> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some();
    if !has_year {
        parsed.set_year(1900)?;
    }
    let week_based = parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if !week_based {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }
    Ok(())
}

/// Absent time fields are zero; a 12-hour clock without `%p` reads as AM
fn default_time_fields(parsed: &mut Parsed) -> ParseResult<()> {
    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(_), None) => parsed.set_hour12(12)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

fn prepare_input(
    text: &str,
    format: &str,
    locale: Option<&LocaleSettings>,
) -> Result<Parsed, DateParseError> {
    match locale {
        Some(locale) => parse_fields(&delocalize(text, format, locale), format),
        None => parse_fields(text, format),
    }
}

/// Parse a datetime with a C89 format
///
/// Fields the format leaves out take the `strptime` defaults: 1900-01-01 and
/// zero for the time of day.
pub fn parse_datetime(
    text: &str,
    format: &str,
    locale: Option<&LocaleSettings>,
) -> Result<NaiveDateTime, DateParseError> {
    let mut parsed = prepare_input(text, format, locale)?;
    default_date_fields(&mut parsed)?;
    default_time_fields(&mut parsed)?;
    Ok(parsed.to_naive_datetime_with_offset(0)?)
}

/// Parse a date with a C89 format; time directives are checked and discarded
pub fn parse_date(
    text: &str,
    format: &str,
    locale: Option<&LocaleSettings>,
) -> Result<NaiveDate, DateParseError> {
    let mut parsed = prepare_input(text, format, locale)?;
    default_date_fields(&mut parsed)?;
    Ok(parsed.to_naive_date()?)
}
