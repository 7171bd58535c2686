use chrono::{NaiveDate, NaiveDateTime};
use meta_csv::formatter::{delocalize, format_date, format_datetime, parse_date};
use meta_csv::locale::{TimeLocaleGuard, get_locale_settings, list_available_locales};
use meta_csv::{FieldProcessor, Value, parse_col_type};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).unwrap()
}

#[test]
fn test_iso_date_column() {
    let processor = parse_col_type("date/yyyy-MM-dd").unwrap().to_field_processor("");
    assert_eq!(
        processor.to_object(Some("2024-02-29")).unwrap(),
        Some(Value::Date(date(2024, 2, 29)))
    );
    assert!(processor.to_object(Some("2023-02-29")).is_err());
    assert_eq!(
        processor.to_string(Some(&Value::Date(date(2021, 7, 14)))),
        "2021-07-14"
    );
}

#[test]
fn test_slashed_date_column() {
    let processor = parse_col_type("date/dd\\/MM\\/yyyy").unwrap().to_field_processor("");
    assert_eq!(
        processor.to_object(Some("14/07/2021")).unwrap(),
        Some(Value::Date(date(2021, 7, 14)))
    );
}

#[test]
fn test_datetime_column() {
    let processor = parse_col_type("datetime/yyyy-MM-dd'T'HH:mm:ss")
        .unwrap()
        .to_field_processor("");
    let value = Value::Datetime(datetime(2024, 3, 5, 14, 7, 9));
    assert_eq!(processor.to_object(Some("2024-03-05T14:07:09")).unwrap(), Some(value.clone()));
    assert_eq!(processor.to_string(Some(&value)), "2024-03-05T14:07:09");
    // a date is written at midnight
    assert_eq!(
        processor.to_string(Some(&Value::Date(date(2024, 3, 5)))),
        "2024-03-05T00:00:00"
    );
}

#[test]
fn test_twelve_hour_clock() {
    let processor = parse_col_type("datetime/dd\\/MM\\/yyyy hh:mm a")
        .unwrap()
        .to_field_processor("");
    let value = Value::Datetime(datetime(2024, 3, 5, 14, 7, 0));
    assert_eq!(processor.to_string(Some(&value)), "05/03/2024 02:07 PM");
    assert_eq!(processor.to_object(Some("05/03/2024 02:07 PM")).unwrap(), Some(value));
}

#[test]
fn test_french_dates() {
    let processor = parse_col_type("date/EEEE d MMMM yyyy/fr_FR")
        .unwrap()
        .to_field_processor("");
    let value = Value::Date(date(2024, 2, 4));
    assert_eq!(processor.to_string(Some(&value)), "dimanche 04 février 2024");
    assert_eq!(processor.to_object(Some("dimanche 04 février 2024")).unwrap(), Some(value.clone()));
    assert_eq!(processor.to_object(Some("Dimanche 04 Février 2024")).unwrap(), Some(value));
}

#[test]
fn test_german_abbreviations() {
    let processor = parse_col_type("date/dd MMM yyyy/de_DE.UTF-8")
        .unwrap()
        .to_field_processor("");
    let value = Value::Date(date(2024, 3, 1));
    assert_eq!(processor.to_string(Some(&value)), "01 Mär 2024");
    assert_eq!(processor.to_object(Some("01 Mär 2024")).unwrap(), Some(value));
}

#[test]
fn test_unknown_locale_is_a_read_error() {
    let processor = parse_col_type("date/dd MMMM yyyy/tlh_KL")
        .unwrap()
        .to_field_processor("");
    assert!(processor.to_object(Some("01 March 2024")).is_err());
}

#[test]
fn test_formatter_functions() {
    let fr = get_locale_settings("fr_FR").unwrap();
    assert_eq!(
        format_date(&date(2024, 8, 15), "%a %d %b", Some(&fr)).unwrap(),
        "jeu. 15 août"
    );
    assert_eq!(
        format_datetime(&datetime(2024, 8, 15, 9, 30, 0), "%H:%M", None).unwrap(),
        "09:30"
    );
    assert_eq!(delocalize("15 août 2024", "%d %B %Y", &fr), "15 August 2024");
    assert_eq!(
        parse_date("15 août 2024", "%d %B %Y", Some(&fr)).unwrap(),
        date(2024, 8, 15)
    );
}

#[test]
fn test_locale_guard() {
    assert!(list_available_locales().iter().any(|name| name == "es_ES"));
    let guard = TimeLocaleGuard::acquire("es_ES.UTF-8").unwrap();
    assert_eq!(guard.settings().day_names[1], "lunes");
    assert!(TimeLocaleGuard::acquire("zz_ZZ").is_err());
}

#[test]
fn test_zoned_fraction_column_round_trip() {
    let processor = parse_col_type("datetime/yyyy-MM-dd'T'HH:mm:ss,SSSSZ")
        .unwrap()
        .to_field_processor("");
    let value = Value::Datetime(
        date(2024, 3, 5)
            .and_hms_micro_opt(14, 7, 9, 123_400)
            .unwrap(),
    );
    let text = processor.to_string(Some(&value));
    assert_eq!(text, "2024-03-05T14:07:09,123400");
    assert_eq!(processor.to_object(Some(&text)).unwrap(), Some(value));
}

#[test]
fn test_short_fraction_column() {
    let processor = parse_col_type("datetime/yyyy-MM-dd HH:mm:ss,SSSS")
        .unwrap()
        .to_field_processor("");
    assert_eq!(
        processor.to_object(Some("2024-03-05 14:07:09,1234")).unwrap(),
        Some(Value::Datetime(
            date(2024, 3, 5)
                .and_hms_micro_opt(14, 7, 9, 123_400)
                .unwrap()
        ))
    );
}

#[test]
fn test_partial_date_columns() {
    let month = parse_col_type("date/yyyy-MM").unwrap().to_field_processor("");
    assert_eq!(
        month.to_object(Some("2024-03")).unwrap(),
        Some(Value::Date(date(2024, 3, 1)))
    );
    let year = parse_col_type("date/yyyy").unwrap().to_field_processor("");
    assert_eq!(
        year.to_object(Some("2024")).unwrap(),
        Some(Value::Date(date(2024, 1, 1)))
    );
}

#[test]
fn test_datetime_columns_without_seconds() {
    let hour = parse_col_type("datetime/yyyy-MM-dd HH").unwrap().to_field_processor("");
    assert_eq!(
        hour.to_object(Some("2024-03-05 14")).unwrap(),
        Some(Value::Datetime(datetime(2024, 3, 5, 14, 0, 0)))
    );
    let twelve = parse_col_type("datetime/yyyy-MM-dd hh:mm").unwrap().to_field_processor("");
    assert_eq!(
        twelve.to_object(Some("2024-03-05 02:30")).unwrap(),
        Some(Value::Datetime(datetime(2024, 3, 5, 2, 30, 0)))
    );
}
