//! Date and datetime columns, formatted with C89 directives in an optional time locale

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{LocaleError, ReadException};
use crate::formatter::{format_date, format_datetime, parse_date, parse_datetime};
use crate::locale::TimeLocaleGuard;
use crate::processor::{FieldProcessor, text_or_none};
use crate::types::LocaleSettings;

/// Run `f` with the settings of `locale` active, or without a locale
fn with_time_locale<T>(
    locale: Option<&str>,
    f: impl FnOnce(Option<&LocaleSettings>) -> T,
) -> Result<T, LocaleError> {
    match locale {
        Some(name) => {
            let guard = TimeLocaleGuard::acquire(name)?;
            Ok(f(Some(guard.settings())))
        }
        None => Ok(f(None)),
    }
}

/// Format and locale shared by date and datetime processors
#[derive(Debug, Clone, PartialEq, Eq)]
struct TemporalFormat {
    format: String,
    locale: Option<String>,
}

impl TemporalFormat {
    fn parse<T, E: std::fmt::Display>(
        &self,
        text: &str,
        parse: impl FnOnce(&str, &str, Option<&LocaleSettings>) -> Result<T, E>,
    ) -> Result<T, ReadException> {
        let trimmed = text.trim();
        with_time_locale(self.locale.as_deref(), |settings| {
            parse(trimmed, &self.format, settings)
        })
        .map_err(|e| ReadException::new(text, e.to_string()))?
        .map_err(|e| ReadException::new(text, format!("does not match {:?}: {e}", self.format)))
    }

    /// Render with `format`, falling back to `iso` if the locale or a directive fails
    fn render<T>(
        &self,
        value: &T,
        format: impl Fn(&T, &str, Option<&LocaleSettings>) -> Result<String, std::fmt::Error>,
        iso: impl FnOnce(&T) -> String,
    ) -> String {
        let rendered = match with_time_locale(self.locale.as_deref(), |settings| {
            format(value, &self.format, settings)
        }) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(error = %e, "rendering date without its locale");
                format(value, &self.format, None)
            }
        };
        rendered.unwrap_or_else(|_| {
            tracing::warn!(format = %self.format, "cannot render date format, using ISO 8601");
            iso(value)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFieldProcessor {
    format: TemporalFormat,
    null_value: String,
}

impl DateFieldProcessor {
    pub fn new(format: &str, locale: Option<&str>, null_value: &str) -> Self {
        Self {
            format: TemporalFormat {
                format: format.to_string(),
                locale: locale.map(str::to_string),
            },
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for DateFieldProcessor {
    type Value = NaiveDate;

    fn to_object(&self, text: Option<&str>) -> Result<Option<NaiveDate>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        self.format.parse(text, parse_date).map(Some)
    }

    fn to_string(&self, value: Option<&NaiveDate>) -> String {
        match value {
            Some(date) => self.format.render(date, format_date, |date| {
                date.format("%Y-%m-%d").to_string()
            }),
            None => self.null_value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeFieldProcessor {
    format: TemporalFormat,
    null_value: String,
}

impl DatetimeFieldProcessor {
    pub fn new(format: &str, locale: Option<&str>, null_value: &str) -> Self {
        Self {
            format: TemporalFormat {
                format: format.to_string(),
                locale: locale.map(str::to_string),
            },
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for DatetimeFieldProcessor {
    type Value = NaiveDateTime;

    fn to_object(&self, text: Option<&str>) -> Result<Option<NaiveDateTime>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        self.format.parse(text, parse_datetime).map(Some)
    }

    fn to_string(&self, value: Option<&NaiveDateTime>) -> String {
        match value {
            Some(datetime) => self.format.render(datetime, format_datetime, |datetime| {
                datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
            }),
            None => self.null_value.clone(),
        }
    }
}
