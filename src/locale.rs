//! Time locale support for date and datetime columns
//!
//! Localized month, day and AM/PM names are loaded once from an embedded TOML table.
//! A column bound to a locale activates it with a [`TimeLocaleGuard`] for the duration
//! of one conversion; the previously active locale is restored when the guard drops.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use serde::Deserialize;

use crate::error::LocaleError;
use crate::types::LocaleSettings;

type Result<T> = std::result::Result<T, LocaleError>;

/// One `[locale]` table; missing keys inherit from `[base]`
#[derive(Debug, Default, Deserialize)]
struct LocaleTable {
    ampm: Option<Vec<String>>,
    month_names: Option<Vec<String>>,
    month_abbreviations: Option<Vec<String>>,
    day_names: Option<Vec<String>>,
    day_abbreviations: Option<Vec<String>>,
}

impl LocaleTable {
    fn apply_to(self, settings: &mut LocaleSettings, locale_id: &str) -> Result<()> {
        if let Some(ampm) = self.ampm {
            settings.ampm_markers = to_array(ampm, locale_id, "ampm")?;
        }
        if let Some(months) = self.month_names {
            settings.month_names = to_array(months, locale_id, "month_names")?;
        }
        if let Some(months) = self.month_abbreviations {
            settings.short_month_names = to_array(months, locale_id, "month_abbreviations")?;
        }
        if let Some(days) = self.day_names {
            settings.day_names = to_array(days, locale_id, "day_names")?;
        }
        if let Some(days) = self.day_abbreviations {
            settings.short_day_names = to_array(days, locale_id, "day_abbreviations")?;
        }
        Ok(())
    }
}

fn to_array<const N: usize>(names: Vec<String>, locale_id: &str, key: &str) -> Result<[String; N]> {
    let len = names.len();
    names.try_into().map_err(|_| {
        LocaleError::ParseError(format!("{locale_id}.{key} has {len} names, expected {N}"))
    })
}

/// Provides access to the embedded time locale tables
struct LocaleManager {
    locale_settings: HashMap<String, LocaleSettings>,
}

static LOCALE_MANAGER: OnceLock<LocaleManager> = OnceLock::new();

/// Name of the locale activated by the innermost live [`TimeLocaleGuard`]
static ACTIVE_TIME_LOCALE: Mutex<Option<String>> = Mutex::new(None);

impl LocaleManager {
    fn new() -> Self {
        let locale_settings = match parse_locale_settings(include_str!("locale/time_locales.toml"))
        {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(error = %e, "failed to load embedded time locale data");
                HashMap::new()
            }
        };
        Self { locale_settings }
    }

    fn get() -> &'static Self {
        LOCALE_MANAGER.get_or_init(Self::new)
    }

    fn get_locale_settings(&self, locale_id: &str) -> Option<&LocaleSettings> {
        self.locale_settings.get(normalize_locale_name(locale_id))
    }
}

fn parse_locale_settings(toml_str: &str) -> Result<HashMap<String, LocaleSettings>> {
    let mut tables: HashMap<String, LocaleTable> =
        toml::from_str(toml_str).map_err(|e| LocaleError::ParseError(e.to_string()))?;

    let mut base_settings = LocaleSettings::default();
    if let Some(base) = tables.remove("base") {
        base.apply_to(&mut base_settings, "base")?;
    }

    let mut locale_settings = HashMap::with_capacity(tables.len());
    for (locale_id, table) in tables {
        let mut settings = base_settings.clone();
        table.apply_to(&mut settings, &locale_id)?;
        locale_settings.insert(locale_id, settings);
    }
    Ok(locale_settings)
}

/// Strip the `.encoding` and `@modifier` parts of a locale name
///
/// # Examples
/// ```
/// use meta_csv::locale::normalize_locale_name;
///
/// assert_eq!(normalize_locale_name("fr_FR.UTF-8"), "fr_FR");
/// assert_eq!(normalize_locale_name("de_DE@euro"), "de_DE");
/// ```
pub fn normalize_locale_name(name: &str) -> &str {
    let end = name.find(['.', '@']).unwrap_or(name.len());
    &name[..end]
}

/// Get time locale settings by name, e.g. `fr_FR` or `fr_FR.UTF-8`
pub fn get_locale_settings(locale_id: &str) -> Option<LocaleSettings> {
    LocaleManager::get().get_locale_settings(locale_id).cloned()
}

/// List the names of all embedded time locales
pub fn list_available_locales() -> Vec<String> {
    let mut locales: Vec<String> = LocaleManager::get().locale_settings.keys().cloned().collect();
    locales.sort();
    locales
}

fn lock_active() -> MutexGuard<'static, Option<String>> {
    ACTIVE_TIME_LOCALE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// The name of the currently active time locale, if any
pub fn active_time_locale() -> Option<String> {
    lock_active().clone()
}

/// Settings of the currently active time locale, English when none is active
pub fn active_locale_settings() -> LocaleSettings {
    active_time_locale()
        .and_then(|name| get_locale_settings(&name))
        .unwrap_or_default()
}

/// Activates a time locale until dropped
///
/// Guards nest: dropping one restores whatever was active when it was acquired.
#[derive(Debug)]
#[must_use = "the locale is restored as soon as the guard is dropped"]
pub struct TimeLocaleGuard {
    previous: Option<String>,
    settings: LocaleSettings,
}

impl TimeLocaleGuard {
    /// Activate `name`, failing without side effects if it is unknown
    pub fn acquire(name: &str) -> Result<Self> {
        let settings = LocaleManager::get()
            .get_locale_settings(name)
            .cloned()
            .ok_or_else(|| LocaleError::NotFound(name.to_string()))?;
        let previous = lock_active().replace(name.to_string());
        tracing::trace!(locale = name, ?previous, "activated time locale");
        Ok(Self { previous, settings })
    }

    /// Settings of the locale this guard activated
    pub fn settings(&self) -> &LocaleSettings {
        &self.settings
    }
}

impl Drop for TimeLocaleGuard {
    fn drop(&mut self) {
        *lock_active() = self.previous.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_loading() {
        let locales = list_available_locales();
        for name in ["C", "POSIX", "en_US", "en_GB", "fr_FR", "de_DE", "es_ES", "it_IT", "nl_NL", "pt_BR"] {
            assert!(locales.iter().any(|l| l == name), "missing {name}");
        }
        assert!(!locales.iter().any(|l| l == "base"));
    }

    #[test]
    fn test_inherits_base() {
        let en_us = get_locale_settings("en_US.UTF-8").unwrap();
        assert_eq!(en_us, LocaleSettings::default());

        let fr = get_locale_settings("fr_FR.UTF-8").unwrap();
        assert_eq!(fr.month_names[0], "janvier");
        assert_eq!(fr.short_day_names[0], "dim.");
        assert_eq!(fr.ampm_markers, ["AM".to_string(), "PM".to_string()]);
    }

    #[test]
    fn test_unknown_locale() {
        assert!(get_locale_settings("xx_XX").is_none());
        assert_eq!(
            TimeLocaleGuard::acquire("xx_XX.UTF-8").unwrap_err(),
            LocaleError::NotFound("xx_XX.UTF-8".to_string())
        );
    }

    #[test]
    fn test_bad_table_length() {
        let err = parse_locale_settings("[xx]\nday_names = [\"a\"]").unwrap_err();
        assert!(matches!(err, LocaleError::ParseError(_)));
    }

    #[test]
    fn test_guard_applies_locale() {
        let guard = TimeLocaleGuard::acquire("de_DE.UTF-8").unwrap();
        assert_eq!(guard.settings().month_names[2], "März");
        {
            let inner = TimeLocaleGuard::acquire("nl_NL").unwrap();
            assert_eq!(inner.settings().short_month_names[2], "mrt");
        }
        drop(guard);
    }
}
