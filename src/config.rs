//! Settings from a TOML file.
//!
//! ```toml
//! method = "ISNA"
//! asr = "Hanafi"
//! high_lats = "AngleBased"
//! format = "12h"
//! timezone = "America/Toronto"
//! isha = "90 min"
//!
//! [location]
//! latitude = 43.65
//! longitude = -79.38
//!
//! [tune]
//! fajr = 2
//! ```
//!
//! Named values are resolved in one of two modes. [`Validation::Lenient`]
//! substitutes the default for a name it does not recognise and records a
//! [`Fallback`]; [`Validation::Strict`] returns the error instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{PrayTimeError, Result};
use crate::method::{CalculationMethod, MethodOverrides, MidnightRule, Twilight};
use crate::settings::{Location, Settings, Tune, UtcOffset};
use crate::TimeName;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    #[default]
    Lenient,
    Strict,
}

/// A value that was not recognised and replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub method: Option<String>,
    pub fajr: Option<f64>,
    pub isha: Option<Twilight>,
    pub maghrib: Option<Twilight>,
    pub midnight: Option<String>,
    pub imsak: Option<Twilight>,
    /// minutes after solar noon
    pub dhuhr: Option<f64>,
    pub asr: Option<String>,
    pub high_lats: Option<String>,
    pub format: Option<String>,
    pub rounding: Option<String>,
    pub timezone: Option<String>,
    /// hours; takes precedence over `timezone`
    pub utc_offset: Option<f64>,
    pub dst: Option<f64>,
    pub location: Option<Location>,
    pub tune: BTreeMap<String, i32>,
    pub iterations: Option<u32>,
}

struct Resolver {
    validation: Validation,
    fallbacks: Vec<Fallback>,
}

impl Resolver {
    /// Parse `value`, or decide what an unrecognised one becomes.
    fn named<T: FromStr<Err = PrayTimeError>>(
        &mut self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Option<T>> {
        let Some(value) = value else {
            return Ok(None);
        };
        match value.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => self.reject(field, value, err).map(|()| None),
        }
    }

    fn reject(&mut self, field: &'static str, value: &str, err: PrayTimeError) -> Result<()> {
        match self.validation {
            Validation::Strict => Err(err),
            Validation::Lenient => {
                warn!(field, value, "unrecognised setting, using default");
                self.fallbacks.push(Fallback {
                    field,
                    value: value.to_string(),
                });
                Ok(())
            }
        }
    }
}

impl SettingsFile {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        debug!("loading prayer time settings");
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Layer the file over the defaults: method-agnostic defaults, then the
    /// named method, then the explicit fields.
    pub fn resolve(&self, validation: Validation) -> Result<(Settings, Vec<Fallback>)> {
        let mut resolver = Resolver {
            validation,
            fallbacks: Vec::new(),
        };
        let mut settings = Settings::default();

        match resolver.named::<CalculationMethod>("method", self.method.as_deref())? {
            Some(method) => settings = settings.with_method(method),
            None if self.method.is_some() => {
                settings.params = settings.params.apply(&MethodOverrides::DEFAULTS);
                settings.method = None;
            }
            None => {}
        }

        let midnight = resolver.named::<MidnightRule>("midnight", self.midnight.as_deref())?;
        settings = settings.with_overrides(&MethodOverrides {
            fajr: self.fajr,
            isha: self.isha,
            maghrib: self.maghrib,
            midnight,
        });

        if let Some(imsak) = self.imsak {
            settings = settings.with_imsak(imsak);
        }
        if let Some(minutes) = self.dhuhr {
            settings = settings.with_dhuhr_minutes(minutes);
        }
        if let Some(asr) = resolver.named("asr", self.asr.as_deref())? {
            settings = settings.with_asr(asr);
        }
        if let Some(rule) = resolver.named("high_lats", self.high_lats.as_deref())? {
            settings = settings.with_high_lats(rule);
        }
        if let Some(format) = resolver.named("format", self.format.as_deref())? {
            settings = settings.with_format(format);
        }
        if let Some(rounding) = resolver.named("rounding", self.rounding.as_deref())? {
            settings = settings.with_rounding(rounding);
        }
        if let Some(name) = self.timezone.as_deref() {
            match name.parse::<Tz>() {
                Ok(tz) => settings = settings.with_timezone(tz),
                Err(_) => resolver.reject(
                    "timezone",
                    name,
                    PrayTimeError::UnknownSetting {
                        field: "timezone",
                        value: name.to_string(),
                    },
                )?,
            }
        }
        if let Some(hours) = self.utc_offset {
            settings = settings.with_utc_offset(UtcOffset::Hours(hours + self.dst.unwrap_or(0.0)));
        }
        if let Some(location) = self.location {
            settings = settings.with_location(location);
        }

        let mut tune = Tune::new();
        for (key, &minutes) in &self.tune {
            if let Some(name) = resolver.named::<TimeName>("tune", Some(key.as_str()))? {
                tune = tune.with(name, minutes);
            }
        }
        settings = settings.with_tune(tune);

        if let Some(iterations) = self.iterations {
            settings = settings.with_iterations(iterations);
        }

        settings.validate()?;
        Ok((settings, resolver.fallbacks))
    }
}
