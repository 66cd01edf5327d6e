//! Engine settings.
//!
//! [`Settings`] is a plain value assembled with `with_*` methods and checked
//! by [`Settings::validate`] before every computation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PrayTimeError, Result};
use crate::method::{CalculationMethod, MethodOverrides, MethodParams, Twilight};
use crate::TimeName;

fn unknown(field: &'static str, value: &str) -> PrayTimeError {
    PrayTimeError::UnknownSetting {
        field,
        value: value.to_string(),
    }
}

// Juristic Methods
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsrMethod {
    #[default]
    Standard, // Shafii, Maliki, Hanbali
    Hanafi,
}

impl AsrMethod {
    /// Shadow length relative to object height, on top of the noon shadow.
    pub fn shadow_factor(self) -> f64 {
        match self {
            AsrMethod::Standard => 1.0,
            AsrMethod::Hanafi => 2.0,
        }
    }
}

impl FromStr for AsrMethod {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "shafii" => Ok(AsrMethod::Standard),
            "hanafi" => Ok(AsrMethod::Hanafi),
            _ => Err(unknown("asr", s)),
        }
    }
}

// Adjusting Methods for Higher Latitudes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighLatRule {
    None, // No adjustment
    #[default]
    NightMiddle, // middle of night
    AngleBased,  // angle/60th of night
    OneSeventh,  // 1/7th of night
}

impl HighLatRule {
    /// Fraction of the night used in place of a twilight `angle`.
    pub fn night_portion(self, angle: f64) -> Option<f64> {
        match self {
            HighLatRule::None => None,
            HighLatRule::NightMiddle => Some(1.0 / 2.0),
            HighLatRule::AngleBased => Some(angle / 60.0),
            HighLatRule::OneSeventh => Some(1.0 / 7.0),
        }
    }
}

impl FromStr for HighLatRule {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(HighLatRule::None),
            "nightmiddle" | "midnight" => Ok(HighLatRule::NightMiddle),
            "anglebased" => Ok(HighLatRule::AngleBased),
            "oneseventh" => Ok(HighLatRule::OneSeventh),
            _ => Err(unknown("high_lats", s)),
        }
    }
}

/// Output rendering of a computed time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `05:07`
    #[default]
    H24,
    /// `5:07 AM`
    H12,
    /// `5:07`
    H12NoSuffix,
    /// decimal hours, `5.1166…`
    Float,
    /// `2024-03-11T05:07:00+03:00`
    Iso8601,
}

impl FromStr for TimeFormat {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" => Ok(TimeFormat::H24),
            "12h" => Ok(TimeFormat::H12),
            "12hns" | "12hnosuffix" => Ok(TimeFormat::H12NoSuffix),
            "float" => Ok(TimeFormat::Float),
            "iso8601" | "iso" => Ok(TimeFormat::Iso8601),
            _ => Err(unknown("format", s)),
        }
    }
}

/// Minute rounding applied to every instant before it is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    #[default]
    Nearest,
    Up,
    /// truncate
    Down,
    None,
}

impl FromStr for Rounding {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Rounding::Nearest),
            "up" => Ok(Rounding::Up),
            "down" | "truncate" => Ok(Rounding::Down),
            "none" => Ok(Rounding::None),
            _ => Err(unknown("rounding", s)),
        }
    }
}

/// Offset of the displayed times from UTC.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UtcOffset {
    /// Derived per instant from the configured time zone (or the system
    /// zone), so DST transitions are honoured.
    #[default]
    Auto,
    /// Fixed offset in hours, DST already included.
    Hours(f64),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// meters above sea level
    #[serde(default)]
    pub elevation: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
            elevation: 0.0,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PrayTimeError::InvalidSetting(format!(
                "latitude {} out of range [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PrayTimeError::InvalidSetting(format!(
                "longitude {} out of range [-180, 180]",
                self.longitude
            )));
        }
        if !self.elevation.is_finite() {
            return Err(PrayTimeError::InvalidSetting(format!(
                "elevation {} is not finite",
                self.elevation
            )));
        }
        Ok(())
    }
}

/// Per-time manual corrections in minutes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tune(BTreeMap<TimeName, i32>);

impl Tune {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: TimeName, minutes: i32) -> Self {
        self.0.insert(name, minutes);
        self
    }

    pub fn minutes(&self, name: TimeName) -> i32 {
        self.0.get(&name).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&m| m == 0)
    }
}

impl FromIterator<(TimeName, i32)> for Tune {
    fn from_iter<I: IntoIterator<Item = (TimeName, i32)>>(iter: I) -> Self {
        Tune(iter.into_iter().collect())
    }
}

/// Largest minute rule or dhuhr offset `validate` accepts: one day.
pub const MAX_OFFSET_MINUTES: f64 = 24.0 * 60.0;

/// Everything a computation depends on besides the date.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// The preset `params` came from, if any.
    pub method: Option<CalculationMethod>,
    pub params: MethodParams,
    /// minutes before fajr, or an angle
    pub imsak: Twilight,
    /// minutes after solar noon
    pub dhuhr_minutes: f64,
    pub asr: AsrMethod,
    pub high_lats: HighLatRule,
    pub tune: Tune,
    pub format: TimeFormat,
    pub rounding: Rounding,
    pub utc_offset: UtcOffset,
    /// Zone used by [`UtcOffset::Auto`]; the system zone when unset.
    pub timezone: Option<Tz>,
    pub location: Location,
    /// refinement passes over the seed times
    pub iterations: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            method: Some(CalculationMethod::MWL),
            params: CalculationMethod::MWL.params(),
            imsak: Twilight::Minutes(10.0),
            dhuhr_minutes: 0.0,
            asr: AsrMethod::default(),
            high_lats: HighLatRule::default(),
            tune: Tune::default(),
            format: TimeFormat::default(),
            rounding: Rounding::default(),
            utc_offset: UtcOffset::default(),
            timezone: None,
            location: Location::default(),
            iterations: 1,
        }
    }
}

impl Settings {
    pub fn new(method: CalculationMethod) -> Self {
        Settings::default().with_method(method)
    }

    pub fn with_method(mut self, method: CalculationMethod) -> Self {
        self.params = method.params_over(self.params);
        self.method = Some(method);
        self
    }

    /// Caller overrides, applied last.
    pub fn with_overrides(mut self, overrides: &MethodOverrides) -> Self {
        self.params = self.params.apply(overrides);
        self
    }

    pub fn with_params(mut self, params: MethodParams) -> Self {
        self.params = params;
        self.method = None;
        self
    }

    pub fn with_imsak(mut self, imsak: Twilight) -> Self {
        self.imsak = imsak;
        self
    }

    pub fn with_dhuhr_minutes(mut self, minutes: f64) -> Self {
        self.dhuhr_minutes = minutes;
        self
    }

    pub fn with_asr(mut self, asr: AsrMethod) -> Self {
        self.asr = asr;
        self
    }

    pub fn with_high_lats(mut self, rule: HighLatRule) -> Self {
        self.high_lats = rule;
        self
    }

    pub fn with_tune(mut self, tune: Tune) -> Self {
        self.tune = tune;
        self
    }

    pub fn with_format(mut self, format: TimeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_utc_offset(mut self, utc_offset: UtcOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        if self.iterations == 0 {
            return Err(PrayTimeError::InvalidSetting(
                "iterations must be at least 1".to_string(),
            ));
        }
        if let UtcOffset::Hours(hours) = self.utc_offset {
            if !hours.is_finite() || hours.abs() >= 24.0 {
                return Err(PrayTimeError::InvalidUtcOffset(hours));
            }
        }
        let angles = [
            Some(self.params.fajr),
            self.params.isha.angle(),
            self.params.maghrib.angle(),
            self.imsak.angle(),
        ];
        if let Some(bad) = angles.into_iter().flatten().find(|a| !(0.0..90.0).contains(a)) {
            return Err(PrayTimeError::InvalidSetting(format!(
                "twilight angle {bad} out of range [0, 90)"
            )));
        }
        let minutes = [
            self.params.isha.minutes(),
            self.params.maghrib.minutes(),
            self.imsak.minutes(),
        ];
        if let Some(bad) = minutes
            .into_iter()
            .flatten()
            .find(|m| !(0.0..=MAX_OFFSET_MINUTES).contains(m))
        {
            return Err(PrayTimeError::InvalidSetting(format!(
                "twilight minutes {bad} out of range [0, {MAX_OFFSET_MINUTES}]"
            )));
        }
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&self.dhuhr_minutes) {
            return Err(PrayTimeError::InvalidSetting(format!(
                "dhuhr offset {} out of range [-{MAX_OFFSET_MINUTES}, {MAX_OFFSET_MINUTES}]",
                self.dhuhr_minutes
            )));
        }
        Ok(())
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeFormat::H24 => "24h",
            TimeFormat::H12 => "12h",
            TimeFormat::H12NoSuffix => "12hNS",
            TimeFormat::Float => "float",
            TimeFormat::Iso8601 => "iso8601",
        })
    }
}
