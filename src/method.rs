//! Calculation methods and their twilight parameters.
//!
//! Parameters are layered in a fixed order: the method-agnostic defaults,
//! then the method table entry, then any caller overrides. Each layer is a
//! [`MethodOverrides`] applied onto a complete [`MethodParams`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrayTimeError;

/// A twilight boundary: either a solar depression angle or a fixed number of
/// minutes from the neighbouring time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TwilightRepr", into = "TwilightRepr")]
pub enum Twilight {
    /// degrees below the horizon
    Angle(f64),
    /// minutes from the anchor time
    Minutes(f64),
}

impl Twilight {
    pub fn angle(self) -> Option<f64> {
        match self {
            Twilight::Angle(a) => Some(a),
            Twilight::Minutes(_) => None,
        }
    }

    pub fn minutes(self) -> Option<f64> {
        match self {
            Twilight::Minutes(m) => Some(m),
            Twilight::Angle(_) => None,
        }
    }
}

impl fmt::Display for Twilight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Twilight::Angle(a) => write!(f, "{a}"),
            Twilight::Minutes(m) => write!(f, "{m} min"),
        }
    }
}

/// Accepts `"17.5"`, `"90 min"` and `"1min"`.
impl FromStr for Twilight {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PrayTimeError::UnknownSetting {
            field: "twilight",
            value: s.to_string(),
        };
        if let Some(number) = s.strip_suffix("min") {
            let minutes = number.trim().parse::<f64>().map_err(|_| invalid())?;
            return Ok(Twilight::Minutes(minutes));
        }
        s.parse::<f64>().map(Twilight::Angle).map_err(|_| invalid())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TwilightRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<TwilightRepr> for Twilight {
    type Error = PrayTimeError;

    fn try_from(repr: TwilightRepr) -> Result<Self, Self::Error> {
        match repr {
            TwilightRepr::Number(angle) => Ok(Twilight::Angle(angle)),
            TwilightRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Twilight> for TwilightRepr {
    fn from(twilight: Twilight) -> Self {
        match twilight {
            Twilight::Angle(a) => TwilightRepr::Number(a),
            Twilight::Minutes(_) => TwilightRepr::Text(twilight.to_string()),
        }
    }
}

/// How the night midpoint is apportioned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidnightRule {
    /// mid sunset to sunrise
    #[default]
    Standard,
    /// mid sunset to fajr
    Jafari,
}

impl FromStr for MidnightRule {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(MidnightRule::Standard),
            "jafari" => Ok(MidnightRule::Jafari),
            _ => Err(PrayTimeError::UnknownSetting {
                field: "midnight",
                value: s.to_string(),
            }),
        }
    }
}

/// Fully resolved method parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodParams {
    pub fajr: f64,
    pub isha: Twilight,
    pub maghrib: Twilight,
    pub midnight: MidnightRule,
}

/// The engine starts out on MWL.
impl Default for MethodParams {
    fn default() -> Self {
        MethodParams {
            fajr: 18.0,
            isha: Twilight::Angle(17.0),
            maghrib: Twilight::Minutes(1.0),
            midnight: MidnightRule::Standard,
        }
    }
}

impl MethodParams {
    /// Overlay the fields `overrides` sets.
    pub fn apply(self, overrides: &MethodOverrides) -> Self {
        MethodParams {
            fajr: overrides.fajr.unwrap_or(self.fajr),
            isha: overrides.isha.unwrap_or(self.isha),
            maghrib: overrides.maghrib.unwrap_or(self.maghrib),
            midnight: overrides.midnight.unwrap_or(self.midnight),
        }
    }
}

/// A partial set of method parameters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodOverrides {
    pub fajr: Option<f64>,
    pub isha: Option<Twilight>,
    pub maghrib: Option<Twilight>,
    pub midnight: Option<MidnightRule>,
}

impl MethodOverrides {
    /// Method-agnostic defaults, applied before every method entry.
    pub const DEFAULTS: MethodOverrides = MethodOverrides {
        fajr: None,
        isha: Some(Twilight::Angle(14.0)),
        maghrib: Some(Twilight::Minutes(1.0)),
        midnight: Some(MidnightRule::Standard),
    };

    const fn angles(fajr: f64, isha: f64) -> Self {
        MethodOverrides {
            fajr: Some(fajr),
            isha: Some(Twilight::Angle(isha)),
            maghrib: None,
            midnight: None,
        }
    }

    const fn jafari(fajr: f64, maghrib: f64) -> Self {
        MethodOverrides {
            fajr: Some(fajr),
            isha: None,
            maghrib: Some(Twilight::Angle(maghrib)),
            midnight: Some(MidnightRule::Jafari),
        }
    }
}

// Calculation Methods
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum CalculationMethod {
    #[default]
    MWL, // Muslim World League
    ISNA,      // Islamic Society of North America
    Egypt,     // Egyptian General Authority of Survey
    Makkah,    // Umm al-Qura University, Makkah
    Karachi,   // University of Islamic Sciences, Karachi
    Tehran,    // Institute of Geophysics, University of Tehran
    Jafari,    // Shia Ithna Ashari, Leva Institute, Qum
    France,    // Union des Organisations Islamiques de France
    Russia,    // Spiritual Administration of Muslims of Russia
    Singapore, // Majlis Ugama Islam Singapura
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 10] = [
        CalculationMethod::MWL,
        CalculationMethod::ISNA,
        CalculationMethod::Egypt,
        CalculationMethod::Makkah,
        CalculationMethod::Karachi,
        CalculationMethod::Tehran,
        CalculationMethod::Jafari,
        CalculationMethod::France,
        CalculationMethod::Russia,
        CalculationMethod::Singapore,
    ];

    pub fn name(self) -> &'static str {
        use CalculationMethod::*;
        match self {
            MWL => "MWL",
            ISNA => "ISNA",
            Egypt => "Egypt",
            Makkah => "Makkah",
            Karachi => "Karachi",
            Tehran => "Tehran",
            Jafari => "Jafari",
            France => "France",
            Russia => "Russia",
            Singapore => "Singapore",
        }
    }

    /// The table entry for this method.
    pub fn overrides(self) -> MethodOverrides {
        use CalculationMethod::*;
        match self {
            MWL => MethodOverrides::angles(18.0, 17.0),
            ISNA => MethodOverrides::angles(15.0, 15.0),
            Egypt => MethodOverrides::angles(19.5, 17.5),
            Makkah => MethodOverrides {
                fajr: Some(18.5),
                isha: Some(Twilight::Minutes(90.0)),
                maghrib: None,
                midnight: None,
            },
            Karachi => MethodOverrides::angles(18.0, 18.0),
            Tehran => MethodOverrides::jafari(17.7, 4.5),
            Jafari => MethodOverrides::jafari(16.0, 4.0),
            France => MethodOverrides::angles(12.0, 12.0),
            Russia => MethodOverrides::angles(16.0, 15.0),
            Singapore => MethodOverrides::angles(20.0, 18.0),
        }
    }

    /// Resolve over `base`: defaults first, then the table entry.
    pub fn params_over(self, base: MethodParams) -> MethodParams {
        base.apply(&MethodOverrides::DEFAULTS)
            .apply(&self.overrides())
    }

    pub fn params(self) -> MethodParams {
        self.params_over(MethodParams::default())
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalculationMethod {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CalculationMethod::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PrayTimeError::UnknownMethod(s.to_string()))
    }
}
