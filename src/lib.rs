/*-------------------------- In the name of God ----------------------------*\

    praytime (rust)
    Islamic prayer times calculator library
    Based on libprayertimes 1.0 Cpp library
    Based on PrayTimes JavaScript library

----------------------------- Copyright Block --------------------------------

Copyright (C) 2007-2010 PrayTimes.org

Developed By: Nbiba Bedis <bedis at nbiba at gmail dot com>
Based on Cpp Code By: Mohammad Ebrahim Mohammadi Panah <ebrahim at mohammadi dot ir>
Based on a JavaScript Code By: Hamid Zarrabi-Zadeh

License: GNU GPL v3.0

TERMS OF USE:
    Permission is granted to use this code, with or
    without modification, in any website or application
    provided that credit is given to the original work
    with a link back to PrayTimes.org.

This program is distributed in the hope that it will
be useful, but WITHOUT ANY WARRANTY.

PLEASE DO NOT REMOVE THIS COPYRIGHT BLOCK.

------------------------------------------------------------------------------

User's Manual:
http://praytimes.org/manual

Calculating Formulas:
http://praytimes.org/calculation

\*--------------------------------------------------------------------------*/

//! Prayer times from the sun's position.
//!
//! ```
//! use praytime::{CalculationMethod, DateInput, PrayerTimes, TimeName, UtcOffset};
//!
//! let mut pt = PrayerTimes::new(CalculationMethod::MWL);
//! pt.set_location(21.4225, 39.8262, 0.0)
//!     .set_utc_offset(UtcOffset::Hours(3.0));
//! let table = pt.times(DateInput::calendar(2024, 3, 11)).unwrap();
//! println!("fajr {}", table.get(TimeName::Fajr));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod astro;
pub mod config;
pub mod easy;
pub mod engine;
pub mod error;
pub mod format;
pub mod method;
pub mod qibla;
pub mod schedule;
pub mod settings;

pub use config::{SettingsFile, Validation};
pub use engine::{DateInput, PrayerTimes};
pub use error::{PrayTimeError, Result};
pub use format::{TimeTable, TimeValue};
pub use method::{CalculationMethod, MethodOverrides, MethodParams, MidnightRule, Twilight};
pub use schedule::{DayTimes, PrayerTime};
pub use settings::{
    AsrMethod, HighLatRule, Location, Rounding, Settings, TimeFormat, Tune, UtcOffset,
};

/// Rendered in place of a time that could not be resolved.
pub const INVALID_TIME: &str = "-----";

/// The times of a day, in chronological order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeName {
    Imsak = 0,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
    Midnight,
}

impl TimeName {
    pub const COUNT: usize = 9;

    pub const ALL: [TimeName; TimeName::COUNT] = [
        TimeName::Imsak,
        TimeName::Fajr,
        TimeName::Sunrise,
        TimeName::Dhuhr,
        TimeName::Asr,
        TimeName::Sunset,
        TimeName::Maghrib,
        TimeName::Isha,
        TimeName::Midnight,
    ];

    /// The five obligatory prayers.
    pub const PRAYERS: [TimeName; 5] = [
        TimeName::Fajr,
        TimeName::Dhuhr,
        TimeName::Asr,
        TimeName::Maghrib,
        TimeName::Isha,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TimeName::Imsak => "imsak",
            TimeName::Fajr => "fajr",
            TimeName::Sunrise => "sunrise",
            TimeName::Dhuhr => "dhuhr",
            TimeName::Asr => "asr",
            TimeName::Sunset => "sunset",
            TimeName::Maghrib => "maghrib",
            TimeName::Isha => "isha",
            TimeName::Midnight => "midnight",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeName::Imsak => "Imsak",
            TimeName::Fajr => "Fajr",
            TimeName::Sunrise => "Sunrise",
            TimeName::Dhuhr => "Dhuhr",
            TimeName::Asr => "Asr",
            TimeName::Sunset => "Sunset",
            TimeName::Maghrib => "Maghrib",
            TimeName::Isha => "Isha",
            TimeName::Midnight => "Midnight",
        }
    }
}

impl fmt::Display for TimeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeName {
    type Err = PrayTimeError;

    fn from_str(s: &str) -> Result<Self> {
        TimeName::ALL
            .into_iter()
            .find(|name| name.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PrayTimeError::UnknownSetting {
                field: "time name",
                value: s.to_string(),
            })
    }
}
