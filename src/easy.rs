//! Flat 24-hour strings for callers that just want a table to print.

use serde::Serialize;

use crate::engine::DateInput;
use crate::error::Result;
use crate::settings::{Location, TimeFormat, UtcOffset};
use crate::TimeName;

impl crate::PrayerTimes {
    /// Times for a calendar date at a fixed `timezone` offset in hours.
    pub fn get_prayer_times_easy24(
        &self,
        year: i32,
        month: u32,
        day: u32,
        latitude: f64,
        longitude: f64,
        timezone: f64,
    ) -> Result<EasyTimes24> {
        let table = self.get_times(
            DateInput::calendar(year, month, day),
            Some(Location::new(latitude, longitude)),
            UtcOffset::Hours(timezone),
            0.0,
            TimeFormat::H24,
        )?;
        let text = |name: TimeName| table.get(name).to_string();
        Ok(EasyTimes24 {
            imsak: text(TimeName::Imsak),
            fajr: text(TimeName::Fajr),
            sunrise: text(TimeName::Sunrise),
            dhuhr: text(TimeName::Dhuhr),
            asr: text(TimeName::Asr),
            sunset: text(TimeName::Sunset),
            maghrib: text(TimeName::Maghrib),
            isha: text(TimeName::Isha),
            midnight: text(TimeName::Midnight),
        })
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EasyTimes24 {
    pub imsak: String,
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub sunset: String,
    pub maghrib: String,
    pub isha: String,
    pub midnight: String,
}
