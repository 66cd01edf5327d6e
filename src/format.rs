//! Minute rounding and rendering of computed times.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Timelike, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schedule::{DayTimes, PrayerTime};
use crate::settings::{Rounding, TimeFormat};
use crate::{TimeName, INVALID_TIME};

const ONE_MINUTE_MS: i64 = 60_000;

/// Round an instant to a whole minute.
pub fn round_instant(instant: DateTime<Utc>, rounding: Rounding) -> DateTime<Utc> {
    let ms = instant.timestamp_millis();
    let rounded = match rounding {
        Rounding::None => return instant,
        Rounding::Nearest => (ms + ONE_MINUTE_MS / 2).div_euclid(ONE_MINUTE_MS),
        Rounding::Down => ms.div_euclid(ONE_MINUTE_MS),
        Rounding::Up => -(-ms).div_euclid(ONE_MINUTE_MS),
    };
    DateTime::from_timestamp_millis(rounded * ONE_MINUTE_MS).unwrap_or(instant)
}

/// A rendered time.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    Text(String),
    /// decimal hours of the local day, `[0, 24)`
    Hours(f64),
    Invalid,
}

impl TimeValue {
    pub fn render(time: PrayerTime, format: TimeFormat) -> TimeValue {
        let PrayerTime::At(t) = time else {
            return TimeValue::Invalid;
        };
        match format {
            TimeFormat::H24 => TimeValue::Text(format!("{:02}:{:02}", t.hour(), t.minute())),
            TimeFormat::H12 | TimeFormat::H12NoSuffix => {
                let (pm, hour) = t.hour12();
                let mut text = format!("{}:{:02}", hour, t.minute());
                if format == TimeFormat::H12 {
                    text.push_str(if pm { " PM" } else { " AM" });
                }
                TimeValue::Text(text)
            }
            TimeFormat::Float => TimeValue::Hours(
                t.hour() as f64
                    + t.minute() as f64 / 60.0
                    + (t.second() as f64 + t.nanosecond() as f64 / 1e9) / 3600.0,
            ),
            TimeFormat::Iso8601 => TimeValue::Text(t.to_rfc3339_opts(SecondsFormat::Secs, false)),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, TimeValue::Invalid)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Text(text) => f.write_str(text),
            TimeValue::Hours(hours) => write!(f, "{hours}"),
            TimeValue::Invalid => f.write_str(INVALID_TIME),
        }
    }
}

impl Serialize for TimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeValue::Text(text) => serializer.serialize_str(text),
            TimeValue::Hours(hours) => serializer.serialize_f64(*hours),
            TimeValue::Invalid => serializer.serialize_str(INVALID_TIME),
        }
    }
}

/// The day's times in one output format. Serializes as a map keyed by
/// lowercase time name.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    date: NaiveDate,
    format: TimeFormat,
    values: [TimeValue; TimeName::COUNT],
}

impl TimeTable {
    pub fn render(day: &DayTimes, format: TimeFormat) -> TimeTable {
        TimeTable {
            date: day.date(),
            format,
            values: TimeName::ALL.map(|name| TimeValue::render(day.get(name), format)),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn format(&self) -> TimeFormat {
        self.format
    }

    pub fn get(&self, name: TimeName) -> &TimeValue {
        &self.values[name as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimeName, &TimeValue)> {
        TimeName::ALL.into_iter().zip(self.values.iter())
    }
}

impl fmt::Display for TimeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{:<9}: {}", name.label(), value)?;
        }
        Ok(())
    }
}

impl Serialize for TimeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TimeName::COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.key(), value)?;
        }
        map.end()
    }
}
