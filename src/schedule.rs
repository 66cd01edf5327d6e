//! Resolved times of a day and the questions a clock display asks of them.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use serde::Serialize;

use crate::TimeName;

/// A time of day at a fixed offset, or a time the sun never reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrayerTime {
    At(DateTime<FixedOffset>),
    Invalid,
}

impl PrayerTime {
    pub fn instant(self) -> Option<DateTime<FixedOffset>> {
        match self {
            PrayerTime::At(t) => Some(t),
            PrayerTime::Invalid => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTimes {
    date: NaiveDate,
    times: [PrayerTime; TimeName::COUNT],
}

impl DayTimes {
    pub fn new(date: NaiveDate, times: [PrayerTime; TimeName::COUNT]) -> Self {
        DayTimes { date, times }
    }

    /// The date the times were computed for. Late times such as midnight
    /// may fall on the following calendar day.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn get(&self, name: TimeName) -> PrayerTime {
        self.times[name as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimeName, PrayerTime)> + '_ {
        TimeName::ALL.into_iter().zip(self.times.iter().copied())
    }

    /// The first of the five prayers strictly after `now`, if any remain
    /// today.
    pub fn next_prayer<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Option<(TimeName, DateTime<FixedOffset>)> {
        TimeName::PRAYERS
            .into_iter()
            .filter_map(|name| self.get(name).instant().map(|t| (name, t)))
            .filter(|(_, t)| t > now)
            .min_by_key(|(_, t)| *t)
    }

    /// Time left until `name`, zero once it has passed. `None` when the time
    /// is invalid.
    pub fn until<Tz: TimeZone>(&self, name: TimeName, now: &DateTime<Tz>) -> Option<Duration> {
        let target = self.get(name).instant()?;
        let remaining = target.signed_duration_since(now.clone());
        Some(remaining.max(Duration::zero()))
    }
}

/// `HH:MM:SS`, negative durations as zero.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
