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

//! The prayer time engine.
//!
//! A computation runs in stages over [`DayHours`], each stage producing a new
//! value: seed guesses, `iterations` refinement passes against the sun's
//! position, high latitude fallback, fixed-minute rules, midnight, tuning,
//! and finally conversion to instants in the display offset.

use std::ops::Index;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::astro::{self, dcos, dsin, dtan, fix_hour, time_diff, SunPosition};
use crate::error::{PrayTimeError, Result};
use crate::format::{round_instant, TimeTable};
use crate::method::{CalculationMethod, MethodOverrides, MethodParams, MidnightRule, Twilight};
use crate::schedule::{DayTimes, PrayerTime};
use crate::settings::{
    AsrMethod, HighLatRule, Location, Rounding, Settings, TimeFormat, Tune, UtcOffset,
};
use crate::TimeName;

/// Which side of solar noon an angle is solved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Before,
    After,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Before => -1.0,
            Direction::After => 1.0,
        }
    }
}

/// Decimal hours for every time of a day. `None` marks a time the sun
/// never reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayHours([Option<f64>; TimeName::COUNT]);

impl DayHours {
    /// Initial guesses the first pass refines.
    pub const SEED: DayHours = DayHours([
        Some(5.),
        Some(5.),
        Some(6.),
        Some(12.),
        Some(13.),
        Some(18.),
        Some(18.),
        Some(18.),
        Some(24.),
    ]);

    pub fn get(&self, name: TimeName) -> Option<f64> {
        self.0[name as usize]
    }

    fn set(&mut self, name: TimeName, value: Option<f64>) {
        self.0[name as usize] = value;
    }

    fn guess(&self, name: TimeName) -> f64 {
        self.get(name)
            .or(DayHours::SEED.get(name))
            .unwrap_or(12.0)
    }
}

impl Index<TimeName> for DayHours {
    type Output = Option<f64>;

    fn index(&self, name: TimeName) -> &Self::Output {
        &self.0[name as usize]
    }
}

/// A calendar date, or a number of days from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Calendar { year: i32, month: u32, day: u32 },
    Date(NaiveDate),
    DaysFromToday(i64),
}

impl DateInput {
    pub fn calendar(year: i32, month: u32, day: u32) -> Self {
        DateInput::Calendar { year, month, day }
    }

    fn resolve(self, today: impl FnOnce() -> NaiveDate) -> Result<NaiveDate> {
        match self {
            DateInput::Calendar { year, month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| PrayTimeError::InvalidDate(format!("{year}-{month:02}-{day:02}"))),
            DateInput::Date(date) => Ok(date),
            DateInput::DaysFromToday(days) => {
                let today = today();
                Duration::try_days(days)
                    .and_then(|offset| today.checked_add_signed(offset))
                    .ok_or_else(|| {
                        PrayTimeError::InvalidDate(format!("{today} {days:+} days"))
                    })
            }
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

/// Per-call state: the settings snapshot and the longitude-corrected julian
/// date. Times it works with are local mean time at the observer.
struct Solver<'a> {
    settings: &'a Settings,
    julian_date: f64,
}

impl<'a> Solver<'a> {
    fn new(settings: &'a Settings, date: NaiveDate) -> Self {
        Solver {
            settings,
            julian_date: astro::julian_date(date) - settings.location.longitude / (15. * 24.),
        }
    }

    fn latitude(&self) -> f64 {
        self.settings.location.latitude
    }

    fn params(&self) -> &MethodParams {
        &self.settings.params
    }

    fn sun_position(&self, t: f64) -> SunPosition {
        astro::sun_position(self.julian_date + t / 24.0)
    }

    /* compute mid-day (Dhuhr, Zawal) time */
    fn mid_day(&self, t: f64) -> f64 {
        fix_hour(12. - self.sun_position(t).equation)
    }

    /* time at which the sun is `angle` degrees below the horizon */
    fn angle_time(&self, angle: f64, t: f64, direction: Direction) -> Option<f64> {
        let lat = self.latitude();
        let decl = self.sun_position(t).declination;
        let cos_h = (-dsin(angle) - dsin(decl) * dsin(lat)) / (dcos(decl) * dcos(lat));
        let h = astro::darccos(cos_h)? / 15.0;
        Some(self.mid_day(t) + direction.sign() * h)
    }

    /* the angle at which the shadow reaches `factor` times its length */
    fn asr_angle(&self, factor: f64, t: f64) -> f64 {
        let decl = self.sun_position(t).declination;
        -astro::darccot(factor + dtan((self.latitude() - decl).abs()))
    }

    fn twilight_time(&self, twilight: Twilight, t: f64, carry: Option<f64>) -> Option<f64> {
        match twilight {
            Twilight::Angle(angle) => self.angle_time(angle, t, Direction::After),
            Twilight::Minutes(_) => carry,
        }
    }

    /// One refinement pass: every time is re-solved with the sun's position
    /// at its own current guess.
    fn process(&self, guess: &DayHours) -> DayHours {
        use TimeName::*;

        let horizon = astro::rise_set_angle(self.settings.location.elevation);
        let params = self.params();

        let fajr = self.angle_time(params.fajr, guess.guess(Fajr), Direction::Before);
        let sunrise = self.angle_time(horizon, guess.guess(Sunrise), Direction::Before);
        let sunset = self.angle_time(horizon, guess.guess(Sunset), Direction::After);
        let asr_t = guess.guess(Asr);
        let asr = self.angle_time(
            self.asr_angle(self.settings.asr.shadow_factor(), asr_t),
            asr_t,
            Direction::After,
        );
        let imsak = match self.settings.imsak {
            Twilight::Angle(angle) => self.angle_time(angle, guess.guess(Imsak), Direction::Before),
            Twilight::Minutes(_) => fajr,
        };
        let maghrib = self.twilight_time(params.maghrib, guess.guess(Maghrib), sunset);
        let isha = self.twilight_time(params.isha, guess.guess(Isha), maghrib);

        DayHours([
            imsak,
            fajr,
            sunrise,
            Some(self.mid_day(guess.guess(Dhuhr))),
            asr,
            sunset,
            maghrib,
            isha,
            guess.get(Midnight),
        ])
    }

    /// Replace dawn and dusk times that are missing, or further from the
    /// horizon than the rule's share of the night allows.
    fn adjust_high_lats(&self, times: DayHours) -> DayHours {
        use TimeName::*;

        let rule = self.settings.high_lats;
        if rule == HighLatRule::None {
            return times;
        }
        let (Some(sunrise), Some(sunset)) = (times[Sunrise], times[Sunset]) else {
            return times;
        };
        let night = time_diff(sunset, sunrise);
        let params = self.params();
        let mut adjusted = times;

        if let Twilight::Angle(angle) = self.settings.imsak {
            let imsak = fallback(rule, times[Imsak], sunrise, angle, night, Direction::Before);
            adjusted.set(Imsak, imsak);
        }
        adjusted.set(
            Fajr,
            fallback(rule, times[Fajr], sunrise, params.fajr, night, Direction::Before),
        );
        adjusted.set(
            Isha,
            fallback(
                rule,
                times[Isha],
                sunset,
                params.isha.angle().unwrap_or(18.0),
                night,
                Direction::After,
            ),
        );
        adjusted.set(
            Maghrib,
            fallback(
                rule,
                times[Maghrib],
                sunset,
                params.maghrib.angle().unwrap_or(4.0),
                night,
                Direction::After,
            ),
        );
        adjusted
    }

    /// Fixed-minute rules and the dhuhr offset.
    fn apply_rules(&self, times: DayHours) -> DayHours {
        use TimeName::*;

        let params = self.params();
        let mut updated = times;
        if let Twilight::Minutes(minutes) = self.settings.imsak {
            updated.set(Imsak, times[Fajr].map(|fajr| fajr - minutes / 60.0));
        }
        if let Twilight::Minutes(minutes) = params.maghrib {
            updated.set(Maghrib, times[Sunset].map(|sunset| sunset + minutes / 60.0));
        }
        if let Twilight::Minutes(minutes) = params.isha {
            updated.set(Isha, updated[Maghrib].map(|maghrib| maghrib + minutes / 60.0));
        }
        updated.set(
            Dhuhr,
            times[Dhuhr].map(|dhuhr| dhuhr + self.settings.dhuhr_minutes / 60.0),
        );
        updated
    }

    fn with_midnight(&self, times: DayHours) -> DayHours {
        use TimeName::*;

        let end = match self.params().midnight {
            MidnightRule::Standard => times[Sunrise],
            MidnightRule::Jafari => times[Fajr],
        };
        let mut updated = times;
        updated.set(
            Midnight,
            times[Sunset]
                .zip(end)
                .map(|(sunset, end)| sunset + time_diff(sunset, end) / 2.0),
        );
        updated
    }

    fn tune(&self, times: DayHours) -> DayHours {
        let tune = &self.settings.tune;
        let mut tuned = times;
        for name in TimeName::ALL {
            let minutes = tune.minutes(name);
            if minutes != 0 {
                tuned.set(name, times[name].map(|t| t + minutes as f64 / 60.0));
            }
        }
        tuned
    }

    fn compute_hours(&self) -> DayHours {
        let mut times = DayHours::SEED;
        for _ in 0..self.settings.iterations {
            times = self.process(&times);
        }
        let times = self.adjust_high_lats(times);
        let times = self.apply_rules(times);
        let times = self.with_midnight(times);
        self.tune(times)
    }
}

/// High latitude fallback for a single time: keep a solved time if it lies
/// within `portion` of the night from `base`, otherwise use that bound.
fn fallback(
    rule: HighLatRule,
    time: Option<f64>,
    base: f64,
    angle: f64,
    night: f64,
    direction: Direction,
) -> Option<f64> {
    let Some(portion) = rule.night_portion(angle).map(|p| p * night) else {
        return time;
    };
    let within = |t: f64| match direction {
        Direction::Before => time_diff(t, base) <= portion,
        Direction::After => time_diff(base, t) <= portion,
    };
    match time {
        Some(t) if within(t) => Some(t),
        _ => Some(base + direction.sign() * portion),
    }
}

/// Instant of a local-mean-time value on `date`.
fn to_utc(date: NaiveDate, longitude: f64, hours: f64) -> Option<DateTime<Utc>> {
    let utc_hours = hours - longitude / 15.0;
    if !utc_hours.is_finite() {
        return None;
    }
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    let millis = (utc_hours * 3_600_000.0).floor() as i64;
    midnight.checked_add_signed(Duration::try_milliseconds(millis)?)
}

fn fixed<T: TimeZone>(instant: DateTime<Utc>, zone: &T) -> DateTime<FixedOffset> {
    let local = instant.with_timezone(zone);
    let offset = local.offset().fix();
    instant.with_timezone(&offset)
}

fn to_display(settings: &Settings, instant: DateTime<Utc>) -> Result<DateTime<FixedOffset>> {
    match settings.utc_offset {
        UtcOffset::Hours(hours) => {
            let offset = FixedOffset::east_opt((hours * 3600.0).round() as i32)
                .ok_or(PrayTimeError::InvalidUtcOffset(hours))?;
            Ok(instant.with_timezone(&offset))
        }
        UtcOffset::Auto => Ok(match settings.timezone {
            Some(tz) => fixed(instant, &tz),
            None => fixed(instant, &Local),
        }),
    }
}

fn today(settings: &Settings) -> NaiveDate {
    match settings.timezone {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

/// Compute the day's times under `settings`.
pub fn compute_day(settings: &Settings, date: DateInput) -> Result<DayTimes> {
    settings.validate()?;
    let date = date.resolve(|| today(settings))?;
    let location = settings.location;
    debug!(
        %date,
        latitude = location.latitude,
        longitude = location.longitude,
        method = ?settings.method,
        "computing prayer times"
    );

    let hours = Solver::new(settings, date).compute_hours();

    let mut times = [PrayerTime::Invalid; TimeName::COUNT];
    for name in TimeName::ALL {
        let instant = hours[name].and_then(|h| to_utc(date, location.longitude, h));
        times[name as usize] = match instant {
            Some(instant) => {
                let rounded = round_instant(instant, settings.rounding);
                PrayerTime::At(to_display(settings, rounded)?)
            }
            None => {
                warn!(
                    %date,
                    latitude = location.latitude,
                    time = name.key(),
                    "sun does not reach the required angle, time left invalid"
                );
                PrayerTime::Invalid
            }
        };
    }
    Ok(DayTimes::new(date, times))
}

/// Prayer time calculator holding its settings between computations.
#[derive(Debug, Clone, Default)]
pub struct PrayerTimes {
    settings: Settings,
}

impl PrayerTimes {
    pub fn new(method: CalculationMethod) -> Self {
        PrayerTimes {
            settings: Settings::new(method),
        }
    }

    pub fn with_settings(settings: Settings) -> Self {
        PrayerTimes { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch to a method by name. An unknown name keeps the current fajr
    /// angle and applies the method-agnostic defaults.
    pub fn configure(&mut self, name: &str) -> &mut Self {
        match name.parse::<CalculationMethod>() {
            Ok(method) => self.set_method(method),
            Err(_) => {
                warn!(method = name, "unknown calculation method, using defaults");
                self.settings.params = self.settings.params.apply(&MethodOverrides::DEFAULTS);
                self.settings.method = None;
                self
            }
        }
    }

    /// Like [`configure`](Self::configure) but rejects unknown names.
    pub fn try_configure(&mut self, name: &str) -> Result<&mut Self> {
        let method = name.parse::<CalculationMethod>()?;
        Ok(self.set_method(method))
    }

    pub fn set_method(&mut self, method: CalculationMethod) -> &mut Self {
        self.settings.params = method.params_over(self.settings.params);
        self.settings.method = Some(method);
        self
    }

    pub fn set_method_params(&mut self, params: MethodParams) -> &mut Self {
        self.settings.params = params;
        self.settings.method = None;
        self
    }

    pub fn set_asr_method(&mut self, asr: AsrMethod) -> &mut Self {
        self.settings.asr = asr;
        self
    }

    pub fn set_high_lat_rule(&mut self, rule: HighLatRule) -> &mut Self {
        self.settings.high_lats = rule;
        self
    }

    pub fn set_time_format(&mut self, format: TimeFormat) -> &mut Self {
        self.settings.format = format;
        self
    }

    /// Zone for [`UtcOffset::Auto`]; also switches the offset to auto.
    pub fn set_timezone(&mut self, timezone: Tz) -> &mut Self {
        self.settings.timezone = Some(timezone);
        self.settings.utc_offset = UtcOffset::Auto;
        self
    }

    pub fn set_utc_offset(&mut self, utc_offset: UtcOffset) -> &mut Self {
        self.settings.utc_offset = utc_offset;
        self
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64, elevation: f64) -> &mut Self {
        self.settings.location = Location::new(latitude, longitude).with_elevation(elevation);
        self
    }

    pub fn set_tune(&mut self, tune: Tune) -> &mut Self {
        self.settings.tune = tune;
        self
    }

    pub fn set_rounding(&mut self, rounding: Rounding) -> &mut Self {
        self.settings.rounding = rounding;
        self
    }

    pub fn set_iterations(&mut self, iterations: u32) -> &mut Self {
        self.settings.iterations = iterations;
        self
    }

    pub fn set_dhuhr_minutes(&mut self, minutes: f64) -> &mut Self {
        self.settings.dhuhr_minutes = minutes;
        self
    }

    pub fn set_imsak(&mut self, imsak: Twilight) -> &mut Self {
        self.settings.imsak = imsak;
        self
    }

    /// Decimal hours in local mean time at the observer, before conversion.
    pub fn hours(&self, date: impl Into<DateInput>) -> Result<DayHours> {
        self.settings.validate()?;
        let date = date.into().resolve(|| today(&self.settings))?;
        Ok(Solver::new(&self.settings, date).compute_hours())
    }

    pub fn compute(&self, date: impl Into<DateInput>) -> Result<DayTimes> {
        compute_day(&self.settings, date.into())
    }

    /// The day's times rendered in the configured format.
    pub fn times(&self, date: impl Into<DateInput>) -> Result<TimeTable> {
        let day = self.compute(date)?;
        Ok(TimeTable::render(&day, self.settings.format))
    }

    /// One-shot computation: `location`, the offset and the format apply to
    /// this call only. `dst` is added to a fixed offset and ignored for
    /// [`UtcOffset::Auto`].
    pub fn get_times(
        &self,
        date: impl Into<DateInput>,
        location: Option<Location>,
        utc_offset: UtcOffset,
        dst: f64,
        format: TimeFormat,
    ) -> Result<TimeTable> {
        let mut settings = self.settings.clone().with_format(format);
        if let Some(location) = location {
            settings = settings.with_location(location);
        }
        settings = settings.with_utc_offset(match utc_offset {
            UtcOffset::Auto => UtcOffset::Auto,
            UtcOffset::Hours(hours) => UtcOffset::Hours(hours + dst),
        });
        let day = compute_day(&settings, date.into())?;
        Ok(TimeTable::render(&day, format))
    }
}
