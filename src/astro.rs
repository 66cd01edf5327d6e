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

//! Solar position and the degree-based trigonometry the engine is built on.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};

/// Apparent altitude of the sun's upper limb at sunrise/sunset, in degrees
/// below the horizon (refraction plus semi-diameter).
pub const HORIZON_ANGLE: f64 = 0.833;

/* julian date at 0h UT of a calendar date */
pub fn julian_date(date: NaiveDate) -> f64 {
    let (mut year, mut month) = (date.year(), date.month() as i32);
    if month <= 2 {
        year -= 1;
        month += 12;
    }

    let a = (year as f64 / 100.).floor();
    let b = 2. - a + (a / 4.).floor();

    (365.25 * (year + 4716) as f64).floor()
        + (30.6001 * (month + 1) as f64).floor()
        + date.day() as f64
        + b
        - 1524.5
}

/// Declination of the sun and equation of time at a julian date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// degrees
    pub declination: f64,
    /// hours
    pub equation: f64,
}

/* compute declination angle of sun and equation of time */
pub fn sun_position(jd: f64) -> SunPosition {
    let d = jd - 2451545.0;
    let g = fix_angle(357.529 + 0.98560028 * d);
    let q = fix_angle(280.459 + 0.98564736 * d);
    let l = fix_angle(q + 1.915 * dsin(g) + 0.020 * dsin(2. * g));

    let e = 23.439 - 0.00000036 * d;

    let declination = darcsin(dsin(e) * dsin(l));
    let ra = fix_hour(darctan2(dcos(e) * dsin(l), dcos(l)) / 15.0);

    // q and ra wrap independently around the equinox
    let equation = fix_hour(q / 15.0 - ra + 12.0) - 12.0;

    SunPosition {
        declination,
        equation,
    }
}

/// Sunrise/sunset depression for an observer above sea level.
pub fn rise_set_angle(elevation_m: f64) -> f64 {
    HORIZON_ANGLE + 0.0347 * elevation_m.max(0.0).sqrt()
}

/* ---------------------- Trigonometric Functions ----------------------- */

/* degree sin */
pub fn dsin(d: f64) -> f64 {
    deg2rad(d).sin()
}

/* degree cos */
pub fn dcos(d: f64) -> f64 {
    deg2rad(d).cos()
}

/* degree tan */
pub fn dtan(d: f64) -> f64 {
    deg2rad(d).tan()
}

/* degree arcsin */
pub fn darcsin(x: f64) -> f64 {
    rad2deg(x.asin())
}

/* degree arccos, None outside [-1, 1] */
pub fn darccos(x: f64) -> Option<f64> {
    if (-1.0..=1.0).contains(&x) {
        Some(rad2deg(x.acos()))
    } else {
        None
    }
}

/* degree arctan2 */
pub fn darctan2(y: f64, x: f64) -> f64 {
    rad2deg(y.atan2(x))
}

/* degree arccot */
pub fn darccot(x: f64) -> f64 {
    rad2deg((1.0 / x).atan())
}

fn deg2rad(d: f64) -> f64 {
    d * PI / 180.0
}

fn rad2deg(r: f64) -> f64 {
    r * 180.0 / PI
}

/* range reduce angle to [0, 360) */
pub fn fix_angle(a: f64) -> f64 {
    a.rem_euclid(360.0)
}

/* range reduce hours to [0, 24) */
pub fn fix_hour(a: f64) -> f64 {
    a.rem_euclid(24.0)
}

/* compute the forward difference between two times of day */
pub fn time_diff(time1: f64, time2: f64) -> f64 {
    fix_hour(time2 - time1)
}
