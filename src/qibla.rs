//! Direction of the Kaaba.

use crate::astro::{darctan2, dcos, dsin, fix_angle};
use crate::settings::Location;

/// The Kaaba, Mecca.
pub const KAABA: Location = Location {
    latitude: 21.4225,
    longitude: 39.8262,
    elevation: 0.0,
};

/// Initial great-circle bearing from `from` to the Kaaba, degrees clockwise
/// from true north in `[0, 360)`.
pub fn bearing(from: &Location) -> f64 {
    let d_lng = KAABA.longitude - from.longitude;
    let y = dsin(d_lng) * dcos(KAABA.latitude);
    let x = dcos(from.latitude) * dsin(KAABA.latitude)
        - dsin(from.latitude) * dcos(KAABA.latitude) * dcos(d_lng);
    fix_angle(darctan2(y, x))
}

/// Rotation of a compass needle pointing at the Kaaba on a device whose
/// heading is `heading` degrees from north.
pub fn needle_rotation(bearing: f64, heading: f64) -> f64 {
    fix_angle(bearing - heading)
}
