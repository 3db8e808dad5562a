//! Low-precision solar position.
//!
//! Follows the usual almanac formulation (mean anomaly, equation of center,
//! ecliptic to equatorial, local sidereal time), accurate to a fraction of
//! a degree between 1950 and 2050, which is plenty for shading studies.

use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const RAD: f64 = PI / 180.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
/// Obliquity of the ecliptic.
const OBLIQUITY: f64 = RAD * 23.4397;

/// Position of the sun as seen from a point on the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Angle above the horizon in radians.
    pub altitude: f64,
    /// Compass bearing in radians, clockwise from north, in `[0, 2π)`.
    pub azimuth: f64,
}

fn days_since_j2000(time: DateTime<Utc>) -> f64 {
    let seconds = time.timestamp() as f64 + f64::from(time.timestamp_subsec_millis()) / 1000.0;
    seconds / SECONDS_PER_DAY - 0.5 + J1970 - J2000
}

fn solar_mean_anomaly(d: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * d)
}

fn ecliptic_longitude(m: f64) -> f64 {
    let center = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    let perihelion = RAD * 102.9372;
    m + center + perihelion + PI
}

fn sidereal_time(d: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * d) - lw
}

/// Computes the sun's altitude and azimuth at `time` for a location.
///
/// `lat` and `lon` are in degrees, east positive.
pub fn sun_position(time: DateTime<Utc>, lat: f64, lon: f64) -> SolarPosition {
    let lw = RAD * -lon;
    let phi = RAD * lat;
    let d = days_since_j2000(time);

    let l = ecliptic_longitude(solar_mean_anomaly(d));
    let dec = (l.sin() * OBLIQUITY.sin()).asin();
    let ra = (l.sin() * OBLIQUITY.cos()).atan2(l.cos());
    let h = sidereal_time(d, lw) - ra;

    let altitude = (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin();
    // Measured from south, positive toward west.
    let from_south = h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos());

    SolarPosition {
        altitude,
        azimuth: (from_south + PI).rem_euclid(TAU),
    }
}

/// UTC offset used for local times at a longitude.
///
/// A fixed offset wins; otherwise the nominal zone of the longitude is used.
pub fn utc_offset_hours(fixed: Option<f32>, lon: f64) -> f64 {
    fixed.map_or_else(|| (lon / 15.0).round(), f64::from)
}

/// Converts a local date and fractional hour into UTC.
pub fn local_to_utc(date: NaiveDate, hours: f64, offset_hours: f64) -> DateTime<Utc> {
    let local = NaiveDateTime::new(date, NaiveTime::MIN);
    let seconds = ((hours - offset_hours) * 3600.0).round() as i64;
    Utc.from_utc_datetime(&local) + Duration::seconds(seconds)
}

/// Formats a fractional hour as `HH:MM`.
pub fn format_hours(hours: f64) -> String {
    let total = (hours * 60.0).round().rem_euclid(24.0 * 60.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: f64) -> DateTime<Utc> {
        local_to_utc(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, 0.0)
    }

    #[test]
    fn test_equinox_noon_at_equator_is_overhead() {
        let pos = sun_position(utc(2024, 3, 20, 12.0), 0.0, 0.0);
        assert!(pos.altitude > 85.0 * RAD, "altitude {}", pos.altitude / RAD);
    }

    #[test]
    fn test_solstice_noon_in_london() {
        // 90 - 51.5 + 23.44
        let pos = sun_position(utc(2024, 6, 21, 12.0), 51.5, 0.0);
        assert!((pos.altitude / RAD - 61.9).abs() < 1.0);
        assert!((pos.azimuth - PI).abs() < 0.1, "azimuth {}", pos.azimuth / RAD);
    }

    #[test]
    fn test_morning_sun_is_east_and_evening_west() {
        let morning = sun_position(utc(2024, 6, 21, 7.0), 51.5, 0.0);
        let evening = sun_position(utc(2024, 6, 21, 17.0), 51.5, 0.0);
        assert!((0.0..PI).contains(&morning.azimuth));
        assert!((PI..TAU).contains(&evening.azimuth));
        assert!(morning.altitude > 0.0 && evening.altitude > 0.0);
    }

    #[test]
    fn test_midnight_is_below_horizon() {
        let pos = sun_position(utc(2024, 12, 21, 0.0), 47.4, 8.5);
        assert!(pos.altitude < -0.5);
    }

    #[test]
    fn test_local_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let t = local_to_utc(date, 14.5, 2.0);
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 6, 21, 12, 30, 0).unwrap());
        assert_eq!(utc_offset_hours(None, 8.54), 1.0);
        assert_eq!(utc_offset_hours(Some(-3.5), 8.54), -3.5);
        assert_eq!(format_hours(6.25), "06:15");
        assert_eq!(format_hours(24.0), "00:00");
    }
}
