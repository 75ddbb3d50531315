//! Pure chart math: longitudes to signs, houses, and Julian days.

use chrono::{Datelike, NaiveDateTime, Timelike};

/// The twelve zodiac signs, in ecliptic order from 0° Áries.
pub const SIGNS: &[&str] = &[
    "Áries",
    "Touro",
    "Gêmeos",
    "Câncer",
    "Leão",
    "Virgem",
    "Libra",
    "Escorpião",
    "Sagitário",
    "Capricórnio",
    "Aquário",
    "Peixes",
];

/// Normalize a longitude into `[0, 360)`.
pub fn normalize_degrees(longitude: f64) -> f64 {
    let wrapped = longitude % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// The sign occupying an ecliptic longitude.
pub fn sign_for_longitude(longitude: f64) -> &'static str {
    let index = (normalize_degrees(longitude) / 30.0) as usize;
    SIGNS[index.min(11)]
}

/// The house (1..=12) holding an ecliptic longitude, given the twelve
/// cusps in zodiac order.
///
/// Exactly one house interval wraps through 0° Áries; a point falls in it
/// when it is past the cusp or before the next one.
pub fn house_for_longitude(longitude: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_degrees(longitude);
    for i in 0..12 {
        let cusp = normalize_degrees(cusps[i]);
        let next = normalize_degrees(cusps[(i + 1) % 12]);
        let inside = if next > cusp {
            lon >= cusp && lon < next
        } else {
            lon >= cusp || lon < next
        };
        if inside {
            return (i + 1) as u8;
        }
    }
    // Degenerate cusp table (all equal); everything is house 1.
    1
}

/// Julian day for a UTC civil instant (Meeus, ch. 7).
pub fn julian_day_utc(utc: NaiveDateTime) -> f64 {
    let mut year = utc.year() as f64;
    let mut month = utc.month() as f64;
    let day = utc.day() as f64
        + (utc.hour() as f64
            + utc.minute() as f64 / 60.0
            + utc.second() as f64 / 3600.0)
            / 24.0;

    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }
    let a = (year / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + day + b - 1524.5
}
