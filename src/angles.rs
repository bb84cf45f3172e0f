// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Degree-domain trigonometry and sexagesimal conversions.
//!
//! All astronomical formulas of the engine are written in degrees, so the
//! wrappers here convert at the boundary of the `f64` trigonometric
//! functions and nowhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[inline]
pub fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

#[inline]
pub fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

#[inline]
pub fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

#[inline]
pub fn asin_deg(sine: f64) -> f64 {
    sine.asin().to_degrees()
}

#[inline]
pub fn acos_deg(cosine: f64) -> f64 {
    cosine.acos().to_degrees()
}

#[inline]
pub fn atan2_deg(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

/// Reduces an angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Reduces an angle into `[0, 360)` and folds the upper half onto `(-180, 0)`.
#[inline]
pub fn fold_signed_degrees(degrees: f64) -> f64 {
    let normalized = normalize_degrees(degrees);
    if normalized > 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// `-1.0` for negative values, `1.0` otherwise (zero included).
#[inline]
pub fn signum(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Converts degrees, arc-minutes and arc-seconds into decimal degrees.
///
/// The sign is carried by `degrees` only; `minutes` and `seconds` must be
/// non-negative. A value smaller than one degree in magnitude is passed with
/// `degrees == 0.0` and is therefore always positive; callers negate the
/// result themselves.
///
/// ```
/// use moonclock::angles::dms_to_degrees;
///
/// assert_eq!(dms_to_degrees(-150.0, 30.0, 0.0).unwrap(), -150.5);
/// assert!(dms_to_degrees(10.0, -1.0, 0.0).is_err());
/// ```
pub fn dms_to_degrees(degrees: f64, minutes: f64, seconds: f64) -> Result<f64, DomainError> {
    if minutes < 0.0 || seconds < 0.0 {
        return Err(DomainError::InvalidSexagesimal {
            primary: degrees,
            minutes,
            seconds,
        });
    }
    Ok(signum(degrees) * (degrees.abs() + minutes / 60.0 + seconds / 3600.0))
}

/// Arc-seconds as decimal degrees, sign preserved.
#[inline]
pub(crate) fn arcsec(seconds: f64) -> f64 {
    seconds / 3600.0
}

/// Arc-minutes as decimal degrees, sign preserved.
#[inline]
pub(crate) fn arcmin(minutes: f64) -> f64 {
    minutes / 60.0
}

/// A time of day split into hours, minutes and seconds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursMinutesSeconds {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl fmt::Display for HoursMinutesSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.seconds.trunc();
        let millis = ((self.seconds - whole) * 1000.0) as u32;
        write!(
            f,
            "{}h{}m{}s.{:03}",
            self.hours, self.minutes, whole as u32, millis
        )
    }
}

/// An angle split into signed whole degrees, arc-minutes and arc-seconds.
///
/// For angles in `(-1°, 0)` the sign cannot be carried by `degrees == 0`;
/// `negative` records it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreesMinutesSeconds {
    pub degrees: i32,
    pub minutes: u32,
    pub seconds: f64,
    pub negative: bool,
}

impl fmt::Display for DegreesMinutesSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative && self.degrees == 0 { "-" } else { "" };
        let whole = self.seconds.trunc();
        let millis = ((self.seconds - whole) * 1000.0) as u32;
        write!(
            f,
            "{sign}{}°{}'{}\".{:03}",
            self.degrees, self.minutes, whole as u32, millis
        )
    }
}

/// Splits fractional hours into h/m/s. Values are wrapped into `[0, 24)`.
pub fn hours_to_hms(hours: f64) -> HoursMinutesSeconds {
    let hours = hours.rem_euclid(24.0);
    let whole_hours = hours.trunc();
    let minutes = (hours - whole_hours) * 60.0;
    let whole_minutes = minutes.trunc();
    HoursMinutesSeconds {
        hours: whole_hours as u32,
        minutes: whole_minutes as u32,
        seconds: (minutes - whole_minutes) * 60.0,
    }
}

/// Expresses an angle (e.g. right ascension) as a time of day, 15° per hour.
pub fn degrees_to_hms(degrees: f64) -> HoursMinutesSeconds {
    hours_to_hms(normalize_degrees(degrees) / 15.0)
}

/// Splits decimal degrees into whole degrees, arc-minutes and arc-seconds.
pub fn degrees_to_dms(degrees: f64) -> DegreesMinutesSeconds {
    let magnitude = degrees.abs();
    let whole_degrees = magnitude.trunc();
    let minutes = (magnitude - whole_degrees) * 60.0;
    let whole_minutes = minutes.trunc();
    let sign = signum(degrees) as i32;
    DegreesMinutesSeconds {
        degrees: sign * whole_degrees as i32,
        minutes: whole_minutes as u32,
        seconds: (minutes - whole_minutes) * 60.0,
        negative: degrees < 0.0,
    }
}

/// Rotates ecliptic coordinates into equatorial ones.
///
/// Returns `(right ascension, declination)` in degrees; the right ascension
/// is in `(-180, 180]` as produced by `atan2`.
pub fn ecliptic_to_equatorial(longitude: f64, latitude: f64, obliquity: f64) -> (f64, f64) {
    let alpha = atan2_deg(
        sin_deg(longitude) * cos_deg(obliquity) - tan_deg(latitude) * sin_deg(obliquity),
        cos_deg(longitude),
    );
    let delta = asin_deg(
        sin_deg(latitude) * cos_deg(obliquity)
            + cos_deg(latitude) * sin_deg(obliquity) * sin_deg(longitude),
    );
    (alpha, delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signum_treats_zero_as_positive() {
        assert_eq!(signum(0.0001), 1.0);
        assert_eq!(signum(1000.0), 1.0);
        assert_eq!(signum(0.0), 1.0);
        assert_eq!(signum(-0.0001), -1.0);
        assert_eq!(signum(-1000.0), -1.0);
    }

    #[test]
    fn dms_conversion() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(dms_to_degrees(150.0, 0.0, 0.0).unwrap(), 150.0));
        assert!(close(dms_to_degrees(150.0, 30.0, 0.0).unwrap(), 150.5));
        assert!(close(dms_to_degrees(150.0, 30.0, 3600.0).unwrap(), 151.5));
        assert!(close(dms_to_degrees(-150.0, 0.0, 0.0).unwrap(), -150.0));
        assert!(close(dms_to_degrees(-150.0, 30.0, 0.0).unwrap(), -150.5));
        assert!(close(dms_to_degrees(-150.0, 30.0, 3600.0).unwrap(), -151.5));
        assert!(close(dms_to_degrees(0.0, 0.0, 1.0).unwrap(), 1.0 / 3600.0));
    }

    #[test]
    fn dms_rejects_negative_minor_components() {
        assert!(dms_to_degrees(0.0, -30.0, 0.0).is_err());
        assert!(dms_to_degrees(12.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn fold_signed_range() {
        assert!((fold_signed_degrees(359.0) + 1.0).abs() < 1e-12);
        assert_eq!(fold_signed_degrees(180.0), 180.0);
        assert!((fold_signed_degrees(-0.5) + 0.5).abs() < 1e-12);
        assert!((fold_signed_degrees(725.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn hms_split_and_display() {
        let hms = hours_to_hms(13.5);
        assert_eq!((hms.hours, hms.minutes), (13, 30));
        assert!(hms.seconds.abs() < 1e-9);

        let ra = degrees_to_hms(197.693195);
        assert_eq!((ra.hours, ra.minutes), (13, 10));
        assert!((ra.seconds - 46.3668).abs() < 1e-3);
        assert_eq!(format!("{}", hours_to_hms(1.5)), "1h30m0s.000");
    }

    #[test]
    fn dms_split_carries_sign_on_degrees() {
        let obliquity = degrees_to_dms(23.443569);
        assert_eq!((obliquity.degrees, obliquity.minutes), (23, 26));
        assert!((obliquity.seconds - 36.848).abs() < 1e-2);

        let south = degrees_to_dms(-7.5);
        assert_eq!((south.degrees, south.minutes), (-7, 30));

        let small = degrees_to_dms(-0.5);
        assert_eq!((small.degrees, small.minutes), (0, 30));
        assert!(small.negative);
        assert!(format!("{small}").starts_with("-0°30'"));
    }

    #[test]
    fn equatorial_rotation_of_the_sun() {
        // Sun on 1992-10-13: apparent longitude 199.90894°, obliquity 23.43999°.
        let (alpha, delta) = ecliptic_to_equatorial(199.90894, 0.0, 23.43999);
        assert!((normalize_degrees(alpha) - 198.38083).abs() < 1e-3);
        assert!((delta + 7.78507).abs() < 1e-3);
    }

    #[test]
    fn equatorial_rotation_of_pollux() {
        // Meeus example 13.a (reverse): Pollux λ=113.215630°, β=6.684170°, ε=23.4392911°.
        let (alpha, delta) = ecliptic_to_equatorial(113.215630, 6.684170, 23.4392911);
        assert!((alpha - 116.328942).abs() < 1e-5);
        assert!((delta - 28.026183).abs() < 1e-5);
    }
}
