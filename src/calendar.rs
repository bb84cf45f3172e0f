// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil calendar ⇄ Julian day.
//!
//! Dates before 1582-10-15 are taken as proleptic Julian, dates from then on
//! as Gregorian. The ten days 1582-10-05 ..= 1582-10-14 never existed and are
//! rejected.
//!
//! ## References
//! * Meeus, J. (1991). *Astronomical Algorithms*, chap. 7.

use qtty::Centuries;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::julian::JulianDay;

/// First Julian day number whose civil date is Gregorian (1582-10-15).
const FIRST_GREGORIAN_DAY_NUMBER: f64 = 2_299_161.0;

/// A civil date whose day carries the time of day as a fraction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: f64,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u32, day: f64) -> Self {
        Self { year, month, day }
    }

    pub fn to_julian_day(&self) -> Result<JulianDay, DomainError> {
        date_to_julian_day(self.year, self.month, self.day)
    }
}

/// Maps a clock time onto `[0, 1)` of a day.
pub fn time_to_fraction(hours: i32, minutes: i32, seconds: f64) -> Result<f64, DomainError> {
    let total_hours = seconds / 3600.0 + minutes as f64 / 60.0 + hours as f64;
    let fraction = total_hours / 24.0;
    if !(0.0..1.0).contains(&fraction) {
        return Err(DomainError::TimeOutOfRange {
            hours,
            minutes,
            seconds,
        });
    }
    Ok(fraction)
}

/// `true` from 1582-10-15 onwards.
///
/// The earlier calendar is assumed to be Julian all the way back. Days in the
/// cutover gap are an error. `month` may be 13 or 14, the algorithm's
/// spelling of January and February of the following year.
pub fn is_gregorian(year: i32, month: u32, day: f64) -> Result<bool, DomainError> {
    if year != 1582 {
        return Ok(year > 1582);
    }
    if month < 10 {
        return Ok(false);
    }
    if month == 10 {
        if day < 5.0 {
            return Ok(false);
        }
        if day < 15.0 {
            return Err(DomainError::CutoverGap { year, month, day });
        }
    }
    Ok(true)
}

/// Converts a civil date (fractional day) to its Julian day.
///
/// ```
/// use moonclock::date_to_julian_day;
///
/// assert_eq!(date_to_julian_day(2000, 1, 1.5).unwrap().value(), 2_451_545.0);
/// assert_eq!(date_to_julian_day(-4712, 1, 1.5).unwrap().value(), 0.0);
/// assert!(date_to_julian_day(1582, 10, 10.0).is_err());
/// ```
pub fn date_to_julian_day(year: i32, month: u32, day: f64) -> Result<JulianDay, DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidMonth(month));
    }
    let (year, month) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };

    let a = (year as f64 / 100.0).trunc();
    let b = if is_gregorian(year, month, day)? {
        2.0 - a + (a / 4.0).trunc()
    } else {
        0.0
    };

    let jd = (365.25 * (year as f64 + 4716.0)).trunc()
        + (30.6001 * (month as f64 + 1.0)).trunc()
        + day
        + b
        - 1524.5;
    Ok(JulianDay::new(jd))
}

/// Converts a non-negative Julian day back to a civil date.
pub fn julian_day_to_date(jd: JulianDay) -> Result<CalendarDate, DomainError> {
    if jd.value() < 0.0 {
        return Err(DomainError::NegativeJulianDay(jd.value()));
    }

    let shifted = jd.value() + 0.5;
    let z = shifted.trunc();
    let f = shifted - z;

    let a = if z < FIRST_GREGORIAN_DAY_NUMBER {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).trunc();
        z + 1.0 + alpha - (alpha / 4.0).trunc()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).trunc();
    let d = (365.25 * c).trunc();
    let e = ((b - d) / 30.6001).trunc();

    let day = b - d - (30.6001 * e).trunc() + f;
    let month = (if e < 14.0 { e - 1.0 } else { e - 13.0 }) as u32;
    let year = (if month > 2 { c - 4716.0 } else { c - 4715.0 }) as i32;

    Ok(CalendarDate { year, month, day })
}

/// Julian centuries between `epoch` and `jd`.
#[inline]
pub fn julian_day_to_julian_centuries(jd: JulianDay, epoch: JulianDay) -> Centuries {
    jd.julian_centuries_since(epoch)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (year, month, day, JD) pairs from Meeus chap. 7 and the 2025 clock season.
    const DATES: [(i32, u32, f64, f64); 17] = [
        (1957, 10, 4.81, 2_436_116.31),
        (333, 1, 27.5, 1_842_713.0),
        (2000, 1, 1.5, 2_451_545.0),
        (1987, 1, 27.0, 2_446_822.5),
        (1987, 6, 19.5, 2_446_966.0),
        (1988, 1, 27.0, 2_447_187.5),
        (1988, 6, 19.5, 2_447_332.0),
        (1900, 1, 1.0, 2_415_020.5),
        (1600, 1, 1.0, 2_305_447.5),
        (1600, 12, 31.0, 2_305_812.5),
        (837, 4, 10.3, 2_026_871.8),
        (-1000, 7, 12.5, 1_356_001.0),
        (-1000, 2, 29.0, 1_355_866.5),
        (-1001, 8, 17.9, 1_355_671.4),
        (-4712, 1, 1.5, 0.0),
        (2010, 1, 1.0, 2_455_197.5),
        (2015, 3, 21.5, 2_457_103.0),
    ];

    #[test]
    fn civil_dates_to_julian_days() {
        for (year, month, day, expected) in DATES {
            let jd = date_to_julian_day(year, month, day).unwrap();
            assert!(
                (jd.value() - expected).abs() < 1e-6,
                "{year}-{month}-{day}: {} != {expected}",
                jd.value()
            );
        }
    }

    #[test]
    fn julian_days_back_to_civil_dates() {
        for (year, month, day, jd) in DATES {
            let date = julian_day_to_date(JulianDay::new(jd)).unwrap();
            assert_eq!((date.year, date.month), (year, month), "JD {jd}");
            assert!((date.day - day).abs() < 1e-4, "JD {jd}: day {}", date.day);
        }
    }

    #[test]
    fn inverse_of_arbitrary_days() {
        let date = julian_day_to_date(JulianDay::new(1_507_900.13)).unwrap();
        assert_eq!((date.year, date.month), (-584, 5));
        assert!((date.day - 28.63).abs() < 1e-4);

        let date = julian_day_to_date(JulianDay::new(2_460_761.25)).unwrap();
        assert_eq!((date.year, date.month), (2025, 3));
        assert!((date.day - 26.75).abs() < 1e-9);
    }

    #[test]
    fn round_trip_across_the_cutover() {
        let days = [(1582, 10, 4.0), (1582, 10, 15.0), (1582, 10, 15.99), (1583, 2, 28.25)];
        for (year, month, day) in days {
            let jd = date_to_julian_day(year, month, day).unwrap();
            let back = julian_day_to_date(jd).unwrap();
            assert_eq!((back.year, back.month), (year, month));
            assert!((back.day - day).abs() < 1e-4);
        }
        let last_julian = date_to_julian_day(1582, 10, 4.0).unwrap();
        let first_gregorian = date_to_julian_day(1582, 10, 15.0).unwrap();
        assert_eq!((first_gregorian - last_julian).value(), 1.0);
    }

    #[test]
    fn cutover_gap_is_rejected() {
        for day in [5.0, 7.5, 10.0, 14.0, 14.999] {
            assert!(
                matches!(
                    date_to_julian_day(1582, 10, day),
                    Err(DomainError::CutoverGap { .. })
                ),
                "1582-10-{day} accepted"
            );
        }
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert_eq!(
            date_to_julian_day(2025, 13, 1.0),
            Err(DomainError::InvalidMonth(13))
        );
        assert!(date_to_julian_day(2025, 0, 1.0).is_err());
    }

    #[test]
    fn negative_julian_day_is_rejected() {
        assert!(julian_day_to_date(JulianDay::new(-0.0001)).is_err());
        assert!(julian_day_to_date(JulianDay::new(0.0)).is_ok());
    }

    #[test]
    fn time_fractions() {
        assert!((time_to_fraction(18, 32, 14.0).unwrap() - 0.7723842592592592).abs() < 1e-15);
        assert!((time_to_fraction(23, 59, 1.0).unwrap() - 0.9993171296296296).abs() < 1e-15);
        assert_eq!(time_to_fraction(0, 0, 0.0), Ok(0.0));
        assert_eq!(time_to_fraction(12, 0, 0.0), Ok(0.5));
    }

    #[test]
    fn time_fraction_outside_the_day() {
        assert!(time_to_fraction(24, 0, 0.0).is_err());
        assert!(time_to_fraction(-1, 0, 0.0).is_err());
        assert!(time_to_fraction(23, 60, 0.0).is_err());
    }

    #[test]
    fn centuries_rescale() {
        let t = julian_day_to_julian_centuries(JulianDay::new(2_448_908.5), JulianDay::J2000);
        assert!((t.value() + 0.072183436).abs() < 1e-9);
    }
}
