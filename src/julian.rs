// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Continuous Julian-day instant.
//!
//! [`JulianDay`] is the common time axis of every series in the crate. It
//! stores a single [`Days`] quantity counted from the Julian epoch
//! (−4712-01-01 12:00), so it is layout-identical to an `f64`.
//!
//! | Quantity | Value |
//! |----------|-------|
//! | [`JulianDay::J2000`] | 2 451 545.0 (2000-01-01 12:00) |
//! | [`JulianDay::JULIAN_CENTURY`] | 36 525 days |
//! | [`DEFAULT_DELTA_T`] | 69.184 s |
//!
//! No ΔT is applied when converting civil timestamps: the instrument
//! evaluates its series on the civil axis and only the rise/set solver
//! accounts for ΔT explicitly.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use chrono::{DateTime, Datelike, Timelike, Utc};
use qtty::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{date_to_julian_day, time_to_fraction};
use crate::error::DomainError;

/// ΔT (TT − UT) used by the rise/set solver when the caller has no better value.
pub const DEFAULT_DELTA_T: Seconds = Seconds::new(69.184);

/// A point on the Julian-day axis.
///
/// Negative values denote instants before the Julian epoch and are valid;
/// only the calendar inverse refuses them.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay {
    quantity: Days,
}

impl JulianDay {
    /// 2000-01-01T12:00:00 (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    // ── constructors ──────────────────────────────────────────────────

    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self { quantity: days }
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    // ── epochs ────────────────────────────────────────────────────────

    /// Julian centuries since J2000.0, the argument of every time polynomial.
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        self.julian_centuries_since(Self::J2000)
    }

    /// Julian centuries elapsed since an arbitrary `epoch`.
    #[inline]
    pub fn julian_centuries_since(&self, epoch: Self) -> Centuries {
        Centuries::new(((*self - epoch) / Self::JULIAN_CENTURY).simplify().value())
    }

    // ── UTC helpers ───────────────────────────────────────────────────

    /// Builds the instant of a UTC timestamp.
    ///
    /// Fails only for timestamps inside the 1582 cutover gap, which chrono's
    /// proleptic Gregorian calendar can represent but the Julian-day
    /// convention cannot.
    pub fn from_utc(datetime: DateTime<Utc>) -> Result<Self, DomainError> {
        let seconds = datetime.second() as f64 + datetime.nanosecond() as f64 / 1e9;
        let fraction = time_to_fraction(datetime.hour() as i32, datetime.minute() as i32, seconds)?;
        date_to_julian_day(datetime.year(), datetime.month(), datetime.day() as f64 + fraction)
    }
}

impl std::fmt::Display for JulianDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {}", self.quantity)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

impl Serialize for JulianDay {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for JulianDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl AddAssign<Days> for JulianDay {
    #[inline]
    fn add_assign(&mut self, rhs: Days) {
        self.quantity += rhs;
    }
}

impl Sub<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl SubAssign<Days> for JulianDay {
    #[inline]
    fn sub_assign(&mut self, rhs: Days) {
        self.quantity -= rhs;
    }
}

impl Sub for JulianDay {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

impl From<Days> for JulianDay {
    #[inline]
    fn from(days: Days) -> Self {
        Self::from_days(days)
    }
}

impl From<JulianDay> for Days {
    #[inline]
    fn from(jd: JulianDay) -> Self {
        jd.quantity
    }
}

impl From<JulianDay> for Centuries {
    fn from(jd: JulianDay) -> Self {
        jd.julian_centuries()
    }
}
