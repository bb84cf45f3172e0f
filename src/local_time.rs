// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil local time: fixed UTC offset plus a daylight-saving rule.
//!
//! The DST rule is evaluated on the *standard* local time, i.e. UTC plus the
//! configured offset before any DST shift.
//!
//! | Strategy | Rule |
//! |----------|------|
//! | `none`   | never shifted |
//! | `canada` | +1 h from the 2nd Sunday of March 02:00 until the 1st Sunday of November 01:00 (standard time) |
//!
//! The `canada` rule yields a 23-hour day in March and a 25-hour day in
//! November.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Daylight-saving rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DstStrategy {
    None,
    Canada,
}

impl DstStrategy {
    /// Parses a settings token. Unknown tokens fall back to [`DstStrategy::None`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "none" => Self::None,
            "canada" => Self::Canada,
            other => {
                warn!("unknown DST strategy {other:?}, using \"none\"");
                Self::None
            }
        }
    }

    pub const fn token(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Canada => "canada",
        }
    }

    /// DST shift applying at a standard (pre-DST) local time.
    pub fn delta(&self, standard_local: NaiveDateTime) -> Result<Duration, DomainError> {
        match self {
            Self::None => Ok(Duration::zero()),
            Self::Canada => canada_delta(standard_local),
        }
    }
}

impl fmt::Display for DstStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for DstStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for DstStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

fn canada_delta(standard_local: NaiveDateTime) -> Result<Duration, DomainError> {
    let year = standard_local.year();
    let day_hour = (standard_local.day(), standard_local.hour());

    let dst = match standard_local.month() {
        3 => day_hour >= (nth_weekday_of_month(year, 3, Weekday::Sun, 2)?, 2),
        4..=10 => true,
        11 => day_hour < (nth_weekday_of_month(year, 11, Weekday::Sun, 1)?, 1),
        _ => false,
    };
    Ok(if dst {
        Duration::hours(1)
    } else {
        Duration::zero()
    })
}

/// Day of the month of the `n`-th `weekday` (1-based) in `year`-`month`.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    n: u32,
) -> Result<u32, DomainError> {
    let mut date = NaiveDate::from_ymd_opt(year, month, 1).ok_or(DomainError::InvalidMonth(month))?;
    let mut seen = 0;
    while date.month() == month {
        if date.weekday() == weekday {
            seen += 1;
            if seen == n {
                return Ok(date.day());
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    Err(DomainError::WeekdayNotFound {
        year,
        month,
        weekday,
        n,
    })
}

/// Observer and clock configuration, read-only for the engine.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTimeConfig {
    pub utc_offset_seconds: i32,
    pub dst: DstStrategy,
    /// Geographic latitude, degrees north.
    pub latitude_deg: f64,
    /// Geographic longitude, degrees **west**.
    pub longitude_west_deg: f64,
}

impl LocalTimeConfig {
    #[inline]
    pub fn utc_offset(&self) -> Duration {
        Duration::seconds(self.utc_offset_seconds as i64)
    }

    /// Civil local time of a UTC instant.
    pub fn to_local(&self, utc: DateTime<Utc>) -> Result<NaiveDateTime, DomainError> {
        let standard = utc.naive_utc() + self.utc_offset();
        Ok(standard + self.dst.delta(standard)?)
    }

    /// UTC instant of a civil local time.
    ///
    /// The DST shift is evaluated on `local` itself, so the hour repeated in
    /// November maps onto its standard-time reading.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>, DomainError> {
        let standard = local - self.dst.delta(local)?;
        Ok((standard - self.utc_offset()).and_utc())
    }
}

impl Default for LocalTimeConfig {
    /// Kitchener, Ontario on Eastern Standard Time with Canadian DST.
    fn default() -> Self {
        Self {
            utc_offset_seconds: -5 * 3600,
            dst: DstStrategy::Canada,
            latitude_deg: 43.4516,
            longitude_west_deg: 80.4925,
        }
    }
}

/// `to_local` as a free function.
pub fn to_local(utc: DateTime<Utc>, config: &LocalTimeConfig) -> Result<NaiveDateTime, DomainError> {
    config.to_local(utc)
}

/// `to_utc` as a free function.
pub fn to_utc(local: NaiveDateTime, config: &LocalTimeConfig) -> Result<DateTime<Utc>, DomainError> {
    config.to_utc(local)
}
