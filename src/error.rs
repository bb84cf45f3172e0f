// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error families of the engine.
//!
//! | Family | Meaning | Caller reaction |
//! |--------|---------|-----------------|
//! | [`DomainError`] | invalid calendar/time/sexagesimal/interpolation input | recoverable |
//! | [`ResourceError`] | corrupt periodic-term table | fatal, refuse to compute |
//! | [`ConfigError`] | malformed settings document or command | keep previous settings |
//!
//! A body that never rises or sets is not an error: the rise/set solver
//! returns `None` for it.

use thiserror::Error;

/// Invalid input to a pure computation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DomainError {
    /// 1582-10-05 through 1582-10-14 do not exist (Gregorian cutover).
    #[error("{year}-{month:02}-{day} falls in the Gregorian cutover gap")]
    CutoverGap { year: i32, month: u32, day: f64 },

    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),

    #[error("negative Julian day {0} is not supported")]
    NegativeJulianDay(f64),

    /// Clock time that does not map into `[0, 1)` of a day.
    #[error("time {hours}:{minutes}:{seconds} is outside [00:00, 24:00)")]
    TimeOutOfRange { hours: i32, minutes: i32, seconds: f64 },

    /// Minutes/seconds must be non-negative; the sign lives on the primary unit.
    #[error("malformed sexagesimal value {primary} {minutes}' {seconds}\"")]
    InvalidSexagesimal {
        primary: f64,
        minutes: f64,
        seconds: f64,
    },

    #[error("at least two knots are required for interpolation, got {0}")]
    InsufficientKnots(usize),

    #[error("{0} lies outside the interpolation knots")]
    OutOfInterpolationRange(f64),

    #[error("occurrence {n} of {weekday} not found in {year}-{month:02}")]
    WeekdayNotFound {
        year: i32,
        month: u32,
        weekday: chrono::Weekday,
        n: u32,
    },
}

/// Corrupt or missing periodic-term table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResourceError {
    #[error("bad table magic {found:#010x}, expected {expected:#010x}")]
    BadMagic { found: u32, expected: u32 },

    #[error("table truncated at byte {offset}: need {needed} more byte(s)")]
    Truncated { offset: usize, needed: usize },

    #[error("table holds {available} series, series {requested} requested")]
    SeriesOutOfRange { requested: usize, available: usize },

    #[error("{0} trailing byte(s) after the last series")]
    TrailingBytes(usize),
}

/// Malformed settings document or settings command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown settings command {0:?}")]
    UnknownCommand(String),

    #[error("settings command {command} expects {expected} argument(s), got {found}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid argument {value:?} for settings command {command}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Any error raised by the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
