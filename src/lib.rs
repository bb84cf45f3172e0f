// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Moon clock
//!
//! Astronomical engine of a clock that shows local time and drives two
//! analog dials: the phase of the Moon and the moonless hours of tonight.
//! Everything is computed from the Meeus series, no almanac is stored.
//!
//! # Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`polynomial`] | Horner evaluation, piecewise-linear interpolation |
//! | [`angles`] | degree trigonometry, normalisation, sexagesimal forms |
//! | [`julian`] | [`JulianDay`], the typed time axis |
//! | [`calendar`] | civil date ⇄ Julian day (Julian/Gregorian) |
//! | [`nutation`] | nutation in longitude and obliquity |
//! | [`sun`] | apparent solar coordinates |
//! | [`periodic_terms`] | lunar periodic-term table and its binary format |
//! | [`moon`] | apparent lunar coordinates and lunar age |
//! | [`sidereal`] | sidereal time at Greenwich |
//! | [`rise_set`] | rise, transit and set solver |
//! | [`local_time`] | UTC offset and daylight saving |
//! | [`settings`] | persisted settings and text commands |
//! | [`astro_state`] | day-rollover scheduler and dial codes |
//! | [`screens`] | display lines |
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use moonclock::{AstroScheduler, DialChannel, DialOutput, LocalTimeConfig};
//!
//! #[derive(Default)]
//! struct Dials(Vec<(DialChannel, u16)>);
//!
//! impl DialOutput for Dials {
//!     fn write(&mut self, channel: DialChannel, code: u16) {
//!         self.0.push((channel, code));
//!     }
//! }
//!
//! let config = LocalTimeConfig::default();
//! let mut scheduler = AstroScheduler::new(Dials::default());
//!
//! let now = Utc.with_ymd_and_hms(2025, 3, 26, 16, 0, 0).unwrap();
//! assert!(scheduler.tick(now, &config).unwrap());
//!
//! let state = scheduler.snapshot();
//! assert!(state.sun_today.rise.is_some());
//! assert_eq!(scheduler.dials().0.len(), 2);
//! ```

pub mod angles;
pub mod astro_state;
pub mod calendar;
pub mod error;
pub mod julian;
pub mod local_time;
pub mod moon;
pub mod nutation;
pub mod periodic_terms;
pub mod polynomial;
pub mod rise_set;
pub mod screens;
pub mod settings;
pub mod sidereal;
pub mod sun;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use astro_state::{
    AstroScheduler, DayAstroState, DialChannel, DialOutput, MoonlessHours, RiseSet,
};
pub use calendar::{date_to_julian_day, julian_day_to_date, CalendarDate};
pub use error::{ConfigError, DomainError, Error, ResourceError, Result};
pub use julian::{JulianDay, DEFAULT_DELTA_T};
pub use local_time::{DstStrategy, LocalTimeConfig};
pub use moon::{lunar_age_normalized_28_days, lunar_coordinates, LunarCoordinates};
pub use nutation::{nutation_and_obliquity, EclipticNutation};
pub use rise_set::{get_event_time, RiseTransitSetTimes};
pub use screens::Screen;
pub use settings::{Settings, SettingsCommand};
pub use sidereal::sidereal_time_at_greenwich;
pub use sun::{solar_coordinates, SolarCoordinates};
