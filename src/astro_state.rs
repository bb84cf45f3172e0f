// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Day-rollover scheduler and the cached per-day astronomical state.
//!
//! [`AstroScheduler::tick`] is called from the control loop with the current
//! UTC time. It
//!
//! 1. refreshes the lunar age (and the phase dial) at most every
//!    [`PHASE_REFRESH_PERIOD_SECONDS`], or immediately on a new local day;
//! 2. on a new local day, computes the Sun and Moon rise/set moments for
//!    today, then for tomorrow, then the moonless hours of tonight, and
//!    swaps in a new [`DayAstroState`].
//!
//! The state is an immutable snapshot behind an [`Arc`]; readers keep the
//! snapshot they were handed even while the scheduler replaces it.
//!
//! Dial codes use the 12-bit resolution of the actuators (0–4095).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::{debug, info, warn};
use qtty::Seconds;

use crate::calendar::date_to_julian_day;
use crate::error::{DomainError, Result};
use crate::julian::{JulianDay, DEFAULT_DELTA_T};
use crate::local_time::LocalTimeConfig;
use crate::moon::lunar_age_normalized_28_days;
use crate::polynomial::{linear_interp_in_parts, poly_eval};
use crate::rise_set::{get_event_time_with_next_set, ObjectPositions, RiseTransitSetTimes};
use crate::settings::SettingsCommand;

/// Largest dial code.
pub const DIAL_MAX: u16 = 4095;

/// Minimum UTC time between two lunar-age refreshes.
pub const PHASE_REFRESH_PERIOD_SECONDS: i64 = 10;

/// Phase dial response to the 28-day lunar age (constant term first).
pub const PHASE_DIAL_CURVE: [f64; 3] = [504.6, 117.4, -0.6444];

/// Full scale of the moonless-hours dial, hours.
pub const MOONLESS_HOURS_MAX: f64 = 4.5;

/// Value shown when tonight's moonless window cannot be derived, before clamping.
const MOONLESS_HOURS_NOMINAL: f64 = 5.0;

/// Delay between sunset and the end of civil twilight.
const TWILIGHT_MINUTES: i64 = 90;

/// Local date of the empty state (1970-01-01), older than any real clock.
fn sentinel_date() -> NaiveDate {
    NaiveDate::default()
}

// ── dial outputs ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DialChannel {
    MoonPhase = 0,
    MoonlessHours = 1,
}

impl DialChannel {
    pub const fn from_index(index: u8) -> Self {
        match index % 2 {
            0 => Self::MoonPhase,
            _ => Self::MoonlessHours,
        }
    }
}

/// Sink for dial codes, e.g. a DAC driver.
pub trait DialOutput {
    fn write(&mut self, channel: DialChannel, code: u16);
}

/// Phase dial code for a lunar age on the 28-day scale.
pub fn moon_phase_code(age_28_days: f64) -> u16 {
    poly_eval(age_28_days, &PHASE_DIAL_CURVE).clamp(0.0, DIAL_MAX as f64) as u16
}

/// Moonless-hours dial code, linear over `[0, MOONLESS_HOURS_MAX]`.
pub fn moonless_hours_code(hours: f64) -> std::result::Result<u16, DomainError> {
    let knots = [(0.0, 0.0), (MOONLESS_HOURS_MAX, DIAL_MAX as f64)];
    Ok(linear_interp_in_parts(hours, &knots, true)? as u16)
}

// ── cached state ──────────────────────────────────────────────────────────

/// Local rise and set moments of a body on one local date.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RiseSet {
    pub rise: Option<NaiveDateTime>,
    pub set: Option<NaiveDateTime>,
}

/// Hours of darkness after civil twilight without the Moon above the horizon.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MoonlessHours {
    Computed(f64),
    /// No moonrise/moonset pairing was found after twilight.
    Fallback(f64),
}

impl MoonlessHours {
    pub const fn hours(&self) -> f64 {
        match *self {
            Self::Computed(hours) | Self::Fallback(hours) => hours,
        }
    }

    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    fn fallback() -> Self {
        Self::Fallback(MOONLESS_HOURS_NOMINAL.clamp(0.0, MOONLESS_HOURS_MAX))
    }
}

/// Snapshot of everything derived for one local date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAstroState {
    pub date: NaiveDate,
    pub sun_today: RiseSet,
    pub moon_today: RiseSet,
    pub sun_tomorrow: RiseSet,
    pub moon_tomorrow: RiseSet,
    /// Lunar age on the 28-day scale.
    pub lunar_age: f64,
    pub moonless_hours: MoonlessHours,
}

impl DayAstroState {
    /// State before the first computation.
    pub fn empty() -> Self {
        Self {
            date: sentinel_date(),
            sun_today: RiseSet::default(),
            moon_today: RiseSet::default(),
            sun_tomorrow: RiseSet::default(),
            moon_tomorrow: RiseSet::default(),
            lunar_age: 0.0,
            moonless_hours: MoonlessHours::fallback(),
        }
    }
}

impl Default for DayAstroState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Moonless hours of the night following `sun_today.set`.
///
/// The result always lies in `[0, MOONLESS_HOURS_MAX]`.
pub fn moonless_hours(
    sun_today: &RiseSet,
    moon_today: &RiseSet,
    moon_tomorrow: &RiseSet,
    lunar_age: f64,
) -> MoonlessHours {
    // TODO: this gate admits every finite age; decide whether it should force
    // the nominal value around new moon instead.
    if !(lunar_age >= 3.0 || lunar_age <= 25.0) {
        debug!("lunar age {lunar_age:.2} outside the moonless window gate");
        return MoonlessHours::fallback();
    }

    let Some(sunset) = sun_today.set else {
        warn!("no sunset today, moonless hours fall back to nominal");
        return MoonlessHours::fallback();
    };
    let twilight = sunset + Duration::minutes(TWILIGHT_MINUTES);

    let after_twilight = |a: Option<NaiveDateTime>, b: Option<NaiveDateTime>| {
        [a, b].into_iter().flatten().find(|&moment| moment >= twilight)
    };
    let next_set = after_twilight(moon_today.set, moon_tomorrow.set);
    let next_rise = after_twilight(moon_today.rise, moon_tomorrow.rise);

    let (Some(next_set), Some(next_rise)) = (next_set, next_rise) else {
        warn!(
            "no moonset/moonrise pair after twilight {twilight} (set {next_set:?}, rise {next_rise:?}), \
             moonless hours fall back to nominal"
        );
        return MoonlessHours::fallback();
    };

    let hours_after_twilight =
        |moment: NaiveDateTime| (moment - twilight).num_milliseconds() as f64 / 3.6e6;
    let hours = if next_set < next_rise {
        MOONLESS_HOURS_MAX - hours_after_twilight(next_set)
    } else {
        hours_after_twilight(next_rise)
    };
    MoonlessHours::Computed(hours.clamp(0.0, MOONLESS_HOURS_MAX))
}

// ── rise/set scan ─────────────────────────────────────────────────────────

/// Sun and Moon events of one UT day.
#[derive(Debug, Copy, Clone)]
struct UtcDayEvents {
    sun: Option<RiseTransitSetTimes>,
    moon: Option<RiseTransitSetTimes>,
}

/// Memoises per-UT-day solutions while scanning today and tomorrow.
struct EventScan<'a> {
    config: &'a LocalTimeConfig,
    delta_t: Seconds,
    days: BTreeMap<NaiveDate, UtcDayEvents>,
}

impl<'a> EventScan<'a> {
    fn new(config: &'a LocalTimeConfig, delta_t: Seconds) -> Self {
        Self {
            config,
            delta_t,
            days: BTreeMap::new(),
        }
    }

    fn utc_day(&mut self, date: NaiveDate) -> Result<UtcDayEvents> {
        if let Some(events) = self.days.get(&date) {
            return Ok(*events);
        }
        let jd = date_to_julian_day(date.year(), date.month(), date.day() as f64)?;
        let (lat, lon) = (self.config.latitude_deg, self.config.longitude_west_deg);
        let events = UtcDayEvents {
            sun: get_event_time_with_next_set(jd, &ObjectPositions::sun(jd), lat, lon, self.delta_t),
            moon: get_event_time_with_next_set(jd, &ObjectPositions::moon(jd)?, lat, lon, self.delta_t),
        };
        debug!("UT {date}: sun {:?}, moon {:?}", events.sun, events.moon);
        self.days.insert(date, events);
        Ok(events)
    }

    /// Earliest rise and set of each body whose local date is `target`.
    ///
    /// A UT day whose first set falls just after 0h can hold a second set
    /// before it ends; that one comes from `next_set_hours`.
    fn local_day(&mut self, target: NaiveDate) -> Result<(RiseSet, RiseSet)> {
        let mut sun = RiseSet::default();
        let mut moon = RiseSet::default();
        for offset in -1..=1 {
            let utc_date = target + Duration::days(offset);
            let events = self.utc_day(utc_date)?;
            let midnight = utc_date.and_time(NaiveTime::MIN).and_utc();
            for (times, slot) in [(events.sun, &mut sun), (events.moon, &mut moon)] {
                let Some(times) = times else { continue };
                let rises = [Some(times.rise_hours)];
                let sets = [
                    Some(times.set_hours),
                    times.next_set_hours.filter(|hours| (0.0..24.0).contains(hours)),
                ];
                for (candidates, moment) in [(&rises[..], &mut slot.rise), (&sets[..], &mut slot.set)] {
                    for &hours in candidates.iter().flatten() {
                        let local = self.config.to_local(midnight + hours_duration(hours))?;
                        if local.date() == target && moment.map_or(true, |known| local < known) {
                            *moment = Some(local);
                        }
                    }
                }
            }
        }
        Ok((sun, moon))
    }
}

fn hours_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3.6e6).round() as i64)
}

// ── scheduler ─────────────────────────────────────────────────────────────

/// Owns the cached [`DayAstroState`] and drives the dials.
pub struct AstroScheduler<D: DialOutput> {
    dials: D,
    state: Arc<DayAstroState>,
    last_phase_refresh: Option<DateTime<Utc>>,
    delta_t: Seconds,
    calibrating: bool,
}

impl<D: DialOutput> AstroScheduler<D> {
    pub fn new(dials: D) -> Self {
        Self {
            dials,
            state: Arc::new(DayAstroState::empty()),
            last_phase_refresh: None,
            delta_t: DEFAULT_DELTA_T,
            calibrating: false,
        }
    }

    pub fn with_delta_t(mut self, delta_t: Seconds) -> Self {
        self.delta_t = delta_t;
        self
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<DayAstroState> {
        Arc::clone(&self.state)
    }

    pub fn dials(&self) -> &D {
        &self.dials
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating
    }

    /// Handles the dial commands (`CAL`, `STOPCAL`); other commands are ignored.
    ///
    /// While calibrating, computed values are cached but not written out.
    pub fn handle_command(&mut self, command: &SettingsCommand) {
        match *command {
            SettingsCommand::Calibrate { channel, value } => {
                self.calibrating = true;
                self.dials.write(DialChannel::from_index(channel), value.min(DIAL_MAX));
            }
            SettingsCommand::StopCalibration => {
                self.calibrating = false;
                self.last_phase_refresh = None;
                if let Ok(code) = moonless_hours_code(self.state.moonless_hours.hours()) {
                    self.dials.write(DialChannel::MoonlessHours, code);
                }
            }
            _ => {}
        }
    }

    /// Advances the scheduler to `now`. Returns `true` when a new local day
    /// was computed.
    pub fn tick(&mut self, now: DateTime<Utc>, config: &LocalTimeConfig) -> Result<bool> {
        let local_date = config.to_local(now)?.date();
        let new_day = local_date != self.state.date;

        let phase_due = match self.last_phase_refresh {
            None => true,
            Some(last) => now < last || now - last >= Duration::seconds(PHASE_REFRESH_PERIOD_SECONDS),
        };
        if new_day || phase_due {
            self.refresh_phase(now)?;
        }

        if new_day {
            info!("local day rollover {} -> {local_date}", self.state.date);
            self.recompute_day(local_date, config)?;
        }
        Ok(new_day)
    }

    fn refresh_phase(&mut self, now: DateTime<Utc>) -> Result<()> {
        let lunar_age = lunar_age_normalized_28_days(JulianDay::from_utc(now)?)?;
        self.last_phase_refresh = Some(now);
        self.state = Arc::new(DayAstroState {
            lunar_age,
            ..(*self.state).clone()
        });
        if !self.calibrating {
            self.dials.write(DialChannel::MoonPhase, moon_phase_code(lunar_age));
        }
        Ok(())
    }

    fn recompute_day(&mut self, today: NaiveDate, config: &LocalTimeConfig) -> Result<()> {
        let mut scan = EventScan::new(config, self.delta_t);
        let (sun_today, moon_today) = scan.local_day(today)?;
        let (sun_tomorrow, moon_tomorrow) = scan.local_day(today + Duration::days(1))?;

        let moonless = moonless_hours(&sun_today, &moon_today, &moon_tomorrow, self.state.lunar_age);
        debug!(
            "{today}: sun {sun_today:?}, moon {moon_today:?}, tomorrow sun {sun_tomorrow:?}, \
             moon {moon_tomorrow:?}, moonless {moonless:?}"
        );

        self.state = Arc::new(DayAstroState {
            date: today,
            sun_today,
            moon_today,
            sun_tomorrow,
            moon_tomorrow,
            lunar_age: self.state.lunar_age,
            moonless_hours: moonless,
        });
        if !self.calibrating {
            self.dials.write(DialChannel::MoonlessHours, moonless_hours_code(moonless.hours())?);
        }
        Ok(())
    }
}
