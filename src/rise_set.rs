// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Rising, transit and setting of a body (Meeus chap. 15).
//!
//! The solver needs the apparent equatorial position of the body at 0h
//! dynamical time on the previous, current and next day, plus the standard
//! altitude `h0` at which the body is considered to cross the horizon:
//!
//! | Body | h0 |
//! |------|----|
//! | stars and planets | −0°34′ |
//! | Sun | −0.8333° |
//! | Moon | 0.7275·π − 0°34′ |
//!
//! Each approximate time gets one first-order correction; the result is
//! not iterated to convergence.
//!
//! Longitudes are measured positively **west** of Greenwich.

use qtty::{Day, Days, Seconds};
use serde::{Deserialize, Serialize};

use crate::angles::{
    acos_deg, arcmin, asin_deg, cos_deg, fold_signed_degrees, normalize_degrees, sin_deg,
};
use crate::error::ResourceError;
use crate::julian::JulianDay;
use crate::moon::lunar_coordinates;
use crate::sidereal::sidereal_time_at_greenwich;
use crate::sun::solar_coordinates;

/// Standard altitude of stars and planets, degrees.
pub const STELLAR_STANDARD_ALTITUDE: f64 = -0.5667;
/// Standard altitude of the Sun's upper limb, degrees.
pub const SUN_STANDARD_ALTITUDE: f64 = -0.8333;

/// Sidereal degrees per solar day.
const SIDEREAL_RATE: f64 = 360.985647;

/// Standard altitude of the Moon for a given horizontal parallax, degrees.
#[inline]
pub fn moon_standard_altitude(horizontal_parallax: f64) -> f64 {
    0.7275 * horizontal_parallax - arcmin(34.0)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquatorialPosition {
    pub ra: f64,
    pub dec: f64,
}

impl EquatorialPosition {
    pub const fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// Three consecutive daily positions of a body and its standard altitude.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPositions {
    pub previous: EquatorialPosition,
    pub current: EquatorialPosition,
    pub next: EquatorialPosition,
    /// h0, degrees.
    pub standard_altitude: f64,
}

impl ObjectPositions {
    pub const fn new(
        previous: EquatorialPosition,
        current: EquatorialPosition,
        next: EquatorialPosition,
        standard_altitude: f64,
    ) -> Self {
        Self {
            previous,
            current,
            next,
            standard_altitude,
        }
    }

    /// Apparent solar positions around `jd`.
    pub fn sun(jd: JulianDay) -> Self {
        let at = |offset: f64| {
            let sun = solar_coordinates(jd + Days::new(offset));
            EquatorialPosition::new(sun.ra_apparent, sun.dec_apparent)
        };
        Self::new(at(-1.0), at(0.0), at(1.0), SUN_STANDARD_ALTITUDE)
    }

    /// Apparent lunar positions around `jd`; h0 uses the parallax of the
    /// current day.
    pub fn moon(jd: JulianDay) -> Result<Self, ResourceError> {
        let previous = lunar_coordinates(jd - Days::new(1.0))?;
        let current = lunar_coordinates(jd)?;
        let next = lunar_coordinates(jd + Days::new(1.0))?;
        Ok(Self::new(
            EquatorialPosition::new(previous.ra_apparent, previous.dec_apparent),
            EquatorialPosition::new(current.ra_apparent, current.dec_apparent),
            EquatorialPosition::new(next.ra_apparent, next.dec_apparent),
            moon_standard_altitude(current.horizontal_parallax),
        ))
    }
}

/// Event times as hours of the UT day, each in `[0, 24)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiseTransitSetTimes {
    pub rise_hours: f64,
    pub transit_hours: f64,
    pub set_hours: f64,
    /// Setting one cycle after [`set_hours`](Self::set_hours), when requested.
    ///
    /// Counted from 0h UT of the solved day and not wrapped: below 24 when a
    /// set near 0h UT is followed by a second one before the day ends.
    pub next_set_hours: Option<f64>,
}

/// Three-point interpolation around the central value (Meeus eq. 3.3).
#[inline]
pub fn interpolate(y1: f64, y2: f64, y3: f64, n: f64) -> f64 {
    let a = y2 - y1;
    let b = y3 - y2;
    let c = b - a;
    y2 + n / 2.0 * (a + b + n * c)
}

/// Shifts a neighbouring right ascension by whole turns so that it lies
/// within 180° of `reference`.
#[inline]
fn unwrap_ra(ra: f64, reference: f64) -> f64 {
    ra + 360.0 * ((reference - ra) / 360.0).round()
}

/// Rise, transit and set of a body on the UT day starting at `jd` (0h UT).
///
/// Returns `None` when the body stays above or below the horizon all day.
///
/// ```
/// use moonclock::rise_set::{get_event_time, EquatorialPosition, ObjectPositions};
/// use moonclock::{JulianDay, DEFAULT_DELTA_T};
///
/// let polar_night = ObjectPositions::new(
///     EquatorialPosition::new(270.0, -23.4),
///     EquatorialPosition::new(271.1, -23.4),
///     EquatorialPosition::new(272.2, -23.4),
///     -0.8333,
/// );
/// let jd = JulianDay::new(2_460_665.5);
/// assert!(get_event_time(jd, &polar_night, 78.2, -15.6, DEFAULT_DELTA_T).is_none());
/// ```
pub fn get_event_time(
    jd: JulianDay,
    positions: &ObjectPositions,
    latitude: f64,
    longitude_west: f64,
    delta_t: Seconds,
) -> Option<RiseTransitSetTimes> {
    solve(jd, positions, latitude, longitude_west, delta_t, false)
}

/// Same as [`get_event_time`], also solving for the setting one cycle later.
pub fn get_event_time_with_next_set(
    jd: JulianDay,
    positions: &ObjectPositions,
    latitude: f64,
    longitude_west: f64,
    delta_t: Seconds,
) -> Option<RiseTransitSetTimes> {
    solve(jd, positions, latitude, longitude_west, delta_t, true)
}

fn solve(
    jd: JulianDay,
    positions: &ObjectPositions,
    latitude: f64,
    longitude_west: f64,
    delta_t: Seconds,
    with_next_set: bool,
) -> Option<RiseTransitSetTimes> {
    let h0 = positions.standard_altitude;
    let alpha2 = positions.current.ra;
    let alpha1 = unwrap_ra(positions.previous.ra, alpha2);
    let alpha3 = unwrap_ra(positions.next.ra, alpha2);
    let (delta1, delta2, delta3) = (
        positions.previous.dec,
        positions.current.dec,
        positions.next.dec,
    );

    let cos_h0 = (sin_deg(h0) - sin_deg(latitude) * sin_deg(delta2))
        / (cos_deg(latitude) * cos_deg(delta2));
    if cos_h0.abs() > 1.0 {
        return None;
    }
    let hour_angle0 = acos_deg(cos_h0);

    let theta0 = sidereal_time_at_greenwich(jd);
    let transit = (alpha2 + longitude_west - theta0) / 360.0;
    let rise = transit - hour_angle0 / 360.0;
    let set = transit + hour_angle0 / 360.0;

    let delta_t_days = delta_t.to::<Day>().value();

    let refine = |m: f64, is_transit: bool| -> f64 {
        let theta = normalize_degrees(theta0 + SIDEREAL_RATE * m);
        let n = m + delta_t_days;
        let alpha = interpolate(alpha1, alpha2, alpha3, n);
        let delta = interpolate(delta1, delta2, delta3, n);

        let local_hour_angle = fold_signed_degrees(theta - longitude_west - alpha);
        let correction = if is_transit {
            -local_hour_angle / 360.0
        } else {
            let altitude = asin_deg(
                sin_deg(latitude) * sin_deg(delta)
                    + cos_deg(latitude) * cos_deg(delta) * cos_deg(local_hour_angle),
            );
            (altitude - h0)
                / (360.0 * cos_deg(delta) * cos_deg(latitude) * sin_deg(local_hour_angle))
        };
        (m + correction) * 24.0
    };

    let set_fraction = set.rem_euclid(1.0);
    Some(RiseTransitSetTimes {
        rise_hours: refine(rise.rem_euclid(1.0), false).rem_euclid(24.0),
        transit_hours: refine(transit.rem_euclid(1.0), true).rem_euclid(24.0),
        set_hours: refine(set_fraction, false).rem_euclid(24.0),
        next_set_hours: with_next_set.then(|| refine(set_fraction + 1.0, false)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::date_to_julian_day;

    fn venus_1988_03_20() -> ObjectPositions {
        ObjectPositions::new(
            EquatorialPosition::new(40.68021, 18.04761),
            EquatorialPosition::new(41.73129, 18.44092),
            EquatorialPosition::new(42.78204, 18.82742),
            STELLAR_STANDARD_ALTITUDE,
        )
    }

    #[test]
    fn meeus_example_15a_venus_at_boston() {
        let jd = date_to_julian_day(1988, 3, 20.0).unwrap();
        let times = get_event_time(jd, &venus_1988_03_20(), 42.3333, 71.0833, Seconds::new(56.0))
            .expect("Venus rises and sets at Boston");

        assert!((times.rise_hours / 24.0 - 0.51766).abs() < 1e-5, "rise {}", times.rise_hours);
        assert!((times.transit_hours / 24.0 - 0.81980).abs() < 1e-5, "transit {}", times.transit_hours);
        assert!((times.set_hours / 24.0 - 0.12130).abs() < 1e-5, "set {}", times.set_hours);
        assert_eq!(times.next_set_hours, None);
    }

    #[test]
    fn next_set_is_one_cycle_later() {
        let jd = date_to_julian_day(1988, 3, 20.0).unwrap();
        let times = get_event_time_with_next_set(
            jd,
            &venus_1988_03_20(),
            42.3333,
            71.0833,
            Seconds::new(56.0),
        )
        .unwrap();
        let next = times.next_set_hours.expect("requested");
        // Venus moves slowly, so the next setting falls a few minutes later in the day.
        assert!(next > 24.0);
        assert!((next - 24.0 - times.set_hours).abs() < 0.25, "{next} vs {}", times.set_hours);
    }

    #[test]
    fn second_sunset_of_a_ut_day_stays_in_that_day() {
        // Kitchener, 2025-08-31: the set drifts across 0h UT, so this UT day
        // holds the previous evening's sunset and its own at 23:58.
        let jd = date_to_julian_day(2025, 8, 31.0).unwrap();
        let times = get_event_time_with_next_set(
            jd,
            &ObjectPositions::sun(jd),
            43.4516,
            80.4925,
            Seconds::new(69.184),
        )
        .unwrap();
        assert!(times.set_hours < 0.1, "set {}", times.set_hours);
        let next = times.next_set_hours.unwrap();
        assert!((next - 23.9729).abs() < 0.01, "next set {next}");
    }

    #[test]
    fn circumpolar_and_never_rising() {
        let summer = ObjectPositions::new(
            EquatorialPosition::new(88.0, 23.4),
            EquatorialPosition::new(89.0, 23.4),
            EquatorialPosition::new(90.0, 23.4),
            SUN_STANDARD_ALTITUDE,
        );
        let jd = JulianDay::new(2_460_847.5);
        assert!(get_event_time(jd, &summer, 80.0, 0.0, Seconds::new(69.184)).is_none());
        assert!(get_event_time(jd, &summer, -80.0, 0.0, Seconds::new(69.184)).is_none());
        assert!(get_event_time(jd, &summer, 45.0, 0.0, Seconds::new(69.184)).is_some());
    }

    #[test]
    fn right_ascension_wrap_is_continuous() {
        let jd = JulianDay::new(2_460_754.5);
        let wrapped = ObjectPositions::new(
            EquatorialPosition::new(359.1, -0.4),
            EquatorialPosition::new(0.0, 0.0),
            EquatorialPosition::new(0.9, 0.4),
            SUN_STANDARD_ALTITUDE,
        );
        let unwrapped = ObjectPositions {
            previous: EquatorialPosition::new(-0.9, -0.4),
            ..wrapped
        };
        let a = get_event_time(jd, &wrapped, 43.45, 80.49, Seconds::new(69.184)).unwrap();
        let b = get_event_time(jd, &unwrapped, 43.45, 80.49, Seconds::new(69.184)).unwrap();
        assert!((a.rise_hours - b.rise_hours).abs() < 1e-9);
        assert!((a.set_hours - b.set_hours).abs() < 1e-9);
        assert!((a.transit_hours - b.transit_hours).abs() < 1e-9);
    }

    #[test]
    fn sun_bracket_on_the_equinox_week() {
        // 2025-03-20 at Kitchener: the Sun's RA crosses 0° during the bracket.
        let jd = date_to_julian_day(2025, 3, 20.0).unwrap();
        let positions = ObjectPositions::sun(jd);
        let times = get_event_time(jd, &positions, 43.4516, 80.4925, Seconds::new(69.184)).unwrap();
        // Sunrise 07:25 EDT = 11:25 UT, sunset 19:35 EDT = 23:35 UT.
        assert!((times.rise_hours - (11.0 + 25.0 / 60.0)).abs() < 1.0 / 60.0, "{}", times.rise_hours);
        assert!((times.set_hours - (23.0 + 35.0 / 60.0)).abs() < 1.0 / 60.0, "{}", times.set_hours);
    }

    #[test]
    fn moon_standard_altitude_for_mean_parallax() {
        let h0 = moon_standard_altitude(0.9507);
        assert!((h0 - 0.125).abs() < 1e-3, "h0 = {h0}");
    }
}
