// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geocentric lunar position (Meeus chap. 47) and the normalised lunar age.
//!
//! The periodic-term table is decoded for each computation and dropped as
//! soon as the three sums are complete, so at most one decoded table is
//! alive at a time.

use serde::{Deserialize, Serialize};

use crate::angles::{
    asin_deg, ecliptic_to_equatorial, fold_signed_degrees, normalize_degrees, sin_deg, cos_deg,
};
use crate::error::ResourceError;
use crate::julian::JulianDay;
use crate::nutation::nutation_and_obliquity;
use crate::periodic_terms::{PeriodicTerm, PeriodicTermTable, Series};
use crate::polynomial::poly_eval;
use crate::sun::solar_coordinates;

/// Equatorial radius of the Earth used for the parallax, km.
const EARTH_RADIUS_KM: f64 = 6378.14;
/// Mean Earth–Moon distance the Σr sum is referred to, km.
const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Mean synodic month, days.
pub const SYNODIC_MONTH: f64 = 29.530575;
/// Mean daily elongation gain of the Moon, degrees.
const DAILY_ELONGATION: f64 = 12.1907;
/// Length of the display lunation.
pub const DISPLAY_LUNATION: f64 = 28.0;

// ── mean arguments (degrees, powers of T) ─────────────────────────────────
const MEAN_LONGITUDE: [f64; 5] = [
    218.3164591,
    481_267.88134236,
    -0.0013268,
    1.0 / 538_841.0,
    -1.0 / 65_194_000.0,
];
const MEAN_ELONGATION: [f64; 5] = [
    297.8502042,
    445_267.1115168,
    -0.0016300,
    1.0 / 545_868.0,
    -1.0 / 113_065_000.0,
];
const SUN_MEAN_ANOMALY: [f64; 4] = [357.5291092, 35_999.0502909, -0.0001536, 1.0 / 24_490_000.0];
const MOON_MEAN_ANOMALY: [f64; 5] = [
    134.9634114,
    477_198.8676313,
    0.0089970,
    1.0 / 69_699.0,
    -1.0 / 14_712_000.0,
];
const ARGUMENT_OF_LATITUDE: [f64; 5] = [
    93.2720993,
    483_202.0175273,
    -0.0034029,
    -1.0 / 3_526_000.0,
    1.0 / 863_310_000.0,
];
const ECCENTRICITY_FACTOR: [f64; 3] = [1.0, -0.002516, -0.0000074];

/// Geocentric position of the Moon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarCoordinates {
    /// Geometric ecliptic longitude λ, degrees in `[0, 360)`.
    pub true_lon: f64,
    /// Ecliptic latitude β, degrees.
    pub lat: f64,
    pub ra_apparent: f64,
    pub dec_apparent: f64,
    /// Equatorial horizontal parallax π, degrees.
    pub horizontal_parallax: f64,
    /// Distance between the centres of the Earth and the Moon, km.
    pub distance_km: f64,
}

/// The fundamental arguments D, M, M′, F plus the eccentricity factor E.
struct Arguments {
    d: f64,
    m: f64,
    m_prime: f64,
    f: f64,
    e: f64,
}

impl Arguments {
    /// Eccentricity correction of a term: `E^|m|` for |m| ∈ {1, 2}.
    #[inline]
    fn eccentricity_factor(&self, term: &PeriodicTerm) -> f64 {
        match term.m.abs() {
            1 => self.e,
            2 => self.e * self.e,
            _ => 1.0,
        }
    }

    fn sum(&self, terms: &[PeriodicTerm], trig: fn(f64) -> f64) -> f64 {
        terms
            .iter()
            .map(|term| {
                let argument = term.argument(self.d, self.m, self.m_prime, self.f);
                self.eccentricity_factor(term) * term.coefficient as f64 * trig(argument)
            })
            .sum()
    }
}

/// Apparent geocentric position of the Moon at `jd`.
///
/// Fails only when the embedded periodic-term table is corrupt.
pub fn lunar_coordinates(jd: JulianDay) -> Result<LunarCoordinates, ResourceError> {
    let t = jd.julian_centuries().value();

    let l_prime = normalize_degrees(poly_eval(t, &MEAN_LONGITUDE));
    let args = Arguments {
        d: normalize_degrees(poly_eval(t, &MEAN_ELONGATION)),
        m: normalize_degrees(poly_eval(t, &SUN_MEAN_ANOMALY)),
        m_prime: normalize_degrees(poly_eval(t, &MOON_MEAN_ANOMALY)),
        f: normalize_degrees(poly_eval(t, &ARGUMENT_OF_LATITUDE)),
        e: poly_eval(t, &ECCENTRICITY_FACTOR),
    };

    // Venus, Jupiter and flattening corrections
    let a1 = normalize_degrees(119.75 + 131.849 * t);
    let a2 = normalize_degrees(53.09 + 479_264.290 * t);
    let a3 = normalize_degrees(313.45 + 481_266.484 * t);

    let table = PeriodicTermTable::load()?;
    let sigma_l = args.sum(table.series(Series::Longitude)?, sin_deg)
        + 3958.0 * sin_deg(a1)
        + 1962.0 * sin_deg(l_prime - args.f)
        + 318.0 * sin_deg(a2);
    let sigma_r = args.sum(table.series(Series::Distance)?, cos_deg);
    let sigma_b = args.sum(table.series(Series::Latitude)?, sin_deg)
        - 2235.0 * sin_deg(l_prime)
        + 382.0 * sin_deg(a3)
        + 175.0 * sin_deg(a1 - args.f)
        + 175.0 * sin_deg(a1 + args.f)
        + 127.0 * sin_deg(l_prime - args.m_prime)
        - 115.0 * sin_deg(l_prime + args.m_prime);
    drop(table);

    let true_lon = normalize_degrees(l_prime + sigma_l / 1e6);
    let lat = sigma_b / 1e6;
    let distance_km = MEAN_DISTANCE_KM + sigma_r / 1e3;
    let horizontal_parallax = fold_signed_degrees(asin_deg(EARTH_RADIUS_KM / distance_km));

    let nutation = nutation_and_obliquity(jd);
    let apparent_lon = true_lon + nutation.nutation_longitude;
    let (ra, dec_apparent) = ecliptic_to_equatorial(apparent_lon, lat, nutation.true_obliquity);

    Ok(LunarCoordinates {
        true_lon,
        lat,
        ra_apparent: normalize_degrees(ra),
        dec_apparent,
        horizontal_parallax,
        distance_km,
    })
}

/// Lunar age at `jd` rescaled from the synodic month onto a 28-day lunation.
///
/// 0 is new moon, 14 full moon.
pub fn lunar_age_normalized_28_days(jd: JulianDay) -> Result<f64, ResourceError> {
    let sun = solar_coordinates(jd);
    let moon = lunar_coordinates(jd)?;
    let age_days = normalize_degrees(moon.true_lon - sun.true_lon) / DAILY_ELONGATION;
    Ok(age_days / SYNODIC_MONTH * DISPLAY_LUNATION)
}
