// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Low-accuracy solar coordinates (Meeus chap. 24), good to about 0.01°.

use serde::{Deserialize, Serialize};

use crate::angles::{cos_deg, ecliptic_to_equatorial, normalize_degrees, sin_deg};
use crate::julian::JulianDay;
use crate::nutation::{lunar_node_longitude, nutation_and_obliquity};
use crate::polynomial::poly_eval;

const MEAN_LONGITUDE: [f64; 3] = [280.46645, 36_000.76983, 0.0003032];
const MEAN_ANOMALY: [f64; 4] = [357.52910, 35_999.05030, -0.0001559, -0.00000048];
const ECCENTRICITY: [f64; 3] = [0.016708617, -0.000042037, -0.0000001236];

/// Geocentric position of the Sun. Angles in degrees, distance in AU.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarCoordinates {
    /// Geometric longitude ☉ referred to the mean equinox of the date.
    pub true_lon: f64,
    /// ☉ corrected for nutation and aberration.
    pub apparent_lon: f64,
    /// Always zero at this accuracy.
    pub apparent_lat: f64,
    /// R
    pub radius_vector: f64,
    pub ra: f64,
    pub dec: f64,
    pub ra_apparent: f64,
    pub dec_apparent: f64,
}

pub fn solar_coordinates(jd: JulianDay) -> SolarCoordinates {
    let t = jd.julian_centuries().value();

    let mean_longitude = normalize_degrees(poly_eval(t, &MEAN_LONGITUDE));
    let mean_anomaly = normalize_degrees(poly_eval(t, &MEAN_ANOMALY));
    let e = poly_eval(t, &ECCENTRICITY);

    // Equation of the centre
    let center = poly_eval(t, &[1.914600, -0.004817, -0.000014]) * sin_deg(mean_anomaly)
        + poly_eval(t, &[0.019993, -0.000101]) * sin_deg(2.0 * mean_anomaly)
        + 0.000290 * sin_deg(3.0 * mean_anomaly);

    let true_lon = normalize_degrees(mean_longitude + center);
    let true_anomaly = mean_anomaly + center;
    let radius_vector = 1.000001018 * (1.0 - e * e) / (1.0 + e * cos_deg(true_anomaly));

    let omega = lunar_node_longitude(t, &[125.04, -1934.136]);
    let apparent_lon = normalize_degrees(true_lon - 0.00569 - 0.00478 * sin_deg(omega));

    let mean_obliquity = nutation_and_obliquity(jd).mean_obliquity;
    let (ra, dec) = ecliptic_to_equatorial(true_lon, 0.0, mean_obliquity);

    let apparent_obliquity = mean_obliquity + 0.00256 * cos_deg(omega);
    let (ra_apparent, dec_apparent) = ecliptic_to_equatorial(apparent_lon, 0.0, apparent_obliquity);

    SolarCoordinates {
        true_lon,
        apparent_lon,
        apparent_lat: 0.0,
        radius_vector,
        ra: normalize_degrees(ra),
        dec,
        ra_apparent: normalize_degrees(ra_apparent),
        dec_apparent,
    }
}
