// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Apparent sidereal time at Greenwich (Meeus chap. 11).

use crate::angles::{cos_deg, normalize_degrees};
use crate::julian::JulianDay;
use crate::nutation::nutation_and_obliquity;
use crate::polynomial::poly_eval;

/// Mean sidereal time at Greenwich, degrees (eq. 11.4).
const MEAN_SIDEREAL_TIME: [f64; 4] = [
    100.46061837,
    36_000.770053608,
    0.000387933,
    -1.0 / 38_710_000.0,
];

/// Mean sidereal time at Greenwich, degrees in `[0, 360)`.
///
/// `jd` is expected at 0h UT.
pub fn mean_sidereal_time_at_greenwich(jd: JulianDay) -> f64 {
    normalize_degrees(poly_eval(jd.julian_centuries().value(), &MEAN_SIDEREAL_TIME))
}

/// Apparent sidereal time at Greenwich, degrees in `[0, 360)`.
///
/// Mean sidereal time plus the equation of the equinoxes `Δψ/15 · cos ε`.
pub fn sidereal_time_at_greenwich(jd: JulianDay) -> f64 {
    let nutation = nutation_and_obliquity(jd);
    let equation_of_equinoxes = nutation.nutation_longitude / 15.0 * cos_deg(nutation.true_obliquity);
    normalize_degrees(mean_sidereal_time_at_greenwich(jd) + equation_of_equinoxes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::degrees_to_hms;

    #[test]
    fn meeus_example_11a() {
        // 1987-04-10 0h UT: θ0 = 13h10m46.3668s = 197.693195°
        let jd = JulianDay::new(2_446_895.5);
        let mean = mean_sidereal_time_at_greenwich(jd);
        assert!((mean - 197.693195).abs() < 1e-6, "θ0 = {mean}");

        let hms = degrees_to_hms(mean);
        assert_eq!((hms.hours, hms.minutes), (13, 10));
        assert!((hms.seconds - 46.3668).abs() < 1e-3);
    }

    #[test]
    fn apparent_differs_by_the_equation_of_the_equinoxes() {
        let jd = JulianDay::new(2_446_895.5);
        let apparent = sidereal_time_at_greenwich(jd);
        assert!((apparent - 197.693129).abs() < 1e-5, "θ = {apparent}");
        assert!(apparent < mean_sidereal_time_at_greenwich(jd));
    }

    #[test]
    fn stays_normalised() {
        for step in 0..200 {
            let theta = sidereal_time_at_greenwich(JulianDay::new(2_440_000.5 + step as f64 * 91.7));
            assert!((0.0..360.0).contains(&theta));
        }
    }
}
