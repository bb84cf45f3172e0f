// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Nutation and the obliquity of the ecliptic.
//!
//! Four-term series of Meeus chap. 21 (p. 132), accurate to about 0.5″ in
//! longitude and 0.1″ in obliquity. The mean obliquity uses equation 21.2,
//! valid within a couple of millennia of J2000.0.
//!
//! | Term | Δψ | Δε |
//! |------|----|----|
//! | Ω    | −17.20″ | +9.20″ |
//! | 2L   | −1.32″  | +0.57″ |
//! | 2L′  | −0.23″  | +0.10″ |
//! | 2Ω   | +0.21″  | −0.09″ |

use serde::{Deserialize, Serialize};

use crate::angles::{arcsec, cos_deg, fold_signed_degrees, normalize_degrees, sin_deg};
use crate::julian::JulianDay;
use crate::polynomial::poly_eval;

/// Mean obliquity polynomial (eq. 21.2) in degrees.
const MEAN_OBLIQUITY: [f64; 4] = [
    23.0 + 26.0 / 60.0 + 21.448 / 3600.0,
    -46.8150 / 3600.0,
    -0.00059 / 3600.0,
    0.001813 / 3600.0,
];

/// Nutation angles and obliquity of a date, all in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipticNutation {
    /// Δψ, signed.
    pub nutation_longitude: f64,
    /// Δε, signed.
    pub nutation_obliquity: f64,
    /// ε₀
    pub mean_obliquity: f64,
    /// ε = ε₀ + Δε
    pub true_obliquity: f64,
}

/// Longitude of the Moon's mean ascending node, degrees in `[0, 360)`.
#[inline]
pub(crate) fn lunar_node_longitude(t: f64, coefficients: &[f64]) -> f64 {
    normalize_degrees(poly_eval(t, coefficients))
}

pub fn nutation_and_obliquity(jd: JulianDay) -> EclipticNutation {
    let t = jd.julian_centuries().value();

    let omega = lunar_node_longitude(t, &[125.04452, -1934.136261]);
    let sun_mean_longitude = normalize_degrees(280.4665 + 36_000.7698 * t);
    let moon_mean_longitude = normalize_degrees(218.3165 + 481_267.8813 * t);

    let delta_psi = arcsec(-17.20) * sin_deg(omega)
        + arcsec(-1.32) * sin_deg(2.0 * sun_mean_longitude)
        + arcsec(-0.23) * sin_deg(2.0 * moon_mean_longitude)
        + arcsec(0.21) * sin_deg(2.0 * omega);

    let delta_epsilon = arcsec(9.20) * cos_deg(omega)
        + arcsec(0.57) * cos_deg(2.0 * sun_mean_longitude)
        + arcsec(0.10) * cos_deg(2.0 * moon_mean_longitude)
        + arcsec(-0.09) * cos_deg(2.0 * omega);

    let nutation_longitude = fold_signed_degrees(delta_psi);
    let nutation_obliquity = fold_signed_degrees(delta_epsilon);
    let mean_obliquity = normalize_degrees(poly_eval(t, &MEAN_OBLIQUITY));

    EclipticNutation {
        nutation_longitude,
        nutation_obliquity,
        mean_obliquity,
        true_obliquity: normalize_degrees(mean_obliquity + nutation_obliquity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::dms_to_degrees;

    #[test]
    fn meeus_example_22a() {
        // 1987-04-10 0h TD
        let n = nutation_and_obliquity(JulianDay::new(2_446_895.5));

        let psi_arcsec = n.nutation_longitude * 3600.0;
        let eps_arcsec = n.nutation_obliquity * 3600.0;
        assert!((psi_arcsec + 3.788).abs() < 0.5, "Δψ = {psi_arcsec}″");
        assert!((eps_arcsec - 9.443).abs() < 0.1, "Δε = {eps_arcsec}″");

        let expected_true = dms_to_degrees(23.0, 26.0, 36.850).unwrap();
        assert!((n.true_obliquity - expected_true).abs() < 1e-3);

        let expected_mean = dms_to_degrees(23.0, 26.0, 27.407).unwrap();
        assert!((n.mean_obliquity - expected_mean).abs() < 1e-4);
    }

    #[test]
    fn nutation_keeps_its_sign() {
        let n = nutation_and_obliquity(JulianDay::new(2_446_895.5));
        assert!(n.nutation_longitude < 0.0);
        assert!(n.nutation_obliquity > 0.0);
    }

    #[test]
    fn amplitudes_stay_bounded() {
        for step in 0..400 {
            let jd = JulianDay::new(2_451_545.0 + step as f64 * 17.3);
            let n = nutation_and_obliquity(jd);
            assert!(n.nutation_longitude.abs() <= 19.0 / 3600.0);
            assert!(n.nutation_obliquity.abs() <= 10.0 / 3600.0);
            assert!((n.true_obliquity - n.mean_obliquity - n.nutation_obliquity).abs() < 1e-12);
        }
    }
}
