// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Power series and piecewise-linear interpolation.
//!
//! Every time-polynomial constant of the engine (mean longitudes, anomalies,
//! obliquity, sidereal time, ...) is written as a coefficient slice ordered
//! from the constant term upwards and evaluated with [`poly_eval`].

use crate::error::DomainError;

/// Evaluates `c[0] + c[1]·x + c[2]·x² + …` with Horner's scheme.
///
/// An empty coefficient slice evaluates to `0.0`.
#[inline]
pub fn poly_eval(x: f64, coefficients: &[f64]) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &coefficient| coefficient + acc * x)
}

/// Evaluates the same polynomial as [`poly_eval`] by accumulating powers of `x`.
///
/// Kept as a reference evaluator for cross-checking the Horner form.
pub fn poly_eval_naive(x: f64, coefficients: &[f64]) -> f64 {
    let Some((&first, rest)) = coefficients.split_first() else {
        return 0.0;
    };
    let mut power = 1.0;
    let mut result = first;
    for &coefficient in rest {
        power *= x;
        result += power * coefficient;
    }
    result
}

/// Interpolates linearly over consecutive `(x, y)` knots sorted by `x`.
///
/// Outside the knot range the closest edge `y` is returned when
/// `extrapolate_edges` is set, otherwise the call fails.
pub fn linear_interp_in_parts(
    x: f64,
    knots: &[(f64, f64)],
    extrapolate_edges: bool,
) -> Result<f64, DomainError> {
    let (Some(&(min_x, min_y)), Some(&(max_x, max_y))) = (knots.first(), knots.last()) else {
        return Err(DomainError::InsufficientKnots(0));
    };
    if knots.len() < 2 {
        return Err(DomainError::InsufficientKnots(knots.len()));
    }

    if extrapolate_edges {
        if x < min_x {
            return Ok(min_y);
        }
        if x > max_x {
            return Ok(max_y);
        }
    }

    knots
        .windows(2)
        .find_map(|segment| {
            let (x1, y1) = segment[0];
            let (x2, y2) = segment[1];
            (x1..=x2)
                .contains(&x)
                .then(|| y1 + (y2 - y1) / (x2 - x1) * (x - x1))
        })
        .ok_or(DomainError::OutOfInterpolationRange(x))
}
