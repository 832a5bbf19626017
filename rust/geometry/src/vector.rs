// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D vector primitives
//!
//! Pure functions over `nalgebra::Vector2<f64>`. Angles are in degrees and
//! positive angles rotate counter-clockwise about +Z (viewed from above).

use std::fmt;
use std::ops::Neg;

use nalgebra::{Rotation2, Vector2};

use crate::error::{Error, Result};

/// Lengths at or below this are treated as zero when normalizing
pub const LENGTH_EPSILON: f64 = 1e-12;

/// Rotation in degrees, guaranteed finite
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const QUARTER_TURN: Angle = Angle(90.0);

    /// Validate a rotation given in degrees
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        if degrees.is_finite() {
            Ok(Angle(degrees))
        } else {
            Err(Error::InvalidAngle(degrees))
        }
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl TryFrom<f64> for Angle {
    type Error = Error;

    fn try_from(degrees: f64) -> Result<Self> {
        Angle::from_degrees(degrees)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[inline]
pub fn add(v1: Vector2<f64>, v2: Vector2<f64>) -> Vector2<f64> {
    v1 + v2
}

#[inline]
pub fn subtract(v1: Vector2<f64>, v2: Vector2<f64>) -> Vector2<f64> {
    v1 - v2
}

#[inline]
pub fn multiply_scalar(v: Vector2<f64>, s: f64) -> Vector2<f64> {
    v * s
}

/// Euclidean norm
#[inline]
pub fn magnitude(v: Vector2<f64>) -> f64 {
    v.norm()
}

/// Unit vector in the direction of `v`
///
/// A zero (or non-finite) vector has no direction and yields
/// [`Error::DegenerateInput`] instead of NaN components.
pub fn normalize(v: Vector2<f64>) -> Result<Vector2<f64>> {
    let length = magnitude(v);
    if !length.is_finite() || length <= LENGTH_EPSILON {
        return Err(Error::DegenerateInput(format!(
            "cannot normalize vector ({}, {}) with length {}",
            v.x, v.y, length
        )));
    }
    Ok(v / length)
}

/// Rotate `v` counter-clockwise by `degrees`
pub fn rotate(v: Vector2<f64>, degrees: f64) -> Result<Vector2<f64>> {
    Ok(rotate_by(v, Angle::from_degrees(degrees)?))
}

/// Rotate `v` by an already validated angle
#[inline]
pub fn rotate_by(v: Vector2<f64>, angle: Angle) -> Vector2<f64> {
    Rotation2::new(angle.radians()) * v
}
