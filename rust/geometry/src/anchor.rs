// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground anchor layout
//!
//! An anchor is drawn in its own XZ plane with the wale centre at the
//! origin. The tendon dips below +X at the dipping angle, free length
//! first and fixed length beyond it. The bearing plate, cap and rebars
//! stack outward on the opposite side of the wale along the same line.
//! All distances are measured along that line from the wale centre.

use nalgebra::Point2;

use crate::error::{ensure_positive, Error, Result};
use crate::placement::{plane_xz_extrusion, ExtrusionFrame};
use crate::profile::{CircleDimensions, RectangleDimensions};
use crate::vector::Angle;

/// Fixed part sizes of an anchor head and tendon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorDimensions {
    pub tendon: CircleDimensions,
    /// Bearing plate; `y_dim` is its height across the wale
    pub plate: RectangleDimensions,
    pub plate_thickness: f64,
    pub cap: CircleDimensions,
    pub cap_depth: f64,
    pub rebar: CircleDimensions,
    /// Centre distance of the 2x2 rebar group
    pub rebar_pitch: f64,
    pub rebar_length: f64,
}

impl Default for AnchorDimensions {
    fn default() -> Self {
        Self {
            tendon: CircleDimensions { radius: 0.1 },
            plate: RectangleDimensions {
                x_dim: 0.28,
                y_dim: 0.3,
            },
            plate_thickness: 0.01,
            cap: CircleDimensions { radius: 0.12 },
            cap_depth: 0.12,
            rebar: CircleDimensions { radius: 0.0115 },
            rebar_pitch: 0.085,
            rebar_length: 0.3,
        }
    }
}

impl AnchorDimensions {
    /// Rebar circle centres in the profile plane, counter-clockwise from
    /// the bottom-left one
    pub fn rebar_centres(&self) -> [Point2<f64>; 4] {
        let h = 0.5 * self.rebar_pitch;
        [
            Point2::new(-h, -h),
            Point2::new(h, -h),
            Point2::new(h, h),
            Point2::new(-h, h),
        ]
    }
}

/// Solid frames of one anchor, relative to the anchor placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorLayout {
    pub dipping: Angle,
    /// Where the free length ends at the wale side
    pub free_start: f64,
    /// Where the bearing plate sits on the wale
    pub plate_start: f64,
    pub free: ExtrusionFrame,
    pub fixed: ExtrusionFrame,
    pub plate: ExtrusionFrame,
    pub cap: ExtrusionFrame,
    /// Shared by the four rebars; their offsets live in the profiles
    pub rebar: ExtrusionFrame,
}

/// Lay out an anchor through a `wale_width` x `wale_depth` wale
///
/// `dipping` is measured downward from horizontal and must lie in
/// `[0, 90)` degrees.
pub fn anchor_layout(
    wale_width: f64,
    wale_depth: f64,
    dipping: Angle,
    free_length: f64,
    fixed_length: f64,
    dims: &AnchorDimensions,
) -> Result<AnchorLayout> {
    ensure_positive("wale_width", wale_width)?;
    ensure_positive("wale_depth", wale_depth)?;
    ensure_positive("free_length", free_length)?;
    ensure_positive("fixed_length", fixed_length)?;
    ensure_positive("plate_thickness", dims.plate_thickness)?;
    ensure_positive("cap_depth", dims.cap_depth)?;
    ensure_positive("rebar_length", dims.rebar_length)?;

    let degrees = dipping.degrees();
    if !(0.0..90.0).contains(&degrees) {
        return Err(Error::dimension("dipping", degrees, "must be in [0, 90) degrees"));
    }
    let (sin, cos) = dipping.radians().sin_cos();
    let tan = sin / cos;
    // Solids extrude back up the tendon line, tilted from vertical
    let tilt = Angle::from_degrees(90.0 - degrees)?;

    let below = |d: f64| Point2::new(d * cos, -d * sin);
    let above = |d: f64| Point2::new(-d * cos, d * sin);

    let free_start = 0.5 * wale_depth + 0.5 * wale_width * tan;
    let free = plane_xz_extrusion(below(free_start + free_length), tilt, free_length)?;
    let fixed = plane_xz_extrusion(below(free_start + free_length + fixed_length), tilt, fixed_length)?;

    let plate_start = 0.5 * dims.plate.y_dim * tan + 0.5 * wale_depth / cos;
    let cap_start = plate_start + dims.plate_thickness;
    let rebar_start = cap_start + dims.cap_depth;

    Ok(AnchorLayout {
        dipping,
        free_start,
        plate_start,
        free,
        fixed,
        plate: plane_xz_extrusion(above(plate_start), tilt, dims.plate_thickness)?,
        cap: plane_xz_extrusion(above(cap_start), tilt, dims.cap_depth)?,
        rebar: plane_xz_extrusion(above(rebar_start), tilt, dims.rebar_length)?,
    })
}

impl AnchorLayout {
    /// Every solid frame, tendon first
    pub fn frames(&self) -> [&ExtrusionFrame; 5] {
        [&self.free, &self.fixed, &self.plate, &self.cap, &self.rebar]
    }
}
