// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement derivation for walls, columns and beams
//!
//! Turns user-facing element input (2D endpoints, rotation in degrees,
//! thickness and offsets) into the frames written as `IfcAxis2Placement3D`
//! and `IfcExtrudedAreaSolid` arguments. All results are relative to the
//! containing storey placement.

use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

use crate::error::{ensure_finite, ensure_positive, Error, Result};
use crate::vector::{self, Angle};

/// Origin plus local Z (`axis`) and local X (`ref_direction`) of a placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub ref_direction: Vector3<f64>,
}

impl PlacementResult {
    pub fn new(origin: Point3<f64>, axis: Vector3<f64>, ref_direction: Vector3<f64>) -> Self {
        Self {
            origin,
            axis,
            ref_direction,
        }
    }

    /// Origin with the default axes, +Z up and +X as reference
    pub fn identity() -> Self {
        Self::new(Point3::origin(), Vector3::z(), Vector3::x())
    }

    /// Local Y axis (right-hand rule: Y = Z × X)
    pub fn y_axis(&self) -> Vector3<f64> {
        self.axis.cross(&self.ref_direction)
    }

    /// Transform from local coordinates to the parent frame
    ///
    /// Columns hold the parent-space directions of the local X, Y and Z
    /// axes, the last column the origin.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let x = self.ref_direction;
        let y = self.y_axis();
        let z = self.axis;
        let o = self.origin;
        Matrix4::new(
            x.x, y.x, z.x, o.x,
            x.y, y.y, z.y, o.y,
            x.z, y.z, z.z, o.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Map a point given in this placement's local frame to the parent frame
    pub fn to_parent(&self, local: Point3<f64>) -> Point3<f64> {
        self.origin
            + self.ref_direction * local.x
            + self.y_axis() * local.y
            + self.axis * local.z
    }
}

/// Position and orientation of an `IfcExtrudedAreaSolid`
///
/// `location`, `axis` and `ref_direction` form the solid's own placement;
/// `extruded_direction` is expressed in that placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionFrame {
    pub location: Point3<f64>,
    pub axis: Vector3<f64>,
    pub ref_direction: Vector3<f64>,
    pub extruded_direction: Vector3<f64>,
    pub depth: f64,
}

impl ExtrusionFrame {
    /// Straight up from the element origin
    pub fn vertical(depth: f64) -> Result<Self> {
        ensure_positive("height", depth)?;
        Ok(Self {
            location: Point3::origin(),
            axis: Vector3::z(),
            ref_direction: Vector3::x(),
            extruded_direction: Vector3::z(),
            depth,
        })
    }

    /// Frame of the solid relative to the element placement
    pub fn placement(&self) -> PlacementResult {
        PlacementResult::new(self.location, self.axis, self.ref_direction)
    }

    /// Extrusion vector (direction times depth) in the element frame
    pub fn sweep(&self) -> Vector3<f64> {
        let frame = self.placement();
        let d = self.extruded_direction;
        (frame.ref_direction * d.x + frame.y_axis() * d.y + frame.axis * d.z) * self.depth
    }
}

/// Horizontal reference direction for a rotation about +Z
///
/// Counter-clockwise for positive angles: `(cos r, sin r, 0)`.
pub fn rotation_direction(angle: Angle) -> Vector3<f64> {
    let (sin, cos) = angle.radians().sin_cos();
    Vector3::new(cos, sin, 0.0)
}

/// Extrusion in the element's XZ plane, tilted by `angle` from +X
///
/// `point` is `(x, z)` in that plane. The solid's local Z is
/// `(-sin r, 0, cos r)` and its local X `(-cos r, 0, -sin r)`; the
/// extrusion runs along local +Z for `depth`.
pub fn plane_xz_extrusion(point: Point2<f64>, angle: Angle, depth: f64) -> Result<ExtrusionFrame> {
    ensure_finite_point("point", point)?;
    ensure_positive("depth", depth)?;
    let (sin, cos) = angle.radians().sin_cos();
    Ok(ExtrusionFrame {
        location: Point3::new(point.x, 0.0, point.y),
        axis: Vector3::new(-sin, 0.0, cos),
        ref_direction: Vector3::new(-cos, 0.0, -sin),
        extruded_direction: Vector3::z(),
        depth,
    })
}

fn ensure_finite_point(name: &'static str, p: Point2<f64>) -> Result<Point2<f64>> {
    ensure_finite(name, p.x)?;
    ensure_finite(name, p.y)?;
    Ok(p)
}

/// Wall centerline shifted to its drawn boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPlacement {
    /// Offset start point
    pub start: Point2<f64>,
    /// Offset end point
    pub end: Point2<f64>,
    /// Unit direction from start to end
    pub direction: Vector2<f64>,
    /// Unit offset direction, the centerline direction rotated by -90°
    pub normal: Vector2<f64>,
    pub length: f64,
    pub thickness: f64,
}

/// Offset the centerline `p1 -> p2` by half the thickness to the right
///
/// Both endpoints move by the same vector so the wall keeps its length and
/// orientation. The body built on [`WallPlacement::profile_position`] then
/// spans the full thickness back across the original centerline.
pub fn wall_placement(p1: Point2<f64>, p2: Point2<f64>, thickness: f64) -> Result<WallPlacement> {
    ensure_finite_point("start", p1)?;
    ensure_finite_point("end", p2)?;
    ensure_positive("thickness", thickness)?;

    let delta = vector::subtract(p2.coords, p1.coords);
    let direction = vector::normalize(delta)
        .map_err(|_| Error::DegenerateInput("degenerate wall: start and end coincide".into()))?;
    let normal = vector::rotate_by(direction, -Angle::QUARTER_TURN);
    let offset = vector::multiply_scalar(normal, 0.5 * thickness);

    Ok(WallPlacement {
        start: Point2::from(vector::add(p1.coords, offset)),
        end: Point2::from(vector::add(p2.coords, offset)),
        direction,
        normal,
        length: vector::magnitude(delta),
        thickness,
    })
}

impl WallPlacement {
    /// Element placement at height `z_offset` above the storey
    pub fn placement(&self, z_offset: f64) -> Result<PlacementResult> {
        ensure_finite("z_offset", z_offset)?;
        Ok(PlacementResult::new(
            Point3::new(self.start.x, self.start.y, z_offset),
            Vector3::z(),
            Vector3::new(self.direction.x, self.direction.y, 0.0),
        ))
    }

    /// Centre of the rectangular profile in the wall's local frame
    ///
    /// Local +Y points away from `normal`, so a rectangle centred here covers
    /// `0..thickness` and is split evenly by the original centerline.
    pub fn profile_position(&self) -> Point2<f64> {
        Point2::new(0.5 * self.length, 0.5 * self.thickness)
    }

    /// Wall axis in the local frame, along the offset reference line
    pub fn axis_points(&self) -> [Point2<f64>; 2] {
        [Point2::origin(), Point2::new(self.length, 0.0)]
    }

    pub fn body(&self, height: f64) -> Result<ExtrusionFrame> {
        ExtrusionFrame::vertical(height)
    }
}

/// Column placement: `coordinate` lifted by `base_offset`, rotated about +Z
pub fn column_placement(
    coordinate: Point2<f64>,
    base_offset: f64,
    angle: Angle,
) -> Result<PlacementResult> {
    ensure_finite_point("coordinate", coordinate)?;
    ensure_finite("base_offset", base_offset)?;
    Ok(PlacementResult::new(
        Point3::new(coordinate.x, coordinate.y, base_offset),
        Vector3::z(),
        rotation_direction(angle),
    ))
}

/// Beam element placement and body extrusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamPlacement {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub direction: Vector2<f64>,
    pub length: f64,
    pub placement: PlacementResult,
    pub body: ExtrusionFrame,
}

/// Place a beam from `pt_start` to `pt_end` at height `z_offset`
///
/// The element placement sits at the start point with local X along the
/// beam. The body solid's local Z is -X, so extruding along its -Z for
/// `length` runs from start to end; `angle` spins the cross-section about
/// the beam axis.
pub fn beam_placement(
    pt_start: Point2<f64>,
    pt_end: Point2<f64>,
    z_offset: f64,
    angle: Angle,
) -> Result<BeamPlacement> {
    ensure_finite_point("start", pt_start)?;
    ensure_finite_point("end", pt_end)?;
    ensure_finite("z_offset", z_offset)?;

    let delta = vector::subtract(pt_end.coords, pt_start.coords);
    let length = vector::magnitude(delta);
    let direction = vector::normalize(delta)
        .map_err(|_| Error::DegenerateInput("degenerate beam: start and end coincide".into()))?;

    let placement = PlacementResult::new(
        Point3::new(pt_start.x, pt_start.y, z_offset),
        Vector3::z(),
        Vector3::new(direction.x, direction.y, 0.0),
    );

    let (sin, cos) = angle.radians().sin_cos();
    let body = ExtrusionFrame {
        location: Point3::origin(),
        axis: -Vector3::x(),
        ref_direction: Vector3::new(0.0, cos, sin),
        extruded_direction: -Vector3::z(),
        depth: length,
    };

    Ok(BeamPlacement {
        start: pt_start,
        end: pt_end,
        direction,
        length,
        placement,
        body,
    })
}

impl BeamPlacement {
    /// Beam axis in the local frame
    pub fn axis_points(&self) -> [Point2<f64>; 2] {
        [Point2::origin(), Point2::new(self.length, 0.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn distance_to_line(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
        let d = (b - a).normalize();
        let v = p - a;
        (v.x * d.y - v.y * d.x).abs()
    }

    #[test]
    fn test_wall_offset_half_thickness() {
        let p1 = Point2::new(1.0, 1.0);
        let p2 = Point2::new(1.0, 4.0);
        let wall = wall_placement(p1, p2, 0.2).unwrap();

        assert_relative_eq!(distance_to_line(wall.start, p1, p2), 0.1, epsilon = 1e-12);
        assert_relative_eq!(distance_to_line(wall.end, p1, p2), 0.1, epsilon = 1e-12);
        assert_relative_eq!(wall.direction, Vector2::new(0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!((wall.end - wall.start).normalize(), wall.direction, epsilon = 1e-12);
        assert_relative_eq!(wall.length, 3.0);

        // Heading +Y, the offset goes to +X
        assert_relative_eq!(wall.start, Point2::new(1.1, 1.0), epsilon = 1e-12);
        assert_relative_eq!(wall.end, Point2::new(1.1, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_wall_body_straddles_centerline() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(4.0, 0.0);
        let wall = wall_placement(p1, p2, 0.3).unwrap();
        let frame = wall.placement(0.0).unwrap();

        let c = wall.profile_position();
        let centre = frame.to_parent(Point3::new(c.x, c.y, 0.0));
        assert_relative_eq!(centre, Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_wall_degenerate() {
        let p = Point2::new(2.0, 2.0);
        let err = wall_placement(p, p, 0.2).unwrap_err();
        assert_eq!(
            err,
            Error::DegenerateInput("degenerate wall: start and end coincide".into())
        );
    }

    #[test]
    fn test_wall_rejects_bad_thickness() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        assert!(matches!(
            wall_placement(p1, p2, 0.0),
            Err(Error::InvalidDimension { name: "thickness", .. })
        ));
        assert!(wall_placement(p1, p2, f64::NAN).is_err());
    }

    #[test]
    fn test_rotation_direction() {
        let d = rotation_direction(Angle::from_degrees(90.0).unwrap());
        assert_relative_eq!(d, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_eq!(rotation_direction(Angle::ZERO), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_column_placement() {
        let angle = Angle::from_degrees(30.0).unwrap();
        let p = column_placement(Point2::new(2.0, 3.0), 0.5, angle).unwrap();
        assert_eq!(p.origin, Point3::new(2.0, 3.0, 0.5));
        assert_eq!(p.axis, Vector3::z());
        assert_relative_eq!(p.ref_direction.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.ref_direction.y.atan2(p.ref_direction.x).to_degrees(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_beam_length_345() {
        let beam = beam_placement(
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            3.0,
            Angle::ZERO,
        )
        .unwrap();
        assert_eq!(beam.length, 5.0);
        assert_eq!(beam.body.depth, 5.0);
        assert_relative_eq!(beam.direction, Vector2::new(0.6, 0.8), epsilon = 1e-12);
        assert_eq!(beam.placement.origin, Point3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_beam_body_runs_start_to_end() {
        let beam = beam_placement(
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 6.0),
            0.0,
            Angle::from_degrees(45.0).unwrap(),
        )
        .unwrap();

        // Sweep is along local +X of the element for the full length
        assert_relative_eq!(beam.body.sweep(), Vector3::new(5.0, 0.0, 0.0), epsilon = 1e-12);

        let end_local = Point3::origin() + beam.body.sweep();
        let end_world = beam.placement.to_parent(end_local);
        assert_relative_eq!(end_world, Point3::new(1.0, 6.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_beam_degenerate() {
        let p = Point2::new(0.5, 0.5);
        let err = beam_placement(p, p, 0.0, Angle::ZERO).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn test_to_matrix_matches_to_parent() {
        let p = column_placement(
            Point2::new(-1.0, 2.0),
            0.25,
            Angle::from_degrees(-60.0).unwrap(),
        )
        .unwrap();
        let local = Point3::new(0.4, -0.2, 1.5);
        let via_matrix = p.to_matrix().transform_point(&local);
        assert_relative_eq!(via_matrix, p.to_parent(local), epsilon = 1e-12);
    }

    #[test]
    fn test_plane_xz_extrusion_axes() {
        let frame = plane_xz_extrusion(Point2::new(2.0, -1.0), Angle::from_degrees(60.0).unwrap(), 4.0).unwrap();
        let (sin, cos) = 60f64.to_radians().sin_cos();
        assert_eq!(frame.location, Point3::new(2.0, 0.0, -1.0));
        assert_relative_eq!(frame.axis, Vector3::new(-sin, 0.0, cos), epsilon = 1e-12);
        assert_relative_eq!(frame.ref_direction, Vector3::new(-cos, 0.0, -sin), epsilon = 1e-12);
        assert_relative_eq!(frame.axis.dot(&frame.ref_direction), 0.0, epsilon = 1e-12);
        // local Y stays horizontal, so the frame never leaves the XZ plane
        assert_relative_eq!(frame.placement().y_axis(), Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(frame.sweep(), frame.axis * 4.0, epsilon = 1e-12);

        let upright = plane_xz_extrusion(Point2::origin(), Angle::ZERO, 1.0).unwrap();
        assert_relative_eq!(upright.sweep(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert!(plane_xz_extrusion(Point2::origin(), Angle::ZERO, 0.0).is_err());
    }

    #[test]
    fn test_vertical_extrusion_requires_height() {
        assert!(ExtrusionFrame::vertical(3.0).is_ok());
        assert!(ExtrusionFrame::vertical(-1.0).is_err());
    }
}
