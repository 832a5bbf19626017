// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Writer Geometry
//!
//! Placement math for building elements: 2D vector primitives, wall
//! centerline offsets, column, beam and ground anchor placement frames, and
//! validated profile dimensions with the I-shape outline curve.
//!
//! Everything here is a pure function of its inputs; the entity graph is
//! assembled elsewhere from these results.

pub mod anchor;
pub mod error;
pub mod placement;
pub mod profile;
pub mod vector;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use anchor::{anchor_layout, AnchorDimensions, AnchorLayout};
pub use error::{Error, Result};
pub use placement::{
    beam_placement, column_placement, plane_xz_extrusion, rotation_direction, wall_placement, BeamPlacement,
    ExtrusionFrame, PlacementResult, WallPlacement,
};
pub use profile::{CircleDimensions, CurveSegment, IShapeDimensions, Outline, RectangleDimensions};
pub use vector::{add, magnitude, multiply_scalar, normalize, rotate, rotate_by, subtract, Angle};
