// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured profile dimensions and the I-shape outline
//!
//! Dimensions are validated when constructed, so a malformed profile fails
//! before any entity is written.

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

use crate::error::{ensure_finite, ensure_positive, Error, Result};
use crate::vector::{self, Angle};

/// Parametric I-shape (`IfcIShapeProfileDef`) dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IShapeDimensions {
    overall_width: f64,
    overall_depth: f64,
    web_thickness: f64,
    flange_thickness: f64,
    fillet_radius: f64,
}

impl IShapeDimensions {
    pub fn new(
        overall_width: f64,
        overall_depth: f64,
        web_thickness: f64,
        flange_thickness: f64,
        fillet_radius: f64,
    ) -> Result<Self> {
        ensure_positive("overall_width", overall_width)?;
        ensure_positive("overall_depth", overall_depth)?;
        ensure_positive("web_thickness", web_thickness)?;
        ensure_positive("flange_thickness", flange_thickness)?;
        ensure_finite("fillet_radius", fillet_radius)?;

        if fillet_radius < 0.0 {
            return Err(Error::dimension("fillet_radius", fillet_radius, "must not be negative"));
        }
        if web_thickness >= overall_width {
            return Err(Error::dimension(
                "web_thickness",
                web_thickness,
                "must be less than overall_width",
            ));
        }
        if 2.0 * flange_thickness >= overall_depth {
            return Err(Error::dimension(
                "flange_thickness",
                flange_thickness,
                "flanges must not meet inside overall_depth",
            ));
        }
        if 0.5 * web_thickness + fillet_radius >= 0.5 * overall_width {
            return Err(Error::dimension(
                "fillet_radius",
                fillet_radius,
                "fillet does not fit between web and flange tip",
            ));
        }
        if 2.0 * (flange_thickness + fillet_radius) >= overall_depth {
            return Err(Error::dimension(
                "fillet_radius",
                fillet_radius,
                "fillets do not fit along the web",
            ));
        }

        Ok(Self {
            overall_width,
            overall_depth,
            web_thickness,
            flange_thickness,
            fillet_radius,
        })
    }

    pub fn overall_width(&self) -> f64 {
        self.overall_width
    }

    pub fn overall_depth(&self) -> f64 {
        self.overall_depth
    }

    pub fn web_thickness(&self) -> f64 {
        self.web_thickness
    }

    pub fn flange_thickness(&self) -> f64 {
        self.flange_thickness
    }

    pub fn fillet_radius(&self) -> f64 {
        self.fillet_radius
    }

    /// Closed outline centred on the origin, counter-clockwise from the
    /// bottom-left corner
    ///
    /// Twelve straight edges plus a quarter-circle fillet at each web root.
    /// Fillets are omitted when the radius is zero.
    pub fn outline(&self) -> Outline {
        let a = 0.5 * self.overall_width;
        let b = 0.5 * self.overall_depth;
        let c = 0.5 * self.web_thickness;
        let tf = self.flange_thickness;
        let r = self.fillet_radius;

        let p = Point2::new;
        let mut segments = Outline::new();
        let line = |start: Point2<f64>, end: Point2<f64>, out: &mut Outline| {
            out.push(CurveSegment::Line { start, end });
        };
        let fillet = |center: Point2<f64>, ref_direction: Vector2<f64>, out: &mut Outline| {
            if r > 0.0 {
                out.push(CurveSegment::Arc {
                    center,
                    radius: r,
                    ref_direction,
                    sweep: Angle::QUARTER_TURN,
                    same_sense: false,
                });
            }
        };

        // Bottom flange, right half
        line(p(-a, -b), p(a, -b), &mut segments);
        line(p(a, -b), p(a, -b + tf), &mut segments);
        line(p(a, -b + tf), p(c + r, -b + tf), &mut segments);
        fillet(p(c + r, -b + tf + r), -Vector2::x(), &mut segments);
        // Web, right face
        line(p(c, -b + tf + r), p(c, b - tf - r), &mut segments);
        fillet(p(c + r, b - tf - r), Vector2::y(), &mut segments);
        // Top flange
        line(p(c + r, b - tf), p(a, b - tf), &mut segments);
        line(p(a, b - tf), p(a, b), &mut segments);
        line(p(a, b), p(-a, b), &mut segments);
        line(p(-a, b), p(-a, b - tf), &mut segments);
        line(p(-a, b - tf), p(-c - r, b - tf), &mut segments);
        fillet(p(-c - r, b - tf - r), Vector2::x(), &mut segments);
        // Web, left face
        line(p(-c, b - tf - r), p(-c, -b + tf + r), &mut segments);
        fillet(p(-c - r, -b + tf + r), -Vector2::y(), &mut segments);
        // Bottom flange, left half
        line(p(-c - r, -b + tf), p(-a, -b + tf), &mut segments);
        line(p(-a, -b + tf), p(-a, -b), &mut segments);

        segments
    }
}

/// Rectangle (`IfcRectangleProfileDef`) dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleDimensions {
    pub x_dim: f64,
    pub y_dim: f64,
}

impl RectangleDimensions {
    pub fn new(x_dim: f64, y_dim: f64) -> Result<Self> {
        ensure_positive("x_dim", x_dim)?;
        ensure_positive("y_dim", y_dim)?;
        Ok(Self { x_dim, y_dim })
    }
}

/// Circle (`IfcCircleProfileDef`) dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDimensions {
    pub radius: f64,
}

impl CircleDimensions {
    pub fn new(radius: f64) -> Result<Self> {
        ensure_positive("radius", radius)?;
        Ok(Self { radius })
    }
}

/// Segments of a composite profile curve; 16 fit inline
pub type Outline = SmallVec<[CurveSegment; 16]>;

/// One segment of a composite curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSegment {
    Line {
        start: Point2<f64>,
        end: Point2<f64>,
    },
    /// Circular arc trimmed from parameter 0 (at `center + radius *
    /// ref_direction`) counter-clockwise through `sweep`. With `same_sense`
    /// false the segment is traversed from the far end back to parameter 0.
    Arc {
        center: Point2<f64>,
        radius: f64,
        ref_direction: Vector2<f64>,
        sweep: Angle,
        same_sense: bool,
    },
}

impl CurveSegment {
    fn arc_point(center: Point2<f64>, radius: f64, ref_direction: Vector2<f64>, at: Angle) -> Point2<f64> {
        center + vector::rotate_by(ref_direction, at) * radius
    }

    /// First point in traversal order
    pub fn start(&self) -> Point2<f64> {
        match *self {
            CurveSegment::Line { start, .. } => start,
            CurveSegment::Arc {
                center,
                radius,
                ref_direction,
                sweep,
                same_sense,
            } => {
                let at = if same_sense { Angle::ZERO } else { sweep };
                Self::arc_point(center, radius, ref_direction, at)
            }
        }
    }

    /// Last point in traversal order
    pub fn end(&self) -> Point2<f64> {
        match *self {
            CurveSegment::Line { end, .. } => end,
            CurveSegment::Arc {
                center,
                radius,
                ref_direction,
                sweep,
                same_sense,
            } => {
                let at = if same_sense { sweep } else { Angle::ZERO };
                Self::arc_point(center, radius, ref_direction, at)
            }
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, CurveSegment::Arc { .. })
    }
}
