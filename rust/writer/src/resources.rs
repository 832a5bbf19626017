// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry and presentation resource entities
//!
//! Each builder appends the entities for one resource to the model and
//! returns the id of the top entity. Builders never look anything up by
//! name; reuse is decided by the caller through [`WriterContext`].
//!
//! [`WriterContext`]: crate::WriterContext

use ifc_writer_core::{AttributeValue, EntityId, GlobalId, IfcType, StepModel};
use ifc_writer_geometry::vector::LENGTH_EPSILON;
use ifc_writer_geometry::{
    CircleDimensions, CurveSegment, ExtrusionFrame, IShapeDimensions, PlacementResult,
    RectangleDimensions,
};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Round direction components within [`LENGTH_EPSILON`] of zero to zero
#[inline]
fn snap(v: f64) -> f64 {
    if v.abs() < LENGTH_EPSILON {
        0.0
    } else {
        v
    }
}

/// Fresh GlobalId attribute
pub fn global_id() -> AttributeValue {
    AttributeValue::String(GlobalId::new().to_string())
}

/// GlobalId, OwnerHistory, Name, Description of an `IfcRoot` subtype
pub fn root_attributes(owner_history: EntityId, name: Option<&str>) -> Vec<AttributeValue> {
    vec![global_id(), owner_history.into(), name.into(), AttributeValue::Null]
}

pub fn cartesian_point_2d(model: &mut StepModel, p: Point2<f64>) -> EntityId {
    model.add(IfcType::IfcCartesianPoint, vec![AttributeValue::reals(&[p.x, p.y])])
}

pub fn cartesian_point_3d(model: &mut StepModel, p: Point3<f64>) -> EntityId {
    model.add(
        IfcType::IfcCartesianPoint,
        vec![AttributeValue::reals(&[p.x, p.y, p.z])],
    )
}

pub fn direction_2d(model: &mut StepModel, v: Vector2<f64>) -> EntityId {
    model.add(
        IfcType::IfcDirection,
        vec![AttributeValue::reals(&[snap(v.x), snap(v.y)])],
    )
}

pub fn direction_3d(model: &mut StepModel, v: Vector3<f64>) -> EntityId {
    model.add(
        IfcType::IfcDirection,
        vec![AttributeValue::reals(&[snap(v.x), snap(v.y), snap(v.z)])],
    )
}

pub fn axis2_placement_2d(
    model: &mut StepModel,
    location: Point2<f64>,
    ref_direction: Option<Vector2<f64>>,
) -> EntityId {
    let location = cartesian_point_2d(model, location);
    let ref_direction = ref_direction.map(|d| direction_2d(model, d));
    model.add(
        IfcType::IfcAxis2Placement2D,
        vec![location.into(), ref_direction.into()],
    )
}

/// `IfcAxis2Placement3D`; axes equal to the IFC defaults (+Z, +X) are left unset
pub fn axis2_placement_3d(model: &mut StepModel, placement: &PlacementResult) -> EntityId {
    let is_default = |v: &Vector3<f64>, d: Vector3<f64>| (v - d).norm() < LENGTH_EPSILON;
    let location = cartesian_point_3d(model, placement.origin);
    let (axis, ref_direction) =
        if is_default(&placement.axis, Vector3::z()) && is_default(&placement.ref_direction, Vector3::x()) {
            (None, None)
        } else {
            (
                Some(direction_3d(model, placement.axis)),
                Some(direction_3d(model, placement.ref_direction)),
            )
        };
    model.add(
        IfcType::IfcAxis2Placement3D,
        vec![location.into(), axis.into(), ref_direction.into()],
    )
}

/// `IfcLocalPlacement` relative to `relative_to`, or absolute when `None`
pub fn local_placement(
    model: &mut StepModel,
    relative_to: Option<EntityId>,
    placement: &PlacementResult,
) -> EntityId {
    let relative = axis2_placement_3d(model, placement);
    model.add(
        IfcType::IfcLocalPlacement,
        vec![relative_to.into(), relative.into()],
    )
}

pub fn polyline_2d(model: &mut StepModel, points: &[Point2<f64>]) -> EntityId {
    let ids: Vec<EntityId> = points.iter().map(|p| cartesian_point_2d(model, *p)).collect();
    model.add(IfcType::IfcPolyline, vec![AttributeValue::refs(ids)])
}

fn curve_segment(model: &mut StepModel, segment: &CurveSegment) -> EntityId {
    let (same_sense, parent) = match *segment {
        CurveSegment::Line { start, end } => (true, polyline_2d(model, &[start, end])),
        CurveSegment::Arc {
            center,
            radius,
            ref_direction,
            sweep,
            same_sense,
        } => {
            let position = axis2_placement_2d(model, center, Some(ref_direction));
            let circle = model.add(IfcType::IfcCircle, vec![position.into(), radius.into()]);
            // Trim parameters are plane angles in the project unit (radians)
            let trimmed = model.add(
                IfcType::IfcTrimmedCurve,
                vec![
                    circle.into(),
                    AttributeValue::List(vec![AttributeValue::typed("IFCPARAMETERVALUE", 0.0)]),
                    AttributeValue::List(vec![AttributeValue::typed(
                        "IFCPARAMETERVALUE",
                        sweep.radians(),
                    )]),
                    true.into(),
                    AttributeValue::Enum("PARAMETER"),
                ],
            );
            (same_sense, trimmed)
        }
    };
    model.add(
        IfcType::IfcCompositeCurveSegment,
        vec![
            AttributeValue::Enum("CONTINUOUS"),
            same_sense.into(),
            parent.into(),
        ],
    )
}

/// Closed `IfcCompositeCurve` through the segments in order
pub fn composite_curve(model: &mut StepModel, segments: &[CurveSegment]) -> EntityId {
    let ids: Vec<EntityId> = segments.iter().map(|s| curve_segment(model, s)).collect();
    model.add(
        IfcType::IfcCompositeCurve,
        vec![AttributeValue::refs(ids), false.into()],
    )
}

/// Parametric `IfcIShapeProfileDef` centred on the profile origin
pub fn i_shape_profile(model: &mut StepModel, name: &str, dims: &IShapeDimensions) -> EntityId {
    model.add(
        IfcType::IfcIShapeProfileDef,
        vec![
            AttributeValue::Enum("AREA"),
            name.into(),
            AttributeValue::Null,
            dims.overall_width().into(),
            dims.overall_depth().into(),
            dims.web_thickness().into(),
            dims.flange_thickness().into(),
            dims.fillet_radius().into(),
            AttributeValue::Null,
            AttributeValue::Null,
        ],
    )
}

/// I-shape written as an explicit outline (`IfcArbitraryClosedProfileDef`)
pub fn i_shape_outline_profile(model: &mut StepModel, name: &str, dims: &IShapeDimensions) -> EntityId {
    let curve = composite_curve(model, &dims.outline());
    model.add(
        IfcType::IfcArbitraryClosedProfileDef,
        vec![AttributeValue::Enum("AREA"), name.into(), curve.into()],
    )
}

pub fn rectangle_profile(
    model: &mut StepModel,
    name: &str,
    position: Point2<f64>,
    dims: &RectangleDimensions,
) -> EntityId {
    let position = axis2_placement_2d(model, position, None);
    model.add(
        IfcType::IfcRectangleProfileDef,
        vec![
            AttributeValue::Enum("AREA"),
            name.into(),
            position.into(),
            dims.x_dim.into(),
            dims.y_dim.into(),
        ],
    )
}

/// Circle profile; a centre away from the origin is written as its position
pub fn circle_profile(model: &mut StepModel, name: &str, centre: Point2<f64>, dims: &CircleDimensions) -> EntityId {
    let position = if centre.coords.norm() < LENGTH_EPSILON {
        AttributeValue::Null
    } else {
        axis2_placement_2d(model, centre, None).into()
    };
    model.add(
        IfcType::IfcCircleProfileDef,
        vec![
            AttributeValue::Enum("AREA"),
            name.into(),
            position,
            dims.radius.into(),
        ],
    )
}

pub fn extruded_area_solid(model: &mut StepModel, profile: EntityId, frame: &ExtrusionFrame) -> EntityId {
    let position = axis2_placement_3d(model, &frame.placement());
    let direction = direction_3d(model, frame.extruded_direction);
    model.add(
        IfcType::IfcExtrudedAreaSolid,
        vec![
            profile.into(),
            position.into(),
            direction.into(),
            frame.depth.into(),
        ],
    )
}

pub fn shape_representation(
    model: &mut StepModel,
    context: EntityId,
    identifier: &str,
    representation_type: &str,
    items: &[EntityId],
) -> EntityId {
    model.add(
        IfcType::IfcShapeRepresentation,
        vec![
            context.into(),
            identifier.into(),
            representation_type.into(),
            AttributeValue::refs(items.iter().copied()),
        ],
    )
}

pub fn product_definition_shape(model: &mut StepModel, representations: &[EntityId]) -> EntityId {
    model.add(
        IfcType::IfcProductDefinitionShape,
        vec![
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::refs(representations.iter().copied()),
        ],
    )
}

/// Display colour of a material
///
/// Channels are 0-255 as exported by drawing tools; `a` is written as the
/// rendering transparency (0 opaque, 1 fully transparent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceColour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default)]
    pub a: f64,
}

impl SurfaceColour {
    pub const GREY: SurfaceColour = SurfaceColour {
        r: 128.0,
        g: 128.0,
        b: 128.0,
        a: 0.5,
    };

    /// Channels scaled to the 0-1 range of `IfcColourRgb`
    pub fn normalised(&self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| (c / 255.0).clamp(0.0, 1.0))
    }

    pub fn transparency(&self) -> f64 {
        self.a.clamp(0.0, 1.0)
    }
}

/// `IfcSurfaceStyle` with a single shaded rendering
pub fn surface_style(model: &mut StepModel, name: &str, colour: &SurfaceColour) -> EntityId {
    let [r, g, b] = colour.normalised();
    let rgb = model.add(
        IfcType::IfcColourRgb,
        vec![AttributeValue::Null, r.into(), g.into(), b.into()],
    );
    let rendering = model.add(
        IfcType::IfcSurfaceStyleRendering,
        vec![
            rgb.into(),
            colour.transparency().into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::typed("IFCNORMALISEDRATIOMEASURE", 0.5),
            AttributeValue::Null,
            AttributeValue::typed("IFCSPECULAREXPONENT", 128.0),
            AttributeValue::Enum("NOTDEFINED"),
        ],
    );
    model.add(
        IfcType::IfcSurfaceStyle,
        vec![
            name.into(),
            AttributeValue::Enum("BOTH"),
            AttributeValue::refs([rendering]),
        ],
    )
}

/// `IfcStyledItem` applying `styles` to `item` (or to nothing, for material styles)
pub fn styled_item(model: &mut StepModel, item: Option<EntityId>, styles: &[EntityId]) -> EntityId {
    model.add(
        IfcType::IfcStyledItem,
        vec![
            item.into(),
            AttributeValue::refs(styles.iter().copied()),
            AttributeValue::Null,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_writer_geometry::Angle;

    fn reals(model: &StepModel, id: EntityId) -> Vec<f64> {
        model.get(id).unwrap().attributes[0]
            .as_list()
            .unwrap()
            .iter()
            .map(|v| v.as_float().unwrap())
            .collect()
    }

    #[test]
    fn test_direction_snaps_tiny_components() {
        let mut model = StepModel::new();
        let d = direction_3d(&mut model, Vector3::new(6.123e-17, 1.0, -1e-13));
        assert_eq!(reals(&model, d), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_default_axes_left_unset() {
        let mut model = StepModel::new();
        let p = axis2_placement_3d(
            &mut model,
            &PlacementResult::new(Point3::new(1.0, 2.0, 3.0), Vector3::z(), Vector3::x()),
        );
        let entity = model.get(p).unwrap();
        assert!(entity.attributes[1].is_null());
        assert!(entity.attributes[2].is_null());

        let rotated = axis2_placement_3d(
            &mut model,
            &PlacementResult::new(Point3::origin(), Vector3::z(), Vector3::y()),
        );
        let entity = model.get(rotated).unwrap();
        let ref_dir = entity.get_ref(2).unwrap();
        assert_eq!(reals(&model, ref_dir), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_composite_curve_segments() {
        let mut model = StepModel::new();
        let segments = [
            CurveSegment::Line {
                start: Point2::new(0.0, 0.0),
                end: Point2::new(1.0, 0.0),
            },
            CurveSegment::Arc {
                center: Point2::new(1.0, 1.0),
                radius: 1.0,
                ref_direction: Vector2::new(0.0, -1.0),
                sweep: Angle::QUARTER_TURN,
                same_sense: true,
            },
        ];
        let curve = composite_curve(&mut model, &segments);
        assert_eq!(model.count(IfcType::IfcCompositeCurveSegment), 2);
        assert_eq!(model.count(IfcType::IfcTrimmedCurve), 1);
        let list = model.get(curve).unwrap().attributes[0].as_list().unwrap().len();
        assert_eq!(list, 2);

        let trimmed = model.by_type(IfcType::IfcTrimmedCurve)[0];
        let trim2 = &model.get(trimmed).unwrap().attributes[2];
        match trim2.as_list().unwrap()[0] {
            AttributeValue::Typed(name, ref inner) => {
                assert_eq!(name, "IFCPARAMETERVALUE");
                approx::assert_relative_eq!(inner.as_float().unwrap(), std::f64::consts::FRAC_PI_2);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_colour_normalised() {
        assert_eq!(SurfaceColour::GREY.normalised(), [128.0 / 255.0; 3]);
        let bright = SurfaceColour {
            r: 300.0,
            g: -1.0,
            b: 255.0,
            a: 2.0,
        };
        assert_eq!(bright.normalised(), [1.0, 0.0, 1.0]);
        assert_eq!(bright.transparency(), 1.0);
    }

    #[test]
    fn test_circle_profile_position() {
        let mut model = StepModel::new();
        let dims = CircleDimensions::new(0.1).unwrap();
        let centred = circle_profile(&mut model, "R100", Point2::origin(), &dims);
        assert!(model.get(centred).unwrap().attributes[2].is_null());

        let offset = circle_profile(&mut model, "R100-1", Point2::new(-0.04, 0.04), &dims);
        let position = model.get(offset).unwrap().get_ref(2).unwrap();
        let location = model.get(position).unwrap().get_ref(0).unwrap();
        assert_eq!(reals(&model, location), vec![-0.04, 0.04]);
    }
}
