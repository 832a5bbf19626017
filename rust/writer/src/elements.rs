// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Columns, beams and walls
//!
//! Every element is placed relative to its storey, carries a
//! `Body` representation (and an `Axis` curve for linear elements), is
//! contained in the storey and typed by a shared type object.

use ifc_writer_core::{AttributeValue, EntityId, IfcType};
use ifc_writer_geometry::{
    beam_placement, column_placement, wall_placement, Angle, CircleDimensions, ExtrusionFrame,
    IShapeDimensions, PlacementResult, RectangleDimensions,
};
use nalgebra::{Point2, Point3};
use rustc_hash::FxHashMap;

use crate::context::{ProfileRecord, ProfileShape, TypeRecord};
use crate::error::{Error, Result};
use crate::resources::{self, SurfaceColour};
use crate::writer::IfcWriter;

/// Index of `RepresentationMaps` in the element type objects
const TYPE_REPRESENTATION_MAPS: usize = 6;
/// Index of `RelatedObjects` in `IfcRelDefinesByType`
const TYPED_RELATED: usize = 4;

/// Cross-section of a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnProfile {
    IShape(IShapeDimensions),
    Circle(CircleDimensions),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub storey: String,
    pub type_name: String,
    /// Profiles are shared by name; dimensions are needed only for a new one
    pub profile_name: String,
    pub profile: Option<ColumnProfile>,
    pub coordinate: Point2<f64>,
    pub height: f64,
    pub rotation: Angle,
    /// Offset of the column base above the storey
    pub base_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeamSpec {
    pub storey: String,
    pub type_name: String,
    pub profile_name: String,
    pub profile: Option<IShapeDimensions>,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    /// Height of the beam axis above the storey
    pub z_offset: f64,
    /// Spin of the cross-section about the beam axis
    pub rotation: Angle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallSpec {
    pub storey: String,
    pub type_name: String,
    pub profile_name: String,
    /// Centerline endpoints
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub thickness: f64,
    pub height: f64,
    pub z_offset: f64,
    /// Named layer set; walls without one get the `MAT_<type>` material
    pub material_layer_set: Option<String>,
}

impl From<ColumnProfile> for ProfileShape {
    fn from(profile: ColumnProfile) -> Self {
        match profile {
            ColumnProfile::IShape(dims) => ProfileShape::IShape(dims),
            ColumnProfile::Circle(dims) => ProfileShape::Circle(dims),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Column,
    Beam,
    Wall,
    Proxy,
}

impl ElementKind {
    fn type_entity(self) -> IfcType {
        match self {
            ElementKind::Column => IfcType::IfcColumnType,
            ElementKind::Beam => IfcType::IfcBeamType,
            ElementKind::Wall => IfcType::IfcWallType,
            ElementKind::Proxy => IfcType::IfcBuildingElementProxyType,
        }
    }

    fn predefined_type(self) -> &'static str {
        match self {
            ElementKind::Column => "COLUMN",
            ElementKind::Beam => "BEAM",
            ElementKind::Wall => "STANDARD",
            ElementKind::Proxy => "NOTDEFINED",
        }
    }
}

impl IfcWriter {
    fn types_mut(&mut self, kind: ElementKind) -> &mut FxHashMap<String, TypeRecord> {
        match kind {
            ElementKind::Column => &mut self.context.column_types,
            ElementKind::Beam => &mut self.context.beam_types,
            ElementKind::Wall => &mut self.context.wall_types,
            ElementKind::Proxy => &mut self.context.proxy_types,
        }
    }

    /// Get or create the type object `name`, making sure it lists `map`
    pub(crate) fn element_type(&mut self, kind: ElementKind, name: &str, map: Option<EntityId>) -> Result<EntityId> {
        if let Some(record) = self.types_mut(kind).get(name).copied() {
            if let Some(map) = map {
                let listed = self
                    .model
                    .get(record.entity)
                    .and_then(|t| t.get(TYPE_REPRESENTATION_MAPS))
                    .and_then(|v| v.as_list())
                    .map(|maps| maps.iter().any(|m| m.as_entity_ref() == Some(map)));
                match listed {
                    Some(true) => {}
                    Some(false) => self.model.push_to_list(record.entity, TYPE_REPRESENTATION_MAPS, map.into())?,
                    None => self.model.set_attribute(
                        record.entity,
                        TYPE_REPRESENTATION_MAPS,
                        AttributeValue::refs([map]),
                    )?,
                }
            }
            return Ok(record.entity);
        }

        let mut attrs = resources::root_attributes(self.owner_history, Some(name));
        attrs.extend([
            AttributeValue::Null,
            AttributeValue::Null,
            map.map(|m| AttributeValue::refs([m])).into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Enum(kind.predefined_type()),
        ]);
        let entity = self.model.add(kind.type_entity(), attrs);
        self.types_mut(kind).insert(
            name.to_string(),
            TypeRecord {
                entity,
                relation: None,
            },
        );
        tracing::debug!(type_name = %name, kind = ?kind, "Created element type");
        Ok(entity)
    }

    pub(crate) fn assign_type(&mut self, kind: ElementKind, name: &str, element: EntityId) -> Result<()> {
        let record = self
            .types_mut(kind)
            .get(name)
            .copied()
            .ok_or_else(|| Error::not_found("Type", name))?;
        let owner_history = self.owner_history;
        let relation = self.grow_relation(record.relation, TYPED_RELATED, element, |w| {
            let mut attrs = resources::root_attributes(owner_history, Some(name));
            attrs.extend([AttributeValue::refs([element]), record.entity.into()]);
            w.model.add(IfcType::IfcRelDefinesByType, attrs)
        })?;
        if let Some(record) = self.types_mut(kind).get_mut(name) {
            record.relation = Some(relation);
        }
        Ok(())
    }

    /// Element occurrence with `type_name` as Name and ObjectType
    pub(crate) fn add_element(
        &mut self,
        ifc_type: IfcType,
        type_name: &str,
        placement: EntityId,
        shape: EntityId,
        predefined_type: &'static str,
    ) -> EntityId {
        let mut attrs = resources::root_attributes(self.owner_history, Some(type_name));
        attrs.extend([
            type_name.into(),
            placement.into(),
            shape.into(),
            AttributeValue::Null,
            AttributeValue::Enum(predefined_type),
        ]);
        self.model.add(ifc_type, attrs)
    }

    fn axis_representation(&mut self, points: &[Point2<f64>]) -> EntityId {
        let polyline = resources::polyline_2d(&mut self.model, points);
        resources::shape_representation(&mut self.model, self.axis_context, "Axis", "Curve2D", &[polyline])
    }

    /// Profile `name` if it exists; `given` dimensions that differ from the
    /// stored ones are ignored with a warning
    pub(crate) fn cached_profile(&self, name: &str, given: Option<ProfileShape>) -> Option<EntityId> {
        let record = self.context.profiles.get(name)?;
        if let Some(given) = given {
            if given != record.shape {
                tracing::warn!(
                    profile = %name,
                    existing = ?record.shape,
                    given = ?given,
                    "Profile exists with other dimensions, keeping the existing one"
                );
            }
        }
        Some(record.entity)
    }

    pub(crate) fn register_profile(&mut self, name: &str, entity: EntityId, shape: ProfileShape) {
        self.context
            .profiles
            .insert(name.to_string(), ProfileRecord { entity, shape });
        tracing::debug!(profile = %name, id = %entity, "Created profile");
    }

    fn column_profile(&mut self, name: &str, profile: Option<&ColumnProfile>) -> Result<EntityId> {
        if let Some(id) = self.cached_profile(name, profile.map(|p| (*p).into())) {
            return Ok(id);
        }
        let id = match profile {
            Some(ColumnProfile::IShape(dims)) => resources::i_shape_profile(&mut self.model, name, dims),
            Some(ColumnProfile::Circle(dims)) => {
                resources::circle_profile(&mut self.model, name, Point2::origin(), dims)
            }
            None => return Err(Error::MissingProfileDimensions(name.to_string())),
        };
        if let Some(profile) = profile {
            self.register_profile(name, id, (*profile).into());
        }
        Ok(id)
    }

    fn beam_profile(&mut self, name: &str, profile: Option<&IShapeDimensions>) -> Result<EntityId> {
        if let Some(id) = self.cached_profile(name, profile.map(|d| ProfileShape::IShape(*d))) {
            return Ok(id);
        }
        let dims = profile.ok_or_else(|| Error::MissingProfileDimensions(name.to_string()))?;
        let id = resources::i_shape_outline_profile(&mut self.model, name, dims);
        self.register_profile(name, id, ProfileShape::IShape(*dims));
        Ok(id)
    }

    /// `IfcRepresentationMap` at the origin for a body representation
    pub(crate) fn representation_map(&mut self, representation: EntityId) -> EntityId {
        let origin = resources::axis2_placement_3d(&mut self.model, &PlacementResult::identity());
        self.model.add(
            IfcType::IfcRepresentationMap,
            vec![origin.into(), representation.into()],
        )
    }

    /// Product shape drawing `map` in place through a mapped item
    pub(crate) fn mapped_shape(&mut self, map: EntityId) -> EntityId {
        let origin = resources::cartesian_point_3d(&mut self.model, Point3::origin());
        let operator = self.model.add(
            IfcType::IfcCartesianTransformationOperator3D,
            vec![
                AttributeValue::Null,
                AttributeValue::Null,
                origin.into(),
                1.0.into(),
                AttributeValue::Null,
            ],
        );
        let mapped = self.model.add(IfcType::IfcMappedItem, vec![map.into(), operator.into()]);
        let representation = resources::shape_representation(
            &mut self.model,
            self.body_context,
            "Body",
            "MappedRepresentation",
            &[mapped],
        );
        resources::product_definition_shape(&mut self.model, &[representation])
    }

    /// Shared body of all columns with the same profile and height
    fn column_representation_map(&mut self, profile_name: &str, profile: EntityId, body: &ExtrusionFrame) -> EntityId {
        let key = (profile_name.to_string(), body.depth.to_bits());
        if let Some(map) = self.context.column_maps.get(&key) {
            return *map;
        }
        let solid = resources::extruded_area_solid(&mut self.model, profile, body);
        let representation =
            resources::shape_representation(&mut self.model, self.body_context, "Body", "SweptSolid", &[solid]);
        let map = self.representation_map(representation);
        self.context.column_maps.insert(key, map);
        map
    }

    /// Add a column standing on `spec.storey`
    pub fn create_column(&mut self, spec: &ColumnSpec) -> Result<EntityId> {
        let storey = *self.context.storey(&spec.storey)?;
        let placement = column_placement(spec.coordinate, spec.base_offset, spec.rotation)?;
        let body = ExtrusionFrame::vertical(spec.height)?;

        let profile = self.column_profile(&spec.profile_name, spec.profile.as_ref())?;
        let map = self.column_representation_map(&spec.profile_name, profile, &body);
        self.element_type(ElementKind::Column, &spec.type_name, Some(map))?;

        let shape = self.mapped_shape(map);
        let local = resources::local_placement(&mut self.model, Some(storey.placement), &placement);

        let column = self.add_element(IfcType::IfcColumn, &spec.type_name, local, shape, "COLUMN");
        self.contain_in_storey(&spec.storey, column)?;
        self.assign_type(ElementKind::Column, &spec.type_name, column)?;

        tracing::debug!(
            id = %column,
            storey = %spec.storey,
            x = spec.coordinate.x,
            y = spec.coordinate.y,
            rotation = spec.rotation.degrees(),
            "Created column"
        );
        Ok(column)
    }

    /// Add a beam between two plan points on `spec.storey`
    pub fn create_beam(&mut self, spec: &BeamSpec) -> Result<EntityId> {
        let storey = *self.context.storey(&spec.storey)?;
        let beam = beam_placement(spec.start, spec.end, spec.z_offset, spec.rotation)?;

        let profile = self.beam_profile(&spec.profile_name, spec.profile.as_ref())?;
        let solid = resources::extruded_area_solid(&mut self.model, profile, &beam.body);
        let body = resources::shape_representation(&mut self.model, self.body_context, "Body", "SweptSolid", &[solid]);
        let axis = self.axis_representation(&beam.axis_points());
        let shape = resources::product_definition_shape(&mut self.model, &[axis, body]);
        let local = resources::local_placement(&mut self.model, Some(storey.placement), &beam.placement);

        self.element_type(ElementKind::Beam, &spec.type_name, None)?;
        let element = self.add_element(IfcType::IfcBeam, &spec.type_name, local, shape, "BEAM");
        self.contain_in_storey(&spec.storey, element)?;
        self.assign_type(ElementKind::Beam, &spec.type_name, element)?;

        tracing::debug!(id = %element, storey = %spec.storey, length = beam.length, "Created beam");
        Ok(element)
    }

    /// Add a wall whose body is centred on the given centerline
    pub fn create_wall(&mut self, spec: &WallSpec) -> Result<EntityId> {
        let storey = *self.context.storey(&spec.storey)?;
        let wall = wall_placement(spec.start, spec.end, spec.thickness)?;
        let placement = wall.placement(spec.z_offset)?;
        let body_frame = wall.body(spec.height)?;
        let dims = RectangleDimensions::new(wall.length, wall.thickness)?;
        let layer_set = match &spec.material_layer_set {
            Some(name) => Some(self.context.layer_set(name)?.clone()),
            None => None,
        };

        // Wall profiles span the wall length, so each wall has its own
        let profile =
            resources::rectangle_profile(&mut self.model, &spec.profile_name, wall.profile_position(), &dims);
        let solid = resources::extruded_area_solid(&mut self.model, profile, &body_frame);
        let body = resources::shape_representation(&mut self.model, self.body_context, "Body", "SweptSolid", &[solid]);
        let axis = self.axis_representation(&wall.axis_points());
        let shape = resources::product_definition_shape(&mut self.model, &[axis, body]);
        let local = resources::local_placement(&mut self.model, Some(storey.placement), &placement);

        let wall_type = self.element_type(ElementKind::Wall, &spec.type_name, None)?;
        let element = self.add_element(IfcType::IfcWallStandardCase, &spec.type_name, local, shape, "STANDARD");
        self.contain_in_storey(&spec.storey, element)?;
        self.assign_type(ElementKind::Wall, &spec.type_name, element)?;

        match (layer_set, &spec.material_layer_set) {
            (Some(record), Some(set_name)) => {
                if (record.total_thickness - wall.thickness).abs() > 1e-9 {
                    tracing::warn!(
                        layer_set = %set_name,
                        layers = record.total_thickness,
                        wall = wall.thickness,
                        "Layer set thickness differs from wall thickness"
                    );
                }
                resources::styled_item(&mut self.model, Some(solid), &record.styles);
                self.associate_layer_set_usage(set_name, element)?;
                self.assign_layer_set(set_name, &[wall_type])?;
            }
            _ => {
                let material_name = format!("MAT_{}", spec.type_name);
                let material = self.material_or_create(&material_name, &SurfaceColour::GREY);
                resources::styled_item(&mut self.model, Some(solid), &[material.style]);
                self.assign_material(&material_name, &[element])?;
            }
        }

        tracing::debug!(
            id = %element,
            storey = %spec.storey,
            length = wall.length,
            thickness = wall.thickness,
            "Created wall"
        );
        Ok(element)
    }
}
