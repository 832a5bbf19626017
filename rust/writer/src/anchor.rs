// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground anchors through a wale
//!
//! An anchor is an `IfcBuildingElementProxy` typed by an
//! `IfcBuildingElementProxyType`. Its eight solids (free and fixed tendon,
//! bearing plate, cap and four rebars) live in one representation map that
//! every anchor with the same type and layout draws through a mapped item.

use ifc_writer_core::{EntityId, IfcType};
use ifc_writer_geometry::{
    anchor_layout, column_placement, Angle, AnchorDimensions, AnchorLayout, CircleDimensions,
    RectangleDimensions,
};
use nalgebra::Point2;

use crate::context::ProfileShape;
use crate::elements::ElementKind;
use crate::error::Result;
use crate::resources;
use crate::writer::IfcWriter;

pub const TENDON_PROFILE: &str = "TENDON_R100";
pub const PLATE_PROFILE: &str = "PLATE_280x300";
pub const CAP_PROFILE: &str = "CAP_R120";
/// Rebar profiles are `REBAR_1` to `REBAR_4`
pub const REBAR_PROFILE_PREFIX: &str = "REBAR";

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSpec {
    pub storey: String,
    pub type_name: String,
    /// Wale centre in storey plan coordinates
    pub coordinate: Point2<f64>,
    pub z_offset: f64,
    /// Counter-clockwise plan rotation of the anchor line from +X
    pub rotation: Angle,
    /// Downward angle from horizontal, in `[0, 90)` degrees
    pub dipping: Angle,
    pub free_length: f64,
    pub fixed_length: f64,
    pub wale_width: f64,
    pub wale_depth: f64,
}

impl AnchorSpec {
    /// `ANCHOR_<free>-<fixed>-<dipping>` with lengths in metres and the
    /// dipping in degrees
    pub fn default_type_name(free_length: f64, fixed_length: f64, dipping: Angle) -> String {
        format!("ANCHOR_{}-{}-{}", free_length, fixed_length, dipping.degrees())
    }

    fn map_key(&self) -> (String, [u64; 5]) {
        (
            self.type_name.clone(),
            [
                self.wale_width.to_bits(),
                self.wale_depth.to_bits(),
                self.dipping.radians().to_bits(),
                self.free_length.to_bits(),
                self.fixed_length.to_bits(),
            ],
        )
    }
}

impl IfcWriter {
    fn anchor_circle(&mut self, name: &str, centre: Point2<f64>, dims: CircleDimensions) -> EntityId {
        let shape = ProfileShape::Circle(dims);
        if let Some(id) = self.cached_profile(name, Some(shape)) {
            return id;
        }
        let id = resources::circle_profile(&mut self.model, name, centre, &dims);
        self.register_profile(name, id, shape);
        id
    }

    fn anchor_rectangle(&mut self, name: &str, dims: RectangleDimensions) -> EntityId {
        let shape = ProfileShape::Rectangle(dims);
        if let Some(id) = self.cached_profile(name, Some(shape)) {
            return id;
        }
        let id = resources::rectangle_profile(&mut self.model, name, Point2::origin(), &dims);
        self.register_profile(name, id, shape);
        id
    }

    /// Solids of one anchor, tendon first
    fn anchor_solids(&mut self, layout: &AnchorLayout, dims: &AnchorDimensions) -> Vec<EntityId> {
        let tendon = self.anchor_circle(TENDON_PROFILE, Point2::origin(), dims.tendon);
        let plate = self.anchor_rectangle(PLATE_PROFILE, dims.plate);
        let cap = self.anchor_circle(CAP_PROFILE, Point2::origin(), dims.cap);

        let mut solids = vec![
            resources::extruded_area_solid(&mut self.model, tendon, &layout.free),
            resources::extruded_area_solid(&mut self.model, tendon, &layout.fixed),
            resources::extruded_area_solid(&mut self.model, plate, &layout.plate),
            resources::extruded_area_solid(&mut self.model, cap, &layout.cap),
        ];
        for (i, centre) in dims.rebar_centres().into_iter().enumerate() {
            let name = format!("{}_{}", REBAR_PROFILE_PREFIX, i + 1);
            let rebar = self.anchor_circle(&name, centre, dims.rebar);
            solids.push(resources::extruded_area_solid(&mut self.model, rebar, &layout.rebar));
        }
        solids
    }

    /// Add a ground anchor through the wale centred at `spec.coordinate`
    ///
    /// Nothing is written when the storey is unknown or the layout is
    /// invalid.
    pub fn create_anchor(&mut self, spec: &AnchorSpec) -> Result<EntityId> {
        let storey = *self.context.storey(&spec.storey)?;
        let placement = column_placement(spec.coordinate, spec.z_offset, spec.rotation)?;
        let dims = AnchorDimensions::default();
        let layout = anchor_layout(
            spec.wale_width,
            spec.wale_depth,
            spec.dipping,
            spec.free_length,
            spec.fixed_length,
            &dims,
        )?;

        let key = spec.map_key();
        let map = match self.context.anchor_maps.get(&key) {
            Some(map) => *map,
            None => {
                let solids = self.anchor_solids(&layout, &dims);
                let representation = resources::shape_representation(
                    &mut self.model,
                    self.body_context,
                    "Body",
                    "SweptSolid",
                    &solids,
                );
                let map = self.representation_map(representation);
                self.context.anchor_maps.insert(key, map);
                map
            }
        };
        self.element_type(ElementKind::Proxy, &spec.type_name, Some(map))?;

        let shape = self.mapped_shape(map);
        let local = resources::local_placement(&mut self.model, Some(storey.placement), &placement);
        let anchor = self.add_element(
            IfcType::IfcBuildingElementProxy,
            &spec.type_name,
            local,
            shape,
            "NOTDEFINED",
        );
        self.contain_in_storey(&spec.storey, anchor)?;
        self.assign_type(ElementKind::Proxy, &spec.type_name, anchor)?;

        tracing::debug!(
            id = %anchor,
            storey = %spec.storey,
            dipping = spec.dipping.degrees(),
            free = spec.free_length,
            fixed = spec.fixed_length,
            "Created anchor"
        );
        Ok(anchor)
    }
}
