// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Name registries for entities that are looked up or reused by name

use ifc_writer_core::EntityId;
use ifc_writer_geometry::{CircleDimensions, IShapeDimensions, RectangleDimensions};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// A storey and the relations that grow as elements are added to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreyRecord {
    pub entity: EntityId,
    /// `IfcLocalPlacement` that element placements are relative to
    pub placement: EntityId,
    pub elevation: f64,
    pub(crate) containment: Option<EntityId>,
}

/// Dimensions a named profile was written with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileShape {
    IShape(IShapeDimensions),
    Circle(CircleDimensions),
    Rectangle(RectangleDimensions),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRecord {
    pub entity: EntityId,
    pub shape: ProfileShape,
}

/// An element type object and its `IfcRelDefinesByType`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeRecord {
    pub entity: EntityId,
    pub(crate) relation: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialRecord {
    pub material: EntityId,
    /// `IfcSurfaceStyle` shown for the material
    pub style: EntityId,
    pub(crate) association: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSetRecord {
    pub layer_set: EntityId,
    pub usage: EntityId,
    /// One surface style per layer, in layer order
    pub styles: Vec<EntityId>,
    pub total_thickness: f64,
    pub(crate) usage_association: Option<EntityId>,
    pub(crate) set_association: Option<EntityId>,
}

/// Registry of named entities owned by one writer
#[derive(Debug, Default, Clone)]
pub struct WriterContext {
    pub(crate) storeys: FxHashMap<String, StoreyRecord>,
    pub(crate) storey_order: Vec<String>,
    pub(crate) profiles: FxHashMap<String, ProfileRecord>,
    pub(crate) column_types: FxHashMap<String, TypeRecord>,
    pub(crate) beam_types: FxHashMap<String, TypeRecord>,
    pub(crate) wall_types: FxHashMap<String, TypeRecord>,
    pub(crate) proxy_types: FxHashMap<String, TypeRecord>,
    /// Column representation maps keyed by profile name and height bits
    pub(crate) column_maps: FxHashMap<(String, u64), EntityId>,
    /// Anchor representation maps keyed by type name and layout input bits
    pub(crate) anchor_maps: FxHashMap<(String, [u64; 5]), EntityId>,
    pub(crate) materials: FxHashMap<String, MaterialRecord>,
    pub(crate) layer_sets: FxHashMap<String, LayerSetRecord>,
}

impl WriterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storey(&self, name: &str) -> Result<&StoreyRecord> {
        self.storeys
            .get(name)
            .ok_or_else(|| Error::not_found("Storey", name))
    }

    pub(crate) fn storey_mut(&mut self, name: &str) -> Result<&mut StoreyRecord> {
        self.storeys
            .get_mut(name)
            .ok_or_else(|| Error::not_found("Storey", name))
    }

    pub fn has_storey(&self, name: &str) -> bool {
        self.storeys.contains_key(name)
    }

    /// Storey names in creation order
    pub fn storey_names(&self) -> impl Iterator<Item = &str> {
        self.storey_order.iter().map(String::as_str)
    }

    pub fn profile(&self, name: &str) -> Option<EntityId> {
        self.profiles.get(name).map(|p| p.entity)
    }

    pub fn profile_shape(&self, name: &str) -> Option<ProfileShape> {
        self.profiles.get(name).map(|p| p.shape)
    }

    pub fn column_type(&self, name: &str) -> Option<EntityId> {
        self.column_types.get(name).map(|t| t.entity)
    }

    pub fn beam_type(&self, name: &str) -> Option<EntityId> {
        self.beam_types.get(name).map(|t| t.entity)
    }

    pub fn wall_type(&self, name: &str) -> Option<EntityId> {
        self.wall_types.get(name).map(|t| t.entity)
    }

    pub fn proxy_type(&self, name: &str) -> Option<EntityId> {
        self.proxy_types.get(name).map(|t| t.entity)
    }

    pub fn material(&self, name: &str) -> Option<&MaterialRecord> {
        self.materials.get(name)
    }

    pub fn layer_set(&self, name: &str) -> Result<&LayerSetRecord> {
        self.layer_sets
            .get(name)
            .ok_or_else(|| Error::not_found("MaterialLayerSet", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_storey() {
        let ctx = WriterContext::new();
        assert!(!ctx.has_storey("1F"));
        match ctx.storey("1F") {
            Err(Error::NotFound { kind, name }) => {
                assert_eq!(kind, "Storey");
                assert_eq!(name, "1F");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let mut ctx = WriterContext::new();
        let circle = ProfileShape::Circle(CircleDimensions { radius: 0.15 });
        ctx.profiles.insert(
            "D300".to_string(),
            ProfileRecord {
                entity: EntityId(7),
                shape: circle,
            },
        );
        ctx.column_types.insert(
            "C1".to_string(),
            TypeRecord {
                entity: EntityId(9),
                relation: None,
            },
        );
        assert_eq!(ctx.profile("D300"), Some(EntityId(7)));
        assert_eq!(ctx.profile_shape("D300"), Some(circle));
        assert_eq!(ctx.column_type("C1"), Some(EntityId(9)));
        assert_eq!(ctx.beam_type("C1"), None);
        assert!(ctx.layer_set("LS").is_err());
    }
}
