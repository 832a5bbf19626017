// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Styled materials, material layer sets and their associations

use ifc_writer_core::{AttributeValue, EntityId, IfcType};
use serde::{Deserialize, Serialize};

use crate::context::{LayerSetRecord, MaterialRecord};
use crate::error::{Error, Result};
use crate::resources::{self, SurfaceColour};
use crate::writer::IfcWriter;

/// Index of `RelatedObjects` in `IfcRelAssociatesMaterial`
const ASSOCIATED_RELATED: usize = 4;

fn default_layer_colour() -> SurfaceColour {
    SurfaceColour::GREY
}

/// One layer of a material layer set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayerSpec {
    /// Material name; existing materials are reused
    pub name: String,
    pub thickness: f64,
    #[serde(rename = "rgba", default = "default_layer_colour")]
    pub colour: SurfaceColour,
}

impl MaterialLayerSpec {
    pub fn new(name: impl Into<String>, thickness: f64, colour: SurfaceColour) -> Self {
        Self {
            name: name.into(),
            thickness,
            colour,
        }
    }
}

/// Named material layer set as it appears in a building request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSetSpec {
    pub name: String,
    pub layers: Vec<MaterialLayerSpec>,
}

impl IfcWriter {
    fn add_material(&mut self, name: &str, colour: &SurfaceColour) -> MaterialRecord {
        let style = resources::surface_style(&mut self.model, &format!("SRF_{}", name), colour);
        let styled = resources::styled_item(&mut self.model, None, &[style]);
        let representation = self.model.add(
            IfcType::IfcStyledRepresentation,
            vec![
                self.model_context.into(),
                "Style".into(),
                "Material".into(),
                AttributeValue::refs([styled]),
            ],
        );
        let material = self.model.add(
            IfcType::IfcMaterial,
            vec![name.into(), AttributeValue::Null, AttributeValue::Null],
        );
        self.model.add(
            IfcType::IfcMaterialDefinitionRepresentation,
            vec![
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::refs([representation]),
                material.into(),
            ],
        );

        let record = MaterialRecord {
            material,
            style,
            association: None,
        };
        self.context.materials.insert(name.to_string(), record);
        tracing::debug!(material = %name, id = %material, "Created material");
        record
    }

    /// Existing material `name`, or a new one in `colour`
    pub(crate) fn material_or_create(&mut self, name: &str, colour: &SurfaceColour) -> MaterialRecord {
        match self.context.material(name) {
            Some(record) => *record,
            None => self.add_material(name, colour),
        }
    }

    /// Add a material with a surface colour
    pub fn create_material(&mut self, name: &str, colour: &SurfaceColour) -> Result<EntityId> {
        if self.context.material(name).is_some() {
            return Err(Error::duplicate("Material", name));
        }
        Ok(self.add_material(name, colour).material)
    }

    /// Add a layer set and its usage
    ///
    /// Layers are stacked in order on the positive side of the wall
    /// reference line. Layer materials are created on first use.
    pub fn create_material_layer_set(&mut self, name: &str, layers: &[MaterialLayerSpec]) -> Result<EntityId> {
        if self.context.layer_sets.contains_key(name) {
            return Err(Error::duplicate("MaterialLayerSet", name));
        }
        if layers.is_empty() {
            return Err(Error::EmptyLayerSet(name.to_string()));
        }
        for layer in layers {
            if !(layer.thickness.is_finite() && layer.thickness > 0.0) {
                return Err(ifc_writer_geometry::Error::InvalidDimension {
                    name: "layer thickness",
                    value: layer.thickness,
                    reason: "must be positive",
                }
                .into());
            }
        }

        let mut layer_ids = Vec::with_capacity(layers.len());
        let mut styles = Vec::with_capacity(layers.len());
        for layer in layers {
            let material = self.material_or_create(&layer.name, &layer.colour);
            let id = self.model.add(
                IfcType::IfcMaterialLayer,
                vec![
                    material.material.into(),
                    layer.thickness.into(),
                    AttributeValue::Null,
                    layer.name.as_str().into(),
                    AttributeValue::Null,
                    AttributeValue::Null,
                    AttributeValue::Null,
                ],
            );
            layer_ids.push(id);
            styles.push(material.style);
        }

        let layer_set = self.model.add(
            IfcType::IfcMaterialLayerSet,
            vec![AttributeValue::refs(layer_ids), name.into(), AttributeValue::Null],
        );
        let usage = self.model.add(
            IfcType::IfcMaterialLayerSetUsage,
            vec![
                layer_set.into(),
                AttributeValue::Enum("AXIS2"),
                AttributeValue::Enum("POSITIVE"),
                0.0.into(),
                AttributeValue::Null,
            ],
        );

        let total_thickness = layers.iter().map(|l| l.thickness).sum();
        self.context.layer_sets.insert(
            name.to_string(),
            LayerSetRecord {
                layer_set,
                usage,
                styles,
                total_thickness,
                usage_association: None,
                set_association: None,
            },
        );
        tracing::debug!(layer_set = %name, layers = layers.len(), total_thickness, "Created material layer set");
        Ok(layer_set)
    }

    fn associate(&mut self, relation: Option<EntityId>, relating: EntityId, element: EntityId) -> Result<EntityId> {
        let owner_history = self.owner_history;
        self.grow_relation(relation, ASSOCIATED_RELATED, element, |w| {
            let mut attrs = resources::root_attributes(owner_history, None);
            attrs.extend([AttributeValue::refs([element]), relating.into()]);
            w.model.add(IfcType::IfcRelAssociatesMaterial, attrs)
        })
    }

    /// Associate elements (or types) with a material or material layer set
    ///
    /// Materials win when a material and a layer set share `name`; use
    /// [`IfcWriter::assign_layer_set`] to pick the layer set.
    pub fn assign_material(&mut self, name: &str, elements: &[EntityId]) -> Result<()> {
        let Some(record) = self.context.material(name).copied() else {
            if self.context.layer_sets.contains_key(name) {
                return self.assign_layer_set(name, elements);
            }
            return Err(Error::not_found("Material", name));
        };
        let mut relation = record.association;
        for &element in elements {
            relation = Some(self.associate(relation, record.material, element)?);
        }
        if let Some(m) = self.context.materials.get_mut(name) {
            m.association = relation;
        }
        Ok(())
    }

    /// Associate elements (or types) with material layer set `name`
    pub fn assign_layer_set(&mut self, name: &str, elements: &[EntityId]) -> Result<()> {
        let record = self.context.layer_set(name)?;
        let (layer_set, mut relation) = (record.layer_set, record.set_association);
        for &element in elements {
            relation = Some(self.associate(relation, layer_set, element)?);
        }
        if let Some(set) = self.context.layer_sets.get_mut(name) {
            set.set_association = relation;
        }
        Ok(())
    }

    /// Associate a wall occurrence with the usage of layer set `name`
    pub(crate) fn associate_layer_set_usage(&mut self, name: &str, element: EntityId) -> Result<()> {
        let record = self.context.layer_set(name)?;
        let (usage, relation) = (record.usage, record.usage_association);
        let relation = self.associate(relation, usage, element)?;
        if let Some(set) = self.context.layer_sets.get_mut(name) {
            set.usage_association = Some(relation);
        }
        Ok(())
    }
}
