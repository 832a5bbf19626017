// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building storeys and spatial containment

use ifc_writer_core::{AttributeValue, EntityId, IfcType};
use serde::{Deserialize, Serialize};

use crate::context::StoreyRecord;
use crate::error::{Error, Result};
use crate::resources;
use crate::writer::IfcWriter;

/// Index of `RelatedObjects` in `IfcRelAggregates`
const AGGREGATE_RELATED: usize = 5;
/// Index of `RelatedElements` in `IfcRelContainedInSpatialStructure`
const CONTAINED_RELATED: usize = 4;

/// A named storey at an elevation above the building origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreySpec {
    pub name: String,
    #[serde(alias = "height")]
    pub elevation: f64,
}

impl StoreySpec {
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
        }
    }
}

impl IfcWriter {
    /// Add a storey and aggregate it into the building
    ///
    /// Storey names are unique within a model.
    pub fn create_storey(&mut self, spec: &StoreySpec) -> Result<EntityId> {
        if self.context.has_storey(&spec.name) {
            return Err(Error::duplicate("Storey", &spec.name));
        }
        if !spec.elevation.is_finite() {
            return Err(ifc_writer_geometry::Error::InvalidDimension {
                name: "elevation",
                value: spec.elevation,
                reason: "must be finite",
            }
            .into());
        }

        let placement = self.storey_placement(spec.elevation);
        let mut attrs = resources::root_attributes(self.owner_history, Some(spec.name.as_str()));
        attrs.extend([
            AttributeValue::Null,
            placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Enum("ELEMENT"),
            spec.elevation.into(),
        ]);
        let storey = self.model.add(IfcType::IfcBuildingStorey, attrs);

        let building = self.building();
        let aggregation = self.grow_relation(self.storey_aggregation, AGGREGATE_RELATED, storey, |w| {
            w.aggregate(Some("BuildingContainer"), building, &[storey])
        })?;
        self.storey_aggregation = Some(aggregation);

        self.context.storeys.insert(
            spec.name.clone(),
            StoreyRecord {
                entity: storey,
                placement,
                elevation: spec.elevation,
                containment: None,
            },
        );
        self.context.storey_order.push(spec.name.clone());

        tracing::debug!(storey = %spec.name, elevation = spec.elevation, id = %storey, "Created storey");
        Ok(storey)
    }

    /// Add several storeys, skipping any whose name is already taken
    ///
    /// Returns the ids of the storeys that were created.
    pub fn create_storeys(&mut self, specs: &[StoreySpec]) -> Vec<EntityId> {
        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.create_storey(spec) {
                Ok(id) => created.push(id),
                Err(e) => tracing::warn!(storey = %spec.name, error = %e, "Skipped storey"),
            }
        }
        created
    }

    /// Place `element` in the named storey
    pub(crate) fn contain_in_storey(&mut self, storey_name: &str, element: EntityId) -> Result<()> {
        let record = *self.context.storey(storey_name)?;
        let owner_history = self.owner_history;
        let relation = self.grow_relation(record.containment, CONTAINED_RELATED, element, |w| {
            let mut attrs = resources::root_attributes(owner_history, Some(storey_name));
            attrs.extend([AttributeValue::refs([element]), record.entity.into()]);
            w.model.add(IfcType::IfcRelContainedInSpatialStructure, attrs)
        })?;
        self.context.storey_mut(storey_name)?.containment = Some(relation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storeys_share_one_aggregation() {
        let mut writer = IfcWriter::default();
        let ground = writer.create_storey(&StoreySpec::new("1F", 0.0)).unwrap();
        let first = writer.create_storey(&StoreySpec::new("2F", 3.5)).unwrap();

        let model = writer.model();
        assert_eq!(model.count(IfcType::IfcBuildingStorey), 2);
        // Project→Site, Site→Building, Building→Storeys
        assert_eq!(model.count(IfcType::IfcRelAggregates), 3);

        let rel = model.get(*model.by_type(IfcType::IfcRelAggregates).last().unwrap()).unwrap();
        assert_eq!(rel.get_ref(4), Some(writer.building()));
        let related: Vec<_> = rel.get(5).unwrap().as_list().unwrap().iter().filter_map(|v| v.as_entity_ref()).collect();
        assert_eq!(related, vec![ground, first]);
    }

    #[test]
    fn test_storey_elevation_and_placement() {
        let mut writer = IfcWriter::default();
        let id = writer.create_storey(&StoreySpec::new("2F", 3.5)).unwrap();
        let storey = writer.model().get(id).unwrap();
        assert_eq!(storey.get_float(9), Some(3.5));

        let record = *writer.context().storey("2F").unwrap();
        assert_eq!(record.elevation, 3.5);
        let placement = writer.model().get(record.placement).unwrap();
        assert_eq!(placement.get_ref(0), Some(writer.building_placement));
    }

    #[test]
    fn test_duplicate_storey_rejected() {
        let mut writer = IfcWriter::default();
        writer.create_storey(&StoreySpec::new("1F", 0.0)).unwrap();
        let err = writer.create_storey(&StoreySpec::new("1F", 4.0)).unwrap_err();
        assert!(matches!(err, Error::Duplicate { kind: "Storey", .. }));
        assert_eq!(writer.model().count(IfcType::IfcBuildingStorey), 1);
    }

    #[test]
    fn test_create_storeys_skips_duplicates() {
        let mut writer = IfcWriter::default();
        let created = writer.create_storeys(&[
            StoreySpec::new("B1", -3.0),
            StoreySpec::new("1F", 0.0),
            StoreySpec::new("B1", -6.0),
        ]);
        assert_eq!(created.len(), 2);
        let names: Vec<_> = writer.context().storey_names().collect();
        assert_eq!(names, vec!["B1", "1F"]);
    }

    #[test]
    fn test_non_finite_elevation() {
        let mut writer = IfcWriter::default();
        assert!(matches!(
            writer.create_storey(&StoreySpec::new("X", f64::NAN)),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn test_storey_from_json_height() {
        let spec: StoreySpec = serde_json::from_str(r#"{"name": "3F", "height": 7.0}"#).unwrap();
        assert_eq!(spec, StoreySpec::new("3F", 7.0));
    }
}
