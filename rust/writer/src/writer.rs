// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model initialisation and output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use ifc_writer_core::{step, AttributeValue, EntityId, IfcType, StepHeader, StepModel};
use ifc_writer_geometry::PlacementResult;
use nalgebra::{Point3, Vector2, Vector3};

use crate::config::WriterConfig;
use crate::context::WriterContext;
use crate::error::Result;
use crate::resources;

/// Builds one IFC4 model: Project → Site → Building → Storeys → Elements
///
/// Construction writes the ownership, unit and representation context
/// entities every product refers to. Storeys, elements and materials are
/// added through the `create_*` methods and looked up by name through the
/// [`WriterContext`].
#[derive(Debug)]
pub struct IfcWriter {
    pub(crate) model: StepModel,
    pub(crate) context: WriterContext,
    config: WriterConfig,
    created_at: DateTime<Utc>,
    pub(crate) owner_history: EntityId,
    pub(crate) model_context: EntityId,
    pub(crate) body_context: EntityId,
    pub(crate) axis_context: EntityId,
    project: EntityId,
    site: EntityId,
    building: EntityId,
    pub(crate) building_placement: EntityId,
    /// Building → storeys aggregation, created with the first storey
    pub(crate) storey_aggregation: Option<EntityId>,
}

impl IfcWriter {
    pub fn new(config: WriterConfig) -> Self {
        let created_at = Utc::now();
        let mut model = StepModel::new();

        let owner_history = Self::add_owner_history(&mut model, &config, created_at);
        let units = Self::add_units(&mut model, &config);

        // Representation contexts
        let world = resources::axis2_placement_3d(&mut model, &PlacementResult::identity());
        let true_north = resources::direction_2d(&mut model, Vector2::y());
        let model_context = model.add(
            IfcType::IfcGeometricRepresentationContext,
            vec![
                AttributeValue::Null,
                "Model".into(),
                AttributeValue::Integer(3),
                config.precision.into(),
                world.into(),
                true_north.into(),
            ],
        );
        let body_context = Self::add_sub_context(&mut model, model_context, "Body", "MODEL_VIEW");
        let axis_context = Self::add_sub_context(&mut model, model_context, "Axis", "GRAPH_VIEW");

        let mut project_attrs = resources::root_attributes(owner_history, Some(config.project_name.as_str()));
        project_attrs.extend([
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::refs([model_context]),
            units.into(),
        ]);
        let project = model.add(IfcType::IfcProject, project_attrs);

        let site_placement = resources::local_placement(&mut model, None, &PlacementResult::identity());
        let mut site_attrs = resources::root_attributes(owner_history, Some(config.site_name.as_str()));
        site_attrs.extend([
            AttributeValue::Null,
            site_placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Enum("ELEMENT"),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ]);
        let site = model.add(IfcType::IfcSite, site_attrs);

        let building_placement =
            resources::local_placement(&mut model, Some(site_placement), &PlacementResult::identity());
        let mut building_attrs = resources::root_attributes(owner_history, Some(config.building_name.as_str()));
        building_attrs.extend([
            AttributeValue::Null,
            building_placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Enum("ELEMENT"),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ]);
        let building = model.add(IfcType::IfcBuilding, building_attrs);

        let mut writer = Self {
            model,
            context: WriterContext::new(),
            config,
            created_at,
            owner_history,
            model_context,
            body_context,
            axis_context,
            project,
            site,
            building,
            building_placement,
            storey_aggregation: None,
        };
        writer.aggregate(None, project, &[site]);
        writer.aggregate(None, site, &[building]);

        tracing::debug!(
            project = %writer.config.project_name,
            site = %writer.config.site_name,
            building = %writer.config.building_name,
            entities = writer.model.len(),
            "Initialised IFC model"
        );
        writer
    }

    fn add_owner_history(model: &mut StepModel, config: &WriterConfig, created_at: DateTime<Utc>) -> EntityId {
        let person = model.add(
            IfcType::IfcPerson,
            vec![
                AttributeValue::Null,
                config.author.as_str().into(),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
            ],
        );
        let organization = model.add(
            IfcType::IfcOrganization,
            vec![
                AttributeValue::Null,
                config.organization.as_str().into(),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
            ],
        );
        let person_and_org = model.add(
            IfcType::IfcPersonAndOrganization,
            vec![person.into(), organization.into(), AttributeValue::Null],
        );
        let application = model.add(
            IfcType::IfcApplication,
            vec![
                organization.into(),
                config.application_version.as_str().into(),
                config.application_name.as_str().into(),
                config.application_name.as_str().into(),
            ],
        );
        model.add(
            IfcType::IfcOwnerHistory,
            vec![
                person_and_org.into(),
                application.into(),
                AttributeValue::Null,
                AttributeValue::Enum("ADDED"),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Integer(created_at.timestamp()),
            ],
        )
    }

    fn add_units(model: &mut StepModel, config: &WriterConfig) -> EntityId {
        let units: Vec<EntityId> = config
            .unique_units()
            .iter()
            .map(|unit| {
                model.add(
                    IfcType::IfcSIUnit,
                    vec![
                        AttributeValue::Derived,
                        AttributeValue::Enum(unit.unit_type.as_str()),
                        unit.prefix.map(|p| AttributeValue::Enum(p.as_str())).into(),
                        AttributeValue::Enum(unit.unit_type.si_name()),
                    ],
                )
            })
            .collect();
        model.add(IfcType::IfcUnitAssignment, vec![AttributeValue::refs(units)])
    }

    fn add_sub_context(model: &mut StepModel, parent: EntityId, identifier: &str, view: &'static str) -> EntityId {
        model.add(
            IfcType::IfcGeometricRepresentationSubContext,
            vec![
                identifier.into(),
                "Model".into(),
                AttributeValue::Derived,
                AttributeValue::Derived,
                AttributeValue::Derived,
                AttributeValue::Derived,
                parent.into(),
                AttributeValue::Null,
                AttributeValue::Enum(view),
                AttributeValue::Null,
            ],
        )
    }

    /// `IfcRelAggregates` from `relating` to `related`
    pub(crate) fn aggregate(&mut self, name: Option<&str>, relating: EntityId, related: &[EntityId]) -> EntityId {
        let mut attrs = resources::root_attributes(self.owner_history, name);
        attrs.extend([relating.into(), AttributeValue::refs(related.iter().copied())]);
        self.model.add(IfcType::IfcRelAggregates, attrs)
    }

    /// Append `related` to the list at `index` of `relation`, or create the
    /// relation with `create` when there is none yet
    ///
    /// Objects already in the list are not added twice.
    pub(crate) fn grow_relation(
        &mut self,
        relation: Option<EntityId>,
        index: usize,
        related: EntityId,
        create: impl FnOnce(&mut Self) -> EntityId,
    ) -> Result<EntityId> {
        let Some(rel) = relation else {
            return Ok(create(self));
        };
        let listed = self
            .model
            .get(rel)
            .and_then(|e| e.get(index))
            .and_then(|v| v.as_list())
            .is_some_and(|items| items.iter().any(|v| v.as_entity_ref() == Some(related)));
        if !listed {
            self.model.push_to_list(rel, index, related.into())?;
        }
        Ok(rel)
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn model(&self) -> &StepModel {
        &self.model
    }

    pub fn context(&self) -> &WriterContext {
        &self.context
    }

    pub fn project(&self) -> EntityId {
        self.project
    }

    pub fn site(&self) -> EntityId {
        self.site
    }

    pub fn building(&self) -> EntityId {
        self.building
    }

    /// Placement of a storey at `elevation` above the building origin
    pub(crate) fn storey_placement(&mut self, elevation: f64) -> EntityId {
        let placement = PlacementResult::new(Point3::new(0.0, 0.0, elevation), Vector3::z(), Vector3::x());
        resources::local_placement(&mut self.model, Some(self.building_placement), &placement)
    }

    /// STEP header for a file named `file_name`
    pub fn header(&self, file_name: &str) -> StepHeader {
        let mut header = StepHeader::new(file_name).with_timestamp(self.created_at);
        header.author = self.config.author.clone();
        header.organization = self.config.organization.clone();
        header.originating_system = format!(
            "{} {}",
            self.config.application_name, self.config.application_version
        );
        header
    }

    pub fn to_step_string(&self) -> Result<String> {
        Ok(step::to_step_string(&self.header(""), &self.model)?)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, file_name: &str) -> Result<()> {
        step::write_step(writer, &self.header(file_name), &self.model)?;
        Ok(())
    }

    /// Write the model to `path` as an IFC file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out, &file_name)?;
        out.flush()?;
        tracing::info!(path = %path.display(), entities = self.model.len(), "Saved IFC file");
        Ok(())
    }
}

impl Default for IfcWriter {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_writer_core::{SiPrefix, UnitType};

    #[test]
    fn test_initial_hierarchy() {
        let writer = IfcWriter::default();
        let model = writer.model();
        assert_eq!(model.count(IfcType::IfcProject), 1);
        assert_eq!(model.count(IfcType::IfcSite), 1);
        assert_eq!(model.count(IfcType::IfcBuilding), 1);
        assert_eq!(model.count(IfcType::IfcRelAggregates), 2);
        assert_eq!(model.count(IfcType::IfcGeometricRepresentationSubContext), 2);

        let project = model.get(writer.project()).unwrap();
        assert_eq!(project.get_string(2), Some("Default Project"));

        let rels = model.by_type(IfcType::IfcRelAggregates);
        let first = model.get(rels[0]).unwrap();
        assert_eq!(first.get_ref(4), Some(writer.project()));
        assert_eq!(first.get(5).unwrap().as_list().unwrap()[0].as_entity_ref(), Some(writer.site()));
        let second = model.get(rels[1]).unwrap();
        assert_eq!(second.get_ref(4), Some(writer.site()));
    }

    #[test]
    fn test_units_written() {
        let config = WriterConfig::default().with_length_prefix(SiPrefix::Milli);
        let writer = IfcWriter::new(config);
        let model = writer.model();
        assert_eq!(model.count(IfcType::IfcSIUnit), 4);

        let length = model
            .by_type(IfcType::IfcSIUnit)
            .iter()
            .filter_map(|id| model.get(*id))
            .find(|u| u.get(1).and_then(|v| v.as_enum()) == Some(UnitType::LengthUnit.as_str()))
            .unwrap();
        assert_eq!(length.get(2).and_then(|v| v.as_enum()), Some("MILLI"));
        assert_eq!(length.get(3).and_then(|v| v.as_enum()), Some("METRE"));
    }

    #[test]
    fn test_step_output() {
        let mut config = WriterConfig::default();
        config.project_name = "Tower 'A'".to_string();
        let text = IfcWriter::new(config).to_step_string().unwrap();
        assert!(text.starts_with("ISO-10303-21;"));
        assert!(text.contains("FILE_SCHEMA(('IFC4'));"));
        assert!(text.contains("'Tower ''A'''"));
        assert!(text.contains("IFCGEOMETRICREPRESENTATIONSUBCONTEXT('Body','Model',*,*,*,*,"));
        assert!(text.contains(".MODEL_VIEW.,$);"));
        assert!(text.contains("IFCSIUNIT(*,.PLANEANGLEUNIT.,$,.RADIAN.);"));
    }
}
