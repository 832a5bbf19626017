// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON element requests
//!
//! Requests follow the mapping-table export: an `ifcClass` tag plus
//! camelCase fields, points as `[x, y]` and rotations in degrees. Fields
//! the export does not carry (type and profile names, profile dimensions)
//! are optional and fall back to the defaults below, given in metres.

use ifc_writer_core::EntityId;
use ifc_writer_geometry::{Angle, CircleDimensions, IShapeDimensions};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorSpec;
use crate::config::WriterConfig;
use crate::elements::{BeamSpec, ColumnProfile, ColumnSpec, WallSpec};
use crate::error::Result;
use crate::material::LayerSetSpec;
use crate::spatial::StoreySpec;
use crate::writer::IfcWriter;

pub const DEFAULT_COLUMN_TYPE: &str = "Column";
pub const DEFAULT_COLUMN_PROFILE: &str = "H-300x300x10x15";
pub const DEFAULT_BEAM_TYPE: &str = "Beam";
pub const DEFAULT_BEAM_PROFILE: &str = "H-400x200x8x13";
pub const DEFAULT_WALL_TYPE: &str = "Wall";
pub const DEFAULT_WALL_PROFILE: &str = "Wall Profile";

fn default_column_section() -> Result<IShapeDimensions> {
    Ok(IShapeDimensions::new(0.3, 0.3, 0.01, 0.015, 0.018)?)
}

fn default_beam_section() -> Result<IShapeDimensions> {
    Ok(IShapeDimensions::new(0.2, 0.4, 0.008, 0.013, 0.016)?)
}

/// Profile dimensions: `{w, h, tw, tf, r}` or `{radius}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileRequest {
    IShape {
        w: f64,
        h: f64,
        tw: f64,
        tf: f64,
        #[serde(default)]
        r: f64,
    },
    Circle {
        radius: f64,
    },
}

impl ProfileRequest {
    pub fn to_column_profile(&self) -> Result<ColumnProfile> {
        Ok(match *self {
            ProfileRequest::IShape { w, h, tw, tf, r } => {
                ColumnProfile::IShape(IShapeDimensions::new(w, h, tw, tf, r)?)
            }
            ProfileRequest::Circle { radius } => ColumnProfile::Circle(CircleDimensions::new(radius)?),
        })
    }

    pub fn to_i_shape(&self) -> Result<IShapeDimensions> {
        match *self {
            ProfileRequest::IShape { w, h, tw, tf, r } => Ok(IShapeDimensions::new(w, h, tw, tf, r)?),
            ProfileRequest::Circle { radius } => Err(ifc_writer_geometry::Error::InvalidDimension {
                name: "profile",
                value: radius,
                reason: "beams need an I-shape profile",
            }
            .into()),
        }
    }
}

fn point(xy: [f64; 2]) -> Point2<f64> {
    Point2::new(xy[0], xy[1])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRequest {
    pub coordinate: [f64; 2],
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub target_storey: String,
    #[serde(default)]
    pub base_offset: f64,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfileRequest>,
}

impl ColumnRequest {
    pub fn to_spec(&self) -> Result<ColumnSpec> {
        let profile_name = self.profile_name.as_deref().unwrap_or(DEFAULT_COLUMN_PROFILE);
        let profile = match &self.profile {
            Some(p) => Some(p.to_column_profile()?),
            None if profile_name == DEFAULT_COLUMN_PROFILE => {
                Some(ColumnProfile::IShape(default_column_section()?))
            }
            None => None,
        };
        Ok(ColumnSpec {
            storey: self.target_storey.clone(),
            type_name: self.type_name.clone().unwrap_or_else(|| DEFAULT_COLUMN_TYPE.to_string()),
            profile_name: profile_name.to_string(),
            profile,
            coordinate: point(self.coordinate),
            height: self.height,
            rotation: Angle::from_degrees(self.rotation)?,
            base_offset: self.base_offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeamRequest {
    pub start_pt: [f64; 2],
    pub end_pt: [f64; 2],
    /// Height of the beam axis above the storey
    pub height: f64,
    pub target_storey: String,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfileRequest>,
}

impl BeamRequest {
    pub fn to_spec(&self) -> Result<BeamSpec> {
        let profile_name = self.profile_name.as_deref().unwrap_or(DEFAULT_BEAM_PROFILE);
        let profile = match &self.profile {
            Some(p) => Some(p.to_i_shape()?),
            None if profile_name == DEFAULT_BEAM_PROFILE => Some(default_beam_section()?),
            None => None,
        };
        Ok(BeamSpec {
            storey: self.target_storey.clone(),
            type_name: self.type_name.clone().unwrap_or_else(|| DEFAULT_BEAM_TYPE.to_string()),
            profile_name: profile_name.to_string(),
            profile,
            start: point(self.start_pt),
            end: point(self.end_pt),
            z_offset: self.height,
            rotation: Angle::from_degrees(self.rotation)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRequest {
    pub start_pt: [f64; 2],
    pub end_pt: [f64; 2],
    pub height: f64,
    #[serde(default)]
    pub z_offset: f64,
    pub thickness: f64,
    pub target_storey: String,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub material_layer_set: Option<String>,
}

impl WallRequest {
    pub fn to_spec(&self) -> WallSpec {
        WallSpec {
            storey: self.target_storey.clone(),
            type_name: self.type_name.clone().unwrap_or_else(|| DEFAULT_WALL_TYPE.to_string()),
            profile_name: self
                .profile_name
                .clone()
                .unwrap_or_else(|| DEFAULT_WALL_PROFILE.to_string()),
            start: point(self.start_pt),
            end: point(self.end_pt),
            thickness: self.thickness,
            height: self.height,
            z_offset: self.z_offset,
            material_layer_set: self.material_layer_set.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRequest {
    /// Wale centre
    pub coordinate: [f64; 2],
    #[serde(default)]
    pub z_offset: f64,
    #[serde(default)]
    pub rotation: f64,
    /// Degrees below horizontal
    pub dipping: f64,
    pub free_length: f64,
    pub fixed_length: f64,
    pub wale_width: f64,
    pub wale_depth: f64,
    pub target_storey: String,
    #[serde(default)]
    pub type_name: Option<String>,
}

impl AnchorRequest {
    pub fn to_spec(&self) -> Result<AnchorSpec> {
        let dipping = Angle::from_degrees(self.dipping)?;
        Ok(AnchorSpec {
            storey: self.target_storey.clone(),
            type_name: self
                .type_name
                .clone()
                .unwrap_or_else(|| AnchorSpec::default_type_name(self.free_length, self.fixed_length, dipping)),
            coordinate: point(self.coordinate),
            z_offset: self.z_offset,
            rotation: Angle::from_degrees(self.rotation)?,
            dipping,
            free_length: self.free_length,
            fixed_length: self.fixed_length,
            wale_width: self.wale_width,
            wale_depth: self.wale_depth,
        })
    }
}

/// One item of a building request, tagged by `ifcClass`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ifcClass")]
pub enum ElementRequest {
    #[serde(rename = "IfcBuildingStorey")]
    Storey(StoreySpec),
    #[serde(rename = "IfcColumn")]
    Column(ColumnRequest),
    #[serde(rename = "IfcBeam")]
    Beam(BeamRequest),
    #[serde(rename = "IfcWallStandardCase")]
    Wall(WallRequest),
    #[serde(rename = "IfcBuildingElementProxy")]
    Anchor(AnchorRequest),
}

impl ElementRequest {
    pub fn ifc_class(&self) -> &'static str {
        match self {
            ElementRequest::Storey(_) => "IfcBuildingStorey",
            ElementRequest::Column(_) => "IfcColumn",
            ElementRequest::Beam(_) => "IfcBeam",
            ElementRequest::Wall(_) => "IfcWallStandardCase",
            ElementRequest::Anchor(_) => "IfcBuildingElementProxy",
        }
    }
}

/// A whole model: optional writer settings, layer sets, then items in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRequest {
    #[serde(default)]
    pub project: Option<WriterConfig>,
    #[serde(default)]
    pub material_layer_sets: Vec<LayerSetSpec>,
    pub items: Vec<ElementRequest>,
}

impl IfcWriter {
    /// Build the entities for one request
    pub fn apply(&mut self, request: &ElementRequest) -> Result<EntityId> {
        match request {
            ElementRequest::Storey(spec) => self.create_storey(spec),
            ElementRequest::Column(req) => self.create_column(&req.to_spec()?),
            ElementRequest::Beam(req) => self.create_beam(&req.to_spec()?),
            ElementRequest::Wall(req) => self.create_wall(&req.to_spec()),
            ElementRequest::Anchor(req) => self.create_anchor(&req.to_spec()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ifc_writer_core::IfcType;

    const MAPPING_EXPORT: &str = r#"[
        {"ifcClass": "IfcBuildingStorey", "name": "1F", "height": 0.0},
        {"ifcClass": "IfcColumn", "coordinate": [0, 0], "height": 3.2, "rotation": 45, "targetStorey": "1F"},
        {"ifcClass": "IfcBeam", "startPt": [0, 0], "endPt": [6, 0], "height": 3.2, "targetStorey": "1F", "rotation": 0},
        {"ifcClass": "IfcWallStandardCase", "startPt": [0, 0], "endPt": [0, 5], "height": 3.2,
         "zOffset": 0, "thickness": 0.2, "targetStorey": "1F"}
    ]"#;

    #[test]
    fn test_parse_mapping_export() {
        let items: Vec<ElementRequest> = serde_json::from_str(MAPPING_EXPORT).unwrap();
        let classes: Vec<_> = items.iter().map(|i| i.ifc_class()).collect();
        assert_eq!(classes, vec!["IfcBuildingStorey", "IfcColumn", "IfcBeam", "IfcWallStandardCase"]);
        match &items[1] {
            ElementRequest::Column(c) => {
                assert_eq!(c.coordinate, [0.0, 0.0]);
                assert_eq!(c.rotation, 45.0);
                assert_eq!(c.type_name, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apply_mapping_export() {
        let items: Vec<ElementRequest> = serde_json::from_str(MAPPING_EXPORT).unwrap();
        let mut writer = IfcWriter::default();
        for item in &items {
            writer.apply(item).unwrap();
        }
        let model = writer.model();
        assert_eq!(model.count(IfcType::IfcBuildingStorey), 1);
        assert_eq!(model.count(IfcType::IfcColumn), 1);
        assert_eq!(model.count(IfcType::IfcBeam), 1);
        assert_eq!(model.count(IfcType::IfcWallStandardCase), 1);
        assert!(writer.context().profile(DEFAULT_COLUMN_PROFILE).is_some());
        assert!(writer.context().beam_type(DEFAULT_BEAM_TYPE).is_some());
    }

    #[test]
    fn test_profile_shapes() {
        let i: ProfileRequest = serde_json::from_str(r#"{"w": 0.2, "h": 0.4, "tw": 0.008, "tf": 0.013}"#).unwrap();
        assert!(matches!(i, ProfileRequest::IShape { r, .. } if r == 0.0));
        let c: ProfileRequest = serde_json::from_str(r#"{"radius": 0.25}"#).unwrap();
        assert!(matches!(c.to_column_profile().unwrap(), ColumnProfile::Circle(_)));
        assert!(c.to_i_shape().is_err());
    }

    #[test]
    fn test_named_profile_without_dimensions() {
        let req: ColumnRequest = serde_json::from_str(
            r#"{"coordinate": [1, 2], "height": 3, "targetStorey": "1F", "profileName": "Custom"}"#,
        )
        .unwrap();
        let spec = req.to_spec().unwrap();
        assert_eq!(spec.profile_name, "Custom");
        assert!(spec.profile.is_none());

        let mut writer = IfcWriter::default();
        writer.create_storey(&StoreySpec::new("1F", 0.0)).unwrap();
        assert!(matches!(
            writer.apply(&ElementRequest::Column(req)),
            Err(Error::MissingProfileDimensions(_))
        ));
    }

    #[test]
    fn test_invalid_rotation_and_profile() {
        let mut req: BeamRequest = serde_json::from_str(
            r#"{"startPt": [0, 0], "endPt": [1, 0], "height": 3, "targetStorey": "1F",
                "profile": {"w": 0.2, "h": 0.4, "tw": 0.3, "tf": 0.01}}"#,
        )
        .unwrap();
        assert!(matches!(req.to_spec(), Err(Error::Geometry(_))));

        req.profile = None;
        req.rotation = f64::INFINITY;
        assert!(matches!(
            req.to_spec(),
            Err(Error::Geometry(ifc_writer_geometry::Error::InvalidAngle(_)))
        ));
    }

    #[test]
    fn test_anchor_request() {
        let item: ElementRequest = serde_json::from_str(
            r#"{"ifcClass": "IfcBuildingElementProxy", "coordinate": [2, 0], "zOffset": -0.5,
                "dipping": 30, "freeLength": 6, "fixedLength": 5, "waleWidth": 0.3, "waleDepth": 0.3,
                "targetStorey": "1F"}"#,
        )
        .unwrap();
        assert_eq!(item.ifc_class(), "IfcBuildingElementProxy");

        let mut writer = IfcWriter::default();
        writer.create_storey(&StoreySpec::new("1F", 0.0)).unwrap();
        writer.apply(&item).unwrap();
        assert_eq!(writer.model().count(IfcType::IfcBuildingElementProxy), 1);
        assert!(writer.context().proxy_type("ANCHOR_6-5-30").is_some());
    }

    #[test]
    fn test_building_request() {
        let request: BuildingRequest = serde_json::from_str(
            r#"{
                "project": {"projectName": "Block B"},
                "materialLayerSets": [{"name": "EXT", "layers": [{"name": "Brick", "thickness": 0.2}]}],
                "items": [{"ifcClass": "IfcBuildingStorey", "name": "GF", "elevation": 0.0}]
            }"#,
        )
        .unwrap();
        assert_eq!(request.project.unwrap().project_name, "Block B");
        assert_eq!(request.material_layer_sets[0].layers.len(), 1);
        assert_eq!(request.items.len(), 1);
    }
}
