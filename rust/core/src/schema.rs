// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! The IFC4 entity names this crate writes, as an enum instead of strings.

use std::fmt;

macro_rules! ifc_types {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal ),+ $(,)?) => {
        /// IFC4 entity types known to the writer
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum IfcType {
            $( $(#[$meta])* $variant, )+
        }

        impl IfcType {
            /// Every known type, in declaration order
            pub const ALL: &'static [IfcType] = &[ $( IfcType::$variant, )+ ];

            /// Parse an upper-case STEP entity name
            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $( $name => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Upper-case STEP entity name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }
        }
    };
}

ifc_types! {
    // Actors and ownership
    IfcPerson => "IFCPERSON",
    IfcOrganization => "IFCORGANIZATION",
    IfcPersonAndOrganization => "IFCPERSONANDORGANIZATION",
    IfcApplication => "IFCAPPLICATION",
    IfcOwnerHistory => "IFCOWNERHISTORY",

    // Units
    IfcSIUnit => "IFCSIUNIT",
    IfcUnitAssignment => "IFCUNITASSIGNMENT",

    // Contexts
    IfcGeometricRepresentationContext => "IFCGEOMETRICREPRESENTATIONCONTEXT",
    IfcGeometricRepresentationSubContext => "IFCGEOMETRICREPRESENTATIONSUBCONTEXT",

    // Geometry
    IfcCartesianPoint => "IFCCARTESIANPOINT",
    IfcDirection => "IFCDIRECTION",
    IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
    IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
    IfcLocalPlacement => "IFCLOCALPLACEMENT",
    IfcCartesianTransformationOperator3D => "IFCCARTESIANTRANSFORMATIONOPERATOR3D",

    // Curve types
    IfcPolyline => "IFCPOLYLINE",
    IfcCircle => "IFCCIRCLE",
    IfcTrimmedCurve => "IFCTRIMMEDCURVE",
    IfcCompositeCurve => "IFCCOMPOSITECURVE",
    IfcCompositeCurveSegment => "IFCCOMPOSITECURVESEGMENT",

    // Profiles and solids
    IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
    IfcCircleProfileDef => "IFCCIRCLEPROFILEDEF",
    IfcIShapeProfileDef => "IFCISHAPEPROFILEDEF",
    IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
    IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",

    // Representations
    IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
    IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
    IfcRepresentationMap => "IFCREPRESENTATIONMAP",
    IfcMappedItem => "IFCMAPPEDITEM",

    // Presentation
    IfcColourRgb => "IFCCOLOURRGB",
    IfcSurfaceStyleRendering => "IFCSURFACESTYLERENDERING",
    IfcSurfaceStyle => "IFCSURFACESTYLE",
    IfcStyledItem => "IFCSTYLEDITEM",
    IfcStyledRepresentation => "IFCSTYLEDREPRESENTATION",

    // Materials
    IfcMaterial => "IFCMATERIAL",
    IfcMaterialDefinitionRepresentation => "IFCMATERIALDEFINITIONREPRESENTATION",
    IfcMaterialLayer => "IFCMATERIALLAYER",
    IfcMaterialLayerSet => "IFCMATERIALLAYERSET",
    IfcMaterialLayerSetUsage => "IFCMATERIALLAYERSETUSAGE",

    // Spatial structure
    IfcProject => "IFCPROJECT",
    IfcSite => "IFCSITE",
    IfcBuilding => "IFCBUILDING",
    IfcBuildingStorey => "IFCBUILDINGSTOREY",

    // Structural Elements
    IfcWallStandardCase => "IFCWALLSTANDARDCASE",
    IfcColumn => "IFCCOLUMN",
    IfcBeam => "IFCBEAM",
    IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",

    // Element types
    IfcWallType => "IFCWALLTYPE",
    IfcColumnType => "IFCCOLUMNTYPE",
    IfcBeamType => "IFCBEAMTYPE",
    IfcBuildingElementProxyType => "IFCBUILDINGELEMENTPROXYTYPE",

    // Relationships
    IfcRelAggregates => "IFCRELAGGREGATES",
    IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
    IfcRelDefinesByType => "IFCRELDEFINESBYTYPE",
    IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",
}

impl IfcType {
    /// Check if this is a spatial structure element
    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            Self::IfcProject | Self::IfcSite | Self::IfcBuilding | Self::IfcBuildingStorey
        )
    }

    /// Check if this is a building element
    pub fn is_building_element(&self) -> bool {
        matches!(
            self,
            Self::IfcWallStandardCase | Self::IfcBeam | Self::IfcColumn | Self::IfcBuildingElementProxy
        )
    }

    /// Check if this is an element type object
    pub fn is_type_object(&self) -> bool {
        matches!(
            self,
            Self::IfcWallType | Self::IfcColumnType | Self::IfcBeamType | Self::IfcBuildingElementProxyType
        )
    }

    /// Check if this is a relationship
    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            Self::IfcRelAggregates
                | Self::IfcRelContainedInSpatialStructure
                | Self::IfcRelDefinesByType
                | Self::IfcRelAssociatesMaterial
        )
    }

    /// Rooted entities carry a GlobalId and OwnerHistory as their first
    /// two attributes
    pub fn is_rooted(&self) -> bool {
        self.is_spatial() || self.is_building_element() || self.is_type_object() || self.is_relationship()
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(IfcType::from_str("IFCWALLSTANDARDCASE"), Some(IfcType::IfcWallStandardCase));
        assert_eq!(IfcType::from_str("IFCSIUNIT"), Some(IfcType::IfcSIUnit));
        assert_eq!(IfcType::from_str("IFCPROJECT"), Some(IfcType::IfcProject));
    }

    #[test]
    fn test_as_str_round_trip() {
        for t in IfcType::ALL {
            assert_eq!(IfcType::from_str(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn test_is_spatial() {
        assert!(IfcType::IfcProject.is_spatial());
        assert!(IfcType::IfcBuildingStorey.is_spatial());
        assert!(!IfcType::IfcColumn.is_spatial());
    }

    #[test]
    fn test_is_building_element() {
        assert!(IfcType::IfcWallStandardCase.is_building_element());
        assert!(IfcType::IfcBeam.is_building_element());
        assert!(!IfcType::IfcBeamType.is_building_element());
        assert!(IfcType::IfcBuildingElementProxy.is_building_element());
        assert!(IfcType::IfcBuildingElementProxyType.is_type_object());
        assert!(IfcType::IfcBeamType.is_rooted());
        assert!(!IfcType::IfcCartesianPoint.is_rooted());
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(IfcType::from_str("IFCCUSTOMTYPE"), None);
        assert_eq!(IfcType::from_str("ifcwall"), None);
    }
}
