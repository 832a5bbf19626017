// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writer configuration
//!
//! Names of the spatial root objects, authoring metadata written into the
//! owner history and STEP header, and the project unit assignment.

use ifc_writer_core::{SiPrefix, SiUnit, UnitType};
use serde::{Deserialize, Serialize};

/// Settings applied when a new model is initialised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriterConfig {
    pub project_name: String,
    pub site_name: String,
    pub building_name: String,
    /// Family name of the owning person
    pub author: String,
    pub organization: String,
    pub application_name: String,
    pub application_version: String,
    /// Precision of the 3D model context
    pub precision: f64,
    /// Units assigned to the project, in order
    pub units: Vec<SiUnit>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            project_name: "Default Project".to_string(),
            site_name: "Default Site".to_string(),
            building_name: "Default Building".to_string(),
            author: String::new(),
            organization: String::new(),
            application_name: "ifc-writer".to_string(),
            application_version: env!("CARGO_PKG_VERSION").to_string(),
            precision: 1e-5,
            units: vec![
                SiUnit::new(UnitType::LengthUnit),
                SiUnit::new(UnitType::AreaUnit),
                SiUnit::new(UnitType::VolumeUnit),
                SiUnit::new(UnitType::PlaneAngleUnit),
            ],
        }
    }
}

impl WriterConfig {
    /// Apply one prefix to the length, area and volume units
    ///
    /// Missing length-derived units are left out rather than added.
    pub fn with_length_prefix(mut self, prefix: SiPrefix) -> Self {
        for unit in &mut self.units {
            if matches!(
                unit.unit_type,
                UnitType::LengthUnit | UnitType::AreaUnit | UnitType::VolumeUnit
            ) {
                unit.prefix = Some(prefix);
            }
        }
        self
    }

    /// Units with later duplicates of the same unit type removed
    pub(crate) fn unique_units(&self) -> Vec<SiUnit> {
        let mut seen = Vec::with_capacity(self.units.len());
        self.units
            .iter()
            .filter(|u| {
                if seen.contains(&u.unit_type) {
                    tracing::warn!(unit_type = %u.unit_type, "Duplicate unit type ignored");
                    false
                } else {
                    seen.push(u.unit_type);
                    true
                }
            })
            .copied()
            .collect()
    }
}
