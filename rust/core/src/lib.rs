// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Writer Core
//!
//! The STEP side of IFC authoring: an in-memory entity graph, its
//! ISO-10303-21 serializer, and a small [nom](https://docs.rs/nom) reader
//! for inspecting written files.
//!
//! ## Overview
//!
//! - **Entity model**: [`StepModel`] arena with sequential [`EntityId`]s
//! - **Serialization**: [`to_step_string`] with STEP real and string encoding
//! - **GlobalId**: 22-character compressed GUIDs from random UUIDs
//! - **Units**: [`UnitType`] / [`SiPrefix`] vocabulary for `IfcSIUnit`
//! - **Reading**: [`parse_entity`] tokenizer and [`EntityScanner`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_writer_core::{AttributeValue, IfcType, StepHeader, StepModel, to_step_string};
//!
//! let mut model = StepModel::new();
//! let origin = model.add(IfcType::IfcCartesianPoint, vec![AttributeValue::reals(&[0.0, 0.0, 0.0])]);
//! model.add(IfcType::IfcAxis2Placement3D, vec![origin.into(), AttributeValue::Null, AttributeValue::Null]);
//!
//! let text = to_step_string(&StepHeader::new("example.ifc"), &model).unwrap();
//! assert!(text.contains("#2=IFCAXIS2PLACEMENT3D(#1,$,$);"));
//! ```

pub mod error;
pub mod guid;
pub mod model;
pub mod parser;
pub mod schema;
pub mod step;
pub mod units;

pub use error::{Error, Result};
pub use guid::GlobalId;
pub use model::{AttributeValue, Entity, EntityId, StepModel};
pub use parser::{decode_string, parse_entity, read_schema, EntityScanner, ParsedEntity, Token};
pub use schema::IfcType;
pub use step::{format_real, to_step_string, write_step, StepHeader};
pub use units::{SiPrefix, SiUnit, UnitType};
