// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Writer
//!
//! Assembles IFC4 building models from plan-level input and writes them as
//! STEP files.
//!
//! ## Overview
//!
//! - **Spatial structure**: Project → Site → Building → Storeys
//! - **Elements**: I-shape or circular columns through shared representation
//!   maps, I-shape beams, walls centred on their centerline
//! - **Anchors**: ground anchors through a wale as proxy elements
//! - **Materials**: styled materials and material layer sets
//! - **Requests**: `ifcClass`-tagged JSON items applied in order
//!
//! Placement math comes from [`ifc_writer_geometry`]; the entity graph and
//! serialization from [`ifc_writer_core`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ifc_writer::{ColumnProfile, ColumnSpec, IfcWriter, StoreySpec, WriterConfig};
//! use ifc_writer_geometry::{Angle, IShapeDimensions, Point2};
//!
//! let mut writer = IfcWriter::new(WriterConfig::default());
//! writer.create_storey(&StoreySpec::new("1F", 0.0))?;
//! writer.create_column(&ColumnSpec {
//!     storey: "1F".into(),
//!     type_name: "C1".into(),
//!     profile_name: "H-300".into(),
//!     profile: Some(ColumnProfile::IShape(IShapeDimensions::new(0.3, 0.3, 0.01, 0.015, 0.018)?)),
//!     coordinate: Point2::new(0.0, 0.0),
//!     height: 3.0,
//!     rotation: Angle::from_degrees(90.0)?,
//!     base_offset: 0.0,
//! })?;
//! writer.save("model.ifc")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anchor;
pub mod config;
pub mod context;
pub mod elements;
pub mod error;
pub mod material;
pub mod request;
pub mod resources;
pub mod spatial;
pub mod writer;

pub use anchor::AnchorSpec;
pub use config::WriterConfig;
pub use context::{
    LayerSetRecord, MaterialRecord, ProfileRecord, ProfileShape, StoreyRecord, TypeRecord, WriterContext,
};
pub use elements::{BeamSpec, ColumnProfile, ColumnSpec, WallSpec};
pub use error::{Error, Result};
pub use material::{LayerSetSpec, MaterialLayerSpec};
pub use request::{
    AnchorRequest, BeamRequest, BuildingRequest, ColumnRequest, ElementRequest, ProfileRequest,
    WallRequest,
};
pub use resources::SurfaceColour;
pub use spatial::StoreySpec;
pub use writer::IfcWriter;
