// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model assembly
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling or saving a model
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] ifc_writer_geometry::Error),

    #[error("STEP error: {0}")]
    Step(#[from] ifc_writer_core::Error),

    #[error("Duplication Error: {kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error("Not Exist Error: {kind} '{name}' does not exist")]
    NotFound { kind: &'static str, name: String },

    #[error("Profile '{0}' is not defined and no dimensions were given")]
    MissingProfileDimensions(String),

    #[error("Material layer set '{0}' has no layers")]
    EmptyLayerSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Error::Duplicate {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }
}
