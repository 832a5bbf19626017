// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for STEP model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from building, serializing or reading STEP data
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invalid IFC type: {0}")]
    InvalidIfcType(String),

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),

    #[error("Entity #{id} has no attribute {index}")]
    AttributeOutOfRange { id: u32, index: usize },

    #[error("Attribute {index} of #{id} is not a list")]
    NotAList { id: u32, index: usize },

    #[error("Cannot serialize non-finite real {value} in #{id}")]
    NonFiniteReal { id: u32, value: f64 },

    #[error("Invalid GlobalId `{0}`")]
    InvalidGlobalId(String),

    #[error("Unknown {kind} `{value}`")]
    UnknownEnumValue { kind: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
