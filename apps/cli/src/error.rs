// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the batch writer.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid building request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Item {index} ({entity_type}) failed: {source}")]
    Item {
        index: usize,
        entity_type: String,
        #[source]
        source: ifc_writer::Error,
    },

    #[error("Writing failed: {0}")]
    Write(#[from] ifc_writer::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}
