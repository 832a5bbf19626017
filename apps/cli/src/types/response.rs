// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status lines written to stdout, one JSON object per line.

use serde::{Deserialize, Serialize};

/// What a status line reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    WritingFile,
    WritingEntity,
    System,
}

/// One status record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLine {
    pub action: Action,
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusLine {
    pub fn entity(entity_type: &str, outcome: Result<(), String>) -> Self {
        let (result, message) = match outcome {
            Ok(()) => (true, None),
            Err(message) => (false, Some(message)),
        };
        Self {
            action: Action::WritingEntity,
            result,
            entity_type: Some(entity_type.to_string()),
            message,
        }
    }

    pub fn file(result: bool, message: impl Into<String>) -> Self {
        Self {
            action: Action::WritingFile,
            result,
            entity_type: None,
            message: Some(message.into()),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            action: Action::System,
            result: false,
            entity_type: None,
            message: Some(message.into()),
        }
    }
}
