// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for placement and profile computations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by placement math and profile construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Zero-length centerline, coincident points or a zero vector
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Rotation that is not a finite number of degrees
    #[error("Invalid angle: {0} is not a finite number of degrees")]
    InvalidAngle(f64),

    #[error("Invalid dimension `{name}` = {value}: {reason}")]
    InvalidDimension {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn dimension(name: &'static str, value: f64, reason: &'static str) -> Self {
        Error::InvalidDimension {
            name,
            value,
            reason,
        }
    }
}

/// Reject non-finite scalars
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::dimension(name, value, "must be finite"))
    }
}

/// Reject non-finite, zero or negative scalars
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(Error::dimension(name, value, "must be positive"))
    }
}
