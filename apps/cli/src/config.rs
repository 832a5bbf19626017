// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// tracing filter directive (`RUST_LOG` syntax).
    pub log_filter: String,
    /// Format of log records written to stderr.
    pub log_format: LogFormat,
    /// Output path used when `--output` is not given.
    pub default_output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            log_filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info,ifc_writer=debug".into()),
            log_format: match std::env::var("IFC_WRITER_LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            default_output: std::env::var("IFC_WRITER_OUTPUT").ok().map(PathBuf::from),
        }
    }

    /// Output path: explicit argument, then environment, then the input
    /// file with an `.ifc` extension.
    pub fn output_path(&self, explicit: Option<PathBuf>, input: &std::path::Path) -> PathBuf {
        explicit
            .or_else(|| self.default_output.clone())
            .unwrap_or_else(|| input.with_extension("ifc"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            log_format: LogFormat::Pretty,
            default_output: None,
        }
    }
}
