// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Writer CLI - write IFC4 building models from JSON requests.
//!
//! Reads a building request (or a bare array of `ifcClass`-tagged items),
//! applies it in order and saves the model as a STEP file. Progress is
//! reported on stdout as one JSON status line per item; logs go to stderr.
//!
//! # Environment
//!
//! - `RUST_LOG` - log filter
//! - `IFC_WRITER_LOG_FORMAT` - `pretty` (default) or `json`
//! - `IFC_WRITER_OUTPUT` - output path when `--output` is omitted

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ifc_writer::IfcWriter;
use ifc_writer_core::SiPrefix;

mod batch;
mod config;
mod error;
mod types;

use config::{Config, LogFormat};
use types::StatusLine;

#[derive(Parser, Debug)]
#[command(name = "ifc-writer")]
#[command(version, about = "Write IFC4 building models from JSON requests", long_about = None)]
struct Opts {
    /// Building request JSON file
    input: PathBuf,

    /// Output IFC file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop at the first failed item without writing a file
    #[arg(long)]
    fail_fast: bool,

    /// Log entity counts of the written file
    #[arg(long)]
    summary: bool,

    /// SI prefix for length, area and volume units, e.g. MILLI
    #[arg(long, value_name = "PREFIX")]
    length_prefix: Option<String>,
}

fn init_logging(config: &Config) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .with_writer(io::stderr);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_logging(&config);
    let opts = Opts::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let request = match batch::load_request(&opts.input) {
        Ok(request) => request,
        Err(e) => {
            batch::emit(&mut out, &StatusLine::system(e.to_string()))?;
            return Err(e.into());
        }
    };

    let mut writer_config = request.project.clone().unwrap_or_default();
    if let Some(prefix) = &opts.length_prefix {
        writer_config = writer_config.with_length_prefix(SiPrefix::parse(prefix)?);
    }
    tracing::info!(
        input = %opts.input.display(),
        project = %writer_config.project_name,
        layer_sets = request.material_layer_sets.len(),
        items = request.items.len(),
        "Starting batch"
    );

    let mut writer = IfcWriter::new(writer_config);
    let report = batch::run_batch(&mut writer, &request, opts.fail_fast, &mut out)?;

    let path = config.output_path(opts.output, &opts.input);
    if let Err(e) = writer.save(&path) {
        batch::emit(&mut out, &StatusLine::file(false, e.to_string()))?;
        return Err(e).with_context(|| format!("Cannot write {}", path.display()));
    }
    batch::emit(&mut out, &StatusLine::file(true, path.display().to_string()))?;

    tracing::info!(
        output = %path.display(),
        succeeded = report.succeeded,
        failed = report.failed,
        entities = writer.model().len(),
        "Batch complete"
    );

    if opts.summary {
        for (entity_type, count) in batch::summarize(&path)? {
            tracing::info!(entity_type = %entity_type, count, "Written");
        }
    }

    Ok(())
}
