// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch processing of building requests.

use std::io::Write;
use std::path::Path;

use ifc_writer::{BuildingRequest, ElementRequest, IfcWriter};
use ifc_writer_core::EntityScanner;

use crate::error::CliError;
use crate::types::StatusLine;

/// Outcome counts of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Parse a request document.
///
/// Accepts a full [`BuildingRequest`] object or a bare array of items.
pub fn parse_request(text: &str) -> Result<BuildingRequest, CliError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.is_array() {
        let items: Vec<ElementRequest> = serde_json::from_value(value)?;
        return Ok(BuildingRequest {
            items,
            ..Default::default()
        });
    }
    Ok(serde_json::from_value(value)?)
}

/// Read and parse a request file.
pub fn load_request(path: &Path) -> Result<BuildingRequest, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    parse_request(&text)
}

pub fn emit<W: Write>(out: &mut W, line: &StatusLine) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, line).map_err(std::io::Error::from)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Apply layer sets then items in order, writing one status line each.
///
/// Failed items are reported and skipped. With `fail_fast` the first
/// failure stops the batch and is returned as an error.
pub fn run_batch<W: Write>(
    writer: &mut IfcWriter,
    request: &BuildingRequest,
    fail_fast: bool,
    out: &mut W,
) -> Result<BatchReport, CliError> {
    let mut report = BatchReport::default();

    for set in &request.material_layer_sets {
        let outcome = writer.create_material_layer_set(&set.name, &set.layers);
        report.record(outcome.is_ok());
        match outcome {
            Ok(_) => emit(out, &StatusLine::entity("IfcMaterialLayerSet", Ok(())))?,
            Err(e) => {
                tracing::warn!(layer_set = %set.name, error = %e, "Layer set skipped");
                emit(out, &StatusLine::entity("IfcMaterialLayerSet", Err(e.to_string())))?;
                if fail_fast {
                    return Err(CliError::Write(e));
                }
            }
        }
    }

    for (index, item) in request.items.iter().enumerate() {
        let entity_type = item.ifc_class();
        match writer.apply(item) {
            Ok(id) => {
                report.record(true);
                tracing::debug!(index, entity_type, id = %id, "Item written");
                emit(out, &StatusLine::entity(entity_type, Ok(())))?;
            }
            Err(source) => {
                report.record(false);
                tracing::warn!(index, entity_type, error = %source, "Item skipped");
                emit(out, &StatusLine::entity(entity_type, Err(source.to_string())))?;
                if fail_fast {
                    return Err(CliError::Item {
                        index,
                        entity_type: entity_type.to_string(),
                        source,
                    });
                }
            }
        }
    }

    Ok(report)
}

impl BatchReport {
    fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Entity counts of a written file, sorted by type name.
pub fn summarize(path: &Path) -> Result<Vec<(String, usize)>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut counts: Vec<_> = EntityScanner::new(&content).count_by_type().into_iter().collect();
    counts.sort_unstable();
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_writer::WriterConfig;

    const ITEMS: &str = r#"[
        {"ifcClass": "IfcBuildingStorey", "name": "1F", "height": 0.0},
        {"ifcClass": "IfcColumn", "coordinate": [0, 0], "height": 3, "rotation": 0, "targetStorey": "1F"},
        {"ifcClass": "IfcBeam", "startPt": [0, 0], "endPt": [5, 0], "height": 3, "targetStorey": "9F", "rotation": 0},
        {"ifcClass": "IfcWallStandardCase", "startPt": [0, 0], "endPt": [0, 4], "height": 3,
         "thickness": 0.2, "targetStorey": "1F"}
    ]"#;

    fn lines(buffer: &[u8]) -> Vec<StatusLine> {
        String::from_utf8_lossy(buffer)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_bare_array_request() {
        let request = parse_request(ITEMS).unwrap();
        assert!(request.project.is_none());
        assert_eq!(request.items.len(), 4);
    }

    #[test]
    fn test_invalid_request() {
        assert!(matches!(
            parse_request(r#"{"items": [{"ifcClass": "IfcSlab"}]}"#),
            Err(CliError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_failed_item_is_reported_and_skipped() {
        let request = parse_request(ITEMS).unwrap();
        let mut writer = IfcWriter::new(WriterConfig::default());
        let mut out = Vec::new();
        let report = run_batch(&mut writer, &request, false, &mut out).unwrap();

        assert_eq!(report, BatchReport { succeeded: 3, failed: 1 });
        let status = lines(&out);
        assert_eq!(status.len(), 4);
        assert!(!status[2].result);
        assert_eq!(status[2].entity_type.as_deref(), Some("IfcBeam"));
        assert!(status[2].message.as_deref().unwrap().contains("9F"));
        assert!(status[3].result);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let request = parse_request(ITEMS).unwrap();
        let mut writer = IfcWriter::new(WriterConfig::default());
        let mut out = Vec::new();
        let err = run_batch(&mut writer, &request, true, &mut out).unwrap_err();

        assert!(matches!(err, CliError::Item { index: 2, .. }));
        assert_eq!(lines(&out).len(), 3);
    }

    #[test]
    fn test_summary_counts_written_entities() {
        let request = parse_request(ITEMS).unwrap();
        let mut writer = IfcWriter::new(WriterConfig::default());
        run_batch(&mut writer, &request, false, &mut Vec::<u8>::new()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.ifc");
        writer.save(&path).unwrap();

        let counts = summarize(&path).unwrap();
        let get = |name: &str| counts.iter().find(|(t, _)| t == name).map(|(_, n)| *n);
        assert_eq!(get("IFCCOLUMN"), Some(1));
        assert_eq!(get("IFCWALLSTANDARDCASE"), Some(1));
        assert_eq!(get("IFCBEAM"), None);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), writer.model().len());
    }
}
