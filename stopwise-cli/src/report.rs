//! Reading stop lists and writing JSON reports.

use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;
use stopwise_core::Stop;
use stopwise_fs::{file_is_file, read_utf8_to_string, write_utf8_file};

use crate::CliError;

/// Ensure `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load a JSON array of stops from disk.
pub(crate) fn load_stops(path: &Utf8Path) -> Result<Vec<Stop>, CliError> {
    let payload = read_utf8_to_string(path).map_err(|source| CliError::ReadStops {
        path: path.to_path_buf(),
        source,
    })?;
    let stops: Vec<Stop> =
        serde_json::from_str(&payload).map_err(|source| CliError::ParseStops {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("loaded {} stop(s) from {path}", stops.len());
    Ok(stops)
}

/// Write `report` as pretty JSON to `output`, or to `writer` when no output
/// file is configured.
pub(crate) fn write_report<T>(
    report: &T,
    output: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    T: Serialize,
{
    let mut payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    payload.push('\n');
    match output {
        Some(path) => {
            write_utf8_file(path, payload.as_bytes()).map_err(|source| {
                CliError::WriteReportFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            log::info!("wrote report to {path}");
            Ok(())
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteReport),
    }
}
