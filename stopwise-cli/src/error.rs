//! Error types emitted by the Stopwise CLI.
//!
//! Many helpers return `Result<_, CliError>` and the workspace enables
//! `clippy::result_large_err`, so large payloads stay behind `#[source]`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use stopwise_core::{SequenceError, SequenceIndexError};
use thiserror::Error;

/// Errors emitted by the Stopwise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The stops file does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Argument naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// The stops path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Argument naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// The stops path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Argument naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the stops file failed.
    #[error("failed to read stops from {path:?}: {source}")]
    ReadStops {
        /// Path of the stops file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The stops file is not a JSON array of stops.
    #[error("failed to parse stops JSON at {path:?}: {source}")]
    ParseStops {
        /// Path of the stops file.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The sequencer rejected its input.
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    /// The route is too long to number.
    #[error(transparent)]
    SequenceIndex(#[from] SequenceIndexError),
    /// Serialising the report failed.
    #[error("failed to serialise report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the report to stdout failed.
    #[error("failed to write report: {0}")]
    WriteReport(#[source] std::io::Error),
    /// Writing the report to `--output` failed.
    #[error("failed to write report to {path:?}: {source}")]
    WriteReportFile {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// A logger was already installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] log::SetLoggerError),
}
