//! Error types for the overlap batch.
//!
//! Per-record and per-pair failures (`IngestError`, `GeometryOpError`) are
//! recoverable: they are reported to the diagnostics sink and the batch
//! continues. `OverlapError` is fatal and ends the run.

use overlap_common::configs::ConfigError;
use thiserror::Error;

/// A record that could not enter the corpus.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// The geometry text is not readable WKT.
    #[error("Error parsing geometry field_id {parcel_id} check? {check_flag}: {message}")]
    ParseFailure {
        parcel_id: String,
        check_flag: bool,
        raw_text: String,
        message: String,
    },

    /// The geometry parsed but failed the validity predicate.
    #[error("Invalid polygon of type {kind} field_id {parcel_id} check? {check_flag}: {reason}")]
    InvalidGeometry {
        kind: String,
        parcel_id: String,
        check_flag: bool,
        reason: String,
        raw_text: String,
    },
}

impl IngestError {
    pub fn parcel_id(&self) -> &str {
        match self {
            IngestError::ParseFailure { parcel_id, .. } => parcel_id,
            IngestError::InvalidGeometry { parcel_id, .. } => parcel_id,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            IngestError::ParseFailure { raw_text, .. } => raw_text,
            IngestError::InvalidGeometry { raw_text, .. } => raw_text,
        }
    }
}

/// An intersection or union computation that did not produce usable areas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryOpError {
    #[error("polygon boolean operation failed: {0}")]
    Failed(String),

    #[error("non-finite overlap areas (intersection {intersection}, union {union})")]
    NonFinite { intersection: f64, union: f64 },

    #[error("intersection area {intersection} exceeds union area {union}")]
    Inconsistent { intersection: f64, union: f64 },
}

/// Errors that end the run.
#[derive(Error, Debug)]
pub enum OverlapError {
    /// A line of the input file does not have the expected number of fields.
    #[error("Input file not correctly formatted. Line {line} has {found} fields; should have {expected} fields per line")]
    MalformedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A geometry returned by the spatial index has no owning record.
    #[error("Internal error: {0}")]
    InternalInvariant(String),

    #[error("unable to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl OverlapError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> OverlapError {
        OverlapError::Io {
            path: path.into(),
            source,
        }
    }

    /// The process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            OverlapError::MalformedRecord { .. } => 2,
            OverlapError::InternalInvariant(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let malformed = OverlapError::MalformedRecord {
            line: 4,
            expected: 3,
            found: 2,
        };
        let internal = OverlapError::InternalInvariant("lost geometry".to_string());
        let io = OverlapError::io(
            "in.tsv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(malformed.exit_code(), 2);
        assert_eq!(internal.exit_code(), 3);
        assert_eq!(io.exit_code(), 1);
        assert!(malformed.to_string().contains("Line 4 has 2 fields"));
    }

    #[test]
    fn test_ingest_error_accessors() {
        let e = IngestError::InvalidGeometry {
            kind: "LineString".to_string(),
            parcel_id: "F-1".to_string(),
            check_flag: true,
            reason: "a LineString has no area".to_string(),
            raw_text: "LINESTRING(0 0, 1 1)".to_string(),
        };
        assert_eq!(e.parcel_id(), "F-1");
        assert_eq!(e.raw_text(), "LINESTRING(0 0, 1 1)");
        assert!(e.to_string().starts_with("Invalid polygon of type LineString field_id F-1 check? true"));
    }
}
