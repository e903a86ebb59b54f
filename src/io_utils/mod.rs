// private sub-module defined in other files
mod diagnostics;
mod parcel_reader;
mod report_writer;

// exports identifiers from private sub-modules in the current module namespace
pub use self::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticsWriter, ErrorSink};
pub use self::parcel_reader::{parse_check_flag, ParcelReader, RawRecord, EXPECTED_FIELDS};
pub use self::report_writer::{ReportWriter, REPORT_HEADER};
