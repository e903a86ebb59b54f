/*
This code is part of the parcel overlap detection tools.
Created: 09/10/2026
Last Modified: 14/10/2026
License: MIT
*/

use crate::error::{GeometryOpError, IngestError, OverlapError};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// A recoverable failure worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A record dropped while building the corpus.
    Ingest(IngestError),
    /// A pair whose overlap could not be computed.
    Operation {
        parcel_id: String,
        shape_a: String,
        shape_b: String,
        error: GeometryOpError,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::Ingest(e) => write!(f, "{} WKT:\n{}", e, e.raw_text()),
            Diagnostic::Operation {
                parcel_id,
                shape_a,
                shape_b,
                error,
            } => write!(
                f,
                "Unexpected error checking field_id {}: {}\n{}\n{}",
                parcel_id, error, shape_a, shape_b
            ),
        }
    }
}

/// Receives diagnostics from any worker thread.
pub trait ErrorSink: Sync {
    fn record(&self, diagnostic: Diagnostic);
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panicking writer leaves the data usable
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Keeps diagnostics in memory.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> DiagnosticLog {
        DiagnosticLog::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSink for DiagnosticLog {
    fn record(&self, diagnostic: Diagnostic) {
        lock(&self.entries).push(diagnostic);
    }
}

struct WriterState<W: Write> {
    writer: BufWriter<W>,
    entries: usize,
    error: Option<io::Error>,
}

/// Appends each diagnostic to a text file as it arrives. The first write
/// error is kept and returned by `finish`.
pub struct DiagnosticsWriter<W: Write> {
    state: Mutex<WriterState<W>>,
}

impl DiagnosticsWriter<File> {
    pub fn create(path: &Path) -> Result<DiagnosticsWriter<File>, OverlapError> {
        let file = File::create(path).map_err(|e| OverlapError::io(path.display().to_string(), e))?;
        Ok(DiagnosticsWriter::new(file))
    }
}

impl<W: Write> DiagnosticsWriter<W> {
    pub fn new(inner: W) -> DiagnosticsWriter<W> {
        DiagnosticsWriter {
            state: Mutex::new(WriterState {
                writer: BufWriter::new(inner),
                entries: 0,
                error: None,
            }),
        }
    }

    /// Number of diagnostics received.
    pub fn entries(&self) -> usize {
        lock(&self.state).entries
    }

    pub fn finish(self) -> io::Result<W> {
        let state = match self.state.into_inner() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(e) = state.error {
            return Err(e);
        }
        state.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write + Send> ErrorSink for DiagnosticsWriter<W> {
    fn record(&self, diagnostic: Diagnostic) {
        let mut state = lock(&self.state);
        state.entries += 1;
        if state.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(state.writer, "{}", diagnostic) {
            log::warn!("Unable to write to the diagnostics file: {}", e);
            state.error = Some(e);
        }
    }
}
