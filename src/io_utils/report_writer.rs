use crate::error::OverlapError;
use crate::overlap::OverlapRecord;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub const REPORT_HEADER: &str = "Similarity;FieldID_A;FieldID_B;WKT_A;WKT_B";

/// Writes accepted overlaps as `;`-separated lines under a fixed header.
pub struct ReportWriter<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl ReportWriter<File> {
    pub fn create(path: &Path) -> Result<ReportWriter<File>, OverlapError> {
        let file = File::create(path).map_err(|e| OverlapError::io(path.display().to_string(), e))?;
        ReportWriter::new(file)
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W) -> Result<ReportWriter<W>, OverlapError> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(inner);
        writer.write_record(REPORT_HEADER.split(';'))?;
        Ok(ReportWriter { writer, rows: 0 })
    }

    pub fn write(&mut self, record: &OverlapRecord) -> Result<(), OverlapError> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of overlap rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes the report and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, OverlapError> {
        self.writer
            .flush()
            .map_err(|e| OverlapError::io("report", e))?;
        self.writer.into_inner().map_err(|e| {
            OverlapError::io("report", io::Error::new(e.error().kind(), e.error().to_string()))
        })
    }
}
