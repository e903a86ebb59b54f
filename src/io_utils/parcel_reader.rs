/*
This code is part of the parcel overlap detection tools.
Created: 09/10/2026
Last Modified: 13/10/2026
License: MIT
*/

use crate::error::OverlapError;
use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Fields per input line: geometry text, parcel id, check flag.
pub const EXPECTED_FIELDS: usize = 3;

/// One input line, before its geometry is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// One-based line number in the input file.
    pub line: u64,
    pub geometry_text: String,
    pub parcel_id: String,
    pub check_flag: bool,
}

/// Reads `TRUE`, `true` and `1` as set; anything else is unset.
pub fn parse_check_flag(value: &str) -> bool {
    matches!(value.trim(), "TRUE" | "true" | "1")
}

/// Iterates over the records of a delimited parcel file. The first line is a
/// header and is skipped, as are blank lines. A line with the wrong number of
/// fields ends the iteration with `OverlapError::MalformedRecord`.
pub struct ParcelReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    failed: bool,
}

impl ParcelReader<File> {
    pub fn from_path(path: &Path, delimiter: u8) -> Result<ParcelReader<File>, OverlapError> {
        let file = File::open(path).map_err(|e| OverlapError::io(path.display().to_string(), e))?;
        Ok(ParcelReader::from_reader(file, delimiter))
    }
}

impl<R: Read> ParcelReader<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> ParcelReader<R> {
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader);
        ParcelReader {
            records: reader.into_records(),
            failed: false,
        }
    }
}

impl<R: Read> Iterator for ParcelReader<R> {
    type Item = Result<RawRecord, OverlapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let record = match self.records.next()? {
                Ok(r) => r,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(OverlapError::Csv(e)));
                }
            };
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.len() != EXPECTED_FIELDS {
                self.failed = true;
                return Some(Err(OverlapError::MalformedRecord {
                    line,
                    expected: EXPECTED_FIELDS,
                    found: record.len(),
                }));
            }
            return Some(Ok(RawRecord {
                line,
                geometry_text: record[0].to_string(),
                parcel_id: record[1].to_string(),
                check_flag: parse_check_flag(&record[2]),
            }));
        }
    }
}
