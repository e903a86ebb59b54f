/*
This code is part of the parcel overlap detection tools.
Created: 10/10/2026
Last Modified: 14/10/2026
License: MIT
*/

use super::dedup::Deduplicator;
use super::engine::{ExactOverlap, OverlapEngine, OverlapRecord, SimilarityMeasure};
use super::index::SpatialIndex;
use super::store::{CheckPolicy, GeometryStore};
use crate::error::{IngestError, OverlapError};
use crate::io_utils::{
    Diagnostic, DiagnosticsWriter, ErrorSink, ParcelReader, RawRecord, ReportWriter,
};
use overlap_common::configs::Configs;
use std::fmt;

/// The settings the detection stage needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapOptions {
    pub threshold: f64,
    pub check_policy: CheckPolicy,
    pub report_duplicate_boundaries: bool,
    pub num_threads: usize,
}

impl Default for OverlapOptions {
    fn default() -> OverlapOptions {
        OverlapOptions::from(&Configs::default())
    }
}

impl From<&Configs> for OverlapOptions {
    fn from(configs: &Configs) -> OverlapOptions {
        OverlapOptions {
            threshold: configs.similarity_threshold,
            check_policy: if configs.enforce_check_flag {
                CheckPolicy::FlaggedOnly
            } else {
                CheckPolicy::All
            },
            report_duplicate_boundaries: configs.report_duplicate_boundaries,
            num_threads: configs.num_threads(num_cpus::get()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestCounts {
    pub records_read: usize,
    pub parse_failures: usize,
    pub invalid_geometries: usize,
}

/// Builds the store from raw records. Records that fail to parse or validate
/// go to the sink; a reader error stops the load.
pub fn load_store<I>(
    records: I,
    policy: CheckPolicy,
    sink: &dyn ErrorSink,
) -> Result<(GeometryStore, IngestCounts), OverlapError>
where
    I: IntoIterator<Item = Result<RawRecord, OverlapError>>,
{
    let mut store = GeometryStore::with_check_policy(policy);
    let mut counts = IngestCounts::default();
    for record in records {
        let raw = record?;
        counts.records_read += 1;
        if let Err(e) = store.ingest(&raw.geometry_text, &raw.parcel_id, raw.check_flag) {
            match e {
                IngestError::ParseFailure { .. } => counts.parse_failures += 1,
                IngestError::InvalidGeometry { .. } => counts.invalid_geometries += 1,
            }
            log::warn!("Line {}: {}", raw.line, e);
            sink.record(Diagnostic::Ingest(e));
        }
    }
    Ok((store, counts))
}

/// Deduplicated overlaps plus the tallies of the scoring stage.
#[derive(Debug, Default, Clone)]
pub struct Detection {
    pub overlaps: Vec<OverlapRecord>,
    pub checked: usize,
    pub candidates_tested: usize,
    pub operation_failures: usize,
}

/// Finds every overlapping pair in the store using exact clipping.
pub fn detect_overlaps(
    store: &GeometryStore,
    options: &OverlapOptions,
    sink: &dyn ErrorSink,
) -> Result<Detection, OverlapError> {
    detect_overlaps_with(store, options, ExactOverlap, sink)
}

/// Finds every overlapping pair in the store. Parcels are scored in parallel
/// and the results are deduplicated in parcel order, so the output only
/// depends on the input order.
pub fn detect_overlaps_with<M: SimilarityMeasure>(
    store: &GeometryStore,
    options: &OverlapOptions,
    measure: M,
    sink: &dyn ErrorSink,
) -> Result<Detection, OverlapError> {
    let index = SpatialIndex::build(store.all_geometries());
    let engine = OverlapEngine::with_measure(store, &index, options.threshold, measure)
        .report_duplicate_boundaries(options.report_duplicate_boundaries);
    let queries = store.checked_parcels();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.num_threads)
        .build()?;
    let scores = pool.install(|| engine.score_all(&queries, sink))?;

    let mut ret = Detection {
        checked: queries.len(),
        ..Default::default()
    };
    let mut dedup = Deduplicator::new();
    for parcel in scores {
        ret.candidates_tested += parcel.candidates_tested;
        ret.operation_failures += parcel.operation_failures;
        for record in parcel.overlaps {
            if dedup.accept(&record) {
                ret.overlaps.push(record);
            }
        }
    }
    Ok(ret)
}

/// Counts describing one batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: usize,
    pub parse_failures: usize,
    pub invalid_geometries: usize,
    pub validated: usize,
    pub groups: usize,
    pub checked: usize,
    pub candidates_tested: usize,
    pub operation_failures: usize,
    pub overlaps_reported: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Done processing boundaries. Total {} To check {}",
            self.validated, self.checked
        )?;
        writeln!(
            f,
            "Records read: {} (parse failures {}, invalid geometries {})",
            self.records_read, self.parse_failures, self.invalid_geometries
        )?;
        writeln!(
            f,
            "Distinct shapes: {}; candidate pairs tested: {}; failed operations: {}",
            self.groups, self.candidates_tested, self.operation_failures
        )?;
        write!(f, "Overlap Count {}", self.overlaps_reported)
    }
}

/// Runs one batch as described by the settings: reads the input file, writes
/// the overlap report and the diagnostics file.
pub fn run_batch(configs: &Configs) -> Result<RunSummary, OverlapError> {
    configs.validate()?;
    let options = OverlapOptions::from(configs);
    let input_file = configs.resolve_path(&configs.input_file);
    let output_file = configs.resolve_path(&configs.output_file);
    let error_file = configs.resolve_path(&configs.error_file);

    let reader = ParcelReader::from_path(&input_file, configs.delimiter as u8)?;
    let diagnostics = DiagnosticsWriter::create(&error_file)?;

    log::info!("Reading boundaries from {}", input_file.display());
    let (store, counts) = load_store(reader, options.check_policy, &diagnostics)?;
    let mut summary = RunSummary {
        records_read: counts.records_read,
        parse_failures: counts.parse_failures,
        invalid_geometries: counts.invalid_geometries,
        validated: store.len(),
        groups: store.group_count(),
        ..Default::default()
    };
    log::info!(
        "Done processing boundaries. Total {} To check {}",
        store.len(),
        store.checked_parcels().len()
    );

    let detection = detect_overlaps(&store, &options, &diagnostics)?;
    summary.checked = detection.checked;
    summary.candidates_tested = detection.candidates_tested;
    summary.operation_failures = detection.operation_failures;

    let mut report = ReportWriter::create(&output_file)?;
    for record in &detection.overlaps {
        report.write(record)?;
    }
    summary.overlaps_reported = report.rows();
    report.finish()?;
    diagnostics
        .finish()
        .map_err(|e| OverlapError::io(error_file.display().to_string(), e))?;

    log::info!("Overlap Count {}", summary.overlaps_reported);
    Ok(summary)
}
