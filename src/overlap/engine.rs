/*
This code is part of the parcel overlap detection tools.
Created: 08/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use super::index::SpatialIndex;
use super::store::{CanonicalKey, GeometryStore, ParcelRecord, ValidatedGeometry};
use crate::error::{GeometryOpError, OverlapError};
use crate::io_utils::{Diagnostic, ErrorSink};
use geo::{Area, BooleanOps};
use geo_types::MultiPolygon;
use rayon::prelude::*;
use serde::Serialize;
use std::cell::Cell;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

/// A pair of parcels whose shapes overlap by more than the threshold.
/// Field order is the report's column order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OverlapRecord {
    pub similarity: f64,
    pub parcel_a: String,
    pub parcel_b: String,
    pub wkt_a: String,
    pub wkt_b: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapAreas {
    pub intersection: f64,
    pub union: f64,
}

/// Computes the intersection and union areas of two shapes.
pub trait SimilarityMeasure: Sync {
    fn overlap_areas(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<OverlapAreas, GeometryOpError>;
}

/// Exact polygon clipping. A panic inside the clipping code is caught and
/// returned as an error so one bad pair cannot stop the batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactOverlap;

impl SimilarityMeasure for ExactOverlap {
    fn overlap_areas(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<OverlapAreas, GeometryOpError> {
        guarded_areas(|| {
            (
                a.intersection(b).unsigned_area(),
                a.union(b).unsigned_area(),
            )
        })
    }
}

thread_local! {
    static CLIPPING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Panics raised while clipping go to the debug log instead of stderr. Any
/// other panic still reaches the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CLIPPING.with(|c| c.get()) {
                log::debug!("Clipping panicked: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// Runs a clipping computation and checks the two areas it returns.
fn guarded_areas<F>(clip: F) -> Result<OverlapAreas, GeometryOpError>
where
    F: FnOnce() -> (f64, f64),
{
    install_quiet_hook();
    CLIPPING.with(|c| c.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(clip));
    CLIPPING.with(|c| c.set(false));

    let (intersection, union) = outcome.map_err(|payload| {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown failure".to_string()
        };
        GeometryOpError::Failed(msg)
    })?;

    if !intersection.is_finite() || !union.is_finite() {
        return Err(GeometryOpError::NonFinite {
            intersection,
            union,
        });
    }
    // allow for rounding in the two clipping results
    if intersection > union * (1f64 + 1e-9) {
        return Err(GeometryOpError::Inconsistent {
            intersection,
            union,
        });
    }
    Ok(OverlapAreas {
        intersection,
        union,
    })
}

/// The outcome of checking one parcel against the corpus.
#[derive(Debug, Default, Clone)]
pub struct ParcelScores {
    pub overlaps: Vec<OverlapRecord>,
    pub candidates_tested: usize,
    pub operation_failures: usize,
}

/// Scores checked parcels against the indexed corpus.
pub struct OverlapEngine<'a, M: SimilarityMeasure = ExactOverlap> {
    store: &'a GeometryStore,
    index: &'a SpatialIndex,
    measure: M,
    threshold: f64,
    report_duplicate_boundaries: bool,
}

impl<'a> OverlapEngine<'a, ExactOverlap> {
    pub fn new(store: &'a GeometryStore, index: &'a SpatialIndex, threshold: f64) -> Self {
        OverlapEngine::with_measure(store, index, threshold, ExactOverlap)
    }
}

impl<'a, M: SimilarityMeasure> OverlapEngine<'a, M> {
    pub fn with_measure(
        store: &'a GeometryStore,
        index: &'a SpatialIndex,
        threshold: f64,
        measure: M,
    ) -> Self {
        OverlapEngine {
            store,
            index,
            measure,
            threshold,
            report_duplicate_boundaries: false,
        }
    }

    /// When set, parcels whose boundary text is byte-identical to the
    /// query's are reported against it with a similarity of 1. Parcels with
    /// the same shape written differently are always reported.
    pub fn report_duplicate_boundaries(mut self, value: bool) -> Self {
        self.report_duplicate_boundaries = value;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity of two shapes. Operands are always passed to the measure
    /// in key order so that swapping them gives the identical value.
    pub fn similarity(
        &self,
        a: &ValidatedGeometry,
        b: &ValidatedGeometry,
    ) -> Result<Option<f64>, GeometryOpError> {
        let (first, second) = if a.key() <= b.key() { (a, b) } else { (b, a) };
        let areas = self.measure.overlap_areas(first.shape(), second.shape())?;
        if areas.union == 0f64 {
            return Ok(None);
        }
        Ok(Some(areas.intersection / areas.union))
    }

    /// Checks one parcel against every candidate the index returns for it.
    pub fn score_candidates(
        &self,
        query: &ParcelRecord,
        sink: &dyn ErrorSink,
    ) -> Result<ParcelScores, OverlapError> {
        let mut ret = ParcelScores::default();
        let own_key = query.geometry.key();
        let mut seen: HashSet<&CanonicalKey> = HashSet::new();

        for candidate in self.index.query(&query.geometry) {
            // every copy of a shape resolves to the same records
            if !seen.insert(candidate.key()) {
                continue;
            }

            let same_shape = candidate.key() == own_key;
            let similarity = if same_shape {
                1f64
            } else {
                // the smaller area over the larger bounds the similarity from above
                let (a, b) = (query.geometry.area(), candidate.area());
                if a.min(b) < self.threshold * a.max(b) {
                    continue;
                }
                ret.candidates_tested += 1;
                match self.similarity(&query.geometry, candidate) {
                    Ok(Some(s)) => s,
                    Ok(None) => continue,
                    Err(error) => {
                        log::debug!(
                            "Overlap computation failed for parcel {}: {}",
                            query.parcel_id,
                            error
                        );
                        ret.operation_failures += 1;
                        sink.record(Diagnostic::Operation {
                            parcel_id: query.parcel_id.clone(),
                            shape_a: query.geometry.key().to_string(),
                            shape_b: candidate.key().to_string(),
                            error,
                        });
                        continue;
                    }
                }
            };
            if similarity <= self.threshold {
                continue;
            }

            for other in self.store.resolve(candidate)? {
                if other.parcel_id == query.parcel_id {
                    continue;
                }
                // a byte-identical copy of the query's boundary is not an overlap
                if same_shape && other.wkt == query.wkt && !self.report_duplicate_boundaries {
                    continue;
                }
                ret.overlaps.push(OverlapRecord {
                    similarity,
                    parcel_a: query.parcel_id.clone(),
                    parcel_b: other.parcel_id.clone(),
                    wkt_a: query.wkt.clone(),
                    wkt_b: other.wkt.clone(),
                });
            }
        }
        Ok(ret)
    }

    /// Scores every query in parallel on the current rayon pool. Results come
    /// back in query order.
    pub fn score_all(
        &self,
        queries: &[&ParcelRecord],
        sink: &dyn ErrorSink,
    ) -> Result<Vec<ParcelScores>, OverlapError> {
        let num_queries = queries.len();
        let done = AtomicUsize::new(0);
        let old_progress = AtomicUsize::new(0);
        queries
            .par_iter()
            .map(|query| {
                let scores = self.score_candidates(query, sink)?;
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                let progress = (100.0_f64 * n as f64 / num_queries as f64) as usize;
                let previous = old_progress.fetch_max(progress, Ordering::Relaxed);
                if progress / 10 > previous / 10 {
                    log::info!("Scoring boundaries: {}%", progress);
                }
                Ok(scores)
            })
            .collect()
    }
}

/// Checks one parcel with exact clipping against an index and store.
pub fn score_candidates(
    query: &ParcelRecord,
    index: &SpatialIndex,
    store: &GeometryStore,
    threshold: f64,
    sink: &dyn ErrorSink,
) -> Result<Vec<OverlapRecord>, OverlapError> {
    let engine = OverlapEngine::new(store, index, threshold);
    Ok(engine.score_candidates(query, sink)?.overlaps)
}
