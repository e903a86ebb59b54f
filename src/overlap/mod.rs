/*
This code is part of the parcel overlap detection tools.
Created: 07/10/2026
Last Modified: 13/10/2026
License: MIT
*/

// private sub-module defined in other files
mod batch;
mod dedup;
mod engine;
mod index;
mod store;

// exports identifiers from private sub-modules in the current module namespace
pub use self::batch::{
    detect_overlaps, detect_overlaps_with, load_store, run_batch, Detection, IngestCounts,
    OverlapOptions, RunSummary,
};
pub use self::dedup::{Deduplicator, PairKey};
pub use self::engine::{
    score_candidates, ExactOverlap, OverlapAreas, OverlapEngine, OverlapRecord, ParcelScores,
    SimilarityMeasure,
};
pub use self::index::SpatialIndex;
pub use self::store::{
    CanonicalKey, CheckPolicy, GeometryGroup, GeometryStore, ParcelRecord, ValidatedGeometry,
};
