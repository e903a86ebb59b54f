/*!
Detection of overlapping land-parcel boundaries.

A batch of parcels, each a WKT polygon with an id and a check flag, is read
into a [`overlap::GeometryStore`], indexed by bounding box and scored pair by
pair with the intersection-over-union of the two shapes. Pairs whose score is
above the similarity threshold are reported once each.
*/

pub mod error;
pub mod io_utils;
pub mod overlap;
pub mod vector;

pub use crate::error::{GeometryOpError, IngestError, OverlapError};
pub use crate::overlap::{run_batch, OverlapRecord, RunSummary};
pub use overlap_common::configs::Configs;
