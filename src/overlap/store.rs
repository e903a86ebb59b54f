/*
This code is part of the parcel overlap detection tools.
Created: 07/10/2026
Last Modified: 13/10/2026
License: MIT
*/

use crate::error::{IngestError, OverlapError};
use crate::vector::{canonical_wkt, geometry_kind, parse_wkt, validate};
use geo::Area;
use geo_types::MultiPolygon;
use overlap_common::structures::{BoundingBox, Point2D};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Normalized WKT of a validated shape. Equal keys mean exactly equal
/// coordinates; vertex order and ring orientation are kept as written.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn of(shape: &MultiPolygon<f64>) -> CanonicalKey {
        CanonicalKey(canonical_wkt(shape))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shape that passed the validity check, with the values derived from it
/// that the index and the engine need.
#[derive(Debug)]
pub struct ValidatedGeometry {
    shape: MultiPolygon<f64>,
    key: CanonicalKey,
    bounding_box: BoundingBox,
    area: f64,
}

impl ValidatedGeometry {
    /// Wraps a shape already accepted by `vector::validate`.
    pub fn new(shape: MultiPolygon<f64>) -> ValidatedGeometry {
        let key = CanonicalKey::of(&shape);
        let mut bounding_box = BoundingBox::default();
        for poly in &shape.0 {
            let shell: Vec<Point2D> = poly
                .exterior()
                .0
                .iter()
                .map(|c| Point2D::new(c.x, c.y))
                .collect();
            bounding_box.expand_to(BoundingBox::from_points(&shell));
        }
        let area = shape.unsigned_area();
        ValidatedGeometry {
            shape,
            key,
            bounding_box,
            area,
        }
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn area(&self) -> f64 {
        self.area
    }
}

/// One validated input line.
#[derive(Debug, Clone)]
pub struct ParcelRecord {
    pub parcel_id: String,
    pub check_flag: bool,
    /// The geometry text exactly as it appeared in the input.
    pub wkt: String,
    pub geometry: Arc<ValidatedGeometry>,
}

/// The records whose shapes share one canonical key, in input order.
#[derive(Debug)]
pub struct GeometryGroup {
    pub key: CanonicalKey,
    pub records: Vec<ParcelRecord>,
}

/// Which validated records get checked against the corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CheckPolicy {
    /// Every validated record, whatever its check flag.
    #[default]
    All,
    /// Only records whose check flag is set.
    FlaggedOnly,
}

/// Validated parcels grouped by shape, plus the corpus of every validated
/// geometry in input order. Filled once during ingestion and read-only after.
#[derive(Debug, Default)]
pub struct GeometryStore {
    groups: Vec<GeometryGroup>,
    lookup: HashMap<CanonicalKey, usize>,
    // (group, position in group) of each record, in input order
    order: Vec<(usize, usize)>,
    corpus: Vec<Arc<ValidatedGeometry>>,
    policy: CheckPolicy,
}

impl GeometryStore {
    pub fn new() -> GeometryStore {
        GeometryStore::default()
    }

    pub fn with_check_policy(policy: CheckPolicy) -> GeometryStore {
        GeometryStore {
            policy,
            ..Default::default()
        }
    }

    pub fn check_policy(&self) -> CheckPolicy {
        self.policy
    }

    /// Parses, validates and stores one record. A record that fails either
    /// step is not stored and the failure is returned for reporting.
    pub fn ingest(
        &mut self,
        raw_geometry_text: &str,
        parcel_id: &str,
        check_flag: bool,
    ) -> Result<(), IngestError> {
        let geometry = parse_wkt(raw_geometry_text).map_err(|message| IngestError::ParseFailure {
            parcel_id: parcel_id.to_string(),
            check_flag,
            raw_text: raw_geometry_text.to_string(),
            message,
        })?;
        let kind = geometry_kind(&geometry);
        let shape = validate(geometry).map_err(|reason| IngestError::InvalidGeometry {
            kind: kind.to_string(),
            parcel_id: parcel_id.to_string(),
            check_flag,
            reason: reason.to_string(),
            raw_text: raw_geometry_text.to_string(),
        })?;

        let key = CanonicalKey::of(&shape);
        let group = match self.lookup.get(&key) {
            Some(&g) => g,
            None => {
                self.groups.push(GeometryGroup {
                    key: key.clone(),
                    records: vec![],
                });
                self.lookup.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        // duplicates share the first record's geometry
        let geometry = match self.groups[group].records.first() {
            Some(first) => Arc::clone(&first.geometry),
            None => Arc::new(ValidatedGeometry::new(shape)),
        };
        self.corpus.push(Arc::clone(&geometry));
        let records = &mut self.groups[group].records;
        records.push(ParcelRecord {
            parcel_id: parcel_id.to_string(),
            check_flag,
            wkt: raw_geometry_text.to_string(),
            geometry,
        });
        self.order.push((group, records.len() - 1));
        Ok(())
    }

    /// Every validated geometry, one per stored record, in input order.
    pub fn all_geometries(&self) -> &[Arc<ValidatedGeometry>] {
        &self.corpus
    }

    /// The records to check, in input order.
    pub fn checked_parcels(&self) -> Vec<&ParcelRecord> {
        self.records()
            .filter(|r| self.policy == CheckPolicy::All || r.check_flag)
            .collect()
    }

    /// All records sharing the given geometry's shape.
    pub fn resolve(&self, geometry: &ValidatedGeometry) -> Result<&[ParcelRecord], OverlapError> {
        match self.lookup.get(geometry.key()) {
            Some(&g) => Ok(&self.groups[g].records),
            None => Err(OverlapError::InternalInvariant(format!(
                "no parcel owns the geometry {}",
                geometry.key()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record(&self, index: usize) -> Option<&ParcelRecord> {
        self.order
            .get(index)
            .map(|&(g, i)| &self.groups[g].records[i])
    }

    pub fn records(&self) -> impl Iterator<Item = &ParcelRecord> + '_ {
        self.order.iter().map(move |&(g, i)| &self.groups[g].records[i])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SQUARE: &str = "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))";

    #[test]
    fn test_ingest_groups_identical_shapes() {
        let mut store = GeometryStore::new();
        store.ingest(SQUARE, "C", true).unwrap();
        store
            .ingest("MULTIPOLYGON(((0.0 0.0,1.0 0.0,1 1,0 1,0 0)))", "D", false)
            .unwrap();
        store.ingest("POLYGON((5 5, 6 5, 6 6, 5 6, 5 5))", "E", true).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.group_count(), 2);
        assert_eq!(store.all_geometries().len(), 3);

        let ids: Vec<&str> = store
            .resolve(&store.all_geometries()[0])
            .unwrap()
            .iter()
            .map(|r| r.parcel_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C", "D"]);
        // the raw text is kept for the report
        assert_eq!(store.record(1).unwrap().wkt, "MULTIPOLYGON(((0.0 0.0,1.0 0.0,1 1,0 1,0 0)))");
        assert_eq!(store.record(2).unwrap().parcel_id, "E");
    }

    #[test]
    fn test_ingest_failures_are_not_stored() {
        let mut store = GeometryStore::new();
        let err = store.ingest("POLYGON((0 0, 1", "X", true).unwrap_err();
        assert!(matches!(err, IngestError::ParseFailure { .. }));
        let err = store.ingest("LINESTRING(0 0, 1 1)", "Y", false).unwrap_err();
        match err {
            IngestError::InvalidGeometry { kind, parcel_id, .. } => {
                assert_eq!(kind, "LineString");
                assert_eq!(parcel_id, "Y");
            }
            _ => panic!("expected an invalid geometry"),
        }
        assert!(store.is_empty());
        assert!(store.all_geometries().is_empty());
    }

    #[test]
    fn test_checked_parcels_follow_policy() {
        let mut store = GeometryStore::new();
        store.ingest(SQUARE, "A", false).unwrap();
        store.ingest("POLYGON((2 2, 3 2, 3 3, 2 3, 2 2))", "B", true).unwrap();
        assert_eq!(store.checked_parcels().len(), 2);

        let mut store = GeometryStore::with_check_policy(CheckPolicy::FlaggedOnly);
        store.ingest(SQUARE, "A", false).unwrap();
        store.ingest("POLYGON((2 2, 3 2, 3 3, 2 3, 2 2))", "B", true).unwrap();
        let checked = store.checked_parcels();
        assert_eq!(checked.len(), 1);
        assert_eq!(checked[0].parcel_id, "B");
    }

    #[test]
    fn test_resolving_a_foreign_geometry_fails() {
        let mut store = GeometryStore::new();
        store.ingest(SQUARE, "A", true).unwrap();
        let other = match crate::vector::parse_wkt("POLYGON((0 0, 2 0, 2 2, 0 0))").unwrap() {
            geo_types::Geometry::Polygon(p) => ValidatedGeometry::new(MultiPolygon(vec![p])),
            _ => unreachable!(),
        };
        assert!(matches!(
            store.resolve(&other),
            Err(OverlapError::InternalInvariant(_))
        ));
    }

    #[test]
    fn test_validated_geometry_values() {
        let g = match crate::vector::parse_wkt("POLYGON((1 1, 3 1, 3 2, 1 2, 1 1))").unwrap() {
            geo_types::Geometry::Polygon(p) => ValidatedGeometry::new(MultiPolygon(vec![p])),
            _ => unreachable!(),
        };
        assert_eq!(g.area(), 2.0);
        assert_eq!(g.bounding_box(), BoundingBox::new(1.0, 3.0, 1.0, 2.0));
        assert_eq!(g.key().as_str(), "POLYGON((1 1,3 1,3 2,1 2,1 1))");
    }
}
