use super::engine::OverlapRecord;
use std::collections::HashSet;

/// An unordered pair of parcel ids, stored lowest first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub low: String,
    pub high: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> PairKey {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        PairKey {
            low: low.to_string(),
            high: high.to_string(),
        }
    }
}

/// Lets each unordered pair of parcels through once per run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<PairKey>,
}

impl Deduplicator {
    pub fn new() -> Deduplicator {
        Deduplicator::default()
    }

    /// Returns true the first time the record's pair is offered.
    pub fn accept(&mut self, record: &OverlapRecord) -> bool {
        self.accept_pair(&record.parcel_a, &record.parcel_b)
    }

    pub fn accept_pair(&mut self, a: &str, b: &str) -> bool {
        self.seen.insert(PairKey::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
