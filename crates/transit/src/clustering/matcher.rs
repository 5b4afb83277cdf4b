//! Pairwise matching of stops within a bucket.

use itertools::Itertools;
use tracing::warn;

use crate::clustering::bucket::{Bucket, LocatedStop};
use crate::identifiers::StopIdentifier;
use crate::spatial::DistanceMetric;

/// Buckets bigger than this make the quadratic comparison noticeable
pub const LARGE_BUCKET_WARN: usize = 64;

/// Undirected link between two stops, stored with `a < b`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkEdge {
    a: StopIdentifier,
    b: StopIdentifier,
}

impl LinkEdge {
    pub fn new(x: StopIdentifier, y: StopIdentifier) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    pub fn a(&self) -> &StopIdentifier {
        &self.a
    }

    pub fn b(&self) -> &StopIdentifier {
        &self.b
    }
}

/// Are two located stops the same place?
///
/// Strictly closer than `threshold_km`, or exactly the same name.
pub fn is_linked(
    x: &LocatedStop<'_>,
    y: &LocatedStop<'_>,
    metric: &dyn DistanceMetric,
    threshold_km: f64,
) -> bool {
    x.stop.stop_name == y.stop.stop_name
        || metric.distance_km(x.location, y.location) < threshold_km
}

/// All linked pairs in one bucket
pub fn link_pairs(
    bucket: &Bucket<'_>,
    metric: &dyn DistanceMetric,
    threshold_km: f64,
) -> Vec<LinkEdge> {
    if bucket.len() > LARGE_BUCKET_WARN {
        warn!(
            key = %bucket.key,
            stops = bucket.len(),
            "large bucket, pairwise matching is quadratic; consider a finer precision"
        );
    }

    bucket
        .stops
        .iter()
        .tuple_combinations()
        .filter(|(x, y)| x.stop.stop_id != y.stop.stop_id)
        .filter(|(x, y)| is_linked(x, y, metric, threshold_km))
        .map(|(x, y)| LinkEdge::new(x.stop.stop_id.clone(), y.stop.stop_id.clone()))
        .collect()
}
