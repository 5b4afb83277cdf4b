//! Spatial bucketing of stops.

use std::collections::BTreeMap;

use geo::Point;
use tracing::debug;

use crate::models::types::Stop;
use crate::spatial::BucketKey;

/// A stop with a usable location
#[derive(Clone, Copy, Debug)]
pub struct LocatedStop<'a> {
    pub stop: &'a Stop,
    pub location: Point,
}

/// Stops sharing a bucket key, in stop table order
#[derive(Clone, Debug)]
pub struct Bucket<'a> {
    pub key: String,
    pub stops: Vec<LocatedStop<'a>>,
}

impl Bucket<'_> {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Group stops by bucket key, in key order
///
/// Stops without a location or bucket key are left out, and so are buckets
/// holding a single stop since there is nothing to compare it with.
pub fn bucket_stops<'a>(stops: &'a [Stop], keyer: &dyn BucketKey) -> Vec<Bucket<'a>> {
    let mut grouped: BTreeMap<String, Vec<LocatedStop<'a>>> = BTreeMap::new();
    let mut skipped = 0usize;

    for stop in stops {
        let Some(location) = stop.location() else {
            skipped += 1;
            continue;
        };
        let Some(key) = keyer.bucket_key(location) else {
            skipped += 1;
            continue;
        };
        grouped.entry(key).or_default().push(LocatedStop { stop, location });
    }

    if skipped > 0 {
        debug!(skipped, "stops without a usable location left out of clustering");
    }

    grouped
        .into_iter()
        .filter(|(_, stops)| stops.len() > 1)
        .map(|(key, stops)| Bucket { key, stops })
        .collect()
}
