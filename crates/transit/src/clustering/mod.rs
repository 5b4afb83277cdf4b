//! Stop clustering and aliasing.
//!
//! Stops that are the same physical place (close together, or sharing a name
//! within the same spatial bucket) are grouped into clusters and replaced by
//! one synthesized alias stop each:
//!
//! 1. [`bucket`] groups located stops by geohash prefix
//! 2. [`matcher`] links stop pairs inside each bucket
//! 3. [`components`] turns links into clusters (connected components)
//! 4. [`alias`] rewrites the stop and stop time tables
//!
//! ## Known limitation
//!
//! Only stops sharing a bucket key are ever compared. Two stops a few meters
//! apart on either side of a geohash cell edge stay separate; the same holds
//! across the ±180° meridian, where the geohash cells never meet.
//!
//! ## Preconditions
//!
//! Stop ids must be unique and must not start with
//! [`ALIAS_PREFIX`](crate::identifiers::ALIAS_PREFIX). Clustering a feed that
//! has already been aliased is rejected rather than merging aliases again.

pub mod alias;
pub mod bucket;
pub mod components;
pub mod matcher;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info};

use crate::config::AliasConfig;
use crate::identifiers::StopIdentifier;
use crate::models::types::{Result, Stop, TransitError};
use crate::spatial::{BucketKey, DistanceMetric, Geohash, Haversine};

pub use alias::{apply_aliases, AliasOutcome};
pub use matcher::LinkEdge;

/// Clusters keyed by canonical id
pub type ClusterMap = BTreeMap<StopIdentifier, Cluster>;

/// Stops judged to be the same physical place
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    /// Smallest member id
    pub canonical: StopIdentifier,
    pub members: BTreeSet<StopIdentifier>,
}

impl Cluster {
    /// Build a cluster from its members; `None` if there are none
    pub fn from_members(members: impl IntoIterator<Item = StopIdentifier>) -> Option<Self> {
        let members: BTreeSet<StopIdentifier> = members.into_iter().collect();
        let canonical = members.first()?.clone();
        Some(Self { canonical, members })
    }

    /// Id of the stop that replaces the members
    pub fn alias_id(&self) -> StopIdentifier {
        self.canonical.alias()
    }

    pub fn contains(&self, id: &StopIdentifier) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Cluster `stops` using geohash buckets and haversine distance
///
/// `distance_threshold` is in kilometers; pairs strictly closer than it, or
/// with identical names, are linked.
///
/// Canonical ids are the smallest member under string order, so numeric ids
/// compare textually: a cluster of `"9"` and `"10"` is keyed `"10"`.
pub fn compute_clusters(
    stops: &[Stop],
    bucket_precision: usize,
    distance_threshold: f64,
) -> Result<ClusterMap> {
    let config = AliasConfig {
        bucket_precision,
        distance_threshold_km: distance_threshold,
    };
    config.validate()?;

    compute_clusters_with(
        stops,
        &Geohash::new(bucket_precision),
        &Haversine,
        distance_threshold,
    )
}

/// Cluster `stops` with caller-supplied spatial primitives
pub fn compute_clusters_with(
    stops: &[Stop],
    keyer: &dyn BucketKey,
    metric: &dyn DistanceMetric,
    distance_threshold: f64,
) -> Result<ClusterMap> {
    if !(distance_threshold >= 0.0) {
        return Err(TransitError::InvalidConfig(format!(
            "distance threshold {} km must be a non-negative number",
            distance_threshold
        )));
    }
    check_stop_ids(stops)?;

    let buckets = bucket::bucket_stops(stops, keyer);

    let mut edges = Vec::new();
    for bucket in &buckets {
        let links = matcher::link_pairs(bucket, metric, distance_threshold);
        debug!(key = %bucket.key, stops = bucket.len(), links = links.len(), "matched bucket");
        edges.extend(links);
    }

    let clusters = components::connected_components(&edges);

    info!(
        stops = stops.len(),
        buckets = buckets.len(),
        links = edges.len(),
        clusters = clusters.len(),
        clustered_stops = clusters.values().map(Cluster::len).sum::<usize>(),
        "computed stop clusters"
    );

    Ok(clusters)
}

/// Ids must be unique and outside the alias namespace
pub(crate) fn check_stop_ids(stops: &[Stop]) -> Result<()> {
    let mut seen = HashSet::with_capacity(stops.len());
    for stop in stops {
        if stop.stop_id.is_alias() {
            return Err(TransitError::AliasNamespace(stop.stop_id.clone()));
        }
        if !seen.insert(&stop.stop_id) {
            return Err(TransitError::DuplicateStopId(stop.stop_id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cluster: &Cluster) -> Vec<&str> {
        cluster.members.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_reference_scenario() {
        let stops = vec![
            Stop::new("A", "Foo", 0.0, 0.0),
            Stop::new("B", "Foo", 0.0, 0.001),
            Stop::new("C", "Bar", 0.002, 0.0),
        ];

        let clusters = compute_clusters(&stops, 4, 0.15).unwrap();

        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[&StopIdentifier::new("A")];
        assert_eq!(ids(cluster), ["A", "B"]);
        assert_eq!(cluster.alias_id().as_str(), "cA");
    }

    #[test]
    fn test_zero_threshold_distinct_names() {
        let stops = vec![
            Stop::new("1", "Kamppi", 60.1690, 24.9318),
            Stop::new("2", "Kamppi (M)", 60.1690, 24.9318),
            Stop::new("3", "Narinkkatori", 60.1692, 24.9320),
        ];

        let clusters = compute_clusters(&stops, 4, 0.0).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_names_link_across_distance() {
        // Same name, ~1.1 km apart, same 4-char cell
        let stops = vec![
            Stop::new("10", "Itäkeskus", 60.2100, 25.0800),
            Stop::new("11", "Itäkeskus", 60.2100, 25.1000),
            Stop::new("12", "itäkeskus", 60.2100, 25.0900),
        ];

        let clusters = compute_clusters(&stops, 4, 0.15).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[&StopIdentifier::new("10")]), ["10", "11"]);
    }

    #[test]
    fn test_unlocated_stops_are_skipped() {
        let mut lost = Stop::new("2", "Foo", 0.0, 0.0);
        lost.stop_lat = None;
        let stops = vec![Stop::new("1", "Foo", 0.0, 0.0), lost];

        let clusters = compute_clusters(&stops, 4, 0.15).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_duplicate_ids_fail_fast() {
        let stops = vec![
            Stop::new("1", "Foo", 0.0, 0.0),
            Stop::new("1", "Bar", 10.0, 10.0),
        ];

        let err = compute_clusters(&stops, 4, 0.15).unwrap_err();
        assert!(matches!(err, TransitError::DuplicateStopId(id) if id.as_str() == "1"));
    }

    #[test]
    fn test_already_aliased_input_is_rejected() {
        let stops = vec![
            Stop::new("cA", "Foo", 0.0, 0.0),
            Stop::new("D", "Foo", 0.0, 0.0),
        ];

        let err = compute_clusters(&stops, 4, 0.15).unwrap_err();
        assert!(matches!(err, TransitError::AliasNamespace(id) if id.as_str() == "cA"));
    }

    #[test]
    fn test_invalid_parameters() {
        let stops = vec![Stop::new("1", "Foo", 0.0, 0.0)];

        assert!(compute_clusters(&stops, 0, 0.15).is_err());
        assert!(compute_clusters(&stops, 4, f64::NAN).is_err());
        assert!(compute_clusters_with(&stops, &Geohash::new(4), &Haversine, -1.0).is_err());
    }

    #[test]
    fn test_numeric_ids_compare_as_text() {
        let stops = vec![
            Stop::new("9", "Foo", 60.1709, 24.9415),
            Stop::new("10", "Foo", 60.1709, 24.9415),
        ];

        let clusters = compute_clusters(&stops, 4, 0.15).unwrap();
        let cluster = &clusters[&StopIdentifier::new("10")];
        assert_eq!(cluster.alias_id().as_str(), "c10");
    }

    #[test]
    fn test_cluster_from_members() {
        let cluster = Cluster::from_members(["b", "a", "c"].map(StopIdentifier::new)).unwrap();
        assert_eq!(cluster.canonical.as_str(), "a");
        assert_eq!(cluster.len(), 3);
        assert!(cluster.contains(&StopIdentifier::new("c")));

        assert!(Cluster::from_members(Vec::new()).is_none());
    }
}
