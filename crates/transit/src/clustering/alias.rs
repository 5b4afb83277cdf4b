//! Replacing clustered stops with synthesized alias stops.
//!
//! Application happens in two phases. [`AliasPlan::new`] checks every
//! cluster against the stop table and builds all alias rows without touching
//! anything; [`AliasPlan::apply`] then performs the mutation, which cannot
//! fail. A bad cluster map therefore leaves both tables exactly as they were.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use tracing::{debug, info};

use crate::clustering::{Cluster, ClusterMap};
use crate::identifiers::StopIdentifier;
use crate::models::types::{Result, Stop, StopTimeRef, TransitError};

/// Separator between member names in an alias stop's name
pub const NAME_SEPARATOR: &str = "/";

/// What [`apply_aliases`] did
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasOutcome {
    /// Original stop id → alias id, for every removed stop
    pub renamed: HashMap<StopIdentifier, StopIdentifier>,
    pub aliases_inserted: usize,
    pub stops_removed: usize,
    pub refs_rewritten: usize,
}

/// Validated alias rows, ready to be written into the tables
#[derive(Clone, Debug)]
pub struct AliasPlan {
    rows: Vec<Stop>,
    renamed: HashMap<StopIdentifier, StopIdentifier>,
}

impl AliasPlan {
    /// Check `clusters` against `stops` and build the alias rows
    pub fn new(stops: &[Stop], clusters: &ClusterMap) -> Result<Self> {
        let mut rows_by_id: HashMap<&StopIdentifier, &Stop> = HashMap::with_capacity(stops.len());
        for stop in stops {
            if rows_by_id.insert(&stop.stop_id, stop).is_some() {
                return Err(TransitError::DuplicateStopId(stop.stop_id.clone()));
            }
        }

        let mut renamed: HashMap<StopIdentifier, StopIdentifier> = HashMap::new();
        let mut owner: HashMap<&StopIdentifier, &StopIdentifier> = HashMap::new();

        for (canonical, cluster) in clusters {
            check_cluster(canonical, cluster)?;

            let alias_id = cluster.alias_id();
            if rows_by_id.contains_key(&alias_id) {
                return Err(TransitError::AliasCollision { alias: alias_id });
            }

            for id in &cluster.members {
                if let Some(first) = owner.insert(id, canonical) {
                    return Err(TransitError::OverlappingClusters {
                        stop: id.clone(),
                        first: first.clone(),
                        second: canonical.clone(),
                    });
                }
                if !rows_by_id.contains_key(id) {
                    return Err(TransitError::StopNotFound(id.clone()));
                }
                renamed.insert(id.clone(), alias_id.clone());
            }
        }

        // Member rows in stop table order
        let mut members: BTreeMap<&StopIdentifier, Vec<&Stop>> = BTreeMap::new();
        for stop in stops {
            if let Some(canonical) = owner.get(&stop.stop_id) {
                members.entry(*canonical).or_default().push(stop);
            }
        }

        let mut rows = Vec::with_capacity(clusters.len());
        for (canonical, members) in members {
            let row = merge_members(rows_by_id[canonical], &members);
            debug!(alias = %row.stop_id, name = %row.stop_name, members = members.len(), "built alias stop");
            rows.push(row);
        }

        Ok(Self { rows, renamed })
    }

    /// Write the plan into the tables
    ///
    /// Member rows are removed, alias rows are appended in canonical id order
    /// and stop time references are pointed at the aliases.
    pub fn apply(self, stops: &mut Vec<Stop>, stop_times: &mut [StopTimeRef]) -> AliasOutcome {
        let before = stops.len();
        stops.retain(|stop| !self.renamed.contains_key(&stop.stop_id));
        let stops_removed = before - stops.len();

        let aliases_inserted = self.rows.len();
        stops.extend(self.rows);

        let mut refs_rewritten = 0;
        for stop_time in stop_times.iter_mut() {
            if let Some(alias) = self.renamed.get(&stop_time.stop_id) {
                stop_time.stop_id = alias.clone();
                refs_rewritten += 1;
            }
        }

        AliasOutcome {
            renamed: self.renamed,
            aliases_inserted,
            stops_removed,
            refs_rewritten,
        }
    }
}

/// Replace every cluster with its alias stop and rewrite references to it
///
/// Either every cluster is applied or, on error, neither table is touched.
pub fn apply_aliases(
    stops: &mut Vec<Stop>,
    stop_times: &mut [StopTimeRef],
    clusters: &ClusterMap,
) -> Result<AliasOutcome> {
    let plan = AliasPlan::new(stops, clusters)?;
    let outcome = plan.apply(stops, stop_times);

    info!(
        aliases = outcome.aliases_inserted,
        stops_removed = outcome.stops_removed,
        refs_rewritten = outcome.refs_rewritten,
        "assigned aliased stops"
    );

    Ok(outcome)
}

fn check_cluster(key: &StopIdentifier, cluster: &Cluster) -> Result<()> {
    let invalid = |reason: &str| TransitError::InvalidCluster {
        canonical: key.clone(),
        reason: reason.to_string(),
    };

    if *key != cluster.canonical {
        return Err(invalid("keyed under a different id than its canonical id"));
    }
    if cluster.len() < 2 {
        return Err(invalid("fewer than two members"));
    }
    if cluster.members.first() != Some(&cluster.canonical) {
        return Err(invalid("canonical id is not the smallest member"));
    }
    Ok(())
}

/// Alias row built on `template` (the canonical stop) from `members` in
/// stop table order
fn merge_members(template: &Stop, members: &[&Stop]) -> Stop {
    let mut row = template.clone();
    row.stop_id = template.stop_id.alias();
    row.stop_name = members
        .iter()
        .map(|stop| stop.stop_name.as_str())
        .unique()
        .join(NAME_SEPARATOR);

    let located: Vec<_> = members.iter().filter_map(|stop| stop.location()).collect();
    if !located.is_empty() {
        let n = located.len() as f64;
        row.stop_lat = Some(located.iter().map(|p| p.y()).sum::<f64>() / n);
        row.stop_lon = Some(located.iter().map(|p| p.x()).sum::<f64>() / n);
    }

    row
}
