//! Ground-travel planning between stops.
//!
//! Pairs of stops that no trip connects directly are candidates for a drive
//! instead. [`plan_ground_jobs`] lists them with straight-line estimates,
//! and [`enrich_jobs`] asks a [`RoutingBackend`] for real drive times. The
//! backend is supplied by the caller; this crate does no network I/O.

use std::collections::HashSet;

use geo::Point;
use tracing::{debug, info, warn};

use crate::config::GroundConfig;
use crate::identifiers::StopIdentifier;
use crate::models::feed::Feed;
use crate::models::types::{Result, StopTimeRef};
use crate::spatial::index::{StopIndex, StopNode};

// ============================================================================
// Routing backend
// ============================================================================

/// One candidate path returned by a router
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutePath {
    pub time_ms: u64,
    pub distance_m: f64,
}

/// Road router for car travel between two points
///
/// Implementations typically wrap an HTTP routing service. An empty list
/// means the router found no path.
pub trait RoutingBackend {
    fn route(&self, from: Point, to: Point) -> Result<Vec<RoutePath>>;
}

// ============================================================================
// Jobs
// ============================================================================

/// Fastest drive found for a job
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveTime {
    pub duration_min: f64,
    pub distance_km: f64,
}

impl From<RoutePath> for DriveTime {
    fn from(path: RoutePath) -> Self {
        Self {
            duration_min: path.time_ms as f64 / 1000.0 / 60.0,
            distance_km: path.distance_m / 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundJob {
    /// Smaller id of the pair
    pub id1: StopIdentifier,
    pub id2: StopIdentifier,
    pub p1: Point,
    pub p2: Point,
    pub bird_dist_km: f64,
    pub bird_dur_min: f64,
    /// Far enough apart to be worth routing
    pub should_route: bool,
    pub drive: Option<DriveTime>,
    pub error: Option<String>,
}

/// Unordered pairs of stops visited one after another by some trip
pub fn extant_pairs(stop_times: &[StopTimeRef]) -> HashSet<(StopIdentifier, StopIdentifier)> {
    let mut ordered: Vec<&StopTimeRef> = stop_times.iter().collect();
    ordered.sort_by(|a, b| {
        a.trip_id
            .cmp(&b.trip_id)
            .then(a.stop_sequence.cmp(&b.stop_sequence))
    });

    ordered
        .windows(2)
        .filter(|w| w[0].trip_id == w[1].trip_id && w[0].stop_id != w[1].stop_id)
        .map(|w| sorted_pair(&w[0].stop_id, &w[1].stop_id))
        .collect()
}

/// Ground travel candidates between all located stops within `max_route_km`
///
/// Pairs already joined by a trip hop are left out. Jobs come back sorted by
/// id pair.
pub fn plan_ground_jobs(feed: &Feed, config: &GroundConfig) -> Result<Vec<GroundJob>> {
    config.validate()?;

    let extant = extant_pairs(&feed.stop_times);
    let nodes: Vec<StopNode> = feed
        .stops
        .iter()
        .enumerate()
        .filter_map(|(row, stop)| stop.location().map(|p| StopNode::new(p, row)))
        .collect();
    let index = StopIndex::new(nodes.clone());

    let mut jobs = Vec::new();
    for node in &nodes {
        let here = &feed.stops[node.row];
        for (other, dist) in index.within_km(node.location(), config.max_route_km) {
            // Each pair once, from its lower row
            if other.row <= node.row {
                continue;
            }
            let there = &feed.stops[other.row];
            if here.stop_id == there.stop_id {
                continue;
            }
            let (id1, id2) = sorted_pair(&here.stop_id, &there.stop_id);
            if extant.contains(&(id1.clone(), id2.clone())) {
                continue;
            }
            let (p1, p2) = if id1 == here.stop_id {
                (node.location(), other.location())
            } else {
                (other.location(), node.location())
            };

            jobs.push(GroundJob {
                id1,
                id2,
                p1,
                p2,
                bird_dist_km: dist,
                bird_dur_min: dist / config.avg_speed_kmh * 60.0,
                should_route: dist >= config.min_route_km,
                drive: None,
                error: None,
            });
        }
    }

    jobs.sort_by(|a, b| (&a.id1, &a.id2).cmp(&(&b.id1, &b.id2)));

    info!(
        stops = index.len(),
        extant = extant.len(),
        jobs = jobs.len(),
        routable = jobs.iter().filter(|j| j.should_route).count(),
        "planned ground travel jobs"
    );

    Ok(jobs)
}

/// Counts from one [`enrich_jobs`] pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub routed: usize,
    pub no_path: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Fill in drive times for routable jobs that don't have one yet
///
/// A backend error is recorded on its job and does not stop the pass.
pub fn enrich_jobs(jobs: &mut [GroundJob], backend: &dyn RoutingBackend) -> EnrichReport {
    let mut report = EnrichReport::default();

    for job in jobs.iter_mut() {
        if !job.should_route || job.drive.is_some() {
            report.skipped += 1;
            continue;
        }

        match backend.route(job.p1, job.p2) {
            Ok(paths) => match paths.into_iter().min_by_key(|p| p.time_ms) {
                Some(fastest) => {
                    let drive = DriveTime::from(fastest);
                    debug!(id1 = %job.id1, id2 = %job.id2, minutes = drive.duration_min, "routed");
                    job.drive = Some(drive);
                    job.error = None;
                    report.routed += 1;
                }
                None => report.no_path += 1,
            },
            Err(e) => {
                warn!(id1 = %job.id1, id2 = %job.id2, error = %e, "routing failed");
                job.error = Some(e.to_string());
                report.failed += 1;
            }
        }
    }

    info!(
        routed = report.routed,
        no_path = report.no_path,
        failed = report.failed,
        skipped = report.skipped,
        "enriched ground travel jobs"
    );

    report
}

/// Compact drive time entry: whole minutes and whole kilometers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriveTimeRow {
    pub id1: StopIdentifier,
    pub id2: StopIdentifier,
    pub minutes: u32,
    pub km: u32,
}

/// Rows for every job with a drive time, truncated like the app expects
pub fn drive_time_table(jobs: &[GroundJob]) -> Vec<DriveTimeRow> {
    jobs.iter()
        .filter_map(|job| {
            let drive = job.drive?;
            Some(DriveTimeRow {
                id1: job.id1.clone(),
                id2: job.id2.clone(),
                minutes: drive.duration_min as u32,
                km: drive.distance_km as u32,
            })
        })
        .collect()
}

fn sorted_pair(a: &StopIdentifier, b: &StopIdentifier) -> (StopIdentifier, StopIdentifier) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}
