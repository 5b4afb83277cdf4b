//! # kartturi-transit
//!
//! Feed preparation for a multi-leg journey planner.
//!
//! ## Features
//!
//! - **Stop aliasing**: stops that are the same physical place are merged
//!   into one alias stop and every reference is rewritten
//! - **Date filtering**: services that ended before a cutoff are dropped
//!   together with their trips and stop times
//! - **Ground travel**: candidate drive legs between stops, enriched through
//!   a pluggable routing backend
//!
//! All steps work on in-memory tables; reading and writing feeds is left to
//! the caller.
//!
//! ## Example
//!
//! ```
//! use kartturi_transit::prelude::*;
//!
//! let mut stops = vec![
//!     Stop::new("A", "Foo", 0.0, 0.0),
//!     Stop::new("B", "Foo", 0.0, 0.001),
//!     Stop::new("C", "Bar", 0.002, 0.0),
//! ];
//! let mut stop_times = vec![StopTimeRef::new("t1", 1, "B")];
//!
//! let clusters = compute_clusters(&stops, 4, 0.15).unwrap();
//! assert_eq!(clusters.len(), 1);
//!
//! apply_aliases(&mut stops, &mut stop_times, &clusters).unwrap();
//! assert_eq!(stops[1].stop_id.as_str(), "cA");
//! assert_eq!(stop_times[0].stop_id.as_str(), "cA");
//! ```

pub mod clustering;
pub mod config;
pub mod filter;
pub mod ground;
pub mod identifiers;
pub mod models;
pub mod pipeline;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::clustering::{
        apply_aliases, compute_clusters, compute_clusters_with, AliasOutcome, Cluster, ClusterMap,
    };
    pub use crate::config::*;
    pub use crate::filter::{filter_dates, FilterReport};
    pub use crate::ground::{
        drive_time_table, enrich_jobs, plan_ground_jobs, DriveTimeRow, GroundJob, RoutePath,
        RoutingBackend,
    };
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::pipeline::{prepare_feed, PipelineReport};
    pub use crate::spatial::{BucketKey, DistanceMetric, Geohash, Haversine};
}

pub use prelude::*;
