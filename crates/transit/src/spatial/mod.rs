//! Spatial primitives: distances, bucket keys and the stop R-tree.

pub mod index;
pub mod metric;
pub mod queries;

pub use metric::{BucketKey, DistanceMetric, Geohash, Haversine};
pub use queries::{haversine_distance, haversine_km};
