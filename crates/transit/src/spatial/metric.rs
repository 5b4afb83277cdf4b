//! Pluggable spatial primitives used by the clustering engine.
//!
//! Callers with their own cell scheme or distance model implement these;
//! [`Geohash`] and [`Haversine`] are what a normal run uses.

use geo::Point;

use crate::spatial::queries::haversine_km;

/// Maps a location to the key of the bucket it is compared within
pub trait BucketKey {
    /// `None` means the location cannot be bucketed (e.g. out of range)
    fn bucket_key(&self, location: Point) -> Option<String>;
}

/// Distance between two locations in kilometers
pub trait DistanceMetric {
    fn distance_km(&self, a: Point, b: Point) -> f64;
}

/// Geohash prefix of fixed length
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geohash {
    pub precision: usize,
}

impl Geohash {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }
}

impl BucketKey for Geohash {
    fn bucket_key(&self, location: Point) -> Option<String> {
        let coord = geohash::Coord {
            x: location.x(),
            y: location.y(),
        };
        geohash::encode(coord, self.precision).ok()
    }
}

/// Great-circle distance on the mean Earth radius
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn distance_km(&self, a: Point, b: Point) -> f64 {
        haversine_km(a, b)
    }
}
