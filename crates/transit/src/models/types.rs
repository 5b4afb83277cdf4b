//! Core record types and errors for feed tables.

use std::collections::BTreeMap;

use geo::Point;

use crate::identifiers::*;

/// Columns carried through untouched (e.g. `stop_code`, `zone_id`).
pub type Attributes = BTreeMap<String, String>;

// ============================================================================
// Records
// ============================================================================

/// A row of `stops.txt`
///
/// Coordinates are optional because loaders hand over whatever the feed
/// contained; a stop without a finite lat/lon simply cannot take part in
/// clustering.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub stop_id: StopIdentifier,
    pub stop_name: String,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
}

impl Stop {
    pub fn new(
        stop_id: impl Into<StopIdentifier>,
        stop_name: impl Into<String>,
        stop_lat: f64,
        stop_lon: f64,
    ) -> Self {
        Self {
            stop_id: stop_id.into(),
            stop_name: stop_name.into(),
            stop_lat: Some(stop_lat),
            stop_lon: Some(stop_lon),
            attributes: Attributes::new(),
        }
    }

    /// Location as a `geo` point (x = lon, y = lat), if both coordinates are usable
    pub fn location(&self) -> Option<Point> {
        match (self.stop_lat, self.stop_lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Point::new(lon, lat))
            }
            _ => None,
        }
    }
}

/// A row of `stop_times.txt`; only `stop_id` is rewritten by aliasing
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopTimeRef {
    pub trip_id: TripIdentifier,
    pub stop_sequence: u32,
    pub stop_id: StopIdentifier,
    pub arrival: Option<u32>,   // Seconds since midnight (service day start)
    pub departure: Option<u32>, // Seconds since midnight (service day start)
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
}

impl StopTimeRef {
    pub fn new(
        trip_id: impl Into<TripIdentifier>,
        stop_sequence: u32,
        stop_id: impl Into<StopIdentifier>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            stop_sequence,
            stop_id: stop_id.into(),
            arrival: None,
            departure: None,
            attributes: Attributes::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    pub trip_id: TripIdentifier,
    pub route_id: RouteIdentifier,
    pub service_id: ServiceIdentifier,
    pub headsign: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub route_id: RouteIdentifier,
    pub agency_id: AgencyIdentifier,
    pub short_name: String,
    pub long_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agency {
    pub agency_id: AgencyIdentifier,
    pub name: String,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Duplicate stop id: {0}")]
    DuplicateStopId(StopIdentifier),

    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Stop id {0} is inside the alias namespace; was this feed already aliased?")]
    AliasNamespace(StopIdentifier),

    #[error("Alias id {alias} collides with an existing stop")]
    AliasCollision { alias: StopIdentifier },

    #[error("Stop {stop} is a member of clusters {first} and {second}")]
    OverlappingClusters {
        stop: StopIdentifier,
        first: StopIdentifier,
        second: StopIdentifier,
    },

    #[error("Invalid cluster {canonical}: {reason}")]
    InvalidCluster {
        canonical: StopIdentifier,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Routing backend error: {0}")]
    Routing(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
