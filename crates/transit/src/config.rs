//! Explicit configuration for a preparation run.
//!
//! Nothing here is global: every entry point takes the struct it needs.

use chrono::NaiveDate;

use crate::models::types::{Result, TransitError};

/// Longest geohash the bucketer accepts
pub const MAX_BUCKET_PRECISION: usize = 12;

/// Stop clustering parameters
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AliasConfig {
    /// Geohash length used as the bucket key (4 ≈ 39 km × 20 km cells)
    pub bucket_precision: usize,
    /// Stops closer than this (km) are the same place
    pub distance_threshold_km: f64,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            bucket_precision: 4,
            distance_threshold_km: 0.15,
        }
    }
}

impl AliasConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_BUCKET_PRECISION).contains(&self.bucket_precision) {
            return Err(TransitError::InvalidConfig(format!(
                "bucket precision {} outside 1..={}",
                self.bucket_precision, MAX_BUCKET_PRECISION
            )));
        }
        if !(self.distance_threshold_km >= 0.0) {
            return Err(TransitError::InvalidConfig(format!(
                "distance threshold {} km must be a non-negative number",
                self.distance_threshold_km
            )));
        }
        Ok(())
    }
}

/// Service-date filtering parameters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// Services ending before this date are dropped; `None` keeps everything
    pub cutoff_date: Option<NaiveDate>,
}

/// Ground-travel job planning parameters
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundConfig {
    /// Pairs closer than this (km) are walkable and not worth routing
    pub min_route_km: f64,
    /// Pairs further apart than this (km) are never routed
    pub max_route_km: f64,
    /// Speed used for the straight-line duration estimate
    pub avg_speed_kmh: f64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            min_route_km: 1.0,
            max_route_km: 160.0,
            avg_speed_kmh: 60.0,
        }
    }
}

impl GroundConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_route_km >= 0.0 && self.max_route_km >= self.min_route_km) {
            return Err(TransitError::InvalidConfig(format!(
                "routing window {}..={} km is empty or negative",
                self.min_route_km, self.max_route_km
            )));
        }
        if !(self.avg_speed_kmh > 0.0) || !self.avg_speed_kmh.is_finite() {
            return Err(TransitError::InvalidConfig(format!(
                "average speed {} km/h must be positive",
                self.avg_speed_kmh
            )));
        }
        Ok(())
    }
}

/// Everything `prepare_feed` needs
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub filter: FilterConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aliases: AliasConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.aliases.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AliasConfig::default().validate().is_ok());
        assert!(GroundConfig::default().validate().is_ok());
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_alias_config_rejects_bad_values() {
        let zero = AliasConfig { bucket_precision: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(TransitError::InvalidConfig(_))));

        let long = AliasConfig { bucket_precision: 13, ..Default::default() };
        assert!(long.validate().is_err());

        let nan = AliasConfig { distance_threshold_km: f64::NAN, ..Default::default() };
        assert!(nan.validate().is_err());

        let negative = AliasConfig { distance_threshold_km: -0.1, ..Default::default() };
        assert!(negative.validate().is_err());

        let zero_threshold = AliasConfig { distance_threshold_km: 0.0, ..Default::default() };
        assert!(zero_threshold.validate().is_ok());
    }

    #[test]
    fn test_ground_config_rejects_bad_values() {
        let inverted = GroundConfig { min_route_km: 10.0, max_route_km: 5.0, ..Default::default() };
        assert!(inverted.validate().is_err());

        let stopped = GroundConfig { avg_speed_kmh: 0.0, ..Default::default() };
        assert!(stopped.validate().is_err());
    }
}
