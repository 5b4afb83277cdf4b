//! One preparation run over a loaded feed.

use tracing::{info, warn};

use crate::clustering::{apply_aliases, compute_clusters, AliasOutcome, ClusterMap};
use crate::config::PipelineConfig;
use crate::filter::{filter_dates, FilterReport};
use crate::models::feed::Feed;
use crate::models::types::Result;

#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    /// `None` when no cutoff date was configured
    pub filter: Option<FilterReport>,
    pub clusters: ClusterMap,
    pub aliases: AliasOutcome,
}

/// Filter by service date, then cluster and alias the stops
///
/// Configuration is checked before anything is touched. An error from the
/// clustering stage leaves the stop and stop time tables as they were after
/// filtering.
pub fn prepare_feed(feed: &mut Feed, config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let filter = config.filter.cutoff_date.map(|cutoff| filter_dates(feed, cutoff));

    info!("computing stop aliases");
    let clusters = compute_clusters(
        &feed.stops,
        config.aliases.bucket_precision,
        config.aliases.distance_threshold_km,
    )?;

    let aliases = apply_aliases(&mut feed.stops, &mut feed.stop_times, &clusters)?;

    let dangling = feed.dangling_stop_refs();
    if !dangling.is_empty() {
        warn!(count = dangling.len(), first = %dangling[0], "stop times reference unknown stops");
    }

    Ok(PipelineReport {
        filter,
        clusters,
        aliases,
    })
}
