//! Service-date filtering with referential pruning.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::info;

use crate::identifiers::*;
use crate::models::feed::Feed;

/// Table sizes before and after [`filter_dates`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub trips: (usize, usize),
    pub stop_times: (usize, usize),
    pub stops: (usize, usize),
    pub agencies: (usize, usize),
}

/// Drop everything that no longer runs on or after `cutoff`
///
/// Calendars ending before the cutoff and exceptions dated before it go
/// first, then trips of vanished services, their stop times, and agencies no
/// route refers to. Stops stay even when nothing calls at them any more;
/// ground travel planning still needs them.
pub fn filter_dates(feed: &mut Feed, cutoff: NaiveDate) -> FilterReport {
    let before = FilterReport {
        trips: (feed.trips.len(), 0),
        stop_times: (feed.stop_times.len(), 0),
        stops: (feed.stops.len(), 0),
        agencies: (feed.agencies.len(), 0),
    };

    feed.calendar.retain(|c| c.active_from(cutoff));
    feed.calendar_dates.retain(|d| d.date >= cutoff);

    let services: HashSet<&ServiceIdentifier> = feed.calendar.iter().map(|c| &c.service_id).collect();
    feed.trips.retain(|t| services.contains(&t.service_id));

    let trips: HashSet<&TripIdentifier> = feed.trips.iter().map(|t| &t.trip_id).collect();
    feed.stop_times.retain(|st| trips.contains(&st.trip_id));

    let agencies: HashSet<&AgencyIdentifier> = feed.routes.iter().map(|r| &r.agency_id).collect();
    feed.agencies.retain(|a| agencies.contains(&a.agency_id));

    let report = FilterReport {
        trips: (before.trips.0, feed.trips.len()),
        stop_times: (before.stop_times.0, feed.stop_times.len()),
        stops: (before.stops.0, feed.stops.len()),
        agencies: (before.agencies.0, feed.agencies.len()),
    };

    info!(
        %cutoff,
        trips = ?report.trips,
        stop_times = ?report.stop_times,
        stops = ?report.stops,
        agencies = ?report.agencies,
        "filtered feed by service date"
    );

    report
}
