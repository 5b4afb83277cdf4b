//! The set of tables one preparation run works on.

use std::collections::HashSet;

use crate::identifiers::*;
use crate::models::calendar::{CalendarException, ServiceCalendar};
use crate::models::types::*;

/// In-memory feed, one `Vec` per table
///
/// Loaders fill it, the preparation steps mutate it in place and writers
/// take it back out. Row order is preserved by every step.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feed {
    pub agencies: Vec<Agency>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub calendar: Vec<ServiceCalendar>,
    pub calendar_dates: Vec<CalendarException>,
    pub stops: Vec<Stop>,
    pub stop_times: Vec<StopTimeRef>,
}

impl Feed {
    /// Stop ids referenced from `stop_times`
    pub fn referenced_stop_ids(&self) -> HashSet<&StopIdentifier> {
        self.stop_times.iter().map(|st| &st.stop_id).collect()
    }

    /// Referenced stop ids with no row in `stops`
    pub fn dangling_stop_refs(&self) -> Vec<StopIdentifier> {
        let known: HashSet<&StopIdentifier> = self.stops.iter().map(|s| &s.stop_id).collect();
        let mut dangling: Vec<StopIdentifier> = self
            .referenced_stop_ids()
            .into_iter()
            .filter(|id| !known.contains(id))
            .cloned()
            .collect();
        dangling.sort();
        dangling
    }
}
