//! Service calendars (GTFS calendar.txt and calendar_dates.txt).
//!
//! Only the date range matters for filtering; the rest of a calendar row is
//! carried for the writer in `attributes`.

use chrono::NaiveDate;

use crate::identifiers::ServiceIdentifier;
use crate::models::types::Attributes;

/// Date range of a service's regular schedule
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceCalendar {
    pub service_id: ServiceIdentifier,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Weekday columns and anything else passed through
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
}

impl ServiceCalendar {
    pub fn new(service_id: impl Into<ServiceIdentifier>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            service_id: service_id.into(),
            start_date,
            end_date,
            attributes: Attributes::new(),
        }
    }

    /// Does the service still have days on or after `cutoff`?
    pub fn active_from(&self, cutoff: NaiveDate) -> bool {
        self.end_date >= cutoff
    }
}

/// calendar_dates.txt exception_type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ExceptionKind {
    Added = 1,
    Removed = 2,
}

/// A single added or removed service day
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarException {
    pub service_id: ServiceIdentifier,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
}
