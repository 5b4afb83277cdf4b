//! Feed tables, record types and errors.

pub mod calendar;
pub mod feed;
pub mod types;

// Re-exports for convenience
pub use calendar::{CalendarException, ExceptionKind, ServiceCalendar};
pub use feed::Feed;
pub use types::{Agency, Attributes, Result, Route, Stop, StopTimeRef, TransitError, Trip};
