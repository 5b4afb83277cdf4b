//! Type-safe, cheaply cloned identifiers for feed entities.
//!
//! All identifiers use Arc<str> and order byte-wise by their string value.
//! That order is what picks a cluster's canonical id, so it has to be total
//! and independent of how the feed happened to be read.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Prefix that marks a stop id as a synthesized alias.
///
/// Raw feed ids must never start with it.
pub const ALIAS_PREFIX: &str = "c";

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.as_str().cmp(other.as_str())
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

impl_identifier!(StopIdentifier);
impl_identifier!(TripIdentifier);
impl_identifier!(RouteIdentifier);
impl_identifier!(ServiceIdentifier);
impl_identifier!(AgencyIdentifier);

impl StopIdentifier {
    /// Alias id for a cluster whose canonical member is `self`.
    pub fn alias(&self) -> Self {
        Self::new(format!("{ALIAS_PREFIX}{}", self.0))
    }

    /// True if the id lives in the alias namespace.
    pub fn is_alias(&self) -> bool {
        self.0.starts_with(ALIAS_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = StopIdentifier::new("stop_123");
        let id2 = StopIdentifier::new("stop_123");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(StopIdentifier::new("test"), 42);

        assert_eq!(map.get(&StopIdentifier::new("test")), Some(&42));
    }

    #[test]
    fn test_identifier_order_is_bytewise() {
        let mut ids: Vec<StopIdentifier> = ["9", "10", "B", "A", "a"]
            .into_iter()
            .map(StopIdentifier::new)
            .collect();
        ids.sort();

        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(sorted, ["10", "9", "A", "B", "a"]);
    }

    #[test]
    fn test_alias_namespace() {
        let raw = StopIdentifier::new("1042");
        let alias = raw.alias();

        assert_eq!(alias.as_str(), "c1042");
        assert!(alias.is_alias());
        assert!(!raw.is_alias());
    }

    #[test]
    fn test_identifier_display() {
        let id = TripIdentifier::new("trip_1");
        assert_eq!(format!("{}", id), "trip_1");
    }

    #[test]
    fn test_identifier_conversions() {
        let _id1: ServiceIdentifier = "weekday".into();
        let _id2: AgencyIdentifier = String::from("vr").into();
    }
}
