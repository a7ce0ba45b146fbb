//! Ordered outlet → route mapping

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Outlet identifier → encoded route, kept in insertion order.
///
/// Re-inserting an existing outlet replaces its value but keeps its position,
/// so repeated navigations in one outlet never reorder the hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutletRoutes {
    entries: Vec<(String, String)>,
}

impl OutletRoutes {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `outlet`'s route; an existing entry keeps its position.
    pub fn insert(&mut self, outlet: impl Into<String>, route: impl Into<String>) {
        let outlet = outlet.into();
        let route = route.into();
        match self.entries.iter_mut().find(|(key, _)| *key == outlet) {
            Some(entry) => entry.1 = route,
            None => self.entries.push((outlet, route)),
        }
    }

    /// Encoded route of `outlet`, if present.
    pub fn get(&self, outlet: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == outlet)
            .map(|(_, route)| route.as_str())
    }

    /// Number of outlets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(outlet, route)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(outlet, route)| (outlet.as_str(), route.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OutletRoutes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut routes = OutletRoutes::new();
        for (outlet, route) in iter {
            routes.insert(outlet, route);
        }
        routes
    }
}

impl IntoIterator for OutletRoutes {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for OutletRoutes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (outlet, route) in &self.entries {
            map.serialize_entry(outlet, route)?;
        }
        map.end()
    }
}
