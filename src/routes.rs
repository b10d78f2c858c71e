//! Static route table for synthetic locations.
//!
//! A synthetic location id is a marker (e.g. `@library`) naming a special
//! host page rather than a real location. Tabs pointing at one are routed by
//! path instead of by space and location.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
}

impl RouteTable {
    pub fn new(routes: BTreeMap<String, String>) -> Self {
        Self { routes }
    }

    /// Build the table from the configured marker -> path map
    pub fn from_config(config: &tab_session_config::Config) -> Self {
        Self::new(config.synthetic_routes.clone())
    }

    /// Host path for a synthetic marker, `None` for real locations
    pub fn path_for(&self, location_id: &str) -> Option<&str> {
        self.routes.get(location_id).map(String::as_str)
    }
}
