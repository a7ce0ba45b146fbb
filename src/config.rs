//! Configuration System
//!
//! Route descriptors and the shell/guest settings records. Files are loaded
//! through [`ConfigLoader`], which layers built-in defaults, an optional TOML
//! file and `METAROUTER__*` environment overrides.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fragment::DEFAULT_OUTLET;
use crate::logging::LoggingConfig;
use crate::protocol::OriginPolicy;

mod loader;

pub use loader::ConfigLoader;

/// One configured micro frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Unique route path; also the element id of the route's frame
    pub path: String,

    /// Entry point of the routed app
    pub app: String,

    /// Element id of the outlet hosting the frame
    #[serde(default = "default_outlet")]
    pub outlet: String,
}

/// Characters with a meaning in the location hash; route paths and outlet ids
/// must not contain them.
const RESERVED_CHARS: &[char] = &['/', ':', '(', ')'];

fn default_outlet() -> String {
    DEFAULT_OUTLET.to_string()
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            app: app.into(),
            outlet: default_outlet(),
        }
    }

    pub fn with_outlet(mut self, outlet: impl Into<String>) -> Self {
        self.outlet = outlet.into();
        self
    }

    /// Outlet id, falling back to the default for an empty value.
    pub fn outlet_id(&self) -> &str {
        if self.outlet.is_empty() {
            DEFAULT_OUTLET
        } else {
            &self.outlet
        }
    }
}

/// Shell router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Ordered routes; the first one is the default route
    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,

    /// Prefix placed between `#` and the sub-route in a frame's initial URL
    #[serde(default = "default_hash_prefix")]
    pub hash_prefix: String,

    /// Pixels added to every reported frame height
    #[serde(default = "default_additional_height")]
    pub additional_height: f64,

    /// `*`, `same-origin`, or a `;`-delimited origin list
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

pub(crate) fn default_hash_prefix() -> String {
    "/".to_string()
}

pub(crate) fn default_additional_height() -> f64 {
    5.0
}

pub(crate) fn default_allowed_origins() -> String {
    "*".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            hash_prefix: default_hash_prefix(),
            additional_height: default_additional_height(),
            allowed_origins: default_allowed_origins(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RouterConfig {
    pub fn with_routes(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        // FromStr for OriginPolicy never fails.
        self.allowed_origins.parse().unwrap_or_default()
    }

    /// Outlet ids in first-use order.
    pub fn outlets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.routes
            .iter()
            .map(RouteDescriptor::outlet_id)
            .filter(|outlet| seen.insert(*outlet))
            .collect()
    }

    /// Reject empty paths or entry points, duplicate paths, and paths or
    /// outlet ids the location hash cannot carry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut paths = HashSet::new();
        for (index, route) in self.routes.iter().enumerate() {
            if route.path.is_empty() {
                return Err(ConfigError::EmptyField { index, field: "path" });
            }
            if route.app.is_empty() {
                return Err(ConfigError::EmptyField { index, field: "app" });
            }
            for (field, value) in [("path", &route.path), ("outlet", &route.outlet)] {
                if value.contains(RESERVED_CHARS) {
                    return Err(ConfigError::ReservedCharacter {
                        index,
                        field,
                        value: value.clone(),
                    });
                }
            }
            if !paths.insert(route.path.as_str()) {
                return Err(ConfigError::DuplicateRoute(route.path.clone()));
            }
        }
        Ok(())
    }
}

/// Embedded app (guest) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The guest's own identifier; matches its route path in the shell
    pub app_path: String,

    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

impl AppConfig {
    pub fn new(app_path: impl Into<String>) -> Self {
        Self {
            app_path: app_path.into(),
            allowed_origins: default_allowed_origins(),
        }
    }

    pub fn with_allowed_origins(mut self, allowed_origins: impl Into<String>) -> Self {
        self.allowed_origins = allowed_origins.into();
        self
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        self.allowed_origins.parse().unwrap_or_default()
    }
}
