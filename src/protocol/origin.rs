//! Allowed-origins policy shared by the shell and its guests

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::RouteError;

/// Which sender origins a receiver accepts.
///
/// Parsed from the configuration string: `*`, `same-origin`, or a
/// `;`-delimited list of origins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    #[default]
    Any,
    /// Unresolved; becomes a one-entry allow-list once the page origin is known.
    SameOrigin,
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Replace `same-origin` with the page's own origin.
    pub fn resolve(&self, page_origin: &str) -> OriginPolicy {
        match self {
            OriginPolicy::SameOrigin => OriginPolicy::AllowList(vec![page_origin.to_string()]),
            other => other.clone(),
        }
    }

    /// Check an inbound sender origin. An unresolved `same-origin` policy
    /// accepts nothing.
    pub fn check(&self, origin: &str) -> Result<(), RouteError> {
        let allowed = match self {
            OriginPolicy::Any => true,
            OriginPolicy::SameOrigin => false,
            OriginPolicy::AllowList(origins) => origins.iter().any(|o| o == origin),
        };
        if allowed {
            Ok(())
        } else {
            Err(RouteError::OriginRejected {
                origin: origin.to_string(),
            })
        }
    }

    /// Target origins for outbound posts; the channel only delivers a post
    /// whose target matches the receiver, so an allow-list posts once per entry.
    pub fn target_origins(&self) -> Vec<String> {
        match self {
            OriginPolicy::Any => vec!["*".to_string()],
            OriginPolicy::SameOrigin => Vec::new(),
            OriginPolicy::AllowList(origins) => origins.clone(),
        }
    }
}

impl FromStr for OriginPolicy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = match s.trim() {
            "*" => OriginPolicy::Any,
            "same-origin" => OriginPolicy::SameOrigin,
            list => OriginPolicy::AllowList(
                list.split(';')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };
        Ok(policy)
    }
}

impl fmt::Display for OriginPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginPolicy::Any => write!(f, "*"),
            OriginPolicy::SameOrigin => write!(f, "same-origin"),
            OriginPolicy::AllowList(origins) => write!(f, "{}", origins.join(";")),
        }
    }
}
