//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{CliError, RouteError};

/// Map errors to a string for CLI output.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Route(RouteError::OutletMissing { .. }) => format!(
            "{} (every outlet named in the configuration needs an element with that id)",
            e
        ),
        _ => e.to_string(),
    }
}
