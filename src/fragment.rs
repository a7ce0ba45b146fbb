//! Fragment Codec
//!
//! Packs the routes of several outlets into the single shared location hash
//! and reads them back. The format is
//! `[<default outlet route>][//<outlet>:<route>]*`; a route may contain
//! balanced parentheses whose content is carried opaquely, including any `//`
//! or `:` inside them.

mod routes;
mod scanner;

pub use routes::OutletRoutes;

use scanner::{Scanner, Symbols};

/// Outlet identifier used when a route descriptor names none
pub const DEFAULT_OUTLET: &str = "outlet";

/// Separator between outlet entries
pub const SEPARATOR: &str = "//";

/// Serialize an outlet → route mapping into a hash fragment.
///
/// The default outlet comes first without a key; every other outlet follows
/// as `key:value` in insertion order.
pub fn serialize(routes: &OutletRoutes) -> String {
    let mut parts = Vec::with_capacity(routes.len());
    if let Some(route) = routes.get(DEFAULT_OUTLET) {
        parts.push(route.to_string());
    }
    parts.extend(
        routes
            .iter()
            .filter(|(outlet, _)| *outlet != DEFAULT_OUTLET)
            .map(|(outlet, route)| format!("{}:{}", outlet, route)),
    );
    parts.join(SEPARATOR)
}

/// Parse a hash fragment (without the leading `#`) into an outlet → route mapping.
///
/// Never fails: unbalanced parentheses clamp at depth zero and a trailing
/// entry without a key is dropped.
pub fn parse(hash: &str) -> OutletRoutes {
    if hash.is_empty() {
        return OutletRoutes::new();
    }

    let mut scanner = Scanner::new(DEFAULT_OUTLET);
    for symbol in Symbols::new(hash) {
        if !scanner.feed(symbol) {
            break;
        }
    }
    scanner.into_pairs().into_iter().collect()
}

/// Split an encoded route into its app path and the remaining sub-route.
pub fn split_app_path(route: &str) -> (&str, &str) {
    route.split_once('/').unwrap_or((route, ""))
}
