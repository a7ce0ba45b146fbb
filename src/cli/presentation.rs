//! CLI presentation: text formatters. JSON output is plain serde.

use comfy_table::Table;

use crate::cli::route::SimulationReport;
use crate::fragment::{self, OutletRoutes};

/// Decoded hash as a table of outlet, app path and sub-route.
pub fn format_routes_text(routes: &OutletRoutes) -> String {
    if routes.is_empty() {
        return "No outlet routes in hash".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Outlet", "App", "Sub-route"]);
    for (outlet, route) in routes.iter() {
        let (app, sub_route) = fragment::split_app_path(route);
        table.add_row(vec![outlet, app, if sub_route.is_empty() { "-" } else { sub_route }]);
    }
    table.to_string()
}

pub fn format_simulation_text(report: &SimulationReport) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Frame", "Outlet", "Visible", "Source"]);
    for frame in &report.frames {
        let visible = if frame.visible { "yes" } else { "no" };
        table.add_row(vec![
            frame.path.as_str(),
            frame.outlet.as_str(),
            visible,
            frame.src.as_str(),
        ]);
    }

    let mut output = format!("Hash: #{}\n", report.hash);
    if let Some(active) = &report.active {
        output.push_str(&format!("Active route: {}\n", active));
    }
    output.push_str(&format!("Messages sent to frames: {}\n", report.messages.len()));
    output.push_str(&table.to_string());
    output
}
